//! The dictionaries of the encoder and decoder.
//!
//! Both sides assign codes in the same order, with the same [`Cursor`]. The encoder looks up
//! symbols by content while the decoder looks them up by code, so each has its own layout.
use crate::alloc::{boxed::Box, vec, vec::Vec};
use crate::{Code, FIRST_DYNAMIC, MAX_ENTRIES};

/// The next free code, shared bookkeeping of both tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cursor {
    next: Code,
}

impl Cursor {
    pub(crate) fn new() -> Self {
        Cursor { next: FIRST_DYNAMIC }
    }

    pub(crate) fn next(self) -> Code {
        self.next
    }

    /// If the next code would not fit into the code width.
    pub(crate) fn is_full(self) -> bool {
        usize::from(self.next) >= MAX_ENTRIES
    }

    /// Hand out the next code.
    fn advance(&mut self) -> Code {
        debug_assert!(!self.is_full());
        let code = self.next;
        self.next += 1;
        code
    }

    fn reset(&mut self) {
        self.next = FIRST_DYNAMIC;
    }
}

/// Successors with few entries are searched linearly.
const FEW: usize = 16;

/// Where the successors of one symbol are stored.
#[derive(Clone, Copy)]
enum Successors {
    None,
    Few(u16),
    Dense(u16),
}

#[derive(Clone, Copy)]
struct Few {
    bytes: [u8; FEW],
    codes: [Code; FEW],
    len: u8,
}

#[derive(Clone, Copy)]
struct Dense {
    /// `Code::MAX` for bytes without a successor.
    next: [Code; 256],
}

/// Symbol to code dictionary of the encoder.
///
/// Every dynamic symbol is an existing symbol extended by one byte. The table is thus a tree
/// keyed by `(code of prefix, byte)`, which identifies the content of each symbol uniquely.
pub(crate) struct EncodeTable {
    /// The successors of each assigned code, `nodes.len() == cursor.next()`.
    nodes: Vec<Successors>,
    few: Vec<Few>,
    dense: Vec<Dense>,
    cursor: Cursor,
}

impl EncodeTable {
    pub(crate) fn new() -> Self {
        let mut table = EncodeTable {
            nodes: Vec::with_capacity(MAX_ENTRIES),
            few: Vec::new(),
            dense: Vec::new(),
            cursor: Cursor::new(),
        };
        table.reset();
        table
    }

    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The number of symbols in the table.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drop all dynamic symbols.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.resize(usize::from(FIRST_DYNAMIC), Successors::None);
        self.few.clear();
        self.dense.clear();
        self.cursor.reset();
    }

    /// The code of `prefix + byte`, if that symbol is known.
    pub(crate) fn find(&self, prefix: Code, byte: u8) -> Option<Code> {
        match self.nodes[usize::from(prefix)] {
            Successors::None => None,
            Successors::Few(idx) => {
                let few = &self.few[usize::from(idx)];
                few.bytes[..usize::from(few.len)]
                    .iter()
                    .position(|&b| b == byte)
                    .map(|pos| few.codes[pos])
            }
            Successors::Dense(idx) => {
                let next = self.dense[usize::from(idx)].next[usize::from(byte)];
                if next == Code::MAX {
                    None
                } else {
                    Some(next)
                }
            }
        }
    }

    /// Assign the next code to `prefix + byte`, which must not be known yet.
    pub(crate) fn insert(&mut self, prefix: Code, byte: u8) -> Code {
        debug_assert!(self.find(prefix, byte).is_none());
        let code = self.cursor.advance();
        let slot = usize::from(prefix);

        match self.nodes[slot] {
            Successors::None => {
                let mut few = Few {
                    bytes: [0; FEW],
                    codes: [0; FEW],
                    len: 1,
                };
                few.bytes[0] = byte;
                few.codes[0] = code;
                self.nodes[slot] = Successors::Few(self.few.len() as u16);
                self.few.push(few);
            }
            Successors::Few(idx) if usize::from(self.few[usize::from(idx)].len) < FEW => {
                let few = &mut self.few[usize::from(idx)];
                let at = usize::from(few.len);
                few.bytes[at] = byte;
                few.codes[at] = code;
                few.len += 1;
            }
            Successors::Few(idx) => {
                // Promote, the old entry in `few` stays unused until the next reset.
                let few = &self.few[usize::from(idx)];
                let mut dense = Dense {
                    next: [Code::MAX; 256],
                };
                for (&b, &c) in few.bytes.iter().zip(few.codes.iter()) {
                    dense.next[usize::from(b)] = c;
                }
                dense.next[usize::from(byte)] = code;
                self.nodes[slot] = Successors::Dense(self.dense.len() as u16);
                self.dense.push(dense);
            }
            Successors::Dense(idx) => {
                self.dense[usize::from(idx)].next[usize::from(byte)] = code;
            }
        }

        self.nodes.push(Successors::None);
        code
    }
}

/// Code to symbol dictionary of the decoder.
pub(crate) struct DecodeTable {
    /// One slot per possible code, `None` while unassigned.
    slots: Vec<Option<Box<[u8]>>>,
    cursor: Cursor,
}

impl DecodeTable {
    pub(crate) fn new() -> Self {
        let mut slots = vec![None; MAX_ENTRIES];
        for (byte, slot) in slots.iter_mut().take(usize::from(FIRST_DYNAMIC)).enumerate() {
            *slot = Some(Box::from([byte as u8]));
        }

        DecodeTable {
            slots,
            cursor: Cursor::new(),
        }
    }

    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The number of assigned symbols.
    pub(crate) fn len(&self) -> usize {
        usize::from(self.cursor.next())
    }

    /// Unassign all dynamic codes.
    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots[usize::from(FIRST_DYNAMIC)..] {
            *slot = None;
        }
        self.cursor.reset();
    }

    /// The symbol of a code, `None` if it is unassigned or out of range.
    pub(crate) fn get(&self, code: Code) -> Option<&[u8]> {
        self.slots.get(usize::from(code))?.as_deref()
    }

    /// Assign the next code to `prefix + byte`.
    pub(crate) fn insert(&mut self, prefix: &[u8], byte: u8) -> Code {
        let code = self.cursor.advance();
        let mut symbol = Vec::with_capacity(prefix.len() + 1);
        symbol.extend_from_slice(prefix);
        symbol.push(byte);
        self.slots[usize::from(code)] = Some(symbol.into_boxed_slice());
        code
    }
}
