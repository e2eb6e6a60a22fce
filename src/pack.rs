//! Packing of codes into bytes.
//!
//! Two codes share one group of three bytes, the first code in the high twelve bits:
//!
//! ```text
//! byte0 = code1[11..4]
//! byte1 = code1[3..0] code2[11..8]
//! byte2 = code2[7..0]
//! ```
//!
//! An odd last code is packed with a second code of `0`. [`Format::Counted`] prefixes the groups
//! with the number of codes as a big endian `u32` so that this padding can be dropped again.
use crate::alloc::vec::Vec;
use crate::decode::LzwError;
use crate::{Code, Format};

/// The length of the count header of [`Format::Counted`].
pub const HEADER_LEN: usize = 4;
/// The length of one group.
pub const GROUP_LEN: usize = 3;

const CODE_MASK: Code = 0xfff;

/// Packs codes into groups.
#[derive(Debug, Default)]
pub struct Packer {
    /// The first code of an incomplete group.
    pending: Option<Code>,
}

/// Unpacks codes from groups.
#[derive(Debug)]
pub struct Unpacker {
    format: Format,
    /// Count header, while incomplete.
    header: [u8; HEADER_LEN],
    /// Bytes of an incomplete group.
    group: [u8; GROUP_LEN],
    group_len: usize,
    /// The announced number of codes, once the header is complete.
    count: Option<usize>,
    /// The number of codes produced so far.
    produced: usize,
    /// The number of bytes consumed so far.
    consumed: usize,
    /// Set when a counted stream has an odd last code with non-zero padding.
    bad_padding: bool,
}

impl Packer {
    /// Create a packer with no pending code.
    pub fn new() -> Self {
        Packer::default()
    }

    /// Pack one code, appending a group to `out` when it is complete.
    pub fn push(&mut self, code: Code, out: &mut Vec<u8>) {
        match self.pending.take() {
            None => self.pending = Some(code),
            Some(first) => out.extend_from_slice(&pack_pair(first, code)),
        }
    }

    /// Pack a run of codes, see [`push`](#method.push).
    pub fn extend(&mut self, codes: &[Code], out: &mut Vec<u8>) {
        out.reserve(codes.len() / 2 * GROUP_LEN + GROUP_LEN);
        for &code in codes {
            self.push(code, out);
        }
    }

    /// Write out an incomplete last group, padded with a code of `0`.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if let Some(last) = self.pending.take() {
            out.extend_from_slice(&pack_pair(last, 0));
        }
    }
}

fn pack_pair(first: Code, second: Code) -> [u8; GROUP_LEN] {
    let first = first & CODE_MASK;
    let second = second & CODE_MASK;
    [
        (first >> 4) as u8,
        ((first & 0xf) << 4) as u8 | (second >> 8) as u8,
        (second & 0xff) as u8,
    ]
}

fn unpack_group(group: [u8; GROUP_LEN]) -> (Code, Code) {
    let [b0, b1, b2] = group.map(Code::from);
    ((b0 << 4) | (b1 >> 4), ((b1 & 0xf) << 8) | b2)
}

impl Unpacker {
    /// Create an unpacker for streams of the given format.
    pub fn new(format: Format) -> Self {
        Unpacker {
            format,
            header: [0; HEADER_LEN],
            group: [0; GROUP_LEN],
            group_len: 0,
            count: None,
            produced: 0,
            consumed: 0,
            bad_padding: false,
        }
    }

    /// The number of codes announced by the header, if it has been read.
    ///
    /// This is always `None` for [`Format::Legacy`].
    pub fn count(&self) -> Option<usize> {
        self.count
    }

    /// Unpack all of `inp`, appending complete codes to `out`.
    ///
    /// Incomplete headers and groups are kept for the next call. Bytes beyond the announced
    /// count are only reported by [`finish`](#method.finish).
    pub fn unpack_bytes(&mut self, mut inp: &[u8], out: &mut Vec<Code>) {
        self.consumed += inp.len();

        if let Format::Counted = self.format {
            if self.count.is_none() {
                let have = (self.consumed - inp.len()).min(HEADER_LEN);
                let take = (HEADER_LEN - have).min(inp.len());
                self.header[have..have + take].copy_from_slice(&inp[..take]);
                inp = &inp[take..];
                if have + take < HEADER_LEN {
                    return;
                }
                self.count = Some(u32::from_be_bytes(self.header) as usize);
            }
        }

        out.reserve((inp.len() + self.group_len) / GROUP_LEN * 2);
        for &byte in inp {
            self.group[self.group_len] = byte;
            self.group_len += 1;
            if self.group_len < GROUP_LEN {
                continue;
            }

            self.group_len = 0;
            let (first, second) = unpack_group(self.group);
            match self.remaining() {
                // Beyond the announced count.
                Some(0) => {}
                Some(1) => {
                    out.push(first);
                    self.produced += 1;
                    self.bad_padding |= second != 0;
                }
                None | Some(_) => {
                    out.extend_from_slice(&[first, second]);
                    self.produced += 2;
                }
            }
        }
    }

    /// Codes still to come in a counted stream.
    fn remaining(&self) -> Option<usize> {
        self.count.map(|count| count.saturating_sub(self.produced))
    }

    /// Check that the stream ended at a complete boundary.
    pub fn finish(&self) -> Result<(), LzwError> {
        match self.format {
            Format::Legacy => {
                if self.group_len != 0 {
                    return Err(LzwError::TruncatedGroup);
                }
            }
            Format::Counted => {
                let count = self.count.ok_or(LzwError::TruncatedHeader)?;
                let expected = counted_len(count);
                if self.consumed != expected {
                    return Err(LzwError::LengthMismatch {
                        expected,
                        actual: self.consumed,
                    });
                }
                if self.bad_padding {
                    return Err(LzwError::NonZeroPadding);
                }
            }
        }

        Ok(())
    }
}

/// The length of a counted stream of `count` codes.
///
/// Saturates, no stream in memory can be that long.
fn counted_len(count: usize) -> usize {
    count
        .div_ceil(2)
        .saturating_mul(GROUP_LEN)
        .saturating_add(HEADER_LEN)
}

/// Pack a complete code sequence.
///
/// # Panics
///
/// For [`Format::Counted`], if there are more than `u32::MAX` codes.
pub fn pack(codes: &[Code], format: Format) -> Vec<u8> {
    let mut out = Vec::with_capacity(counted_len(codes.len()));
    if let Format::Counted = format {
        let count = u32::try_from(codes.len()).expect("too many codes for the count header");
        out.extend_from_slice(&count.to_be_bytes());
    }

    let mut packer = Packer::new();
    packer.extend(codes, &mut out);
    packer.finish(&mut out);
    out
}

/// Unpack a complete packed stream.
pub fn unpack(bytes: &[u8], format: Format) -> Result<Vec<Code>, LzwError> {
    let mut unpacker = Unpacker::new(format);
    let mut codes = Vec::new();
    unpacker.unpack_bytes(bytes, &mut codes);
    unpacker.finish()?;
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::{pack, pack_pair, unpack, unpack_group, Unpacker};
    use crate::alloc::vec::Vec;
    use crate::{Code, Format, LzwError};

    #[test]
    fn pair_layout() {
        assert_eq!(pack_pair(0xabc, 0xdef), [0xab, 0xcd, 0xef]);
        assert_eq!(pack_pair(65, 256), [0x04, 0x11, 0x00]);
        assert_eq!(unpack_group([0xab, 0xcd, 0xef]), (0xabc, 0xdef));
    }

    #[test]
    fn every_code_in_both_positions() {
        for code in 0..4096 {
            let partner = 4095 - code;
            assert_eq!(unpack_group(pack_pair(code, partner)), (code, partner));
        }
    }

    #[test]
    fn odd_count_pads_with_zero() {
        assert_eq!(pack(&[0x123], Format::Legacy), [0x12, 0x30, 0x00]);
        assert_eq!(
            pack(&[0x123], Format::Counted),
            [0, 0, 0, 1, 0x12, 0x30, 0x00]
        );
    }

    #[test]
    fn legacy_keeps_padding() {
        let packed = pack(&[1, 2, 3], Format::Legacy);
        assert_eq!(unpack(&packed, Format::Legacy).unwrap(), [1, 2, 3, 0]);
    }

    #[test]
    fn counted_drops_padding() {
        let packed = pack(&[1, 2, 3], Format::Counted);
        assert_eq!(unpack(&packed, Format::Counted).unwrap(), [1, 2, 3]);

        let packed = pack(&[1, 2, 3, 0], Format::Counted);
        assert_eq!(unpack(&packed, Format::Counted).unwrap(), [1, 2, 3, 0]);
    }

    #[test]
    fn empty_streams() {
        assert!(pack(&[], Format::Legacy).is_empty());
        assert_eq!(pack(&[], Format::Counted), [0, 0, 0, 0]);
        assert!(unpack(&[], Format::Legacy).unwrap().is_empty());
        assert!(unpack(&[0, 0, 0, 0], Format::Counted).unwrap().is_empty());
    }

    #[test]
    fn malformed_lengths() {
        assert_eq!(
            unpack(&[1, 2, 3, 4], Format::Legacy),
            Err(LzwError::TruncatedGroup)
        );
        assert_eq!(unpack(&[0, 0], Format::Counted), Err(LzwError::TruncatedHeader));
        assert_eq!(
            unpack(&[0, 0, 0, 2, 1, 2], Format::Counted),
            Err(LzwError::LengthMismatch {
                expected: 7,
                actual: 6
            })
        );
        assert_eq!(
            unpack(&[0, 0, 0, 1, 1, 2, 3, 4, 5, 6], Format::Counted),
            Err(LzwError::LengthMismatch {
                expected: 7,
                actual: 10
            })
        );
        assert_eq!(
            unpack(&[0, 0, 0, 1, 0x12, 0x30, 0x01], Format::Counted),
            Err(LzwError::NonZeroPadding)
        );
    }

    #[test]
    fn byte_by_byte() {
        let codes: Vec<Code> = (0..101).map(|i| (i * 37) % 4096).collect();
        for &format in &[Format::Counted, Format::Legacy] {
            let packed = pack(&codes, format);
            let mut unpacker = Unpacker::new(format);
            let mut out = Vec::new();
            for byte in packed.chunks(1) {
                unpacker.unpack_bytes(byte, &mut out);
            }
            assert_eq!(unpacker.finish(), Ok(()));
            let announced = match format {
                Format::Counted => Some(101),
                Format::Legacy => None,
            };
            assert_eq!(unpacker.count(), announced);
            let expected = match format {
                Format::Counted => 101,
                Format::Legacy => 102,
            };
            assert_eq!(out.len(), expected);
            assert_eq!(out[..101], codes[..]);
        }
    }

    #[test]
    fn huge_count_header() {
        let mut unpacker = Unpacker::new(Format::Counted);
        let mut out = Vec::new();
        unpacker.unpack_bytes(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0], &mut out);
        assert_eq!(unpacker.count(), Some(u32::MAX as usize));
        assert_eq!(out, [0, 0]);
        assert!(matches!(
            unpacker.finish(),
            Err(LzwError::LengthMismatch { actual: 7, .. })
        ));
    }
}
