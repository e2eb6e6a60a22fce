//! A module for all encoding needs.
use crate::alloc::vec::Vec;
use crate::table::EncodeTable;
use crate::{Code, FIRST_DYNAMIC};

#[cfg(feature = "std")]
use crate::decode::AllResult;
#[cfg(feature = "std")]
use crate::pack::{self, Packer};
#[cfg(feature = "std")]
use crate::Format;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

/// The greedy longest match encoder.
///
/// The dictionary and the pending match are kept across calls to [`encode_bytes`], so the input
/// may be supplied in arbitrary pieces. Call [`finish`] after the last piece.
///
/// [`encode_bytes`]: #method.encode_bytes
/// [`finish`]: #method.finish
pub struct Encoder {
    /// The symbol to code dictionary.
    table: EncodeTable,
    /// The code of the symbol matched so far, `None` while nothing is matched.
    current: Option<Code>,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
    format: Format,
}

/// An async encoding sink.
///
/// See [`Encoder::into_async`] on how to create this type and more information.
///
/// [`Encoder::into_async`]: struct.Encoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
    format: Format,
}

impl Encoder {
    /// Create an encoder with a fresh dictionary.
    pub fn new() -> Self {
        Encoder {
            table: EncodeTable::new(),
            current: None,
        }
    }

    /// Encode all of `inp`, appending the codes that are complete to `out`.
    ///
    /// The last matched symbol is held back since a later byte may still extend it.
    pub fn encode_bytes(&mut self, inp: &[u8], out: &mut Vec<Code>) {
        for &byte in inp {
            if self.table.cursor().is_full() {
                // The cursor moves only when a code is emitted, right after which the match is
                // a single byte again. Its code survives the reset.
                debug_assert!(self.current.map_or(true, |code| code < FIRST_DYNAMIC));
                tracing::debug!(emitted = out.len(), "encoder dictionary full, resetting");
                self.table.reset();
            }

            let prefix = match self.current {
                Some(prefix) => prefix,
                None => {
                    self.current = Some(Code::from(byte));
                    continue;
                }
            };

            match self.table.find(prefix, byte) {
                Some(code) => self.current = Some(code),
                None => {
                    out.push(prefix);
                    self.table.insert(prefix, byte);
                    self.current = Some(Code::from(byte));
                }
            }
        }
    }

    /// Mark the input as complete, appending the code of the pending match to `out`.
    ///
    /// Nothing is appended if no byte has been encoded since the last call. The dictionary is
    /// kept, so encoding more bytes afterwards does not start a new independent stream.
    pub fn finish(&mut self, out: &mut Vec<Code>) {
        if let Some(code) = self.current.take() {
            out.push(code);
        }
    }

    /// Encode a complete input.
    pub fn encode(&mut self, data: &[u8]) -> Vec<Code> {
        let mut codes = Vec::new();
        self.encode_bytes(data, &mut codes);
        self.finish(&mut codes);
        codes
    }

    /// The code that the next new symbol will be assigned.
    pub fn next_code(&self) -> Code {
        self.table.cursor().next()
    }

    /// The number of symbols in the dictionary, including the 256 single bytes.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Construct a encoder into a writer.
    ///
    /// The stream is written in [`Format::Counted`] unless changed with
    /// [`IntoStream::format`].
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
            format: Format::default(),
        }
    }

    /// Construct a encoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            encoder: self,
            writer,
            format: Format::default(),
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

/// The codes and bytes of a stream which have not been written yet.
#[cfg(feature = "std")]
struct Pending {
    format: Format,
    codes: Vec<Code>,
    packer: Packer,
    bytes: Vec<u8>,
}

#[cfg(feature = "std")]
impl Pending {
    fn new(format: Format) -> Self {
        Pending {
            format,
            codes: Vec::new(),
            packer: Packer::new(),
            bytes: Vec::new(),
        }
    }

    /// Encode a chunk, returning the bytes that can be written already.
    fn encode(&mut self, encoder: &mut Encoder, data: &[u8]) -> &[u8] {
        self.bytes.clear();
        encoder.encode_bytes(data, &mut self.codes);

        // The count precedes the counted format, so it is only written in `finish`.
        if let Format::Legacy = self.format {
            self.packer.extend(&self.codes, &mut self.bytes);
            self.codes.clear();
        }

        &self.bytes
    }

    /// Encode the end of the input, returning all remaining bytes.
    fn finish(&mut self, encoder: &mut Encoder) -> &[u8] {
        self.bytes.clear();
        encoder.finish(&mut self.codes);

        match self.format {
            Format::Counted => {
                self.bytes = pack::pack(&self.codes, Format::Counted);
            }
            Format::Legacy => {
                self.packer.extend(&self.codes, &mut self.bytes);
                self.packer.finish(&mut self.bytes);
            }
        }

        self.codes.clear();
        &self.bytes
    }
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, W> {
    /// Choose the framing of the written stream.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Encode all data from a reader.
    ///
    /// This will drain the supplied reader and finish the encoder.
    pub fn encode_all(self, mut read: impl BufRead) -> AllResult {
        let IntoStream {
            encoder,
            mut writer,
            format,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut pending = Pending::new(format);

        let status = (|| -> io::Result<()> {
            loop {
                let data = read.fill_buf()?;
                if data.is_empty() {
                    break;
                }

                let consumed = data.len();
                let ready = pending.encode(encoder, data);
                read.consume(consumed);
                bytes_read += consumed;

                writer.write_all(ready)?;
                bytes_written += ready.len();
            }

            let ready = pending.finish(encoder);
            writer.write_all(ready)?;
            bytes_written += ready.len();
            writer.flush()
        })();

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

#[cfg(feature = "async")]
impl<W: futures::io::AsyncWrite + Unpin> IntoAsync<'_, W> {
    /// Choose the framing of the written stream.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Encode all data from an async reader.
    ///
    /// This will drain the supplied reader and finish the encoder.
    pub async fn encode_all(
        self,
        mut read: impl futures::io::AsyncBufRead + Unpin,
    ) -> AllResult {
        use futures::io::{AsyncBufReadExt, AsyncWriteExt};

        let IntoAsync {
            encoder,
            mut writer,
            format,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut pending = Pending::new(format);

        let status = async {
            loop {
                let data = read.fill_buf().await?;
                if data.is_empty() {
                    break;
                }

                let consumed = data.len();
                let ready = pending.encode(encoder, data);
                read.consume_unpin(consumed);
                bytes_read += consumed;

                writer.write_all(ready).await?;
                bytes_written += ready.len();
            }

            let ready = pending.finish(encoder);
            writer.write_all(ready).await?;
            bytes_written += ready.len();
            writer.flush().await
        }
        .await;

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}
