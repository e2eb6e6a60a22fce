//! A module for all decoding needs.
use crate::alloc::vec::Vec;
use crate::table::DecodeTable;
use crate::{Code, FIRST_DYNAMIC};

#[cfg(feature = "std")]
use crate::pack::Unpacker;
#[cfg(feature = "std")]
use crate::Format;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

/// The decoder, mirroring the dictionary of the [`Encoder`](crate::encode::Encoder).
///
/// Like the encoder it keeps its state across calls to [`decode_codes`], so codes may be
/// supplied in arbitrary pieces.
///
/// [`decode_codes`]: #method.decode_codes
pub struct Decoder {
    /// The code to symbol dictionary.
    table: DecodeTable,
    /// The symbol of the previous code, empty before the first code.
    previous: Vec<u8>,
    /// Scratch space for the symbol of the current code.
    current: Vec<u8>,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type and more information.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
    format: Format,
}

/// An async decoding sink.
///
/// See [`Decoder::into_async`] on how to create this type and more information.
///
/// [`Decoder::into_async`]: struct.Decoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
    format: Format,
}

/// The result of coding a whole stream from a reader into a writer.
#[cfg(feature = "std")]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Malformed code streams are reported with `ErrorKind::InvalidData` and the [`LzwError`]
    /// as the inner error.
    pub status: std::io::Result<()>,
}

/// The error of a malformed code or packed stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LzwError {
    /// A code that is neither assigned nor the next code to be assigned.
    #[error("invalid code in the code stream")]
    InvalidCode,
    /// The stream ends inside the count header.
    #[error("packed stream ends inside its count header")]
    TruncatedHeader,
    /// A headerless stream whose length is not a multiple of three.
    #[error("packed stream ends inside a group of three bytes")]
    TruncatedGroup,
    /// A counted stream whose length does not match its count.
    #[error("packed stream has {actual} bytes but its header announces {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    /// The unused half of the last group of a counted stream is not zero.
    #[error("padding of the last group is not zero")]
    NonZeroPadding,
}

impl Decoder {
    /// Create a decoder with a fresh dictionary.
    pub fn new() -> Self {
        Decoder {
            table: DecodeTable::new(),
            previous: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Decode all of `codes`, appending the symbols to `out`.
    ///
    /// On error, the symbols of all codes before the invalid one have been appended.
    pub fn decode_codes(&mut self, codes: &[Code], out: &mut Vec<u8>) -> Result<(), LzwError> {
        for &code in codes {
            self.decode_code(code)?;
            out.extend_from_slice(&self.previous);
        }

        Ok(())
    }

    /// Decode a complete code sequence.
    pub fn decode(&mut self, codes: &[Code]) -> Result<Vec<u8>, LzwError> {
        let mut out = Vec::new();
        self.decode_codes(codes, &mut out)?;
        Ok(out)
    }

    /// Decode one code into `self.previous`.
    fn decode_code(&mut self, code: Code) -> Result<(), LzwError> {
        if self.previous.is_empty() {
            if code >= FIRST_DYNAMIC {
                return Err(LzwError::InvalidCode);
            }
            self.previous.push(code as u8);
            return Ok(());
        }

        if self.table.cursor().is_full() {
            tracing::debug!(code, "decoder dictionary full, resetting");
            self.table.reset();
        }

        self.current.clear();
        match self.table.get(code) {
            Some(symbol) => self.current.extend_from_slice(symbol),
            // The encoder created this code from the previous symbol just now.
            None if code == self.table.cursor().next() => {
                self.current.extend_from_slice(&self.previous);
                self.current.push(self.previous[0]);
            }
            None => return Err(LzwError::InvalidCode),
        }

        self.table.insert(&self.previous, self.current[0]);
        core::mem::swap(&mut self.previous, &mut self.current);
        Ok(())
    }

    /// The code that the next new symbol will be assigned.
    pub fn next_code(&self) -> Code {
        self.table.cursor().next()
    }

    /// The number of symbols in the dictionary, including the 256 single bytes.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Construct a decoder into a writer.
    ///
    /// The stream is read as [`Format::Counted`] unless changed with [`IntoStream::format`].
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            decoder: self,
            writer,
            format: Format::default(),
        }
    }

    /// Construct a decoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            decoder: self,
            writer,
            format: Format::default(),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

/// Unpacked codes and decoded bytes of a stream which have not been written yet.
#[cfg(feature = "std")]
struct Pending {
    unpacker: Unpacker,
    codes: Vec<Code>,
    bytes: Vec<u8>,
}

#[cfg(feature = "std")]
impl Pending {
    fn new(format: Format) -> Self {
        Pending {
            unpacker: Unpacker::new(format),
            codes: Vec::new(),
            bytes: Vec::new(),
        }
    }

    /// Decode a chunk of packed bytes.
    ///
    /// The bytes are those of all codes before an invalid one, they should be written even when
    /// the status is an error.
    fn decode(&mut self, decoder: &mut Decoder, data: &[u8]) -> (&[u8], io::Result<()>) {
        self.codes.clear();
        self.bytes.clear();
        self.unpacker.unpack_bytes(data, &mut self.codes);
        let status = decoder
            .decode_codes(&self.codes, &mut self.bytes)
            .map_err(invalid_data);
        (&self.bytes, status)
    }

    fn finish(&self) -> io::Result<()> {
        self.unpacker.finish().map_err(invalid_data)
    }
}

#[cfg(feature = "std")]
fn invalid_data(err: LzwError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, W> {
    /// Choose the framing of the read stream.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Decode data from a reader.
    ///
    /// This will drain the supplied reader. Errors in the framing are only detected once the
    /// reader is exhausted, after all complete codes have been written.
    pub fn decode_all(self, mut read: impl BufRead) -> AllResult {
        let IntoStream {
            decoder,
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
                let (ready, decoded) = pending.decode(decoder, data);
                read.consume(consumed);
                bytes_read += consumed;

                writer.write_all(ready)?;
                bytes_written += ready.len();
                decoded?;
            }

            pending.finish()?;
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
    /// Choose the framing of the read stream.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Decode data from an async reader.
    ///
    /// This will drain the supplied reader.
    pub async fn decode_all(
        self,
        mut read: impl futures::io::AsyncBufRead + Unpin,
    ) -> AllResult {
        use futures::io::{AsyncBufReadExt, AsyncWriteExt};

        let IntoAsync {
            decoder,
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
                let (ready, decoded) = pending.decode(decoder, data);
                read.consume_unpin(consumed);
                bytes_read += consumed;

                writer.write_all(ready).await?;
                bytes_written += ready.len();
                decoded?;
            }

            pending.finish()?;
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
