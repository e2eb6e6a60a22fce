//! # Fixed width LZW decoder and encoder
//!
//! This crate provides an [`Encoder`] and a [`Decoder`] for LZW with a fixed code width of 12
//! bits, so the dictionary holds at most 4096 symbols. The first 256 codes always stand for the
//! single bytes. Once the dictionary is full it is reset to these 256 entries, at the same point
//! of the code stream for both sides.
//!
//! Codes are persisted two at a time in groups of three bytes, most significant nibble first.
//! There are two framings of that packing, see [`Format`]. The default one carries an explicit
//! code count and round-trips every input. The legacy one is headerless and cannot tell an odd
//! trailing code apart from a code pair ending in `0`.
//!
//! Examplary use:
//!
//! ```
//! use lzw12::{Format, compress, decompress};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let packed = compress(data, Format::Counted);
//! let unpacked = decompress(&packed, Format::Counted).unwrap();
//! assert_eq!(unpacked, data);
//! ```
//!
//! The code level interfaces are available as well:
//!
//! ```
//! use lzw12::{decode::Decoder, encode::Encoder};
//! let codes = Encoder::new().encode(b"AAAAAAAAAA");
//! assert_eq!(codes, [65, 256, 257, 258]);
//!
//! let data = Decoder::new().decode(&codes).unwrap();
//! assert_eq!(data, b"AAAAAAAAAA");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

/// The width of every code.
pub const MAX_CODESIZE: u8 = 12;
/// The capacity of the dictionary.
pub const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;
/// The first code which is assigned dynamically.
pub const FIRST_DYNAMIC: Code = 256;

/// Alias for a LZW code point
pub type Code = u16;

/// The framing of packed code streams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// A four byte big endian code count followed by the packed groups.
    #[default]
    Counted,
    /// The packed groups only.
    ///
    /// An odd number of codes is padded with a code `0` that can not be told apart from a real
    /// one, a decoder will see and decode it.
    Legacy,
}

#[cfg(feature = "alloc")]
pub mod decode;
#[cfg(feature = "alloc")]
pub mod encode;
#[cfg(feature = "std")]
pub mod file;
#[cfg(feature = "alloc")]
pub mod pack;
#[cfg(feature = "alloc")]
mod table;

#[cfg(feature = "alloc")]
pub use crate::decode::{Decoder, LzwError};
#[cfg(feature = "alloc")]
pub use crate::encode::Encoder;

/// Compress `data` into a packed stream of the given format.
#[cfg(feature = "alloc")]
pub fn compress(data: &[u8], format: Format) -> alloc::vec::Vec<u8> {
    let codes = Encoder::new().encode(data);
    pack::pack(&codes, format)
}

/// Decompress a packed stream of the given format.
#[cfg(feature = "alloc")]
pub fn decompress(packed: &[u8], format: Format) -> Result<alloc::vec::Vec<u8>, LzwError> {
    let codes = pack::unpack(packed, format)?;
    Decoder::new().decode(&codes)
}
