//! NSLogger binary log stream decoder
//!
//! NSLogger clients write log messages as a sequence of length-prefixed
//! binary records. This crate walks such a buffer and renders one line of
//! delimited text (or one JSON object) per message.
//!
//! # Format Overview
//!
//! All integers are big-endian.
//!
//! ```text
//! Stream  := Message*
//! Message := totalSize:u32 partCount:u16 Part{partCount}
//! Part    := key:u8 type:u8 Payload
//!
//! Payload(Int16)               := u8[2]
//! Payload(Int32)               := u8[4]
//! Payload(Int64)               := u8[8]
//! Payload(String|Binary|Image) := len:u32 data:u8[len]
//! ```
//!
//! `totalSize` covers everything after the size field itself: the part
//! count and all part bytes.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("session.rawnsloggerdata")?;
//! let text = nslog::decode_stream(&data, ",")?;
//! print!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod frame;
pub mod options;
pub mod part;
pub mod record;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

pub use decoder::{decode_stream, Decoder};
pub use frame::{frames, Frame, Frames};
pub use options::{Boundary, DecodeOptions};
pub use part::{decode_part, Part, Value};
pub use record::{JsonFormat, JsonRecord, Record, RecordFormat, TextFormat, TextRecord};
pub use types::{PartKey, PartType};

/// Size of the `totalSize` prefix in front of every message
pub const TOTAL_SIZE_LEN: usize = 4;

/// Size of the `partCount` field at the start of every message body
pub const PART_COUNT_LEN: usize = 2;

/// Size of the key + type header in front of every part
pub const PART_HEADER_LEN: usize = 2;

/// Size of the explicit length in front of String, Binary and Image payloads
pub const PAYLOAD_LEN_LEN: usize = 4;

/// Errors from stream decoding
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Truncated stream at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Unknown part key {key} at offset {offset}")]
    UnknownPartKey { offset: usize, key: u8 },

    #[error("Unknown part type {part_type} for key {key} at offset {offset}")]
    UnknownPartType { offset: usize, key: u8, part_type: u8 },

    #[error("Timestamp can't be decoded from part type {part_type} at offset {offset}")]
    InvalidTimestampEncoding { offset: usize, part_type: u8 },

    #[error("Timestamp {seconds} out of range at offset {offset}")]
    TimestampOutOfRange { offset: usize, seconds: i64 },

    #[error("Frame size mismatch at offset {offset}: declared {declared} bytes, parts used {consumed}")]
    FrameSizeMismatch {
        offset: usize,
        declared: usize,
        consumed: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Borrow `len` bytes at `offset`, or fail with [`Error::TruncatedStream`]
pub(crate) fn take(buffer: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(Error::TruncatedStream {
            offset,
            needed: len,
            available: buffer.len().saturating_sub(offset),
        })
}
