//! Part decoding
//!
//! A part is one key/type/value unit inside a message:
//! - Byte 0: part key
//! - Byte 1: part type
//! - Bytes 2+: payload, either fixed-width (Int16/Int32/Int64) or a 4-byte
//!   length followed by that many bytes (String/Binary/Image)

use std::borrow::Cow;
use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};

use crate::record::Record;
use crate::{
    take, DecodeOptions, Error, PartKey, PartType, Result, PART_HEADER_LEN, PAYLOAD_LEN_LEN,
};

/// Rendering of `TimestampS` parts
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Decoded part payload
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    /// String payload, borrowed from the buffer when it is valid UTF-8
    Text(Cow<'a, str>),
    /// Integer `TimestampS` part interpreted as Unix seconds
    Timestamp(DateTime<Utc>),
    /// Binary or image payload of `len` bytes, not decoded
    Skipped { len: usize },
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Self::Skipped { .. } => Ok(()),
        }
    }
}

/// One decoded part
#[derive(Debug, Clone, PartialEq)]
pub struct Part<'a> {
    /// Offset of the key byte in the buffer
    pub offset: usize,
    pub key: PartKey,
    pub part_type: PartType,
    /// Payload bytes after the 2-byte key/type header
    pub consumed: usize,
    pub value: Value<'a>,
}

impl Part<'_> {
    /// Bytes this part occupies in the stream, header included
    #[inline]
    pub fn size(&self) -> usize {
        PART_HEADER_LEN + self.consumed
    }

    /// Whether this part contributes a field to rendered output
    pub fn is_rendered(&self) -> bool {
        self.key != PartKey::MessageSeq && !matches!(self.value, Value::Skipped { .. })
    }

    /// Feed this part's value to a record
    ///
    /// Sequence numbers and skipped payloads add nothing.
    pub fn render_into<R: Record + ?Sized>(&self, record: &mut R) {
        if !self.is_rendered() {
            return;
        }

        match &self.value {
            Value::Int16(v) => record.add_int16(self.key, *v),
            Value::Int32(v) => record.add_int32(self.key, *v),
            Value::Int64(v) => record.add_int64(self.key, *v),
            Value::Text(s) => record.add_string(self.key, s),
            Value::Timestamp(_) => record.add_string(self.key, &self.value.to_string()),
            Value::Skipped { .. } => {}
        }
    }
}

/// Decode the part whose key byte is at `cursor`
pub fn decode_part<'a>(
    buffer: &'a [u8],
    cursor: usize,
    options: &DecodeOptions,
) -> Result<Part<'a>> {
    let header = take(buffer, cursor, PART_HEADER_LEN)?;
    let (raw_key, raw_type) = (header[0], header[1]);

    let key = PartKey::from_u8(raw_key, options.user_defined_keys).ok_or(Error::UnknownPartKey {
        offset: cursor,
        key: raw_key,
    })?;

    // Timestamps only come as Int32, Int64 or String, whatever the type byte
    if key == PartKey::TimestampS
        && !matches!(
            PartType::try_from(raw_type),
            Ok(PartType::Int32 | PartType::Int64 | PartType::String)
        )
    {
        return Err(Error::InvalidTimestampEncoding {
            offset: cursor,
            part_type: raw_type,
        });
    }

    let part_type = PartType::try_from(raw_type).map_err(|part_type| Error::UnknownPartType {
        offset: cursor,
        key: raw_key,
        part_type,
    })?;

    let (consumed, value) = read_value(buffer, cursor + PART_HEADER_LEN, part_type)?;

    let value = match (key, value) {
        (PartKey::TimestampS, Value::Int32(v)) => to_timestamp(i64::from(v), cursor)?,
        (PartKey::TimestampS, Value::Int64(v)) => to_timestamp(v, cursor)?,
        (_, value) => value,
    };

    if let Value::Skipped { len } = value {
        tracing::debug!(offset = cursor, ?key, ?part_type, len, "skipping unsupported payload");
    }

    Ok(Part {
        offset: cursor,
        key,
        part_type,
        consumed,
        value,
    })
}

/// Read a payload of the given type starting at `offset`
///
/// Returns the number of bytes consumed, including the length prefix of
/// variable-size types.
fn read_value(buffer: &[u8], offset: usize, part_type: PartType) -> Result<(usize, Value<'_>)> {
    if let Some(size) = part_type.fixed_size() {
        let data = take(buffer, offset, size)?;
        let value = match part_type {
            PartType::Int16 => Value::Int16(BigEndian::read_i16(data)),
            PartType::Int32 => Value::Int32(BigEndian::read_i32(data)),
            _ => Value::Int64(BigEndian::read_i64(data)),
        };
        return Ok((size, value));
    }

    let len = BigEndian::read_u32(take(buffer, offset, PAYLOAD_LEN_LEN)?) as usize;
    let data = take(buffer, offset + PAYLOAD_LEN_LEN, len)?;

    let value = if part_type == PartType::String {
        Value::Text(String::from_utf8_lossy(data))
    } else {
        Value::Skipped { len }
    };

    Ok((PAYLOAD_LEN_LEN + len, value))
}

fn to_timestamp(seconds: i64, offset: usize) -> Result<Value<'static>> {
    DateTime::from_timestamp(seconds, 0)
        .map(Value::Timestamp)
        .ok_or(Error::TimestampOutOfRange { offset, seconds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, TextRecord};

    fn part_bytes(key: u8, part_type: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![key, part_type];
        out.extend_from_slice(payload);
        out
    }

    fn prefixed(key: u8, part_type: u8, data: &[u8]) -> Vec<u8> {
        let mut payload = (data.len() as u32).to_be_bytes().to_vec();
        payload.extend_from_slice(data);
        part_bytes(key, part_type, &payload)
    }

    fn decode(data: &[u8]) -> Result<Part<'_>> {
        decode_part(data, 0, &DecodeOptions::default())
    }

    #[test]
    fn test_decode_int16() {
        let data = part_bytes(4, 2, &(-2i16).to_be_bytes());
        let part = decode(&data).unwrap();
        assert_eq!(part.key, PartKey::ThreadId);
        assert_eq!(part.part_type, PartType::Int16);
        assert_eq!(part.consumed, 2);
        assert_eq!(part.size(), 4);
        assert_eq!(part.value, Value::Int16(-2));
    }

    #[test]
    fn test_decode_int32() {
        let data = part_bytes(12, 3, &[0x00, 0x01, 0x00, 0x00]);
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 4);
        assert_eq!(part.value, Value::Int32(65536));
    }

    #[test]
    fn test_decode_int64() {
        let data = part_bytes(4, 4, &i64::MIN.to_be_bytes());
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 8);
        assert_eq!(part.value, Value::Int64(i64::MIN));
    }

    #[test]
    fn test_decode_string() {
        let data = prefixed(7, 0, "héllo".as_bytes());
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 4 + 6);
        assert_eq!(part.value, Value::Text(Cow::Borrowed("héllo")));
        assert!(matches!(part.value, Value::Text(Cow::Borrowed(_))));
    }

    #[test]
    fn test_decode_string_lengths() {
        for n in [0usize, 1, 3, 255, 256, 4096] {
            let text: String = "abcdefghij".chars().cycle().take(n).collect();
            let data = prefixed(5, 0, text.as_bytes());
            let part = decode(&data).unwrap();
            assert_eq!(part.consumed, 4 + n);
            assert_eq!(part.value.to_string(), text);
        }
    }

    #[test]
    fn test_decode_invalid_utf8_is_replaced() {
        let data = prefixed(7, 0, &[b'o', b'k', 0xff]);
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 7);
        assert_eq!(part.value.to_string(), "ok\u{fffd}");
    }

    #[test]
    fn test_binary_and_image_are_skipped() {
        let data = prefixed(7, 1, &[1, 2, 3]);
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 7);
        assert_eq!(part.value, Value::Skipped { len: 3 });
        assert!(!part.is_rendered());

        let data = prefixed(7, 5, &[0x89, b'P', b'N', b'G']);
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 8);
        assert_eq!(part.value, Value::Skipped { len: 4 });
    }

    #[test]
    fn test_empty_binary_consumes_length_field() {
        for part_type in [1u8, 5] {
            let data = prefixed(7, part_type, &[]);
            let part = decode(&data).unwrap();
            assert_eq!(part.consumed, 4);
            assert_eq!(part.size(), 6);
        }
    }

    #[test]
    fn test_timestamp_int32() {
        let data = part_bytes(1, 3, &1_700_000_000i32.to_be_bytes());
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 4);
        assert!(matches!(part.value, Value::Timestamp(_)));
        assert_eq!(part.value.to_string(), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_timestamp_int64() {
        let data = part_bytes(1, 4, &0i64.to_be_bytes());
        let part = decode(&data).unwrap();
        assert_eq!(part.consumed, 8);
        assert_eq!(part.value.to_string(), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_timestamp_string_passthrough() {
        let data = prefixed(1, 0, b"yesterday");
        let part = decode(&data).unwrap();
        assert_eq!(part.value.to_string(), "yesterday");
    }

    #[test]
    fn test_timestamp_invalid_encoding() {
        let data = part_bytes(1, 2, &[0, 1]);
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidTimestampEncoding {
                offset: 0,
                part_type: 2
            })
        ));

        let data = prefixed(1, 1, &[]);
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidTimestampEncoding {
                part_type: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_timestamp_unknown_type_byte() {
        // Key 1 with a type byte no part type uses
        let data = part_bytes(1, 9, &[0, 0, 0, 0]);
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidTimestampEncoding {
                offset: 0,
                part_type: 9
            })
        ));
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let data = part_bytes(1, 4, &i64::MAX.to_be_bytes());
        assert!(matches!(
            decode(&data),
            Err(Error::TimestampOutOfRange {
                seconds: i64::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_other_timestamp_keys_are_plain_integers() {
        let data = part_bytes(2, 2, &250i16.to_be_bytes());
        let part = decode(&data).unwrap();
        assert_eq!(part.key, PartKey::TimestampMs);
        assert_eq!(part.value, Value::Int16(250));
    }

    #[test]
    fn test_unknown_key() {
        let data = part_bytes(14, 3, &[0, 0, 0, 0]);
        assert!(matches!(
            decode(&data),
            Err(Error::UnknownPartKey { offset: 0, key: 14 })
        ));
    }

    #[test]
    fn test_user_defined_key() {
        let data = part_bytes(150, 3, &7i32.to_be_bytes());
        assert!(matches!(
            decode(&data),
            Err(Error::UnknownPartKey { key: 150, .. })
        ));

        let options = DecodeOptions::new().user_defined_keys(true);
        let part = decode_part(&data, 0, &options).unwrap();
        assert_eq!(part.key, PartKey::UserDefined(150));
        assert_eq!(part.value, Value::Int32(7));
    }

    #[test]
    fn test_unknown_type() {
        let data = part_bytes(7, 9, &[0, 0, 0, 0]);
        assert!(matches!(
            decode(&data),
            Err(Error::UnknownPartType {
                offset: 0,
                key: 7,
                part_type: 9
            })
        ));
    }

    #[test]
    fn test_truncated_payloads() {
        // Header only
        assert!(matches!(
            decode(&[7]),
            Err(Error::TruncatedStream { offset: 0, needed: 2, .. })
        ));

        // Int32 with two payload bytes
        assert!(matches!(
            decode(&[4, 3, 0, 1]),
            Err(Error::TruncatedStream { offset: 2, needed: 4, available: 2 })
        ));

        // String length field cut short
        assert!(matches!(
            decode(&[7, 0, 0, 0]),
            Err(Error::TruncatedStream { offset: 2, needed: 4, .. })
        ));

        // String shorter than declared
        let mut data = prefixed(7, 0, b"hello");
        data.truncate(data.len() - 1);
        assert!(matches!(
            decode(&data),
            Err(Error::TruncatedStream { offset: 6, needed: 5, available: 4 })
        ));

        // Binary payloads must be present even though they are skipped
        let mut data = prefixed(7, 1, &[0; 16]);
        data.truncate(10);
        assert!(matches!(decode(&data), Err(Error::TruncatedStream { .. })));
    }

    #[test]
    fn test_decode_at_cursor() {
        let mut data = vec![0xAA, 0xBB, 0xCC];
        data.extend(part_bytes(6, 2, &3i16.to_be_bytes()));
        let part = decode_part(&data, 3, &DecodeOptions::default()).unwrap();
        assert_eq!(part.offset, 3);
        assert_eq!(part.key, PartKey::Level);
        assert_eq!(part.value, Value::Int16(3));
    }

    #[test]
    fn test_render_into_skips_sequence_numbers() {
        let mut record = TextRecord::new(",");

        let seq = part_bytes(10, 3, &99i32.to_be_bytes());
        let part = decode(&seq).unwrap();
        assert_eq!(part.consumed, 4);
        assert!(!part.is_rendered());
        part.render_into(&mut record);

        let tid = part_bytes(4, 3, &0i32.to_be_bytes());
        decode(&tid).unwrap().render_into(&mut record);

        assert_eq!(record.render(), "0,");
    }
}
