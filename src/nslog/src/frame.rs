//! Message framing
//!
//! Each message starts with a 4-byte big-endian `totalSize` covering the
//! rest of the message, followed by a 2-byte part count and the parts.

use std::iter::FusedIterator;

use byteorder::{BigEndian, ByteOrder};

use crate::part::{decode_part, Part};
use crate::record::{Record, RecordFormat};
use crate::{take, Boundary, DecodeOptions, Error, Result, PART_COUNT_LEN, TOTAL_SIZE_LEN};

/// One decoded message
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    /// Offset of the `totalSize` field
    pub offset: usize,
    /// Declared size of everything after the `totalSize` field
    pub total_size: u32,
    pub part_count: u16,
    /// Bytes actually used by the part count and the parts
    pub body_len: usize,
    pub parts: Vec<Part<'a>>,
}

impl Frame<'_> {
    /// Offset of the byte after this message
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + TOTAL_SIZE_LEN + self.body_len
    }

    /// Whether the parts used exactly the declared size
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.body_len == self.total_size as usize
    }

    /// Feed every rendered part to `record`, in stream order
    pub fn render_into<R: Record + ?Sized>(&self, record: &mut R) {
        for part in &self.parts {
            part.render_into(record);
        }
    }

    /// Render this message as one line, without a line terminator
    pub fn render<F: RecordFormat>(&self, format: &F) -> String {
        let mut record = format.record();
        self.render_into(&mut record);
        record.render()
    }
}

/// Iterator over the messages of a buffer
///
/// Stops after the first error.
pub struct Frames<'a> {
    buffer: &'a [u8],
    cursor: usize,
    options: DecodeOptions,
    finished: bool,
}

impl<'a> Frames<'a> {
    pub fn new(buffer: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            buffer,
            cursor: 0,
            options,
            finished: false,
        }
    }

    /// Offset of the next message
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Read the next `totalSize`, or `None` when the walk is over
    fn next_total_size(&self) -> Result<Option<u32>> {
        let offset = self.cursor;
        let remaining = self.buffer.len() - offset;

        match self.options.boundary {
            Boundary::Exact => {
                if remaining == 0 {
                    return Ok(None);
                }

                let total_size = BigEndian::read_u32(take(self.buffer, offset, TOTAL_SIZE_LEN)?);
                let extent = TOTAL_SIZE_LEN.saturating_add(total_size as usize);
                if extent > remaining {
                    return Err(Error::TruncatedStream {
                        offset,
                        needed: extent,
                        available: remaining,
                    });
                }

                Ok(Some(total_size))
            }
            Boundary::Legacy => {
                if offset > 0 && remaining < TOTAL_SIZE_LEN {
                    return Ok(None);
                }

                let total_size = BigEndian::read_u32(take(self.buffer, offset, TOTAL_SIZE_LEN)?);
                if offset.saturating_add(total_size as usize) >= self.buffer.len() {
                    tracing::debug!(offset, total_size, "message reaches end of buffer, stopping");
                    return Ok(None);
                }

                Ok(Some(total_size))
            }
        }
    }

    fn next_frame(&mut self) -> Result<Option<Frame<'a>>> {
        let Some(total_size) = self.next_total_size()? else {
            return Ok(None);
        };

        let offset = self.cursor;
        let count_offset = offset + TOTAL_SIZE_LEN;
        let part_count = BigEndian::read_u16(take(self.buffer, count_offset, PART_COUNT_LEN)?);

        tracing::debug!(offset, total_size, part_count, "decoding message");

        let mut cursor = count_offset + PART_COUNT_LEN;
        let mut parts = Vec::with_capacity(part_count as usize);
        for _ in 0..part_count {
            let part = decode_part(self.buffer, cursor, &self.options)?;
            cursor += part.size();
            parts.push(part);
        }

        let frame = Frame {
            offset,
            total_size,
            part_count,
            body_len: cursor - count_offset,
            parts,
        };

        if !frame.is_consistent() {
            if self.options.strict_frame_size {
                return Err(Error::FrameSizeMismatch {
                    offset,
                    declared: total_size as usize,
                    consumed: frame.body_len,
                });
            }
            tracing::warn!(
                offset,
                declared = total_size,
                consumed = frame.body_len,
                "message size does not match its parts"
            );
        }

        // Parts, not the declared size, decide where the next message starts
        self.cursor = cursor;
        Ok(Some(frame))
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_frame();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result.transpose()
    }
}

impl FusedIterator for Frames<'_> {}

/// Iterate over the messages of `buffer`
pub fn frames<'a>(buffer: &'a [u8], options: &DecodeOptions) -> Frames<'a> {
    Frames::new(buffer, *options)
}
