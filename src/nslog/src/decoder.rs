//! Whole-stream decoding
//!
//! Walks every message of a buffer and renders one line per message. Any
//! error aborts the whole decode; no partial output is returned.

use crate::frame::Frames;
use crate::record::{RecordFormat, TextFormat};
use crate::{DecodeOptions, Result};

/// Stream decoder with fixed options
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Iterate over the messages of `buffer`
    pub fn frames<'a>(&self, buffer: &'a [u8]) -> Frames<'a> {
        Frames::new(buffer, self.options)
    }

    /// Decode `buffer` as separator-delimited text
    pub fn decode(&self, buffer: &[u8], separator: &str) -> Result<String> {
        self.decode_with(buffer, &TextFormat::new(separator))
    }

    /// Decode `buffer`, rendering each message with `format`
    ///
    /// Every rendered line is terminated with `\n`.
    pub fn decode_with<F: RecordFormat>(&self, buffer: &[u8], format: &F) -> Result<String> {
        let mut output = String::new();
        let mut messages = 0usize;

        for frame in self.frames(buffer) {
            let line = frame?.render(format);
            output.push_str(&line);
            output.push('\n');
            messages += 1;
        }

        tracing::debug!(messages, bytes = buffer.len(), "decoded stream");
        Ok(output)
    }
}

/// Decode `buffer` with default options as separator-delimited text
pub fn decode_stream(buffer: &[u8], separator: &str) -> Result<String> {
    Decoder::default().decode(buffer, separator)
}
