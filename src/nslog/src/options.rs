//! Decoder configuration

/// How the frame walker decides that the stream has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Decode every message that fits the buffer, including the last one.
    ///
    /// Leftover bytes that can't hold a complete message are a
    /// [`crate::Error::TruncatedStream`]. An empty buffer decodes to nothing.
    #[default]
    Exact,
    /// Continue only while `cursor + totalSize < len`.
    ///
    /// This matches historical NSLogger decoders: a message whose `totalSize`
    /// is at least the number of bytes left (length prefix included) ends the
    /// walk without being decoded, and a buffer shorter than one size field
    /// is an error. Fewer than 4 bytes after a message also end the walk.
    Legacy,
}

/// Configuration for stream decoding
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// End-of-stream detection
    pub boundary: Boundary,
    /// Fail when a frame's parts don't use exactly `totalSize - 2` bytes
    pub strict_frame_size: bool,
    /// Accept part keys >= 100 and decode them by type
    pub user_defined_keys: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn strict_frame_size(mut self, strict: bool) -> Self {
        self.strict_frame_size = strict;
        self
    }

    pub fn user_defined_keys(mut self, enabled: bool) -> Self {
        self.user_defined_keys = enabled;
        self
    }
}
