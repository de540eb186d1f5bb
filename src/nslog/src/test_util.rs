//! Helpers for building encoded messages in tests

/// Builds one encoded message
#[derive(Default)]
pub(crate) struct MessageBuilder {
    body: Vec<u8>,
    part_count: u16,
    total_size: Option<u32>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part with an arbitrary payload, exactly as given
    pub fn raw(mut self, key: u8, part_type: u8, payload: &[u8]) -> Self {
        self.body.push(key);
        self.body.push(part_type);
        self.body.extend_from_slice(payload);
        self.part_count += 1;
        self
    }

    pub fn int16(self, key: u8, value: i16) -> Self {
        self.raw(key, 2, &value.to_be_bytes())
    }

    pub fn int32(self, key: u8, value: i32) -> Self {
        self.raw(key, 3, &value.to_be_bytes())
    }

    pub fn int64(self, key: u8, value: i64) -> Self {
        self.raw(key, 4, &value.to_be_bytes())
    }

    /// Append a length-prefixed part (String, Binary or Image)
    pub fn prefixed(self, key: u8, part_type: u8, data: &[u8]) -> Self {
        let mut payload = (data.len() as u32).to_be_bytes().to_vec();
        payload.extend_from_slice(data);
        self.raw(key, part_type, &payload)
    }

    pub fn string(self, key: u8, value: &str) -> Self {
        self.prefixed(key, 0, value.as_bytes())
    }

    /// Override the declared total size
    pub fn total_size(mut self, total_size: u32) -> Self {
        self.total_size = Some(total_size);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let total_size = self.total_size.unwrap_or((self.body.len() + 2) as u32);
        let mut out = total_size.to_be_bytes().to_vec();
        out.extend_from_slice(&self.part_count.to_be_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}

/// Concatenate encoded messages into one stream
pub(crate) fn stream(messages: &[&MessageBuilder]) -> Vec<u8> {
    messages.iter().flat_map(|m| m.build()).collect()
}
