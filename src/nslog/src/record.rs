//! Record accumulation and rendering
//!
//! A record collects the fields of one message and renders them as a single
//! output line. [`TextRecord`] produces separator-delimited text,
//! [`JsonRecord`] produces one JSON object per line.

use serde_json::{Map, Value as JsonValue};

use crate::PartKey;

/// Separator used when none is configured
pub const DEFAULT_SEPARATOR: &str = ",";

/// Field sink for one message
pub trait Record {
    /// Add a text field; empty strings are ignored
    fn add_string(&mut self, key: PartKey, value: &str);

    fn add_int16(&mut self, key: PartKey, value: i16);

    fn add_int32(&mut self, key: PartKey, value: i32);

    fn add_int64(&mut self, key: PartKey, value: i64);

    /// The accumulated line, without a line terminator
    fn render(&self) -> String;
}

/// Creates a fresh record for every message
pub trait RecordFormat {
    type Record: Record;

    fn record(&self) -> Self::Record;
}

/// Separator-delimited text line
///
/// Every field is followed by the separator, so a non-empty line always
/// ends with one.
#[derive(Debug, Clone)]
pub struct TextRecord {
    line: String,
    separator: String,
}

impl TextRecord {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            line: String::new(),
            separator: separator.into(),
        }
    }

    /// Append `text` followed by the separator, unless `text` is empty
    pub fn add_field(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.line.push_str(text);
        self.line.push_str(&self.separator);
    }

    fn add_number(&mut self, value: i64) {
        // Numbers are never suppressed, even when zero
        self.line.push_str(&value.to_string());
        self.line.push_str(&self.separator);
    }
}

impl Record for TextRecord {
    fn add_string(&mut self, _key: PartKey, value: &str) {
        self.add_field(value);
    }

    fn add_int16(&mut self, _key: PartKey, value: i16) {
        self.add_number(i64::from(value));
    }

    fn add_int32(&mut self, _key: PartKey, value: i32) {
        self.add_number(i64::from(value));
    }

    fn add_int64(&mut self, _key: PartKey, value: i64) {
        self.add_number(value);
    }

    fn render(&self) -> String {
        self.line.clone()
    }
}

/// Text output with a configurable separator
#[derive(Debug, Clone)]
pub struct TextFormat {
    pub separator: String,
}

impl TextFormat {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl RecordFormat for TextFormat {
    type Record = TextRecord;

    fn record(&self) -> TextRecord {
        TextRecord::new(self.separator.as_str())
    }
}

/// One JSON object per message, keyed by part name in stream order
///
/// A key that appears twice in a message keeps its last value.
#[derive(Debug, Clone, Default)]
pub struct JsonRecord {
    fields: Map<String, JsonValue>,
}

impl JsonRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: PartKey, value: JsonValue) {
        self.fields.insert(key.name().into_owned(), value);
    }
}

impl Record for JsonRecord {
    fn add_string(&mut self, key: PartKey, value: &str) {
        if !value.is_empty() {
            self.insert(key, JsonValue::from(value));
        }
    }

    fn add_int16(&mut self, key: PartKey, value: i16) {
        self.insert(key, JsonValue::from(value));
    }

    fn add_int32(&mut self, key: PartKey, value: i32) {
        self.insert(key, JsonValue::from(value));
    }

    fn add_int64(&mut self, key: PartKey, value: i64) {
        self.insert(key, JsonValue::from(value));
    }

    fn render(&self) -> String {
        JsonValue::Object(self.fields.clone()).to_string()
    }
}

/// JSON-lines output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl RecordFormat for JsonFormat {
    type Record = JsonRecord;

    fn record(&self) -> JsonRecord {
        JsonRecord::new()
    }
}
