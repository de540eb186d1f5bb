//! Part keys and part types of the NSLogger message format

/// First key value reserved for application-defined parts
pub const USER_DEFINED_KEY_START: u8 = 100;

/// Semantic meaning of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKey {
    /// One of the log message type values (log, block start, client info, ...)
    MessageType,
    /// Seconds component of the timestamp
    TimestampS,
    /// Milliseconds complement of the timestamp
    TimestampMs,
    /// Microseconds complement of the timestamp
    TimestampUs,
    ThreadId,
    Tag,
    Level,
    /// Message text, binary data or image
    Message,
    ImageWidth,
    ImageHeight,
    /// Sequence number assigned by the client
    MessageSeq,
    Filename,
    Linenumber,
    Functionname,
    ClientName,
    ClientVersion,
    OsName,
    OsVersion,
    /// Device model, e.g. "iPhone" or "iPad"
    ClientModel,
    Uniqueid,
    /// Application-defined key (>= 100)
    UserDefined(u8),
}

impl PartKey {
    /// Look up a key from its wire value
    ///
    /// Keys in the user-defined range are only accepted when `user_defined`
    /// is set.
    pub fn from_u8(value: u8, user_defined: bool) -> Option<Self> {
        let key = match value {
            0 => Self::MessageType,
            1 => Self::TimestampS,
            2 => Self::TimestampMs,
            3 => Self::TimestampUs,
            4 => Self::ThreadId,
            5 => Self::Tag,
            6 => Self::Level,
            7 => Self::Message,
            8 => Self::ImageWidth,
            9 => Self::ImageHeight,
            10 => Self::MessageSeq,
            11 => Self::Filename,
            12 => Self::Linenumber,
            13 => Self::Functionname,
            20 => Self::ClientName,
            21 => Self::ClientVersion,
            22 => Self::OsName,
            23 => Self::OsVersion,
            24 => Self::ClientModel,
            25 => Self::Uniqueid,
            v if user_defined && v >= USER_DEFINED_KEY_START => Self::UserDefined(v),
            _ => return None,
        };
        Some(key)
    }

    /// Wire value of this key
    pub fn as_u8(self) -> u8 {
        match self {
            Self::MessageType => 0,
            Self::TimestampS => 1,
            Self::TimestampMs => 2,
            Self::TimestampUs => 3,
            Self::ThreadId => 4,
            Self::Tag => 5,
            Self::Level => 6,
            Self::Message => 7,
            Self::ImageWidth => 8,
            Self::ImageHeight => 9,
            Self::MessageSeq => 10,
            Self::Filename => 11,
            Self::Linenumber => 12,
            Self::Functionname => 13,
            Self::ClientName => 20,
            Self::ClientVersion => 21,
            Self::OsName => 22,
            Self::OsVersion => 23,
            Self::ClientModel => 24,
            Self::Uniqueid => 25,
            Self::UserDefined(v) => v,
        }
    }

    /// Field name used by structured renderers
    pub fn name(self) -> std::borrow::Cow<'static, str> {
        let name = match self {
            Self::MessageType => "message_type",
            Self::TimestampS => "timestamp",
            Self::TimestampMs => "timestamp_ms",
            Self::TimestampUs => "timestamp_us",
            Self::ThreadId => "thread_id",
            Self::Tag => "tag",
            Self::Level => "level",
            Self::Message => "message",
            Self::ImageWidth => "image_width",
            Self::ImageHeight => "image_height",
            Self::MessageSeq => "message_seq",
            Self::Filename => "filename",
            Self::Linenumber => "line_number",
            Self::Functionname => "function_name",
            Self::ClientName => "client_name",
            Self::ClientVersion => "client_version",
            Self::OsName => "os_name",
            Self::OsVersion => "os_version",
            Self::ClientModel => "client_model",
            Self::Uniqueid => "unique_id",
            Self::UserDefined(v) => return format!("user_{}", v).into(),
        };
        name.into()
    }
}

/// Physical encoding of a part payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartType {
    /// UTF-8 text with a 4-byte length prefix
    String,
    /// Opaque bytes with a 4-byte length prefix
    Binary,
    Int16,
    Int32,
    Int64,
    /// PNG image with a 4-byte length prefix
    Image,
}

impl PartType {
    /// Payload size implied by the type, or `None` for length-prefixed types
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Int16 => Some(2),
            Self::Int32 => Some(4),
            Self::Int64 => Some(8),
            Self::String | Self::Binary | Self::Image => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::String => 0,
            Self::Binary => 1,
            Self::Int16 => 2,
            Self::Int32 => 3,
            Self::Int64 => 4,
            Self::Image => 5,
        }
    }
}

impl TryFrom<u8> for PartType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::String),
            1 => Ok(Self::Binary),
            2 => Ok(Self::Int16),
            3 => Ok(Self::Int32),
            4 => Ok(Self::Int64),
            5 => Ok(Self::Image),
            other => Err(other),
        }
    }
}
