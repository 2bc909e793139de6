//! Reply and request values
//!
//! Commands arrive as an array of bulk strings and answer with one of the
//! RESP2 shapes below. Nothing here touches the wire; the console renders
//! replies directly.

use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Status line such as `OK`, `PONG` or a TYPE name
    SimpleString(String),

    /// Error line, prefixed with its kind (`ERR`, `WRONGTYPE`)
    Error(String),

    /// Counts, flags and TTLs
    Integer(i64),

    /// Keys, members and string values
    BulkString(Bytes),

    /// Absent value
    Null,

    /// Member lists, scan batches and request arrays
    Array(Vec<RespValue>),
}

impl RespValue {
    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    /// The `OK` acknowledgement of SET and FLUSHDB
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    pub fn integer(i: i64) -> Self {
        RespValue::Integer(i)
    }

    pub fn bulk_string(b: impl Into<Bytes>) -> Self {
        RespValue::BulkString(b.into())
    }

    pub fn null() -> Self {
        RespValue::Null
    }

    pub fn array(v: Vec<RespValue>) -> Self {
        RespValue::Array(v)
    }

    /// Array of set members, one bulk string each
    pub fn members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        RespValue::Array(members.into_iter().map(RespValue::BulkString).collect())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }

    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_bulk_string(&self) -> Option<&Bytes> {
        match self {
            RespValue::BulkString(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RespValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}
