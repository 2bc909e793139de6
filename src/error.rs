//! Engine error types
//!
//! Every error is reported synchronously to the caller and turned into a
//! RESP error reply at the command boundary.

use crate::protocol::RespValue;
use crate::set::GlobError;
use thiserror::Error;

/// Errors raised by set commands and the key-space
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// The key exists but holds a non-set value
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR syntax error")]
    Syntax,

    #[error("ERR value is not an integer or out of range")]
    NotInteger,

    /// Negative SPOP count
    #[error("ERR value is out of range, must be positive")]
    NotPositive,

    #[error("ERR invalid cursor")]
    InvalidCursor,

    /// Non-positive SSCAN COUNT
    #[error("ERR count must be greater than zero")]
    CountOutOfRange,

    #[error("ERR invalid pattern: {0}")]
    InvalidPattern(#[from] GlobError),

    #[error("ERR {0}")]
    InvalidArgument(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SetError>;

impl SetError {
    /// Convert the error into the reply sent back to the client
    pub fn to_resp(&self) -> RespValue {
        RespValue::error(self.to_string())
    }
}

impl From<SetError> for RespValue {
    fn from(err: SetError) -> Self {
        err.to_resp()
    }
}
