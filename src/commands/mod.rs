//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Each command family is implemented in a separate file.

mod context;
mod registry;

// Command implementations
mod string;
mod key;
mod ttl;
mod set;
mod admin;
mod search;

pub use context::CommandContext;
pub use registry::CommandRegistry;

use crate::error::{Result, SetError};
use crate::protocol::RespValue;
use bytes::Bytes;

/// Command execution trait
///
/// All commands implement this trait with a single execute method.
/// This provides loose coupling between command implementations and the dispatcher.
pub trait Command: Send + Sync {
    /// Execute the command with the given context and arguments
    ///
    /// Arguments:
    /// - ctx: mutable reference to the command context (key-space, random source)
    /// - args: command arguments (excluding the command name itself)
    ///
    /// Returns:
    /// - RespValue representing the response to send to the client
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue;

    /// Get the command name (for debugging/logging)
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }

    /// Check the argument count against `min_args` / `max_args`
    fn check_arity(&self, args: &[RespValue]) -> Result<()> {
        let too_few = args.len() < self.min_args();
        let too_many = self.max_args().is_some_and(|max| args.len() > max);
        if too_few || too_many {
            return Err(SetError::WrongArity(self.name().to_lowercase()));
        }
        Ok(())
    }
}

/// Extract a bulk string argument
pub(crate) fn extract_bulk_string(value: &RespValue) -> Result<&Bytes> {
    value
        .as_bulk_string()
        .ok_or_else(|| SetError::InvalidArgument("expected bulk string".to_string()))
}

/// Extract an integer, parsing it from a bulk string if needed
pub(crate) fn extract_integer(value: &RespValue) -> Result<i64> {
    match value {
        RespValue::Integer(i) => Ok(*i),
        RespValue::BulkString(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(SetError::NotInteger),
        _ => Err(SetError::NotInteger),
    }
}

/// Extract every argument as a key
pub(crate) fn extract_keys(args: &[RespValue]) -> Result<Vec<Bytes>> {
    args.iter().map(|a| extract_bulk_string(a).cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_integer() {
        assert_eq!(extract_integer(&RespValue::bulk_string("-12")), Ok(-12));
        assert_eq!(extract_integer(&RespValue::integer(5)), Ok(5));
        assert_eq!(extract_integer(&RespValue::bulk_string("1.5")), Err(SetError::NotInteger));
        assert_eq!(extract_integer(&RespValue::Null), Err(SetError::NotInteger));
    }

    #[test]
    fn test_extract_bulk_string() {
        assert!(extract_bulk_string(&RespValue::integer(1)).is_err());
        assert_eq!(extract_keys(&[RespValue::bulk_string("a")]), Ok(vec![Bytes::from("a")]));
    }
}
