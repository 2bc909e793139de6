//! TTL commands (EXPIRE, TTL)

use super::{extract_bulk_string, extract_integer, Command, CommandContext};
use crate::error::Result;
use crate::protocol::RespValue;

/// EXPIRE command - Set a timeout on a key
///
/// Syntax: EXPIRE key seconds
///
/// A non-positive timeout expires the key at once. Replies 1 if the timeout
/// was set, 0 if the key does not exist.
pub struct ExpireCommand;

impl ExpireCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let seconds = extract_integer(&args[1])?;

        let mut locks = ctx.keyspace.lock_one(key);
        let applied = match locks.entry_mut(key) {
            Some(entry) => {
                entry.set_expiration(seconds);
                true
            }
            None => false,
        };

        Ok(RespValue::integer(applied as i64))
    }
}

impl Command for ExpireCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "EXPIRE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// TTL command - Get the time to live for a key
///
/// Syntax: TTL key
///
/// Returns:
/// - The TTL in seconds
/// - -1 if the key exists but has no expiration
/// - -2 if the key does not exist
pub struct TtlCommand;

impl TtlCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;

        let locks = ctx.keyspace.lock_one(key);
        let ttl = locks.entry(key).map_or(-2, |entry| entry.ttl_seconds());
        Ok(RespValue::integer(ttl))
    }
}

impl Command for TtlCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "TTL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::set::{SAddCommand, SCardCommand};

    fn args(parts: &[&str]) -> Vec<RespValue> {
        parts.iter().map(|p| RespValue::bulk_string(p.to_string())).collect()
    }

    #[test]
    fn test_expire_ttl() {
        let mut ctx = CommandContext::new();
        SAddCommand.execute(&mut ctx, &args(&["myset", "a"]));

        assert_eq!(TtlCommand.execute(&mut ctx, &args(&["myset"])), RespValue::integer(-1));
        assert_eq!(ExpireCommand.execute(&mut ctx, &args(&["myset", "100"])), RespValue::integer(1));

        let RespValue::Integer(ttl) = TtlCommand.execute(&mut ctx, &args(&["myset"])) else {
            panic!("Expected integer response");
        };
        assert!(ttl > 0 && ttl <= 100);
    }

    #[test]
    fn test_expire_missing_key() {
        let mut ctx = CommandContext::new();
        assert_eq!(ExpireCommand.execute(&mut ctx, &args(&["nope", "10"])), RespValue::integer(0));
        assert_eq!(TtlCommand.execute(&mut ctx, &args(&["nope"])), RespValue::integer(-2));
        assert!(ctx.keyspace.is_empty());
    }

    #[test]
    fn test_expired_set_reads_as_absent() {
        let mut ctx = CommandContext::new();
        SAddCommand.execute(&mut ctx, &args(&["myset", "a", "b"]));

        assert_eq!(ExpireCommand.execute(&mut ctx, &args(&["myset", "0"])), RespValue::integer(1));
        assert_eq!(SCardCommand.execute(&mut ctx, &args(&["myset"])), RespValue::integer(0));
        assert_eq!(TtlCommand.execute(&mut ctx, &args(&["myset"])), RespValue::integer(-2));

        // A new SADD starts from an empty set
        assert_eq!(SAddCommand.execute(&mut ctx, &args(&["myset", "c"])), RespValue::integer(1));
        assert_eq!(SCardCommand.execute(&mut ctx, &args(&["myset"])), RespValue::integer(1));
    }

    #[test]
    fn test_huge_expire_reports_positive_ttl() {
        let mut ctx = CommandContext::new();
        SAddCommand.execute(&mut ctx, &args(&["s", "a"]));
        assert_eq!(
            ExpireCommand.execute(&mut ctx, &args(&["s", "9223372036850000000"])),
            RespValue::integer(1)
        );

        let RespValue::Integer(ttl) = TtlCommand.execute(&mut ctx, &args(&["s"])) else {
            panic!("Expected integer response");
        };
        // -1 when the deadline does not fit in an Instant
        assert!(ttl == -1 || ttl > 9_223_372_036_000_000_000, "ttl {}", ttl);
        assert_eq!(SCardCommand.execute(&mut ctx, &args(&["s"])), RespValue::integer(1));
    }

    #[test]
    fn test_expire_not_integer() {
        let mut ctx = CommandContext::new();
        let result = ExpireCommand.execute(&mut ctx, &args(&["k", "soon"]));
        assert_eq!(result, RespValue::error("ERR value is not an integer or out of range"));
    }
}
