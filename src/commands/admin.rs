//! Admin commands (INFO, FLUSHDB, PING)

use super::{extract_bulk_string, Command, CommandContext};
use crate::error::Result;
use crate::protocol::RespValue;
use tracing::info;

/// INFO command - Get information and statistics about the engine
///
/// Syntax: INFO [section]
///
/// Sections are "server", "keyspace" and "memory"; without one, all are returned.
pub struct InfoCommand;

impl InfoCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let section = match args.first() {
            Some(arg) => String::from_utf8_lossy(extract_bulk_string(arg)?).to_lowercase(),
            None => "all".to_string(),
        };
        let wants = |name: &str| section == "all" || section == name;

        let mut info = String::new();

        if wants("server") {
            info.push_str(&format!(
                "# Server\r\n\
                ferrumset_version:{}\r\n\
                os:{}\r\n\
                arch:{}\r\n\
                \r\n",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH,
            ));
        }

        if wants("keyspace") || wants("memory") {
            let stats = ctx.keyspace.stats();

            if wants("keyspace") {
                info.push_str(&format!(
                    "# Keyspace\r\n\
                    db0:keys={},expires={}\r\n\
                    \r\n",
                    stats.active_keys, stats.volatile_keys
                ));
            }

            if wants("memory") {
                info.push_str(&format!(
                    "# Memory\r\n\
                    used_memory:{}\r\n",
                    stats.used_memory_bytes
                ));
            }
        }

        Ok(RespValue::bulk_string(info))
    }
}

impl Command for InfoCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "INFO"
    }

    fn min_args(&self) -> usize {
        0
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// FLUSHDB command - Remove all keys
///
/// Syntax: FLUSHDB
pub struct FlushDbCommand;

impl Command for FlushDbCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if let Err(e) = self.check_arity(args) {
            return RespValue::from(e);
        }
        let removed = ctx.keyspace.len();
        ctx.keyspace.clear();
        info!("FLUSHDB removed {} keys", removed);
        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "FLUSHDB"
    }

    fn min_args(&self) -> usize {
        0
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// PING command - Liveness check
///
/// Syntax: PING [message]
pub struct PingCommand;

impl PingCommand {
    fn run(&self, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        match args.first() {
            Some(message) => Ok(RespValue::bulk_string(extract_bulk_string(message)?.clone())),
            None => Ok(RespValue::simple_string("PONG")),
        }
    }
}

impl Command for PingCommand {
    fn execute(&self, _ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;
    use bytes::Bytes;

    fn set(ctx: &CommandContext, key: &str) {
        let key = Bytes::from(key.to_string());
        ctx.keyspace.lock_one(&key).insert(&key, Value::string("v"));
    }

    fn info_text(ctx: &mut CommandContext, args: &[RespValue]) -> String {
        if let RespValue::BulkString(bytes) = InfoCommand.execute(ctx, args) {
            String::from_utf8(bytes.to_vec()).unwrap()
        } else {
            panic!("Expected bulk string response");
        }
    }

    #[test]
    fn test_info() {
        let mut ctx = CommandContext::new();
        set(&ctx, "key1");
        set(&ctx, "key2");

        let info = info_text(&mut ctx, &[]);
        assert!(info.contains("ferrumset_version"));
        assert!(info.contains("keys=2,expires=0"));
        assert!(info.contains("used_memory:"));
    }

    #[test]
    fn test_info_section() {
        let mut ctx = CommandContext::new();
        let info = info_text(&mut ctx, &[RespValue::bulk_string("KEYSPACE")]);
        assert!(info.starts_with("# Keyspace"));
        assert!(!info.contains("# Server"));
    }

    #[test]
    fn test_flushdb() {
        let mut ctx = CommandContext::new();
        set(&ctx, "key1");
        set(&ctx, "key2");

        assert_eq!(ctx.keyspace.len(), 2);

        let cmd = FlushDbCommand;
        let result = cmd.execute(&mut ctx, &[]);
        assert_eq!(result, RespValue::simple_string("OK"));

        assert_eq!(ctx.keyspace.len(), 0);
    }

    #[test]
    fn test_flushdb_rejects_arguments() {
        let mut ctx = CommandContext::new();
        set(&ctx, "key1");

        let result = FlushDbCommand.execute(&mut ctx, &[RespValue::bulk_string("ASYNC")]);
        assert_eq!(result, RespValue::error("ERR wrong number of arguments for 'flushdb' command"));
        assert_eq!(ctx.keyspace.len(), 1);
    }

    #[test]
    fn test_ping() {
        let mut ctx = CommandContext::new();
        assert_eq!(PingCommand.execute(&mut ctx, &[]), RespValue::simple_string("PONG"));
        assert_eq!(
            PingCommand.execute(&mut ctx, &[RespValue::bulk_string("hi")]),
            RespValue::bulk_string("hi")
        );
    }
}
