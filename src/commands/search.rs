//! Search commands (KEYS)

use super::{extract_bulk_string, Command, CommandContext};
use crate::error::Result;
use crate::protocol::RespValue;
use crate::set::GlobPattern;

/// KEYS command - Find all keys matching a pattern
///
/// Syntax: KEYS pattern
///
/// Uses the same glob syntax as SSCAN MATCH (`*`, `?`, `[a-z]`, `\x`).
pub struct KeysCommand;

impl KeysCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let pattern = GlobPattern::parse(extract_bulk_string(&args[0])?)?;

        let matching_keys: Vec<RespValue> = ctx
            .keyspace
            .keys()
            .into_iter()
            .filter(|key| pattern.matches(key))
            .map(RespValue::BulkString)
            .collect();

        Ok(RespValue::Array(matching_keys))
    }
}

impl Command for KeysCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "KEYS"
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
    use crate::store::Value;
    use bytes::Bytes;

    fn set(ctx: &CommandContext, key: &str) {
        let key = Bytes::from(key.to_string());
        ctx.keyspace.lock_one(&key).insert(&key, Value::string("v"));
    }

    fn keys_matching(ctx: &mut CommandContext, pattern: &str) -> Vec<Bytes> {
        let args = vec![RespValue::bulk_string(pattern.to_string())];
        let result = KeysCommand.execute(ctx, &args);

        if let RespValue::Array(keys) = result {
            let mut keys: Vec<Bytes> = keys.iter().filter_map(|k| k.as_bulk_string().cloned()).collect();
            keys.sort();
            keys
        } else {
            panic!("Expected array response");
        }
    }

    #[test]
    fn test_keys_all() {
        let mut ctx = CommandContext::new();
        set(&ctx, "key1");
        set(&ctx, "key2");
        set(&ctx, "name");

        assert_eq!(keys_matching(&mut ctx, "*").len(), 3);
    }

    #[test]
    fn test_keys_prefix_and_suffix() {
        let mut ctx = CommandContext::new();
        set(&ctx, "user:1");
        set(&ctx, "user:2");
        set(&ctx, "session:1");

        assert_eq!(keys_matching(&mut ctx, "user:*"), vec![Bytes::from("user:1"), Bytes::from("user:2")]);
        assert_eq!(keys_matching(&mut ctx, "*:1").len(), 2);
    }

    #[test]
    fn test_keys_single_byte_and_class() {
        let mut ctx = CommandContext::new();
        set(&ctx, "hallo");
        set(&ctx, "hello");
        set(&ctx, "hxllo");

        assert_eq!(keys_matching(&mut ctx, "h?llo").len(), 3);
        assert_eq!(keys_matching(&mut ctx, "h[ae]llo"), vec![Bytes::from("hallo"), Bytes::from("hello")]);
        assert_eq!(keys_matching(&mut ctx, "h[^e]llo"), vec![Bytes::from("hallo"), Bytes::from("hxllo")]);
    }

    #[test]
    fn test_keys_invalid_pattern() {
        let mut ctx = CommandContext::new();
        let result = KeysCommand.execute(&mut ctx, &[RespValue::bulk_string("[abc")]);
        assert!(matches!(result, RespValue::Error(_)));
    }
}
