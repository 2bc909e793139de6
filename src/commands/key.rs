//! Key commands (DEL, EXISTS, TYPE)

use super::{extract_bulk_string, extract_keys, Command, CommandContext};
use crate::error::Result;
use crate::protocol::RespValue;

/// DEL command - Delete one or more keys
///
/// Syntax: DEL key [key ...]
pub struct DelCommand;

impl DelCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let keys = extract_keys(args)?;

        // Duplicates are dropped by the lock, each key is deleted once
        let mut locks = ctx.keyspace.lock(&keys);
        let held = locks.keys().to_vec();
        let deleted = held.iter().filter(|key| locks.remove(key)).count();

        Ok(RespValue::integer(deleted as i64))
    }
}

impl Command for DelCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "DEL"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// EXISTS command - Count how many of the given keys exist
///
/// Syntax: EXISTS key [key ...]
///
/// A key listed several times is counted several times.
pub struct ExistsCommand;

impl ExistsCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let keys = extract_keys(args)?;

        let locks = ctx.keyspace.lock(&keys);
        let count = keys.iter().filter(|key| locks.get(key).is_some()).count();

        Ok(RespValue::integer(count as i64))
    }
}

impl Command for ExistsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "EXISTS"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// TYPE command - Get the type of the value stored at a key
///
/// Syntax: TYPE key
///
/// Replies "string", "set", or "none" for an absent key.
pub struct TypeCommand;

impl TypeCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;

        let locks = ctx.keyspace.lock_one(key);
        let type_name = locks.get(key).map_or("none", |v| v.type_name());
        Ok(RespValue::simple_string(type_name))
    }
}

impl Command for TypeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "TYPE"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
