//! String commands (SET, GET)

use super::{extract_bulk_string, Command, CommandContext};
use crate::error::{Result, SetError};
use crate::protocol::RespValue;
use crate::store::Value;

/// SET command - Set a key to a string value
///
/// Syntax: SET key value
///
/// Overwrites whatever the key held, including a set, and clears its expiry.
pub struct SetCommand;

impl SetCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let value = extract_bulk_string(&args[1])?;

        ctx.keyspace.lock_one(key).insert(key, Value::String(value.clone()));
        Ok(RespValue::ok())
    }
}

impl Command for SetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// GET command - Get the value of a key
///
/// Syntax: GET key
pub struct GetCommand;

impl GetCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;

        let locks = ctx.keyspace.lock_one(key);
        match locks.get(key) {
            Some(Value::String(bytes)) => Ok(RespValue::bulk_string(bytes.clone())),
            Some(_) => Err(SetError::WrongType),
            None => Ok(RespValue::null()),
        }
    }
}

impl Command for GetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "GET"
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
    use crate::commands::set::SAddCommand;
    use bytes::Bytes;

    #[test]
    fn test_set_get() {
        let mut ctx = CommandContext::new();

        let set_cmd = SetCommand;
        let get_cmd = GetCommand;

        let args = vec![
            RespValue::bulk_string("mykey"),
            RespValue::bulk_string("myvalue"),
        ];

        let result = set_cmd.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::simple_string("OK"));

        let args = vec![RespValue::bulk_string("mykey")];
        let result = get_cmd.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::bulk_string(Bytes::from("myvalue")));
    }

    #[test]
    fn test_get_nonexistent() {
        let mut ctx = CommandContext::new();
        let get_cmd = GetCommand;

        let args = vec![RespValue::bulk_string("nonexistent")];
        let result = get_cmd.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::null());
    }

    #[test]
    fn test_get_set_key_is_wrong_type() {
        let mut ctx = CommandContext::new();
        SAddCommand.execute(
            &mut ctx,
            &[RespValue::bulk_string("myset"), RespValue::bulk_string("a")],
        );

        let result = GetCommand.execute(&mut ctx, &[RespValue::bulk_string("myset")]);
        assert_eq!(result, RespValue::from(SetError::WrongType));

        // SET replaces the set
        let args = vec![RespValue::bulk_string("myset"), RespValue::bulk_string("v")];
        assert_eq!(SetCommand.execute(&mut ctx, &args), RespValue::simple_string("OK"));
        let result = GetCommand.execute(&mut ctx, &[RespValue::bulk_string("myset")]);
        assert_eq!(result, RespValue::bulk_string("v"));
    }
}
