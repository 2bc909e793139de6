//! Set commands
//!
//! SADD, SREM, SCARD, SISMEMBER, SMISMEMBER, SMEMBERS, SUNION, SINTER, SDIFF,
//! the *STORE variants, SMOVE, SPOP, SRANDMEMBER and SSCAN.

use super::{extract_bulk_string, extract_integer, extract_keys, Command, CommandContext};
use crate::error::{Result, SetError};
use crate::protocol::RespValue;
use crate::set::{self, GlobPattern, ScanOptions, SetOp};

/// SADD command - Add one or more members to a set
///
/// Syntax: SADD key member [member ...]
pub struct SAddCommand;

impl SAddCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let members = extract_keys(&args[1..])?;

        let mut sets = ctx.sets.lock_one(key);
        let table = sets.get_or_create(key)?;

        let mut added = 0;
        for member in members {
            if table.add(member) {
                added += 1;
            }
        }

        Ok(RespValue::integer(added))
    }
}

impl Command for SAddCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SADD"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SREM command - Remove one or more members from a set
///
/// Syntax: SREM key member [member ...]
pub struct SRemCommand;

impl SRemCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let members = extract_keys(&args[1..])?;

        let mut sets = ctx.sets.lock_one(key);
        let removed = match sets.get_mut(key)? {
            Some(table) => members.iter().filter(|m| table.remove(m)).count(),
            None => 0,
        };

        Ok(RespValue::integer(removed as i64))
    }
}

impl Command for SRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SCARD command - Get the number of members in a set
///
/// Syntax: SCARD key
pub struct SCardCommand;

impl SCardCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;

        let sets = ctx.sets.lock_one(key);
        let len = sets.get(key)?.map_or(0, |t| t.len());
        Ok(RespValue::integer(len as i64))
    }
}

impl Command for SCardCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SISMEMBER command - Test membership of a single member
///
/// Syntax: SISMEMBER key member
pub struct SIsMemberCommand;

impl SIsMemberCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let member = extract_bulk_string(&args[1])?;

        let sets = ctx.sets.lock_one(key);
        let found = sets.get(key)?.is_some_and(|t| t.contains(member));
        Ok(RespValue::integer(found as i64))
    }
}

impl Command for SIsMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SISMEMBER"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SMISMEMBER command - Test membership of several members at once
///
/// Syntax: SMISMEMBER key member [member ...]
pub struct SMIsMemberCommand;

impl SMIsMemberCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let members = extract_keys(&args[1..])?;

        let sets = ctx.sets.lock_one(key);
        let table = sets.get(key)?;
        let flags = members
            .iter()
            .map(|m| RespValue::integer(table.is_some_and(|t| t.contains(m)) as i64))
            .collect();

        Ok(RespValue::array(flags))
    }
}

impl Command for SMIsMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SMISMEMBER"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SMEMBERS command - Get all members of a set
///
/// Syntax: SMEMBERS key
pub struct SMembersCommand;

impl SMembersCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;

        let sets = ctx.sets.lock_one(key);
        let members = sets.get(key)?.map(|t| t.snapshot()).unwrap_or_default();
        Ok(RespValue::members(members))
    }
}

impl Command for SMembersCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SMEMBERS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SUNION / SINTER / SDIFF - Combine sets and return the result
///
/// Syntax: SUNION key [key ...]
pub struct SetOpCommand {
    op: SetOp,
}

impl SetOpCommand {
    pub fn new(op: SetOp) -> Self {
        SetOpCommand { op }
    }

    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let keys = extract_keys(args)?;
        let mut result = ctx.sets.combine(self.op, &keys)?;
        Ok(RespValue::members(result.drain()))
    }
}

impl Command for SetOpCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        match self.op {
            SetOp::Union => "SUNION",
            SetOp::Intersect => "SINTER",
            SetOp::Difference => "SDIFF",
        }
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// SUNIONSTORE / SINTERSTORE / SDIFFSTORE - Combine sets into a destination
///
/// Syntax: SUNIONSTORE destination key [key ...]
pub struct SetOpStoreCommand {
    op: SetOp,
}

impl SetOpStoreCommand {
    pub fn new(op: SetOp) -> Self {
        SetOpStoreCommand { op }
    }

    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let dest = extract_bulk_string(&args[0])?;
        let keys = extract_keys(&args[1..])?;
        let stored = ctx.sets.combine_store(self.op, dest, &keys)?;
        Ok(RespValue::integer(stored as i64))
    }
}

impl Command for SetOpStoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        match self.op {
            SetOp::Union => "SUNIONSTORE",
            SetOp::Intersect => "SINTERSTORE",
            SetOp::Difference => "SDIFFSTORE",
        }
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SMOVE command - Move a member from one set to another
///
/// Syntax: SMOVE source destination member
pub struct SMoveCommand;

impl SMoveCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let source = extract_bulk_string(&args[0])?;
        let destination = extract_bulk_string(&args[1])?;
        let member = extract_bulk_string(&args[2])?;

        let moved = ctx.sets.move_member(source, destination, member)?;
        Ok(RespValue::integer(moved as i64))
    }
}

impl Command for SMoveCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SMOVE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// SPOP command - Remove and return random members
///
/// Syntax: SPOP key [count]
///
/// Without a count the reply is a single member or nil; with a count it is
/// an array of up to `count` distinct members.
pub struct SPopCommand;

impl SPopCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;

        let count = match args.get(1) {
            Some(arg) => {
                let count = extract_integer(arg)?;
                if count < 0 {
                    return Err(SetError::NotPositive);
                }
                Some(count as usize)
            }
            None => None,
        };

        let mut sets = ctx.sets.lock_one(key);
        let table = sets.get_mut(key)?;

        let reply = match (table, count) {
            (None, None) => RespValue::null(),
            (None, Some(_)) => RespValue::array(vec![]),
            (Some(table), None) => match set::pop_one(table, &mut ctx.rng) {
                Some(member) => RespValue::bulk_string(member),
                None => RespValue::null(),
            },
            (Some(table), Some(count)) => RespValue::members(set::pop(table, count, &mut ctx.rng)),
        };

        Ok(reply)
    }
}

impl Command for SPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SRANDMEMBER command - Return random members without removing them
///
/// Syntax: SRANDMEMBER key [count]
///
/// A positive count yields distinct members, a negative count yields exactly
/// `|count|` members that may repeat.
pub struct SRandMemberCommand;

impl SRandMemberCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let count = args.get(1).map(extract_integer).transpose()?;
        if count.is_some_and(|c| c < -(i64::MAX / 2)) {
            return Err(SetError::NotInteger);
        }

        let sets = ctx.sets.lock_one(key);
        let table = sets.get(key)?;

        let reply = match (table, count) {
            (None, None) => RespValue::null(),
            (None, Some(_)) => RespValue::array(vec![]),
            (Some(table), None) => match set::random_member(table, &mut ctx.rng) {
                Some(member) => RespValue::bulk_string(member),
                None => RespValue::null(),
            },
            (Some(table), Some(count)) => RespValue::members(set::random_members(table, count, &mut ctx.rng)),
        };

        Ok(reply)
    }
}

impl Command for SRandMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SRANDMEMBER"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SSCAN command - Incrementally iterate over a set
///
/// Syntax: SSCAN key cursor [MATCH pattern] [COUNT count]
///
/// Replies `[next-cursor, [member ...]]`; the scan is over when the returned
/// cursor is "0".
pub struct SScanCommand;

impl SScanCommand {
    fn run(&self, ctx: &mut CommandContext, args: &[RespValue]) -> Result<RespValue> {
        self.check_arity(args)?;
        let key = extract_bulk_string(&args[0])?;
        let cursor = parse_cursor(&args[1])?;
        let options = parse_scan_options(&args[2..], ctx.scan_count)?;

        let batch = ctx.sets.scan(key, cursor, &options)?;

        Ok(RespValue::array(vec![
            RespValue::bulk_string(batch.cursor.to_string()),
            RespValue::members(batch.members),
        ]))
    }
}

impl Command for SScanCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        self.run(ctx, args).unwrap_or_else(RespValue::from)
    }

    fn name(&self) -> &'static str {
        "SSCAN"
    }

    fn min_args(&self) -> usize {
        2
    }
}

fn parse_cursor(value: &RespValue) -> Result<u64> {
    match value {
        RespValue::BulkString(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or(SetError::InvalidCursor),
        RespValue::Integer(i) => u64::try_from(*i).map_err(|_| SetError::InvalidCursor),
        _ => Err(SetError::InvalidCursor),
    }
}

/// Parse the `MATCH` / `COUNT` pairs, later occurrences win
fn parse_scan_options(args: &[RespValue], default_count: usize) -> Result<ScanOptions> {
    let mut options = ScanOptions {
        count: default_count,
        ..ScanOptions::default()
    };

    for pair in args.chunks(2) {
        let [flag, value] = pair else {
            return Err(SetError::Syntax);
        };

        let flag = extract_bulk_string(flag)?;
        if flag.eq_ignore_ascii_case(b"MATCH") {
            options.pattern = GlobPattern::parse(extract_bulk_string(value)?)?;
        } else if flag.eq_ignore_ascii_case(b"COUNT") {
            let count = extract_integer(value)?;
            if count <= 0 {
                return Err(SetError::CountOutOfRange);
            }
            options.count = count as usize;
        } else {
            return Err(SetError::Syntax);
        }
    }

    Ok(options)
}
