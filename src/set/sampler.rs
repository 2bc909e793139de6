//! Random sampling (SRANDMEMBER) and random removal (SPOP)
//!
//! The random source is always passed in, so callers decide between an
//! entropy-seeded generator and a fixed seed.

use crate::store::MemberTable;
use bytes::Bytes;
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Pick one member uniformly, None if the table is empty
pub fn random_member<R: Rng + ?Sized>(table: &MemberTable, rng: &mut R) -> Option<Bytes> {
    if table.is_empty() {
        return None;
    }
    let pick = rng.gen_range(0..table.len());
    table.iter().nth(pick).cloned()
}

/// Sample members without mutating the table
///
/// - `count >= 0`: up to `count` distinct members; every member, in random
///   order, when `count` reaches the cardinality
/// - `count < 0`: exactly `|count|` picks with replacement
pub fn random_members<R: Rng + ?Sized>(table: &MemberTable, count: i64, rng: &mut R) -> Vec<Bytes> {
    if table.is_empty() || count == 0 {
        return Vec::new();
    }

    let mut members = table.snapshot();

    if count < 0 {
        // The pick count comes from the client, so nothing is preallocated
        let picks = count.unsigned_abs();
        let mut picked = Vec::new();
        for _ in 0..picks {
            picked.push(members[rng.gen_range(0..members.len())].clone());
        }
        return picked;
    }

    let count = count as usize;
    if count >= members.len() {
        members.shuffle(rng);
        return members;
    }

    index::sample(rng, members.len(), count)
        .into_iter()
        .map(|i| members[i].clone())
        .collect()
}

/// Remove and return one random member
pub fn pop_one<R: Rng + ?Sized>(table: &mut MemberTable, rng: &mut R) -> Option<Bytes> {
    let member = random_member(table, rng)?;
    table.remove(&member);
    Some(member)
}

/// Remove and return up to `count` distinct random members
///
/// Asking for the whole cardinality or more empties the table.
pub fn pop<R: Rng + ?Sized>(table: &mut MemberTable, count: usize, rng: &mut R) -> Vec<Bytes> {
    if count >= table.len() {
        let mut members = table.drain();
        members.shuffle(rng);
        return members;
    }

    let members = table.snapshot();
    let picked: Vec<Bytes> = index::sample(rng, members.len(), count)
        .into_iter()
        .map(|i| members[i].clone())
        .collect();

    for member in &picked {
        table.remove(member);
    }
    picked
}
