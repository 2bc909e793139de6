//! Set registry
//!
//! Set-typed view over the key-space. A set key is created by the first
//! successful insertion and removed as soon as its table becomes empty;
//! a key holding another type is reported as `WrongType` and never touched.

use crate::error::{Result, SetError};
use crate::store::{KeyLocks, Keyspace, MemberTable, Value};
use bytes::Bytes;
use std::sync::Arc;

/// Entry point for every set operation
#[derive(Clone)]
pub struct SetRegistry {
    keyspace: Arc<Keyspace>,
}

impl SetRegistry {
    /// Create a registry over a shared key-space
    pub fn new(keyspace: Arc<Keyspace>) -> Self {
        SetRegistry { keyspace }
    }

    /// The underlying key-space
    pub fn keyspace(&self) -> &Arc<Keyspace> {
        &self.keyspace
    }

    /// Lock a single key
    pub fn lock_one(&self, key: &Bytes) -> SetLocks<'_> {
        SetLocks {
            locks: self.keyspace.lock_one(key),
        }
    }

    /// Lock several keys at once, in lexical key order
    pub fn lock(&self, keys: &[Bytes]) -> SetLocks<'_> {
        SetLocks {
            locks: self.keyspace.lock(keys),
        }
    }

    /// Move `member` from one set to another as a single step
    ///
    /// Returns false, without changing anything, when the member is not in
    /// the source. Moving within the same key succeeds iff the member is present.
    pub fn move_member(&self, from: &Bytes, to: &Bytes, member: &Bytes) -> Result<bool> {
        let mut sets = self.lock(&[from.clone(), to.clone()]);

        // Type-check the destination before the source loses anything
        sets.get(to)?;

        if from == to {
            return Ok(sets.get(from)?.is_some_and(|t| t.contains(member)));
        }

        let removed = match sets.get_mut(from)? {
            Some(source) => source.remove(member),
            None => false,
        };

        if removed {
            sets.get_or_create(to)?.add(member.clone());
        }

        Ok(removed)
    }
}

/// Locked keys viewed as sets
///
/// Dropping the view deletes every locked key left holding an empty set.
pub struct SetLocks<'a> {
    locks: KeyLocks<'a>,
}

impl SetLocks<'_> {
    /// Get the set stored at `key`, None if absent
    pub fn get(&self, key: &[u8]) -> Result<Option<&MemberTable>> {
        match self.locks.get(key) {
            None => Ok(None),
            Some(Value::Set(table)) => Ok(Some(table)),
            Some(_) => Err(SetError::WrongType),
        }
    }

    /// Get the set stored at `key` mutably, None if absent
    pub fn get_mut(&mut self, key: &[u8]) -> Result<Option<&mut MemberTable>> {
        match self.locks.get_mut(key) {
            None => Ok(None),
            Some(Value::Set(table)) => Ok(Some(table)),
            Some(_) => Err(SetError::WrongType),
        }
    }

    /// Get the set stored at `key`, creating an empty one if absent
    pub fn get_or_create(&mut self, key: &[u8]) -> Result<&mut MemberTable> {
        let value = self
            .locks
            .get_or_insert_with(key, Value::empty_set)
            .ok_or_else(|| not_locked(key))?;

        value.as_set_mut().ok_or(SetError::WrongType)
    }

    /// Remove `key` if it holds an empty set, returns true if removed
    pub fn delete_if_empty(&mut self, key: &[u8]) -> bool {
        let empty = matches!(self.locks.get(key), Some(Value::Set(table)) if table.is_empty());
        empty && self.locks.remove(key)
    }

    /// Overwrite `key` with `table` whatever it held before
    ///
    /// An empty table deletes the key instead. Returns the stored cardinality.
    pub fn replace(&mut self, key: &[u8], table: MemberTable) -> Result<usize> {
        if !self.locks.holds(key) {
            return Err(not_locked(key));
        }

        let len = table.len();
        if table.is_empty() {
            self.locks.remove(key);
        } else {
            self.locks.insert(key, Value::Set(table));
        }
        Ok(len)
    }
}

impl Drop for SetLocks<'_> {
    fn drop(&mut self) {
        for key in self.locks.keys().to_vec() {
            self.delete_if_empty(&key);
        }
    }
}

fn not_locked(key: &[u8]) -> SetError {
    SetError::InvalidArgument(format!(
        "key '{}' is not part of this operation",
        String::from_utf8_lossy(key)
    ))
}
