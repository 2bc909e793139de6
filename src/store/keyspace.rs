//! Shared key-space with per-key locking
//!
//! Every key maps to a slot guarded by its own mutex. Commands lock the keys
//! they touch through [`Keyspace::lock`], which always acquires slots in
//! lexical key order so multi-key commands cannot deadlock each other.
//! Slots left without a live value are unlinked from the map once their
//! guards are released.

use super::entry::Entry;
use super::value::Value;
use bytes::Bytes;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex, RwLock};
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::Arc;
use tracing::debug;

/// Type alias for the slot map with SipHasher
type SlotMap = HashMap<Bytes, Arc<Mutex<Slot>>, BuildHasherDefault<SipHasher13>>;

type SlotGuard = ArcMutexGuard<RawMutex, Slot>;

/// State behind one key's lock
#[derive(Debug, Default)]
pub struct Slot {
    entry: Option<Entry>,

    /// Set once the slot has been unlinked from the map
    detached: bool,
}

impl Slot {
    fn live(&self) -> Option<&Entry> {
        self.entry.as_ref().filter(|e| !e.is_expired())
    }

    fn is_vacant(&self) -> bool {
        self.live().is_none()
    }
}

/// In-memory key-space shared by every command context
pub struct Keyspace {
    slots: RwLock<SlotMap>,
}

impl Keyspace {
    /// Create a new key-space with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new key-space with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Keyspace {
            slots: RwLock::new(HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            )),
        }
    }

    /// Lock a single key
    pub fn lock_one(&self, key: &Bytes) -> KeyLocks<'_> {
        self.lock(std::slice::from_ref(key))
    }

    /// Lock a group of keys for the duration of one operation
    ///
    /// Duplicate keys are locked once. Slots are created for absent keys so a
    /// concurrent writer cannot slip a value in under the caller.
    pub fn lock(&self, keys: &[Bytes]) -> KeyLocks<'_> {
        let mut ordered = keys.to_vec();
        ordered.sort();
        ordered.dedup();

        loop {
            let guards: Vec<SlotGuard> = self
                .slots_for(&ordered)
                .into_iter()
                .map(|slot| slot.lock_arc())
                .collect();

            if guards.iter().all(|g| !g.detached) {
                return KeyLocks {
                    keyspace: self,
                    keys: ordered,
                    guards,
                };
            }

            // A slot was reaped between lookup and locking, take fresh ones
            debug!("Retrying key lock acquisition after concurrent reap");
        }
    }

    /// Get the number of live keys
    pub fn len(&self) -> usize {
        self.live_slots().len()
    }

    /// Check if the key-space is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all live keys (expensive operation, for KEYS/admin)
    pub fn keys(&self) -> Vec<Bytes> {
        self.live_slots().into_iter().map(|(key, _)| key).collect()
    }

    /// Remove all keys
    pub fn clear(&self) {
        let slots: Vec<Arc<Mutex<Slot>>> = self.slots.write().drain().map(|(_, s)| s).collect();

        // One slot at a time, holders of several guards lock in key order
        for slot in slots {
            let mut slot = slot.lock();
            slot.entry = None;
            slot.detached = true;
        }
    }

    /// Get statistics about the key-space
    pub fn stats(&self) -> KeyspaceStats {
        let slots: Vec<Arc<Mutex<Slot>>> = self.slots.read().values().cloned().collect();

        let mut stats = KeyspaceStats::default();
        for slot in slots {
            let slot = slot.lock();
            match &slot.entry {
                Some(entry) if entry.is_expired() => stats.expired_keys += 1,
                Some(entry) => {
                    stats.active_keys += 1;
                    if entry.expire_at.is_some() {
                        stats.volatile_keys += 1;
                    }
                    stats.used_memory_bytes += entry.memory_usage();
                }
                None => {}
            }
        }
        stats
    }

    /// Slots for `keys`, creating empty ones where missing
    fn slots_for(&self, keys: &[Bytes]) -> Vec<Arc<Mutex<Slot>>> {
        {
            let map = self.slots.read();
            let found: Option<Vec<_>> = keys.iter().map(|k| map.get(k).cloned()).collect();
            if let Some(slots) = found {
                return slots;
            }
        }

        let mut map = self.slots.write();
        keys.iter()
            .map(|k| map.entry(k.clone()).or_default().clone())
            .collect()
    }

    fn live_slots(&self) -> Vec<(Bytes, Arc<Mutex<Slot>>)> {
        let slots: Vec<(Bytes, Arc<Mutex<Slot>>)> = self
            .slots
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        slots
            .into_iter()
            .filter(|(_, slot)| !slot.lock().is_vacant())
            .collect()
    }

    /// Unlink vacant slots for `keys`
    fn reap(&self, keys: &[Bytes]) {
        let mut map = self.slots.write();
        for key in keys {
            let vacant = match map.get(key) {
                Some(slot) => {
                    let mut slot = slot.lock();
                    if slot.is_vacant() {
                        slot.entry = None;
                        slot.detached = true;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            };

            if vacant {
                map.remove(key);
            }
        }
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to a group of locked keys
///
/// Expired entries read as absent. Dropping the locks releases every slot and
/// unlinks those left vacant.
pub struct KeyLocks<'a> {
    keyspace: &'a Keyspace,

    /// Locked keys, sorted and deduplicated
    keys: Vec<Bytes>,

    /// One guard per key, same order as `keys`
    guards: Vec<SlotGuard>,
}

impl KeyLocks<'_> {
    /// Get the live entry for a key
    pub fn entry(&self, key: &[u8]) -> Option<&Entry> {
        self.index(key).and_then(|i| self.guards[i].live())
    }

    /// Get the live entry for a key, mutably
    pub fn entry_mut(&mut self, key: &[u8]) -> Option<&mut Entry> {
        let i = self.index(key)?;
        self.guards[i].entry.as_mut().filter(|e| !e.is_expired())
    }

    /// Get the value for a key
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entry(key).map(|e| &e.value)
    }

    /// Get the value for a key, mutably
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut Value> {
        self.entry_mut(key).map(|e| &mut e.value)
    }

    /// Get the live value or insert the one built by `default`
    ///
    /// Returns None only if `key` is not held by these locks.
    pub fn get_or_insert_with<F>(&mut self, key: &[u8], default: F) -> Option<&mut Value>
    where
        F: FnOnce() -> Value,
    {
        let i = self.index(key)?;
        let slot = &mut self.guards[i];
        if slot.is_vacant() {
            slot.entry = Some(Entry::new(default()));
        }
        slot.entry.as_mut().map(|e| &mut e.value)
    }

    /// Overwrite the value of a key, dropping any expiration
    ///
    /// Returns false if `key` is not held by these locks.
    pub fn insert(&mut self, key: &[u8], value: Value) -> bool {
        match self.index(key) {
            Some(i) => {
                self.guards[i].entry = Some(Entry::new(value));
                true
            }
            None => false,
        }
    }

    /// Remove a key, returns true if it held a live value
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match self.index(key) {
            Some(i) => {
                let slot = &mut self.guards[i];
                let existed = !slot.is_vacant();
                slot.entry = None;
                existed
            }
            None => false,
        }
    }

    /// Locked keys, in locking order
    pub fn keys(&self) -> &[Bytes] {
        &self.keys
    }

    /// Check whether `key` is held by these locks
    pub fn holds(&self, key: &[u8]) -> bool {
        self.index(key).is_some()
    }

    fn index(&self, key: &[u8]) -> Option<usize> {
        self.keys.binary_search_by(|k| k.as_ref().cmp(key)).ok()
    }
}

impl Drop for KeyLocks<'_> {
    fn drop(&mut self) {
        let vacant: Vec<Bytes> = self
            .keys
            .iter()
            .zip(&self.guards)
            .filter(|(_, slot)| slot.is_vacant())
            .map(|(key, _)| key.clone())
            .collect();

        // Release every slot before taking the map lock
        self.guards.clear();

        if !vacant.is_empty() {
            self.keyspace.reap(&vacant);
        }
    }
}

/// Statistics about the key-space
#[derive(Debug, Clone, Default)]
pub struct KeyspaceStats {
    pub active_keys: usize,
    pub volatile_keys: usize,
    pub expired_keys: usize,
    pub used_memory_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let keyspace = Keyspace::new();
        let key = Bytes::from("key1");

        {
            let mut locks = keyspace.lock_one(&key);
            assert!(locks.insert(&key, Value::string("value1")));
        }

        let locks = keyspace.lock_one(&key);
        let value = locks.get(&key).and_then(Value::as_string);
        assert_eq!(value, Some(&Bytes::from("value1")));
    }

    #[test]
    fn test_vacant_slots_are_reaped() {
        let keyspace = Keyspace::new();
        let key = Bytes::from("ghost");

        {
            let locks = keyspace.lock_one(&key);
            assert!(locks.get(&key).is_none());
        }

        assert!(keyspace.slots.read().is_empty());
        assert!(keyspace.is_empty());
    }

    #[test]
    fn test_remove() {
        let keyspace = Keyspace::new();
        let key = Bytes::from("key1");

        keyspace.lock_one(&key).insert(&key, Value::string("v"));
        assert_eq!(keyspace.len(), 1);

        assert!(keyspace.lock_one(&key).remove(&key));
        assert!(!keyspace.lock_one(&key).remove(&key));
        assert_eq!(keyspace.len(), 0);
    }

    #[test]
    fn test_duplicate_keys_locked_once() {
        let keyspace = Keyspace::new();
        let a = Bytes::from("a");
        let b = Bytes::from("b");

        let mut locks = keyspace.lock(&[b.clone(), a.clone(), b.clone()]);
        assert!(locks.holds(&a));
        assert!(locks.holds(&b));
        assert!(!locks.holds(b"c"));
        assert!(!locks.insert(b"c", Value::string("x")));
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let keyspace = Keyspace::new();
        let key = Bytes::from("temp");

        {
            let mut locks = keyspace.lock_one(&key);
            locks.insert(&key, Value::string("v"));
            locks.entry_mut(&key).unwrap().set_expiration(0);
            assert!(locks.get(&key).is_none());
        }

        assert!(keyspace.keys().is_empty());
    }

    #[test]
    fn test_clear() {
        let keyspace = Keyspace::new();
        for k in ["a", "b", "c"] {
            let key = Bytes::from(k);
            keyspace.lock_one(&key).insert(&key, Value::string("v"));
        }
        assert_eq!(keyspace.stats().active_keys, 3);

        keyspace.clear();
        assert_eq!(keyspace.len(), 0);
    }
}
