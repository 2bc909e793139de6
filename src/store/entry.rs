//! Entry structure for key-space values

use super::value::Value;
use std::time::{Duration, Instant};

/// A value together with its expiration metadata
#[derive(Debug, Clone)]
pub struct Entry {
    /// The value
    pub value: Value,

    /// Optional expiration time (absolute)
    pub expire_at: Option<Instant>,
}

impl Entry {
    /// Create a new entry without expiration
    pub fn new(value: Value) -> Self {
        Entry {
            value,
            expire_at: None,
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        match self.expire_at {
            Some(expire_at) => Instant::now() >= expire_at,
            None => false,
        }
    }

    /// Set expiration time (TTL in seconds)
    ///
    /// A non-positive TTL expires the entry immediately. A TTL too large to
    /// represent leaves the entry without expiration.
    pub fn set_expiration(&mut self, ttl_seconds: i64) {
        let ttl = Duration::from_secs(ttl_seconds.max(0) as u64);
        self.expire_at = Instant::now().checked_add(ttl);
    }

    /// Get remaining TTL in seconds
    pub fn ttl_seconds(&self) -> i64 {
        match self.expire_at {
            Some(expire_at) => {
                let now = Instant::now();
                if expire_at > now {
                    // Round up so a fresh `EXPIRE k 100` reports 100
                    let remaining = expire_at.duration_since(now);
                    i64::try_from(remaining.as_millis().div_ceil(1000)).unwrap_or(i64::MAX)
                } else {
                    -2 // Expired
                }
            }
            None => -1, // No expiration
        }
    }

    /// Calculate approximate memory usage of this entry in bytes
    pub fn memory_usage(&self) -> usize {
        self.value.memory_usage() + std::mem::size_of::<Option<Instant>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_states() {
        let mut entry = Entry::new(Value::string("v"));
        assert_eq!(entry.ttl_seconds(), -1);
        assert!(!entry.is_expired());

        entry.set_expiration(100);
        let ttl = entry.ttl_seconds();
        assert!((99..=100).contains(&ttl));

        entry.set_expiration(0);
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_seconds(), -2);
    }

    #[test]
    fn test_ttl_far_future() {
        let mut entry = Entry::new(Value::string("v"));
        let far = Duration::from_secs(100_000_000_000_000_000);
        entry.expire_at = Instant::now().checked_add(far);

        // Platforms whose Instant cannot reach that far leave the entry persistent
        if entry.expire_at.is_some() {
            let ttl = entry.ttl_seconds();
            assert!(ttl > 99_999_999_999_000_000, "ttl {}", ttl);
            assert!(ttl <= 100_000_000_000_000_000);
        }
    }
}
