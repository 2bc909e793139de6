//! Member table: hash storage for the members of one set
//!
//! Members live in a power-of-two array of bucket chains. The layout is
//! exposed to the SSCAN cursor through [`MemberTable::scan_buckets`], which
//! walks buckets in reverse-binary order so that a full scan stays complete
//! when the table grows or shrinks between calls.

use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::hash::{BuildHasher, BuildHasherDefault};

/// Smallest bucket array ever allocated
const MIN_BUCKETS: usize = 4;

/// The table shrinks once it holds fewer than one member per this many buckets
const SHRINK_RATIO: usize = 8;

/// Empty buckets a scan step may skip per requested member
const EMPTY_VISITS_PER_COUNT: usize = 10;

/// Unordered collection of unique members
#[derive(Debug, Clone)]
pub struct MemberTable {
    /// Bucket chains, length is always a power of two
    buckets: Vec<Vec<Bytes>>,

    /// Number of members across all chains
    len: usize,

    hasher: BuildHasherDefault<SipHasher13>,
}

impl MemberTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty table sized for `capacity` members
    pub fn with_capacity(capacity: usize) -> Self {
        MemberTable {
            buckets: vec![Vec::new(); capacity.next_power_of_two().max(MIN_BUCKETS)],
            len: 0,
            hasher: BuildHasherDefault::<SipHasher13>::default(),
        }
    }

    /// Add a member, returns true if it was not already present
    pub fn add(&mut self, member: impl Into<Bytes>) -> bool {
        let member = member.into();
        let idx = self.bucket_index(&member);

        if self.buckets[idx].iter().any(|m| *m == member) {
            return false;
        }

        self.buckets[idx].push(member);
        self.len += 1;

        if self.len > self.buckets.len() {
            self.resize(self.buckets.len() * 2);
        }

        true
    }

    /// Remove a member, returns true if it was present
    pub fn remove(&mut self, member: &[u8]) -> bool {
        let idx = self.bucket_index(member);
        let chain = &mut self.buckets[idx];

        match chain.iter().position(|m| m.as_ref() == member) {
            Some(pos) => {
                chain.swap_remove(pos);
                self.len -= 1;
                self.maybe_shrink();
                true
            }
            None => false,
        }
    }

    /// Check membership
    pub fn contains(&self, member: &[u8]) -> bool {
        let idx = self.bucket_index(member);
        self.buckets[idx].iter().any(|m| m.as_ref() == member)
    }

    /// Number of members (cardinality)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all members, order unspecified
    pub fn iter(&self) -> impl Iterator<Item = &Bytes> + '_ {
        self.buckets.iter().flatten()
    }

    /// Copy of all current members
    pub fn snapshot(&self) -> Vec<Bytes> {
        self.iter().cloned().collect()
    }

    /// Remove and return every member, leaving an empty table
    pub fn drain(&mut self) -> Vec<Bytes> {
        let buckets = std::mem::replace(&mut self.buckets, vec![Vec::new(); MIN_BUCKETS]);
        self.len = 0;
        buckets.into_iter().flatten().collect()
    }

    /// Size of the bucket array
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Visit the buckets starting at `cursor` and return the cursor to resume from
    ///
    /// Whole buckets are visited until at least `count` members were passed to
    /// `visit`, too many empty buckets were skipped, or the cursor wrapped back
    /// to 0 (scan complete). Bits of `cursor` beyond the current bucket mask are
    /// ignored, so any value terminates.
    pub fn scan_buckets<F>(&self, cursor: u64, count: usize, mut visit: F) -> u64
    where
        F: FnMut(&Bytes),
    {
        if self.len == 0 {
            return 0;
        }

        let mask = (self.buckets.len() - 1) as u64;
        let mut cursor = cursor;
        let mut visited = 0;
        let mut empty_budget = count.max(1).saturating_mul(EMPTY_VISITS_PER_COUNT);

        loop {
            let chain = &self.buckets[(cursor & mask) as usize];
            if chain.is_empty() {
                empty_budget -= 1;
            } else {
                chain.iter().for_each(&mut visit);
                visited += chain.len();
            }

            cursor = next_cursor(cursor, mask);

            if cursor == 0 || visited >= count || empty_budget == 0 {
                return cursor;
            }
        }
    }

    /// Approximate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let items_size: usize = self.iter().map(|m| m.len()).sum();
        let overhead = self.buckets.len() * std::mem::size_of::<Vec<Bytes>>();
        items_size + overhead
    }

    fn bucket_index(&self, member: &[u8]) -> usize {
        (self.hasher.hash_one(member) as usize) & (self.buckets.len() - 1)
    }

    fn maybe_shrink(&mut self) {
        if self.buckets.len() > MIN_BUCKETS && self.len * SHRINK_RATIO < self.buckets.len() {
            self.resize(self.len.next_power_of_two().max(MIN_BUCKETS));
        }
    }

    fn resize(&mut self, size: usize) {
        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); size]);
        for member in old.into_iter().flatten() {
            let idx = self.bucket_index(&member);
            self.buckets[idx].push(member);
        }
    }
}

/// Reverse-binary increment of the masked part of `cursor`
fn next_cursor(cursor: u64, mask: u64) -> u64 {
    // Unmasked bits are set so the carry of the reversed increment lands in the mask
    (cursor | !mask).reverse_bits().wrapping_add(1).reverse_bits()
}

impl Default for MemberTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MemberTable {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|m| other.contains(m))
    }
}

impl Eq for MemberTable {}

impl<M: Into<Bytes>> FromIterator<M> for MemberTable {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        let mut table = MemberTable::new();
        table.extend(iter);
        table
    }
}

impl<M: Into<Bytes>> Extend<M> for MemberTable {
    fn extend<I: IntoIterator<Item = M>>(&mut self, iter: I) {
        for member in iter {
            self.add(member);
        }
    }
}
