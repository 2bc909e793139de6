//! Incremental enumeration (SSCAN)
//!
//! A cursor of 0 starts a scan; a returned cursor of 0 ends it. Every member
//! present for the whole duration of a complete scan is returned at least
//! once, even if the table is resized between calls. Members may repeat.

use super::glob::GlobPattern;
use super::registry::SetRegistry;
use crate::error::Result;
use crate::store::MemberTable;
use bytes::Bytes;

/// Default number of members retrieved per call
pub const DEFAULT_SCAN_COUNT: usize = 10;

/// Result of one scan step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanBatch {
    /// Cursor to resume from, 0 when the scan is complete
    pub cursor: u64,

    /// Members that matched the pattern
    pub members: Vec<Bytes>,
}

impl ScanBatch {
    fn complete() -> Self {
        ScanBatch {
            cursor: 0,
            members: Vec::new(),
        }
    }
}

/// Scan parameters after argument validation
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub pattern: GlobPattern,

    /// Advisory number of raw members to retrieve, always positive
    pub count: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            pattern: GlobPattern::any(),
            count: DEFAULT_SCAN_COUNT,
        }
    }
}

/// Run one scan step over `table`
///
/// About `count` members are retrieved from the cursor position, then
/// filtered by the pattern. Filtering never changes which buckets are
/// consumed, so a selective pattern can yield empty batches mid-scan.
pub fn scan(table: &MemberTable, cursor: u64, options: &ScanOptions) -> ScanBatch {
    let match_all = options.pattern.matches_everything();
    let mut members = Vec::new();

    let cursor = table.scan_buckets(cursor, options.count, |member| {
        if match_all || options.pattern.matches(member) {
            members.push(member.clone());
        }
    });

    ScanBatch { cursor, members }
}

impl SetRegistry {
    /// One SSCAN step over the set at `key`; an absent key completes at once
    pub fn scan(&self, key: &Bytes, cursor: u64, options: &ScanOptions) -> Result<ScanBatch> {
        let sets = self.lock_one(key);
        let batch = match sets.get(key)? {
            Some(table) => scan(table, cursor, options),
            None => ScanBatch::complete(),
        };
        Ok(batch)
    }
}
