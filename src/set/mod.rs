//! Set data-type engine
//!
//! Built on the member table and key-space from `store`:
//! - `registry`: set-typed key access, create on insert, delete on empty
//! - `algebra`: union, intersection and difference, plain and store
//! - `sampler`: SRANDMEMBER and SPOP
//! - `scan`: SSCAN cursor steps
//! - `glob`: pattern matching used to filter scans

mod algebra;
mod glob;
mod registry;
mod sampler;
mod scan;

pub use algebra::{difference, intersect, union, SetOp};
pub use glob::{matches, GlobError, GlobPattern};
pub use registry::{SetLocks, SetRegistry};
pub use sampler::{pop, pop_one, random_member, random_members};
pub use scan::{scan, ScanBatch, ScanOptions, DEFAULT_SCAN_COUNT};
