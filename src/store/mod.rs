//! In-memory storage module
//!
//! Provides the member table backing sets and the key-space that maps keys
//! to tagged values. This module is independent of protocol and command
//! handling (loose coupling).

mod entry;
mod keyspace;
mod table;
mod value;

pub use entry::Entry;
pub use keyspace::{KeyLocks, Keyspace, KeyspaceStats};
pub use table::MemberTable;
pub use value::Value;
