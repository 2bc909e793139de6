//! FerrumSet - An in-memory, Redis-compatible set engine
//!
//! FerrumSet is designed with strong cohesion and loose coupling principles:
//! - `store` owns the key-space, per-key locking and the member table
//! - `set` builds the set semantics on top: registry, algebra, sampling, scan
//! - `commands` and `dispatch` expose them as Redis-style commands
//! - `console` drives the dispatcher from a line-oriented terminal session

pub mod protocol;
pub mod store;
pub mod set;
pub mod commands;
pub mod dispatch;
pub mod config;
pub mod console;
pub mod error;

/// Re-export commonly used types
pub use store::{Entry, Keyspace, MemberTable, Value};
pub use set::{GlobPattern, SetOp, SetRegistry};
pub use protocol::RespValue;
pub use commands::{Command, CommandContext};
pub use dispatch::Dispatcher;
pub use config::EngineConfig;
pub use error::{Result, SetError};
