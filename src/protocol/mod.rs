//! RESP2 value model
//!
//! Requests and replies are exchanged as `RespValue`s. No wire codec is
//! needed: the console builds requests from text and renders replies itself.

mod types;

pub use types::RespValue;
