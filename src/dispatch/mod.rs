//! Command dispatcher
//!
//! Routes incoming commands to the appropriate handler.
//! This module provides loose coupling between the console and command implementations.

use crate::commands::{CommandContext, CommandRegistry};
use crate::config::EngineConfig;
use crate::protocol::RespValue;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

/// Command dispatcher
///
/// Receives RESP commands, validates them, and routes to appropriate handlers
pub struct Dispatcher {
    /// Command registry, shared between forks
    registry: Arc<CommandRegistry>,

    /// Command execution context
    context: CommandContext,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Self::with_context(CommandContext::new())
    }

    /// Create a dispatcher from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_context(CommandContext::from_config(config))
    }

    /// Create a dispatcher around an existing context
    pub fn with_context(context: CommandContext) -> Self {
        Dispatcher {
            registry: Arc::new(CommandRegistry::new()),
            context,
        }
    }

    /// New dispatcher over the same key-space, for use on another thread
    pub fn fork(&self) -> Self {
        Dispatcher {
            registry: self.registry.clone(),
            context: self.context.fork(),
        }
    }

    /// Dispatch a command
    ///
    /// Takes a RESP value (expected to be an array), extracts the command name
    /// and arguments, then routes to the appropriate handler.
    pub fn dispatch(&mut self, value: RespValue) -> RespValue {
        // Commands should be arrays
        let args = match value.as_array() {
            Some(arr) if !arr.is_empty() => arr,
            Some(_) => {
                return RespValue::error("ERR empty command array");
            }
            None => {
                return RespValue::error("ERR expected array");
            }
        };

        // First element is the command name
        let cmd_name = match args[0].as_bulk_string() {
            Some(name) => match std::str::from_utf8(name) {
                Ok(s) => s,
                Err(_) => {
                    let b64 = general_purpose::STANDARD.encode(name);
                    warn!("Invalid command name encoding. Raw bytes (B64): {}", b64);
                    return RespValue::error("ERR invalid command name encoding");
                }
            },
            None => {
                return RespValue::error("ERR command name must be a bulk string");
            }
        };

        debug!("Dispatching command: {}", cmd_name);

        // Look up the command
        let command = match self.registry.get(cmd_name) {
            Some(cmd) => cmd,
            None => {
                warn!("Unknown command: {}", cmd_name);
                return RespValue::error(format!("ERR unknown command '{}'", cmd_name));
            }
        };

        // Extract arguments (everything after the command name)
        let cmd_args = &args[1..];

        let reply = command.execute(&mut self.context, cmd_args);
        if let RespValue::Error(e) = &reply {
            debug!("{} failed: {}", command.name(), e);
        }
        reply
    }

    /// Convenience wrapper building the request array from plain words
    pub fn dispatch_words<I, S>(&mut self, words: I) -> RespValue
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let parts = words
            .into_iter()
            .map(|w| RespValue::bulk_string(Bytes::copy_from_slice(w.as_ref())))
            .collect();
        self.dispatch(RespValue::array(parts))
    }

    /// Get reference to the context (for testing/inspection)
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Get mutable reference to the context (for testing/inspection)
    pub fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.context
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
