//! Command registry
//!
//! Centralized registry for all available commands.
//! This allows loose coupling between command implementations and the dispatcher.

use super::{admin, key, search, set, string, ttl, Command};
use crate::set::SetOp;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available commands
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a new command registry and register all commands
    pub fn new() -> Self {
        let mut registry = CommandRegistry {
            commands: HashMap::new(),
        };

        // Register set commands
        registry.register(Arc::new(set::SAddCommand));
        registry.register(Arc::new(set::SRemCommand));
        registry.register(Arc::new(set::SCardCommand));
        registry.register(Arc::new(set::SIsMemberCommand));
        registry.register(Arc::new(set::SMIsMemberCommand));
        registry.register(Arc::new(set::SMembersCommand));
        registry.register(Arc::new(set::SMoveCommand));
        registry.register(Arc::new(set::SPopCommand));
        registry.register(Arc::new(set::SRandMemberCommand));
        registry.register(Arc::new(set::SScanCommand));

        // Register set algebra, plain and store variants
        for op in [SetOp::Union, SetOp::Intersect, SetOp::Difference] {
            registry.register(Arc::new(set::SetOpCommand::new(op)));
            registry.register(Arc::new(set::SetOpStoreCommand::new(op)));
        }

        // Register string commands
        registry.register(Arc::new(string::SetCommand));
        registry.register(Arc::new(string::GetCommand));

        // Register key commands
        registry.register(Arc::new(key::DelCommand));
        registry.register(Arc::new(key::ExistsCommand));
        registry.register(Arc::new(key::TypeCommand));

        // Register TTL commands
        registry.register(Arc::new(ttl::ExpireCommand));
        registry.register(Arc::new(ttl::TtlCommand));

        // Register admin commands
        registry.register(Arc::new(admin::InfoCommand));
        registry.register(Arc::new(admin::FlushDbCommand));
        registry.register(Arc::new(admin::PingCommand));

        // Register search commands
        registry.register(Arc::new(search::KeysCommand));

        registry
    }

    /// Register a command
    fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// Get a command by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_uppercase()).cloned()
    }

    /// Check if a command exists
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_uppercase())
    }

    /// Get all command names
    pub fn command_names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_set_command_registered() {
        let registry = CommandRegistry::new();
        for name in [
            "SADD", "SREM", "SCARD", "SISMEMBER", "SMISMEMBER", "SMEMBERS", "SUNION", "SINTER",
            "SDIFF", "SUNIONSTORE", "SINTERSTORE", "SDIFFSTORE", "SMOVE", "SPOP", "SRANDMEMBER",
            "SSCAN",
        ] {
            assert!(registry.has_command(name), "{} missing", name);
        }
        assert!(registry.has_command("sscan"));
        assert!(!registry.has_command("LPUSH"));
        assert_eq!(registry.command_names().len(), 27);
    }
}
