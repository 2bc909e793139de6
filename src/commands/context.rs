//! Command execution context

use crate::config::EngineConfig;
use crate::set::{SetRegistry, DEFAULT_SCAN_COUNT};
use crate::store::Keyspace;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Context provided to commands during execution
///
/// The key-space is shared; the random source and scan default belong to
/// one context, so two contexts can run commands on different threads.
pub struct CommandContext {
    /// Shared key-space
    pub keyspace: Arc<Keyspace>,

    /// Set-typed view over the key-space
    pub sets: SetRegistry,

    /// Random source for SPOP and SRANDMEMBER
    pub rng: StdRng,

    /// SSCAN COUNT when the client gives none
    pub scan_count: usize,
}

impl CommandContext {
    /// Create a new command context over a fresh key-space
    pub fn new() -> Self {
        Self::with_keyspace(Arc::new(Keyspace::new()))
    }

    /// Create a context over an existing key-space
    pub fn with_keyspace(keyspace: Arc<Keyspace>) -> Self {
        CommandContext {
            sets: SetRegistry::new(keyspace.clone()),
            keyspace,
            rng: StdRng::from_entropy(),
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    /// Create a context from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut ctx = Self::with_keyspace(Arc::new(Keyspace::with_capacity(config.initial_capacity)));
        ctx.scan_count = config.scan_count;
        if let Some(seed) = config.rng_seed {
            ctx.rng = StdRng::seed_from_u64(seed);
        }
        ctx
    }

    /// Replace the random source with a seeded one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// New context over the same key-space, with its own random source
    pub fn fork(&self) -> Self {
        let mut ctx = Self::with_keyspace(self.keyspace.clone());
        ctx.scan_count = self.scan_count;
        ctx
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
