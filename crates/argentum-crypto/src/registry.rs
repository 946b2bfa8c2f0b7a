use std::collections::HashMap;

use argentum_core::{Algo, BlockHeader, Hash256};
use tracing::trace;

use crate::error::HashError;
use crate::hashers::{Argon2d, Groestl, PowHasher, Scrypt};

/// Maps each mining algorithm to the primitive that computes its PoW hash.
///
/// SHA-256d never goes through the table: its PoW hash is the header's
/// identity hash. Lyra2RE2 and yescrypt have no Rust implementation here and
/// must be registered by the embedding node.
#[derive(Default)]
pub struct HasherRegistry {
    hashers: HashMap<Algo, Box<dyn PowHasher>>,
}

impl HasherRegistry {
    /// An empty registry; only SHA-256d headers can be hashed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every primitive this crate implements.
    pub fn with_builtin() -> Self {
        let mut r = Self::new();
        r.register(Algo::Scrypt, Box::new(Scrypt));
        r.register(Algo::Groestl, Box::new(Groestl));
        r.register(Algo::Argon2d, Box::new(Argon2d::default()));
        r
    }

    /// Install (or replace) the primitive for `algo`.
    pub fn register(&mut self, algo: Algo, hasher: Box<dyn PowHasher>) {
        self.hashers.insert(algo, hasher);
    }

    pub fn supports(&self, algo: Algo) -> bool {
        algo == Algo::Sha256d || self.hashers.contains_key(&algo)
    }

    /// Algorithms that currently have no primitive.
    pub fn missing(&self) -> Vec<Algo> {
        Algo::ALL.into_iter().filter(|a| !self.supports(*a)).collect()
    }

    /// Compute the proof-of-work hash of `header` under `algo`.
    pub fn pow_hash(&self, header: &BlockHeader, algo: Algo) -> Result<Hash256, HashError> {
        if algo == Algo::Sha256d {
            return Ok(header.hash());
        }
        let hasher = self.hashers.get(&algo).ok_or(HashError::Unavailable(algo))?;
        let hash = hasher.hash(&header.serialize_prefix())?;
        trace!(%algo, %hash, "computed pow hash");
        Ok(hash)
    }
}
