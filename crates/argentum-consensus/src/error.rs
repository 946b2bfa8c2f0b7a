//! Consensus error types.

use argentum_core::{Algo, Hash256};
use argentum_crypto::HashError;
use std::fmt;
use thiserror::Error;

/// Why a compact target was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitsError {
    /// Sign bit set in the mantissa.
    Negative,
    Zero,
    /// Exponent places significant bits beyond 256 bits.
    Overflow,
    /// Decodes to a target easier than the network's `pow_limit`.
    AboveLimit,
}

impl fmt::Display for BitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BitsError::Negative => "negative target",
            BitsError::Zero => "zero target",
            BitsError::Overflow => "target overflows 256 bits",
            BitsError::AboveLimit => "target above pow limit",
        })
    }
}

/// Errors returned by proof-of-work validation.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Compact `bits` do not describe a usable target.
    #[error("bits {bits:#010x} below minimum work: {reason}")]
    InvalidBits { bits: u32, reason: BitsError },

    /// Proof-of-work hash is larger than the claimed target.
    #[error("{algo} hash {hash} doesn't match bits {bits:#010x}")]
    HashAboveTarget { algo: Algo, hash: Hash256, bits: u32 },

    /// The header's PoW hash could not be computed.
    #[error(transparent)]
    Hash(#[from] HashError),
}
