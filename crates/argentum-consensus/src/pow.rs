// Consensus-critical. A header accepted here that another node rejects
// forks the network.
//! Proof-of-work verification.
//!
//! Two entry points mirror the two ways headers are checked:
//! - [`check_bits_range`] validates the claimed target only, for contexts
//!   where the PoW hash is not available.
//! - [`check_proof_of_work`] additionally compares the PoW hash with the
//!   target once the node's best chain has passed
//!   `coinbase_maturity_v2_start`. Below that height the comparison is
//!   skipped; this is historical behaviour kept for compatibility with
//!   existing chain data and must not be widened.

use argentum_core::{Algo, BlockHeader, ConsensusParams, Hash256};
use argentum_crypto::HasherRegistry;
use tracing::{debug, warn};

use crate::error::{BitsError, ConsensusError};
use crate::target::Target;

/// Decode `bits` into a target usable for proof-of-work.
///
/// Fails on a negative, overflowing or zero encoding, and on any target
/// easier than the network's `pow_limit`.
pub fn check_bits_range(bits: u32, params: &ConsensusParams) -> Result<Target, ConsensusError> {
    let decoded = Target::from_compact(bits);
    let reason = if decoded.negative {
        Some(BitsError::Negative)
    } else if decoded.overflow {
        Some(BitsError::Overflow)
    } else if decoded.target.is_zero() {
        Some(BitsError::Zero)
    } else if decoded.target > Target::limit(params) {
        Some(BitsError::AboveLimit)
    } else {
        None
    };
    match reason {
        Some(reason) => {
            debug!(bits = format_args!("{bits:#010x}"), %reason, "rejected bits");
            Err(ConsensusError::InvalidBits { bits, reason })
        }
        None => Ok(decoded.target),
    }
}

/// Verify that `hash` satisfies the target encoded in `bits`.
///
/// `best_height` is the height of the node's current best chain, read by
/// the caller under whatever lock guards it.
pub fn check_proof_of_work(
    hash: &Hash256,
    algo: Algo,
    bits: u32,
    params: &ConsensusParams,
    best_height: u32,
) -> Result<(), ConsensusError> {
    let target = check_bits_range(bits, params)?;

    if best_height > params.coinbase_maturity_v2_start && Target::from_hash(hash) > target {
        return Err(ConsensusError::HashAboveTarget {
            algo,
            hash: *hash,
            bits,
        });
    }
    Ok(())
}

/// [`check_proof_of_work`] reduced to a yes/no answer.
pub fn is_valid_proof_of_work(
    hash: &Hash256,
    algo: Algo,
    bits: u32,
    params: &ConsensusParams,
    best_height: u32,
) -> bool {
    check_proof_of_work(hash, algo, bits, params, best_height).is_ok()
}

/// Hash `header` with the algorithm its version announces and verify the
/// result against its own `bits`.
pub fn check_header(
    header: &BlockHeader,
    hashers: &HasherRegistry,
    params: &ConsensusParams,
    best_height: u32,
) -> Result<Hash256, ConsensusError> {
    let algo = header.algo();
    let hash = hashers.pow_hash(header, algo)?;
    if let Err(e) = check_proof_of_work(&hash, algo, header.bits, params, best_height) {
        warn!(block = %header.hash(), %algo, error = %e, "proof of work failed");
        return Err(e);
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_reasons() {
        let p = ConsensusParams::main();
        let reason = |bits| match check_bits_range(bits, p) {
            Err(ConsensusError::InvalidBits { reason, .. }) => Some(reason),
            _ => None,
        };
        assert_eq!(reason(0x0480_0001), Some(BitsError::Negative));
        assert_eq!(reason(0), Some(BitsError::Zero));
        assert_eq!(reason(0x0100_0001), Some(BitsError::Zero));
        assert_eq!(reason(0xff12_3456), Some(BitsError::Overflow));
        assert_eq!(reason(0x207f_ffff), Some(BitsError::AboveLimit));
        assert_eq!(reason(0x1e0f_fff0), None);
    }

    #[test]
    fn hash_at_target_passes_and_above_fails() {
        let p = ConsensusParams::main();
        let bits = 0x1d00_ffff;
        let target = Target::from_compact(bits).target;
        let at = target.to_hash();
        let above = (&target + &Target::from_u64(1)).to_hash();

        assert!(check_proof_of_work(&at, Algo::Scrypt, bits, p, u32::MAX).is_ok());
        let err = check_proof_of_work(&above, Algo::Scrypt, bits, p, u32::MAX).unwrap_err();
        assert!(matches!(err, ConsensusError::HashAboveTarget { bits: b, .. } if b == bits));
    }

    #[test]
    fn comparison_skipped_until_best_height_passes_threshold() {
        let p = ConsensusParams::main();
        let bits = 0x1d00_ffff;
        let worst = Hash256([0xff; 32]);
        let threshold = p.coinbase_maturity_v2_start;

        assert!(is_valid_proof_of_work(&worst, Algo::Sha256d, bits, p, threshold));
        assert!(!is_valid_proof_of_work(&worst, Algo::Sha256d, bits, p, threshold + 1));
    }

    #[test]
    fn range_failures_ignore_the_carve_out() {
        let p = ConsensusParams::main();
        assert!(!is_valid_proof_of_work(&Hash256::ZERO, Algo::Scrypt, 0x207f_ffff, p, 0));
    }
}
