//! Per-block and cumulative chain work.
//!
//! Once several algorithms share the chain, a block's work is no longer the
//! inverse of its own target alone: it blends in the most recent work of
//! the other algorithms so that no single algorithm can dominate the
//! heaviest-chain comparison.

use argentum_core::constants::{NUM_ALGOS, NUM_ALGOS2};
use argentum_core::{Algo, BlockIndex, ChainView, ConsensusParams};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::target::Target;

/// Hops after which another algorithm's work no longer counts.
const DECAY_HORIZON: u32 = 100;

/// Expected number of hashes to meet `bits`: `2^256 / (target + 1)`.
///
/// Invalid encodings carry no work.
pub fn block_proof_base(bits: u32) -> BigUint {
    let decoded = Target::from_compact(bits);
    if decoded.negative || decoded.overflow || decoded.target.is_zero() {
        return BigUint::zero();
    }
    (BigUint::one() << 256u32) / (decoded.target.into_biguint() + 1u32)
}

/// Base work of the most recent `algo` block at or before `block`.
///
/// When no such block exists the network's `pow_limit` is used as the work
/// value itself.
pub fn prev_work_for_algo<V: ChainView + ?Sized>(
    view: &V,
    block: &BlockIndex,
    algo: Algo,
    params: &ConsensusParams,
) -> BigUint {
    let mut cursor = Some(block);
    while let Some(b) = cursor {
        if b.algo() == algo {
            return block_proof_base(b.bits);
        }
        cursor = view.previous(b);
    }
    Target::limit(params).into_biguint()
}

/// Like [`prev_work_for_algo`], but losing 1% per hop and nothing at all
/// beyond [`DECAY_HORIZON`] hops or when no such block exists.
pub fn prev_work_for_algo_with_decay<V: ChainView + ?Sized>(
    view: &V,
    block: &BlockIndex,
    algo: Algo,
) -> BigUint {
    let mut distance = 0u32;
    let mut cursor = Some(block);
    while let Some(b) = cursor {
        if distance > DECAY_HORIZON {
            break;
        }
        if b.algo() == algo {
            return block_proof_base(b.bits) * (DECAY_HORIZON - distance) / DECAY_HORIZON;
        }
        cursor = view.previous(b);
        distance += 1;
    }
    BigUint::zero()
}

/// `root`-th root of the product of this block's work and every other
/// algorithm's decayed work, skipping algorithms with none.
fn geometric_mean_prev_work<V: ChainView + ?Sized>(
    view: &V,
    block: &BlockIndex,
    root: u32,
) -> BigUint {
    let own = block.algo();
    let product = Algo::ALL
        .into_iter()
        .filter(|a| *a != own)
        .map(|a| prev_work_for_algo_with_decay(view, block, a))
        .filter(|w| !w.is_zero())
        .fold(block_proof_base(block.bits), |acc, w| acc * w);
    product.nth_root(root)
}

/// Work contributed by `block`, by the rule active at its height.
pub fn block_proof<V: ChainView + ?Sized>(
    view: &V,
    block: &BlockIndex,
    params: &ConsensusParams,
) -> BigUint {
    if block.height >= params.bip146_height {
        // Scaled to stay comparable with the earlier geometric mean.
        geometric_mean_prev_work(view, block, NUM_ALGOS2 as u32) << 8u32
    } else if block.height >= params.geo_avg_work_start {
        geometric_mean_prev_work(view, block, NUM_ALGOS as u32)
    } else if block.height >= params.multi_algo_fork {
        let own = block.algo();
        let sum = Algo::ALL
            .into_iter()
            .take(NUM_ALGOS as usize)
            .filter(|a| *a != own)
            .fold(block_proof_base(block.bits), |acc, a| {
                acc + prev_work_for_algo(view, block, a, params)
            });
        sum / NUM_ALGOS as u32
    } else {
        block_proof_base(block.bits)
    }
}

/// Total work from genesis up to and including `block`.
pub fn chain_work<V: ChainView + ?Sized>(
    view: &V,
    block: &BlockIndex,
    params: &ConsensusParams,
) -> BigUint {
    let mut total = BigUint::zero();
    let mut cursor = Some(block);
    while let Some(b) = cursor {
        total += block_proof(view, b, params);
        cursor = view.previous(b);
    }
    total
}

/// Seconds of mining at the tip's rate that separate two amounts of chain
/// work. Positive when `to_work` exceeds `from_work`; saturates at
/// `±i64::MAX`.
pub fn block_proof_equivalent_time<V: ChainView + ?Sized>(
    to_work: &BigUint,
    from_work: &BigUint,
    view: &V,
    tip: &BlockIndex,
    params: &ConsensusParams,
) -> i64 {
    let (diff, sign) = if to_work > from_work {
        (to_work - from_work, 1)
    } else {
        (from_work - to_work, -1)
    };
    let spacing = u64::try_from(params.pow_target_spacing_v2).unwrap_or(0);
    let tip_proof = block_proof(view, tip, params);
    if tip_proof.is_zero() {
        return sign * i64::MAX;
    }
    let r = diff * spacing / tip_proof;
    if r.bits() > 63 {
        return sign * i64::MAX;
    }
    sign * r.to_i64().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argentum_core::MemoryChain;

    const BITS: u32 = 0x1d00_ffff;

    fn params_with(multi: u32, geo: u32, bip146: u32) -> ConsensusParams {
        let mut p = ConsensusParams::main().clone();
        p.multi_algo_fork = multi;
        p.geo_avg_work_start = geo;
        p.bip146_height = bip146;
        p
    }

    fn single_algo(blocks: u32, algo: Algo) -> MemoryChain {
        let mut c = MemoryChain::new();
        for i in 0..blocks {
            c.push(2 | algo.version_bits(), 1_000 + i * 45, BITS);
        }
        c
    }

    #[test]
    fn base_proof_matches_known_value() {
        assert_eq!(block_proof_base(BITS), BigUint::from(0x1_0001_0001u64));
    }

    #[test]
    fn invalid_bits_carry_no_work() {
        assert!(block_proof_base(0).is_zero());
        assert!(block_proof_base(0x0480_0001).is_zero());
        assert!(block_proof_base(0xff12_3456).is_zero());
    }

    #[test]
    fn decay_loses_one_percent_per_hop() {
        let mut c = MemoryChain::new();
        c.push(2 | Algo::Groestl.version_bits(), 1_000, BITS);
        for i in 1..=3u32 {
            c.push(2, 1_000 + i * 45, BITS);
        }
        let tip = c.tip().unwrap();
        let base = block_proof_base(BITS);
        assert_eq!(
            prev_work_for_algo_with_decay(&c, tip, Algo::Groestl),
            &base * 97u32 / 100u32
        );
        assert_eq!(prev_work_for_algo_with_decay(&c, tip, Algo::Scrypt), base);
        assert!(prev_work_for_algo_with_decay(&c, tip, Algo::Yescrypt).is_zero());
    }

    #[test]
    fn decay_stops_past_horizon() {
        let mut c = MemoryChain::new();
        c.push(2 | Algo::Groestl.version_bits(), 1_000, BITS);
        for i in 1..=101u32 {
            c.push(2, 1_000 + i * 45, BITS);
        }
        let tip = c.tip().unwrap();
        assert!(prev_work_for_algo_with_decay(&c, tip, Algo::Groestl).is_zero());
    }

    #[test]
    fn missing_algo_counts_pow_limit_as_work() {
        let p = ConsensusParams::main();
        let c = single_algo(3, Algo::Scrypt);
        let tip = c.tip().unwrap();
        assert_eq!(
            prev_work_for_algo(&c, tip, Algo::Sha256d, p),
            Target::limit(p).into_biguint()
        );
    }

    #[test]
    fn pre_fork_proof_is_base() {
        let p = ConsensusParams::main();
        let c = single_algo(5, Algo::Scrypt);
        assert_eq!(block_proof(&c, c.tip().unwrap(), p), block_proof_base(BITS));
    }

    #[test]
    fn multi_algo_proof_averages_two_algorithms() {
        let p = params_with(0, u32::MAX, u32::MAX);
        let mut c = MemoryChain::new();
        c.push(2 | Algo::Sha256d.version_bits(), 1_000, 0x1c00_ffff);
        c.push(2 | Algo::Scrypt.version_bits(), 1_045, BITS);
        let tip = c.tip().unwrap();
        let expected = (block_proof_base(BITS) + block_proof_base(0x1c00_ffff)) / 2u32;
        assert_eq!(block_proof(&c, tip, &p), expected);
    }

    #[test]
    fn geometric_mean_of_lone_algorithm_is_its_root() {
        let c = single_algo(5, Algo::Scrypt);
        let tip = c.tip().unwrap();
        let base = block_proof_base(BITS);

        let geo = params_with(0, 0, u32::MAX);
        assert_eq!(block_proof(&c, tip, &geo), base.nth_root(2));

        let geo2 = params_with(0, 0, 0);
        assert_eq!(block_proof(&c, tip, &geo2), base.nth_root(6) << 8u32);
    }

    #[test]
    fn geometric_mean_blends_other_algorithms() {
        let p = params_with(0, 0, u32::MAX);
        let mut c = MemoryChain::new();
        c.push(2 | Algo::Groestl.version_bits(), 1_000, 0x1c00_ffff);
        c.push(2 | Algo::Scrypt.version_bits(), 1_045, BITS);
        let tip = c.tip().unwrap();
        let other = block_proof_base(0x1c00_ffff) * 99u32 / 100u32;
        let expected = (block_proof_base(BITS) * other).nth_root(2);
        assert_eq!(block_proof(&c, tip, &p), expected);
    }

    #[test]
    fn chain_work_sums_every_block() {
        let p = ConsensusParams::main();
        let c = single_algo(10, Algo::Scrypt);
        assert_eq!(
            chain_work(&c, c.tip().unwrap(), p),
            block_proof_base(BITS) * 10u32
        );
    }

    #[test]
    fn equivalent_time_is_signed_and_saturates() {
        let p = ConsensusParams::main();
        let c = single_algo(3, Algo::Scrypt);
        let tip = c.tip().unwrap();
        let base = block_proof_base(BITS);
        let ten = &base * 10u32;

        assert_eq!(block_proof_equivalent_time(&ten, &base, &c, tip, p), 9 * 45);
        assert_eq!(block_proof_equivalent_time(&base, &ten, &c, tip, p), -9 * 45);
        assert_eq!(block_proof_equivalent_time(&base, &base, &c, tip, p), 0);

        let huge = BigUint::one() << 200u32;
        assert_eq!(
            block_proof_equivalent_time(&huge, &BigUint::zero(), &c, tip, p),
            i64::MAX
        );
    }
}
