// Consensus-critical. A skipped block here silently corrupts every
// multi-algorithm retarget.
//! Backward walks over block ancestry.

use argentum_core::{Algo, BlockIndex, ChainView, ConsensusParams};

/// The block `n` hops behind `block`, or `None` if ancestry runs out first.
pub fn ancestor<'a, V: ChainView + ?Sized>(
    view: &'a V,
    block: &'a BlockIndex,
    n: i64,
) -> Option<&'a BlockIndex> {
    let mut cursor = block;
    for _ in 0..n.max(0) {
        cursor = view.previous(cursor)?;
    }
    Some(cursor)
}

/// Most recent block mined with `algo`, starting at `block` itself.
pub fn last_block_for_algo<'a, V: ChainView + ?Sized>(
    view: &'a V,
    block: &'a BlockIndex,
    algo: Algo,
) -> Option<&'a BlockIndex> {
    let mut cursor = Some(block);
    while let Some(b) = cursor {
        if b.algo() == algo {
            return Some(b);
        }
        cursor = view.previous(b);
    }
    None
}

/// Nearest strict ancestor of `block` mined with `algo`, searching only
/// blocks at or above the DigiSpeed activation height.
///
/// `algo = None` searches for `block`'s own algorithm.
pub fn prev_block_for_algo<'a, V: ChainView + ?Sized>(
    view: &'a V,
    block: &'a BlockIndex,
    algo: Option<Algo>,
    params: &ConsensusParams,
) -> Option<&'a BlockIndex> {
    if block.height < params.bip146_height {
        return None;
    }
    let algo = algo.unwrap_or_else(|| block.algo());
    let mut cursor = view.previous(block);
    while let Some(b) = cursor {
        if b.height < params.bip146_height {
            break;
        }
        if b.algo() == algo {
            return Some(b);
        }
        cursor = view.previous(b);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use argentum_core::MemoryChain;

    const BITS: u32 = 0x1e0f_fff0;

    fn chain_of(algos: &[Algo]) -> MemoryChain {
        let mut chain = MemoryChain::new();
        for (i, a) in algos.iter().enumerate() {
            chain.push(2 | a.version_bits(), 1_000 + i as u32 * 45, BITS);
        }
        chain
    }

    #[test]
    fn ancestor_counts_hops() {
        let chain = chain_of(&[Algo::Scrypt; 5]);
        let tip = chain.tip().unwrap();
        assert_eq!(ancestor(&chain, tip, 0).unwrap().height, 4);
        assert_eq!(ancestor(&chain, tip, 4).unwrap().height, 0);
        assert!(ancestor(&chain, tip, 5).is_none());
    }

    #[test]
    fn last_block_for_algo_includes_the_start() {
        let chain = chain_of(&[Algo::Sha256d, Algo::Scrypt, Algo::Groestl]);
        let tip = chain.tip().unwrap();
        assert_eq!(last_block_for_algo(&chain, tip, Algo::Groestl).unwrap().height, 2);
        assert_eq!(last_block_for_algo(&chain, tip, Algo::Sha256d).unwrap().height, 0);
        assert!(last_block_for_algo(&chain, tip, Algo::Yescrypt).is_none());
    }

    #[test]
    fn prev_block_for_algo_is_strict_and_fork_bounded() {
        let chain = chain_of(&[
            Algo::Argon2d,
            Algo::Scrypt,
            Algo::Argon2d,
            Algo::Sha256d,
            Algo::Argon2d,
        ]);
        let mut params = ConsensusParams::regtest().clone();
        let tip = chain.tip().unwrap();

        params.bip146_height = 0;
        assert_eq!(prev_block_for_algo(&chain, tip, None, &params).unwrap().height, 2);
        assert_eq!(
            prev_block_for_algo(&chain, tip, Some(Algo::Scrypt), &params).unwrap().height,
            1
        );

        params.bip146_height = 3;
        assert!(prev_block_for_algo(&chain, tip, None, &params).is_none());

        params.bip146_height = 10;
        assert!(prev_block_for_algo(&chain, tip, Some(Algo::Sha256d), &params).is_none());
    }
}
