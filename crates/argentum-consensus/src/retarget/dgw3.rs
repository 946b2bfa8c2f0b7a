//! DarkGravityWave v3: every block, over a 24-block window.

use argentum_core::constants::{DGW_PAST_BLOCKS_MAX, DGW_PAST_BLOCKS_MIN};
use argentum_core::{BlockIndex, ChainView, ConsensusParams};
use tracing::debug;

use super::rescale;
use crate::target::Target;

pub fn next_work<V: ChainView + ?Sized>(
    view: &V,
    tip: &BlockIndex,
    params: &ConsensusParams,
) -> u32 {
    let limit = Target::limit(params);
    if tip.height == 0 || (tip.height as i64) < DGW_PAST_BLOCKS_MIN {
        return limit.to_compact();
    }

    let mut count: i64 = 0;
    let mut average = Target::zero();
    let mut actual: i64 = 0;
    let mut last_time: i64 = 0;

    let mut reading = Some(tip);
    while let Some(block) = reading {
        if block.height == 0 || count >= DGW_PAST_BLOCKS_MAX {
            break;
        }
        count += 1;

        let target = Target::from_compact(block.bits).target;
        average = if count == 1 {
            target
        } else {
            rescale(&(&average.mul_small(count) + &target), 1, count + 1, &limit)
        };

        if last_time > 0 {
            actual += last_time - block.block_time();
        }
        last_time = block.block_time();

        reading = view.previous(block);
    }

    let window = count * params.pow_target_spacing_v1;
    let actual = actual.max(window / 3).min(window * 3);
    debug!(height = tip.height + 1, count, actual, window, "dgw3 timespan");

    rescale(&average, actual, window, &limit)
        .clamp_to(&limit)
        .to_compact()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argentum_core::MemoryChain;

    const BITS: u32 = 0x1e0f_fff0;

    fn uniform(blocks: u32, spacing: u32, bits: u32) -> MemoryChain {
        let mut c = MemoryChain::new();
        for i in 0..blocks {
            c.push(2, 1_000_000 + i * spacing, bits);
        }
        c
    }

    #[test]
    fn short_history_gets_pow_limit() {
        let p = ConsensusParams::main();
        let c = uniform(24, 32, BITS);
        assert_eq!(c.tip().unwrap().height, 23);
        assert_eq!(next_work(&c, c.tip().unwrap(), p), Target::limit(p).to_compact());
    }

    #[test]
    fn uniform_spacing_measures_one_gap_short() {
        // 24 samples give 23 gaps against a 24-slot window.
        let c = uniform(25, 32, BITS);
        let expected = Target::from_compact(BITS)
            .target
            .scale(23 * 32, 24 * 32)
            .unwrap()
            .to_compact();
        assert_eq!(next_work(&c, c.tip().unwrap(), ConsensusParams::main()), expected);
    }

    #[test]
    fn average_weights_newest_sample_first() {
        // Two distinct targets: the window mixes them with the running weights.
        let p = ConsensusParams::main();
        let mut c = MemoryChain::new();
        for i in 0..25u32 {
            let bits = if i == 24 { 0x1d0f_fff0 } else { BITS };
            c.push(2, 1_000_000 + i * 32, bits);
        }
        let hard = Target::from_compact(0x1d0f_fff0).target;
        let easy = Target::from_compact(BITS).target;
        let mut avg = hard;
        for n in 2..=24i64 {
            avg = (&avg.mul_small(n) + &easy).div_small(n + 1).unwrap();
        }
        let expected = avg.scale(23 * 32, 24 * 32).unwrap().to_compact();
        assert_eq!(next_work(&c, c.tip().unwrap(), p), expected);
    }

    #[test]
    fn stalled_chain_clamps_to_three_times() {
        let p = ConsensusParams::main();
        let c = uniform(30, 600, 0x1c0f_fff0);
        let expected = Target::from_compact(0x1c0f_fff0).target.mul_small(3).to_compact();
        assert_eq!(next_work(&c, c.tip().unwrap(), p), expected);
    }

    #[test]
    fn result_is_capped_at_limit() {
        let p = ConsensusParams::main();
        let limit_bits = Target::limit(p).to_compact();
        let c = uniform(30, 600, limit_bits);
        assert_eq!(next_work(&c, c.tip().unwrap(), p), limit_bits);
    }
}
