//! Per-algorithm retargeting shared by StabilX and DigiSpeed.
//!
//! Each algorithm keeps its own difficulty. A global step rescales the
//! algorithm's last target by how far the median-time-past window drifted
//! from its expected length; a local step then tightens algorithms that
//! were mined more often than their share of slots and eases the rest.

use argentum_core::constants::{NUM_ALGOS, NUM_ALGOS2};
use argentum_core::{Algo, BlockIndex, ChainView, ConsensusParams};
use tracing::debug;

use super::rescale;
use crate::ancestry::{ancestor, last_block_for_algo};
use crate::target::Target;

/// Constants that distinguish the two multi-algorithm regimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiAlgoConfig {
    pub name: &'static str,
    /// Algorithms sharing the block schedule.
    pub algo_count: i64,
    /// How strongly the measured timespan is pulled toward the window.
    pub dampening_divisor: i64,
    /// Maximum percentage the timespan may fall below the window.
    pub max_adjust_up: i64,
}

impl MultiAlgoConfig {
    pub fn stabilx(params: &ConsensusParams) -> Self {
        Self {
            name: "StabilX",
            algo_count: NUM_ALGOS,
            dampening_divisor: 6,
            max_adjust_up: params.max_adjust_up,
        }
    }

    pub fn digispeed(params: &ConsensusParams) -> Self {
        Self {
            name: "DigiSpeed",
            algo_count: NUM_ALGOS2,
            dampening_divisor: 4,
            max_adjust_up: params.max_adjust_up_v2,
        }
    }
}

pub fn next_work<V: ChainView + ?Sized>(
    view: &V,
    tip: &BlockIndex,
    algo: Algo,
    cfg: &MultiAlgoConfig,
    params: &ConsensusParams,
) -> u32 {
    let limit = Target::limit(params);

    let spacing = params.pow_target_spacing_v2 * cfg.algo_count;
    let window = params.averaging_interval * spacing;
    let min = window * (100 - cfg.max_adjust_up) / 100;
    let max = window * (100 + params.max_adjust_down) / 100;

    let first = ancestor(view, tip, cfg.algo_count * params.averaging_interval);
    let prev_algo = last_block_for_algo(view, tip, algo);
    let (Some(first), Some(prev_algo)) = (first, prev_algo) else {
        debug!(retarget = cfg.name, %algo, "not enough blocks, using pow limit");
        return limit.to_compact();
    };

    // Median time past resists timestamp warping.
    let measured = tip.median_time_past - first.median_time_past;
    let dampened = window + (measured - window) / cfg.dampening_divisor;
    let actual = dampened.max(min).min(max);
    debug!(retarget = cfg.name, %algo, measured, dampened, actual, min, max, "timespan");

    let mut target = rescale(
        &Target::from_compact(prev_algo.bits).target,
        actual,
        window,
        &limit,
    );

    // Positive when `algo` was mined more recently than its fair share.
    let adjustments = prev_algo.height as i64 + cfg.algo_count - 1 - tip.height as i64;
    let local = 100 + params.local_difficulty_adjustment;
    if adjustments > 0 {
        for _ in 0..adjustments {
            if target.is_zero() {
                break;
            }
            target = rescale(&target, 100, local, &limit);
        }
    } else if adjustments < 0 {
        for _ in 0..-adjustments {
            // Growth is monotonic; once past the limit the clamp decides.
            if target > limit {
                break;
            }
            target = rescale(&target, local, 100, &limit);
        }
    }

    if target > limit {
        debug!(retarget = cfg.name, %algo, "adjusted target above limit, using pow limit");
    }
    target.clamp_to(&limit).to_compact()
}
