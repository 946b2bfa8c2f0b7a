//! Single-algorithm retarget every 250 blocks.

use argentum_core::constants::LEGACY_RETARGET_INTERVAL;
use argentum_core::{BlockIndex, ChainView, ConsensusParams};
use tracing::{debug, warn};

use super::rescale;
use crate::ancestry::ancestor;
use crate::target::Target;

/// Bounds on the measured timespan for the block at `height`.
///
/// The band tightens as the chain matured; each row applies from its height
/// until the next one takes over.
pub fn timespan_bounds(height: i64, timespan: i64) -> (i64, i64) {
    if height >= 111_500 {
        (timespan * 55 / 73, timespan * 75 / 60)
    } else if height >= 79_000 {
        (timespan / 2, timespan * 2)
    } else if height > 10_000 {
        (timespan / 4, timespan * 4)
    } else if height > 5_000 {
        (timespan / 8, timespan * 4)
    } else {
        (timespan / 16, timespan * 4)
    }
}

pub fn next_work<V: ChainView + ?Sized>(
    view: &V,
    tip: &BlockIndex,
    params: &ConsensusParams,
) -> u32 {
    let limit = Target::limit(params);
    let interval = LEGACY_RETARGET_INTERVAL;
    let timespan = params.pow_target_spacing_v1 * interval;
    let height = tip.height as i64 + 1;

    if height % interval != 0 {
        return tip.bits;
    }

    // The first retarget after genesis has one block fewer behind it.
    let go_back = if height == interval { interval - 1 } else { interval };
    let Some(first) = ancestor(view, tip, go_back) else {
        warn!(height, go_back, "legacy retarget window truncated, using pow limit");
        return limit.to_compact();
    };

    let (min, max) = timespan_bounds(height, timespan);
    let actual = (tip.block_time() - first.block_time()).max(min).min(max);
    debug!(height, actual, min, max, "legacy timespan");

    let old = Target::from_compact(tip.bits).target;
    rescale(&old, actual, timespan, &limit).clamp_to(&limit).to_compact()
}
