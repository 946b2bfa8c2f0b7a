//! Difficulty retargeting.
//!
//! Four algorithms have governed the chain, each from a fixed activation
//! height onwards:
//!
//! | from height            | algorithm        |
//! |------------------------|------------------|
//! | 0                      | Legacy           |
//! | `block_diff_adjust_v2` | DarkGravityWave3 |
//! | `multi_algo_fork`      | StabilX          |
//! | `bip146_height`        | DigiSpeed        |
//!
//! Every algorithm is a pure function of the chain snapshot and the
//! network parameters. Insufficient history never errors; it yields the
//! network's `pow_limit`.

pub mod dgw3;
pub mod legacy;
pub mod multi_algo;

use argentum_core::{Algo, BlockIndex, ChainView, ConsensusParams};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::target::Target;
use multi_algo::MultiAlgoConfig;

/// The retarget rule in force for the block following a given tip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RetargetAlgorithm {
    Legacy,
    Dgw3,
    StabilX,
    DigiSpeed,
}

impl RetargetAlgorithm {
    /// Select the algorithm from the tip's height.
    pub fn for_height(height: u32, params: &ConsensusParams) -> Self {
        if height >= params.bip146_height {
            RetargetAlgorithm::DigiSpeed
        } else if height >= params.multi_algo_fork {
            RetargetAlgorithm::StabilX
        } else if height >= params.block_diff_adjust_v2 {
            RetargetAlgorithm::Dgw3
        } else {
            RetargetAlgorithm::Legacy
        }
    }

    /// Compact bits required of the block built on `tip`.
    ///
    /// `algo` only matters to the multi-algorithm rules.
    pub fn next_work<V: ChainView + ?Sized>(
        self,
        view: &V,
        tip: &BlockIndex,
        algo: Algo,
        params: &ConsensusParams,
    ) -> u32 {
        match self {
            RetargetAlgorithm::Legacy => legacy::next_work(view, tip, params),
            RetargetAlgorithm::Dgw3 => dgw3::next_work(view, tip, params),
            RetargetAlgorithm::StabilX => {
                multi_algo::next_work(view, tip, algo, &MultiAlgoConfig::stabilx(params), params)
            }
            RetargetAlgorithm::DigiSpeed => {
                multi_algo::next_work(view, tip, algo, &MultiAlgoConfig::digispeed(params), params)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RetargetAlgorithm::Legacy => "Legacy",
            RetargetAlgorithm::Dgw3 => "DarkGravityWave3",
            RetargetAlgorithm::StabilX => "StabilX",
            RetargetAlgorithm::DigiSpeed => "DigiSpeed",
        }
    }
}

impl fmt::Display for RetargetAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compact bits the next block mined with `algo` must carry.
///
/// `tip = None` means the candidate is the genesis block.
pub fn next_work_required<V: ChainView + ?Sized>(
    view: &V,
    tip: Option<&BlockIndex>,
    algo: Algo,
    params: &ConsensusParams,
) -> u32 {
    let Some(tip) = tip else {
        debug!("no previous block, using pow limit");
        return Target::limit(params).to_compact();
    };
    let regime = RetargetAlgorithm::for_height(tip.height, params);
    let bits = regime.next_work(view, tip, algo, params);
    debug!(height = tip.height + 1, %regime, %algo, bits = format_args!("{bits:#010x}"), "next work");
    bits
}

/// `target * num / den`, falling back to `limit` when `den` is not positive.
pub(crate) fn rescale(target: &Target, num: i64, den: i64, limit: &Target) -> Target {
    target.scale(num, den).unwrap_or_else(|| limit.clone())
}
