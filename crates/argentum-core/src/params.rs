use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Hash256;

/// Which network's constant set is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Testnet,
    Regtest,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Main => "main",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        })
    }
}

impl FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(CoreError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Consensus constants consumed by retargeting and proof-of-work checks.
///
/// One instance per network, built once and never mutated. Spacing and
/// timespan values are in seconds, adjustment bounds in percent, and
/// activation points are block heights.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Easiest target any block may claim.
    pub pow_limit: Hash256,
    /// Block spacing of the single-algorithm era.
    pub pow_target_spacing_v1: i64,
    /// Block spacing across all algorithms from the multi-algorithm fork.
    pub pow_target_spacing_v2: i64,
    /// Blocks per algorithm the multi-algorithm timespan is measured over.
    pub averaging_interval: i64,
    pub max_adjust_up: i64,
    pub max_adjust_up_v2: i64,
    pub max_adjust_down: i64,
    /// Per-algorithm correction applied once per missed or extra slot.
    pub local_difficulty_adjustment: i64,
    /// First height retargeted with DarkGravityWave3.
    pub block_diff_adjust_v2: u32,
    /// First height retargeted with StabilX.
    pub multi_algo_fork: u32,
    /// First height whose chain work uses the geometric mean.
    pub geo_avg_work_start: u32,
    /// First height retargeted with DigiSpeed.
    pub bip146_height: u32,
    /// Best height above which the hash is compared with the claimed target.
    pub coinbase_maturity_v2_start: u32,
}

/// Fields the original parameter sets never assign are zero, exactly as a
/// statically initialised parameter block would hold them.
static MAIN: Lazy<ConsensusParams> = Lazy::new(|| ConsensusParams {
    pow_limit: pow_limit_shifted(20),
    pow_target_spacing_v1: 32,
    pow_target_spacing_v2: 45,
    averaging_interval: 10,
    max_adjust_up: 14,
    max_adjust_up_v2: 0,
    max_adjust_down: 22,
    local_difficulty_adjustment: 12,
    block_diff_adjust_v2: 1_635_000,
    multi_algo_fork: 1_930_000,
    geo_avg_work_start: 2_387_838,
    bip146_height: 2_977_000,
    coinbase_maturity_v2_start: 2_387_838,
});

static TESTNET: Lazy<ConsensusParams> = Lazy::new(|| ConsensusParams {
    pow_limit: pow_limit_shifted(16),
    pow_target_spacing_v1: 20,
    pow_target_spacing_v2: 35,
    averaging_interval: 10,
    max_adjust_up: 14,
    max_adjust_up_v2: 0,
    max_adjust_down: 22,
    local_difficulty_adjustment: 0,
    block_diff_adjust_v2: 30,
    multi_algo_fork: 0,
    geo_avg_work_start: 95,
    bip146_height: 100,
    coinbase_maturity_v2_start: 0,
});

static REGTEST: Lazy<ConsensusParams> = Lazy::new(|| ConsensusParams {
    pow_limit: pow_limit_shifted(1),
    pow_target_spacing_v1: 30,
    pow_target_spacing_v2: 60,
    averaging_interval: 10,
    max_adjust_up: 2,
    max_adjust_up_v2: 0,
    max_adjust_down: 4,
    local_difficulty_adjustment: 0,
    block_diff_adjust_v2: 150,
    multi_algo_fork: 0,
    geo_avg_work_start: 0,
    bip146_height: 0,
    coinbase_maturity_v2_start: 0,
});

/// `~0 >> shift` as a 256-bit value.
fn pow_limit_shifted(shift: u32) -> Hash256 {
    let mut be = [0xffu8; 32];
    let whole = (shift / 8) as usize;
    for b in be.iter_mut().take(whole) {
        *b = 0;
    }
    if whole < 32 {
        be[whole] = 0xff >> (shift % 8);
    }
    Hash256::from_be_bytes(be)
}

impl ConsensusParams {
    pub fn for_network(network: Network) -> &'static ConsensusParams {
        match network {
            Network::Main => &*MAIN,
            Network::Testnet => &*TESTNET,
            Network::Regtest => &*REGTEST,
        }
    }

    pub fn main() -> &'static ConsensusParams {
        &*MAIN
    }

    pub fn testnet() -> &'static ConsensusParams {
        &*TESTNET
    }

    pub fn regtest() -> &'static ConsensusParams {
        &*REGTEST
    }

    /// Load a full parameter set from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<ConsensusParams, CoreError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Serialization(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&json).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_limits_match_network_shifts() {
        assert_eq!(
            ConsensusParams::main().pow_limit.to_hex(),
            "00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );
        assert_eq!(
            ConsensusParams::testnet().pow_limit.to_hex(),
            "0000ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );
        assert_eq!(
            ConsensusParams::regtest().pow_limit.to_hex(),
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );
    }

    #[test]
    fn regime_heights_are_ordered_on_main() {
        let p = ConsensusParams::main();
        assert!(p.block_diff_adjust_v2 < p.multi_algo_fork);
        assert!(p.multi_algo_fork < p.bip146_height);
    }

    #[test]
    fn params_json_round_trip() {
        let p = ConsensusParams::testnet().clone();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"pow_limit\":\"0000ffff"));
        let back: ConsensusParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn network_names_parse() {
        assert_eq!("main".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("TestNet".parse::<Network>().unwrap(), Network::Testnet);
        assert!("signet".parse::<Network>().is_err());
    }
}
