use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::error::CoreError;

/// A mining algorithm a block may be solved with.
///
/// The discriminant is the tag used throughout consensus code; it also fixes
/// the iteration order of `Algo::ALL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algo {
    Sha256d = 0,
    Scrypt = 1,
    Lyra2re2 = 2,
    Groestl = 3,
    Argon2d = 4,
    Yescrypt = 5,
}

impl Algo {
    pub const ALL: [Algo; NUM_ALGOS_IMPL] = [
        Algo::Sha256d,
        Algo::Scrypt,
        Algo::Lyra2re2,
        Algo::Groestl,
        Algo::Argon2d,
        Algo::Yescrypt,
    ];

    /// Decode the algorithm from a block version.
    ///
    /// Pre-multi-algorithm headers carry no selector bits and decode as
    /// `Scrypt`, as does any pattern the table does not know.
    pub fn from_version(version: i32) -> Algo {
        match version & BLOCK_VERSION_ALGO {
            BLOCK_VERSION_SHA256D => Algo::Sha256d,
            BLOCK_VERSION_LYRA2RE2 => Algo::Lyra2re2,
            BLOCK_VERSION_GROESTL => Algo::Groestl,
            BLOCK_VERSION_ARGON2D => Algo::Argon2d,
            BLOCK_VERSION_YESCRYPT => Algo::Yescrypt,
            _ => Algo::Scrypt,
        }
    }

    pub fn from_tag(tag: i32) -> Option<Algo> {
        Algo::ALL.into_iter().find(|a| a.tag() == tag)
    }

    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Version bit pattern announcing this algorithm.
    pub fn version_bits(self) -> i32 {
        match self {
            Algo::Sha256d => BLOCK_VERSION_SHA256D,
            Algo::Scrypt => BLOCK_VERSION_SCRYPT,
            Algo::Lyra2re2 => BLOCK_VERSION_LYRA2RE2,
            Algo::Groestl => BLOCK_VERSION_GROESTL,
            Algo::Argon2d => BLOCK_VERSION_ARGON2D,
            Algo::Yescrypt => BLOCK_VERSION_YESCRYPT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algo::Sha256d => "Sha256d",
            Algo::Scrypt => "Scrypt",
            Algo::Lyra2re2 => "Lyra2RE2",
            Algo::Groestl => "Groestl",
            Algo::Argon2d => "Argon2d",
            Algo::Yescrypt => "Yescrypt",
        }
    }
}

impl fmt::Display for Algo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algo {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Algo::ALL
            .into_iter()
            .find(|a| a.name().to_ascii_lowercase() == lower)
            .ok_or_else(|| CoreError::UnknownAlgo(s.to_string()))
    }
}
