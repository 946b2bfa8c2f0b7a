// Consensus-critical. Every operation here must match the compact encoding
// used by existing chain data bit for bit.
//! 256-bit difficulty targets.
//!
//! Compact `bits` encode a target as `(exponent << 24) | mantissa` where the
//! mantissa is three big-endian bytes whose top bit is a sign flag:
//!
//! - `exponent <= 3`: target = mantissa >> 8 * (3 - exponent)
//! - otherwise:       target = mantissa << 8 * (exponent - 3)
//!
//! Values are held in an arbitrary-precision integer so intermediate
//! products during a retarget can never wrap.

use argentum_core::{ConsensusParams, Hash256};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;
use std::ops::{Add, Shl};

/// A non-negative proof-of-work target.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Target(BigUint);

/// Result of decoding compact `bits`, with the flags callers must check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactTarget {
    pub target: Target,
    pub negative: bool,
    pub overflow: bool,
}

/// Compact form of `2^256 - 1`, used for anything wider than 256 bits.
const MAX_COMPACT: u32 = 0x2100_ffff;

fn mask_256() -> BigUint {
    (BigUint::one() << 256u32) - BigUint::one()
}

impl Target {
    pub fn zero() -> Self {
        Target(BigUint::zero())
    }

    pub fn from_biguint(v: BigUint) -> Self {
        Target(v)
    }

    pub fn from_u64(v: u64) -> Self {
        Target(BigUint::from(v))
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Interpret a hash (wire byte order) as a little-endian 256-bit number.
    pub fn from_hash(hash: &Hash256) -> Self {
        Target(BigUint::from_bytes_le(hash.as_le_bytes()))
    }

    /// The network's easiest permitted target.
    pub fn limit(params: &ConsensusParams) -> Self {
        Target::from_hash(&params.pow_limit)
    }

    /// Low 256 bits as a hash in wire byte order.
    pub fn to_hash(&self) -> Hash256 {
        let truncated = &self.0 & mask_256();
        let le = truncated.to_bytes_le();
        let mut out = [0u8; 32];
        out[..le.len()].copy_from_slice(&le);
        Hash256(out)
    }

    /// Decode compact `bits`.
    ///
    /// The sign bit is excluded from the value and reported through
    /// `negative`; `overflow` is set when the exponent would push a non-zero
    /// mantissa past 256 bits, in which case the value is truncated to the
    /// low 256 bits.
    pub fn from_compact(bits: u32) -> CompactTarget {
        let size = bits >> 24;
        let mut word = bits & 0x007f_ffff;
        let value = if size <= 3 {
            word >>= 8 * (3 - size);
            BigUint::from(word)
        } else {
            (BigUint::from(word) << (8 * (size - 3))) & mask_256()
        };
        let negative = word != 0 && (bits & 0x0080_0000) != 0;
        let overflow = word != 0
            && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
        CompactTarget {
            target: Target(value),
            negative,
            overflow,
        }
    }

    /// Encode to the minimal compact form.
    ///
    /// Zero encodes as `0`; values wider than 256 bits encode as the compact
    /// form of `2^256 - 1`.
    pub fn to_compact(&self) -> u32 {
        if self.0.bits() > 256 {
            return MAX_COMPACT;
        }
        let mut size = ((self.0.bits() + 7) / 8) as u32;
        let mut compact: u32 = if size <= 3 {
            let low = self.0.to_u64().unwrap_or(0);
            (low << (8 * (3 - size))) as u32
        } else {
            let shifted: BigUint = &self.0 >> (8 * (size - 3));
            shifted.to_u32().unwrap_or(0)
        };
        if compact & 0x0080_0000 != 0 {
            compact >>= 8;
            size += 1;
        }
        compact | (size << 24)
    }

    /// Multiply by a small factor. Negative factors yield zero.
    pub fn mul_small(&self, k: i64) -> Target {
        match u64::try_from(k) {
            Ok(k) => Target(&self.0 * k),
            Err(_) => Target::zero(),
        }
    }

    /// Truncating division by a small positive divisor.
    ///
    /// Returns `None` when `k <= 0`.
    pub fn div_small(&self, k: i64) -> Option<Target> {
        match u64::try_from(k) {
            Ok(k) if k > 0 => Some(Target(&self.0 / k)),
            _ => None,
        }
    }

    /// `self * num / den` in one step.
    pub fn scale(&self, num: i64, den: i64) -> Option<Target> {
        self.mul_small(num).div_small(den)
    }

    /// Cap at `ceiling`.
    pub fn clamp_to(self, ceiling: &Target) -> Target {
        if self > *ceiling {
            ceiling.clone()
        } else {
            self
        }
    }
}

impl Add for &Target {
    type Output = Target;

    fn add(self, rhs: &Target) -> Target {
        Target(&self.0 + &rhs.0)
    }
}

impl Shl<u32> for Target {
    type Output = Target;

    fn shl(self, rhs: u32) -> Target {
        Target(self.0 << rhs)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064x}", self.0)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({:#x})", self.0)
    }
}
