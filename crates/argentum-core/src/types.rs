use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::algo::Algo;
use crate::constants::{HEADER_PREFIX_LEN, VERSION_AUXPOW, VERSION_CHAIN_START};
use crate::error::CoreError;

// ── Hash256 ──────────────────────────────────────────────────────────────────

/// 256-bit hash in wire (little-endian) byte order.
///
/// Displayed and parsed as big-endian hex, the way block explorers print
/// block hashes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub fn from_le_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn from_be_bytes(mut b: [u8; 32]) -> Self {
        b.reverse();
        Self(b)
    }

    pub fn as_le_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut b = self.0;
        b.reverse();
        b
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_be_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidHash(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidHash(format!("expected 32 bytes in {s}")))?;
        Ok(Self::from_be_bytes(arr))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({}…)", &self.to_hex()[..16])
    }
}

impl TryFrom<String> for Hash256 {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Hash256::from_hex(&s)
    }
}

impl From<Hash256> for String {
    fn from(h: Hash256) -> String {
        h.to_hex()
    }
}

/// Double SHA-256, the identity hash of every header.
pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    Hash256(Sha256::digest(first).into())
}

// ── BlockHeader ──────────────────────────────────────────────────────────────

/// The pure 80-byte block header, without any auxpow payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Wire serialization that PoW hashes are computed over.
    pub fn serialize_prefix(&self) -> [u8; HEADER_PREFIX_LEN] {
        let mut out = [0u8; HEADER_PREFIX_LEN];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_block.0);
        out[36..68].copy_from_slice(&self.merkle_root.0);
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    pub fn hash(&self) -> Hash256 {
        sha256d(&self.serialize_prefix())
    }

    pub fn algo(&self) -> Algo {
        Algo::from_version(self.version)
    }

    /// Version number with the auxpow flag, algorithm bits and chain id stripped.
    pub fn base_version(&self) -> i32 {
        self.version % VERSION_AUXPOW
    }

    pub fn chain_id(&self) -> i32 {
        self.version / VERSION_CHAIN_START
    }

    pub fn is_auxpow(&self) -> bool {
        self.version & VERSION_AUXPOW != 0
    }

    pub fn is_legacy(&self) -> bool {
        self.version == 1
    }

    /// Set the base version and chain id, discarding any previous value.
    ///
    /// Must be called before the auxpow flag is set.
    pub fn set_base_version(&mut self, base_version: i32, chain_id: i32) -> Result<(), CoreError> {
        if self.is_auxpow() {
            return Err(CoreError::AuxpowVersion {
                version: self.version,
            });
        }
        self.version = base_version | chain_id.wrapping_mul(VERSION_CHAIN_START);
        Ok(())
    }

    pub fn set_auxpow_flag(&mut self, auxpow: bool) {
        if auxpow {
            self.version |= VERSION_AUXPOW;
        } else {
            self.version &= !VERSION_AUXPOW;
        }
    }

    /// Replace the algorithm selector bits.
    pub fn set_algo(&mut self, algo: Algo) {
        self.version = (self.version & !crate::constants::BLOCK_VERSION_ALGO) | algo.version_bits();
    }
}
