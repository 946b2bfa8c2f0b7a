/// ─── Argentum Proof-of-Work Constants ───────────────────────────────────────
///
/// Values that are fixed by the protocol rather than per network. Per-network
/// values live in `ConsensusParams`.

// ── Block version layout ─────────────────────────────────────────────────────

/// Version bit marking a merged-mined (auxpow) header.
pub const VERSION_AUXPOW: i32 = 1 << 8;

/// Multiplier placing the auxiliary chain id in the high bits of the version.
pub const VERSION_CHAIN_START: i32 = 1 << 16;

/// Mask selecting the mining-algorithm bits of the version.
pub const BLOCK_VERSION_ALGO: i32 = 7 << 9;

/// Scrypt headers leave the algorithm bits unset.
pub const BLOCK_VERSION_SCRYPT: i32 = 0;
pub const BLOCK_VERSION_SHA256D: i32 = 1 << 9;
pub const BLOCK_VERSION_LYRA2RE2: i32 = 2 << 9;
pub const BLOCK_VERSION_GROESTL: i32 = 3 << 9;
pub const BLOCK_VERSION_ARGON2D: i32 = 4 << 9;
pub const BLOCK_VERSION_YESCRYPT: i32 = 5 << 9;

/// Size of the serialized pure header that every PoW hash runs over.
pub const HEADER_PREFIX_LEN: usize = 80;

// ── Multi-algorithm ──────────────────────────────────────────────────────────

/// Algorithms active during the StabilX regime.
pub const NUM_ALGOS: i64 = 2;

/// Algorithms active from the DigiSpeed regime onwards.
pub const NUM_ALGOS2: i64 = 6;

/// Algorithms the node knows how to hash.
pub const NUM_ALGOS_IMPL: usize = 6;

// ── Legacy retarget ──────────────────────────────────────────────────────────

/// Blocks between legacy retargets.
pub const LEGACY_RETARGET_INTERVAL: i64 = 250;

// ── DarkGravityWave3 ─────────────────────────────────────────────────────────

pub const DGW_PAST_BLOCKS_MIN: i64 = 24;
pub const DGW_PAST_BLOCKS_MAX: i64 = 24;

// ── Median time past ─────────────────────────────────────────────────────────

/// Number of blocks (tip included) the median timestamp is taken over.
pub const MEDIAN_TIME_SPAN: usize = 11;
