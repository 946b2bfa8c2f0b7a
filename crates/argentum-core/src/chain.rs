use serde::{Deserialize, Serialize};

use crate::algo::Algo;
use crate::constants::MEDIAN_TIME_SPAN;
use crate::types::{BlockHeader, Hash256};

/// Opaque handle of a block inside a chain store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Consensus-relevant view of an accepted block.
///
/// `prev` is a lookup key into the owning store, never an owning pointer,
/// so walking ancestry always goes through a `ChainView`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndex {
    pub id: BlockId,
    pub prev: Option<BlockId>,
    pub height: u32,
    pub hash: Hash256,
    pub version: i32,
    pub time: u32,
    pub bits: u32,
    /// Median of this block's and its ancestors' timestamps, computed by the store.
    pub median_time_past: i64,
}

impl BlockIndex {
    pub fn algo(&self) -> Algo {
        Algo::from_version(self.version)
    }

    pub fn block_time(&self) -> i64 {
        self.time as i64
    }
}

/// Read-only access to stored block indices.
pub trait ChainView {
    fn get(&self, id: BlockId) -> Option<&BlockIndex>;

    fn previous(&self, block: &BlockIndex) -> Option<&BlockIndex> {
        block.prev.and_then(|id| self.get(id))
    }
}

// ── MemoryChain ──────────────────────────────────────────────────────────────

/// Append-only, single-branch block index kept in memory.
///
/// Block `n` of the chain lives at arena slot `n`, so height lookups are O(1).
#[derive(Clone, Debug, Default)]
pub struct MemoryChain {
    blocks: Vec<BlockIndex>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `header` on top of the current tip and return its handle.
    ///
    /// `header.prev_block` is not checked; the block is linked to the tip.
    pub fn push_header(&mut self, header: &BlockHeader) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        let prev = self.tip().map(|t| t.id);

        let mut times: Vec<i64> = self
            .blocks
            .iter()
            .rev()
            .take(MEDIAN_TIME_SPAN - 1)
            .map(|b| b.block_time())
            .collect();
        times.push(header.time as i64);
        times.sort_unstable();

        self.blocks.push(BlockIndex {
            id,
            prev,
            height: id.0,
            hash: header.hash(),
            version: header.version,
            time: header.time,
            bits: header.bits,
            median_time_past: times[times.len() / 2],
        });
        id
    }

    /// Append a synthetic block with the given consensus fields.
    pub fn push(&mut self, version: i32, time: u32, bits: u32) -> BlockId {
        let header = BlockHeader {
            version,
            prev_block: self.tip().map(|t| t.hash).unwrap_or_default(),
            merkle_root: Hash256::ZERO,
            time,
            bits,
            nonce: self.blocks.len() as u32,
        };
        self.push_header(&header)
    }

    pub fn tip(&self) -> Option<&BlockIndex> {
        self.blocks.last()
    }

    pub fn at_height(&self, height: u32) -> Option<&BlockIndex> {
        self.blocks.get(height as usize)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockIndex> {
        self.blocks.iter()
    }
}

impl ChainView for MemoryChain {
    fn get(&self, id: BlockId) -> Option<&BlockIndex> {
        self.blocks.get(id.0 as usize)
    }
}
