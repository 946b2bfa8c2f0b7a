pub mod algo;
pub mod chain;
pub mod constants;
pub mod error;
pub mod params;
pub mod types;

pub use algo::Algo;
pub use chain::{BlockId, BlockIndex, ChainView, MemoryChain};
pub use constants::*;
pub use error::CoreError;
pub use params::{ConsensusParams, Network};
pub use types::*;
