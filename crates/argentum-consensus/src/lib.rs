//! Argentum proof-of-work consensus rules.
//!
//! This crate is responsible for:
//! - 256-bit target arithmetic and the compact `bits` encoding
//! - selecting and running the difficulty retarget active at a height
//! - checking a header's proof-of-work against its claimed target
//! - per-block and cumulative chain work
//!
//! Chain storage, hash primitives and network parameter selection are
//! supplied by the caller.

pub mod ancestry;
pub mod error;
pub mod pow;
pub mod retarget;
pub mod target;
pub mod work;

pub use ancestry::{ancestor, last_block_for_algo, prev_block_for_algo};
pub use error::{BitsError, ConsensusError};
pub use pow::{check_bits_range, check_header, check_proof_of_work, is_valid_proof_of_work};
pub use retarget::{next_work_required, RetargetAlgorithm};
pub use target::{CompactTarget, Target};
pub use work::{block_proof, block_proof_base, block_proof_equivalent_time, chain_work};
