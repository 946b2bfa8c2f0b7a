use argentum_core::Algo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("no hash primitive registered for {0}")]
    Unavailable(Algo),

    #[error("{algo} primitive failed: {reason}")]
    Primitive { algo: Algo, reason: String },
}
