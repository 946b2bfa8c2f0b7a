use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("header version {version:#x} already carries auxpow framing")]
    AuxpowVersion { version: i32 },

    #[error("unknown mining algorithm: {0}")]
    UnknownAlgo(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("invalid hash hex: {0}")]
    InvalidHash(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
