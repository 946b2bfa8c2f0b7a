pub mod error;
pub mod hashers;
pub mod registry;

pub use error::HashError;
pub use hashers::{Argon2d, Groestl, PowHasher, Scrypt, Sha256d};
pub use registry::HasherRegistry;
