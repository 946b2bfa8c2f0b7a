use argentum_core::constants::HEADER_PREFIX_LEN;
use argentum_core::{sha256d, Algo, Hash256};
use groestl::{Digest, Groestl512};

use crate::error::HashError;

/// A proof-of-work hash primitive over the 80-byte header prefix.
pub trait PowHasher: Send + Sync {
    fn hash(&self, prefix: &[u8; HEADER_PREFIX_LEN]) -> Result<Hash256, HashError>;
}

/// Plain closures can serve as primitives, which is how the node plugs in
/// algorithms implemented outside this crate.
impl<F> PowHasher for F
where
    F: Fn(&[u8; HEADER_PREFIX_LEN]) -> Hash256 + Send + Sync,
{
    fn hash(&self, prefix: &[u8; HEADER_PREFIX_LEN]) -> Result<Hash256, HashError> {
        Ok(self(prefix))
    }
}

// ── SHA-256d ─────────────────────────────────────────────────────────────────

/// Double SHA-256; identical to the header's identity hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256d;

impl PowHasher for Sha256d {
    fn hash(&self, prefix: &[u8; HEADER_PREFIX_LEN]) -> Result<Hash256, HashError> {
        Ok(sha256d(prefix))
    }
}

// ── Scrypt ───────────────────────────────────────────────────────────────────

/// scrypt with N=1024, r=1, p=1, using the header as both password and salt.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scrypt;

impl Scrypt {
    const LOG_N: u8 = 10;
    const R: u32 = 1;
    const P: u32 = 1;
}

impl PowHasher for Scrypt {
    fn hash(&self, prefix: &[u8; HEADER_PREFIX_LEN]) -> Result<Hash256, HashError> {
        let params = scrypt::Params::new(Self::LOG_N, Self::R, Self::P, 32).map_err(|e| {
            HashError::Primitive {
                algo: Algo::Scrypt,
                reason: e.to_string(),
            }
        })?;
        let mut out = [0u8; 32];
        scrypt::scrypt(prefix, prefix, &params, &mut out).map_err(|e| HashError::Primitive {
            algo: Algo::Scrypt,
            reason: e.to_string(),
        })?;
        Ok(Hash256(out))
    }
}

// ── Groestl ──────────────────────────────────────────────────────────────────

/// Grøstl-512 applied twice, truncated to the first 256 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Groestl;

impl PowHasher for Groestl {
    fn hash(&self, prefix: &[u8; HEADER_PREFIX_LEN]) -> Result<Hash256, HashError> {
        let first = Groestl512::digest(prefix);
        let second = Groestl512::digest(first);
        let mut out = [0u8; 32];
        out.copy_from_slice(&second[..32]);
        Ok(Hash256(out))
    }
}

// ── Argon2d ──────────────────────────────────────────────────────────────────

/// Argon2d (v1.3) over the header, salted with the header itself.
#[derive(Clone, Copy, Debug)]
pub struct Argon2d {
    pub time_cost: u32,
    pub mem_cost_kib: u32,
    pub lanes: u32,
}

impl Default for Argon2d {
    fn default() -> Self {
        Self {
            time_cost: 1,
            mem_cost_kib: 500,
            lanes: 8,
        }
    }
}

impl PowHasher for Argon2d {
    fn hash(&self, prefix: &[u8; HEADER_PREFIX_LEN]) -> Result<Hash256, HashError> {
        let config = argon2::Config {
            variant: argon2::Variant::Argon2d,
            version: argon2::Version::Version13,
            time_cost: self.time_cost,
            mem_cost: self.mem_cost_kib,
            lanes: self.lanes,
            hash_length: 32,
            ..argon2::Config::default()
        };
        let raw = argon2::hash_raw(prefix, prefix, &config).map_err(|e| HashError::Primitive {
            algo: Algo::Argon2d,
            reason: e.to_string(),
        })?;
        let out: [u8; 32] = raw.try_into().map_err(|_| HashError::Primitive {
            algo: Algo::Argon2d,
            reason: "unexpected output length".into(),
        })?;
        Ok(Hash256(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(nonce: u8) -> [u8; HEADER_PREFIX_LEN] {
        let mut p = [0u8; HEADER_PREFIX_LEN];
        p[0] = 1;
        p[79] = nonce;
        p
    }

    #[test]
    fn sha256d_matches_known_vector() {
        // sha256d of the empty string.
        let h = sha256d(&[]);
        assert_eq!(
            hex::encode(h.0),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn primitives_are_deterministic_and_nonce_sensitive() {
        let hashers: Vec<Box<dyn PowHasher>> = vec![
            Box::new(Sha256d),
            Box::new(Scrypt),
            Box::new(Groestl),
            Box::new(Argon2d::default()),
        ];
        for h in &hashers {
            let a = h.hash(&prefix(0)).unwrap();
            assert_eq!(a, h.hash(&prefix(0)).unwrap());
            assert_ne!(a, h.hash(&prefix(1)).unwrap());
        }
    }

    #[test]
    fn primitives_disagree_with_each_other() {
        let p = prefix(7);
        let sha = Sha256d.hash(&p).unwrap();
        let scr = Scrypt.hash(&p).unwrap();
        let gro = Groestl.hash(&p).unwrap();
        let arg = Argon2d::default().hash(&p).unwrap();
        assert_ne!(sha, scr);
        assert_ne!(scr, gro);
        assert_ne!(gro, arg);
        assert_ne!(sha, arg);
    }

    #[test]
    fn closures_act_as_primitives() {
        let fixed = |_: &[u8; HEADER_PREFIX_LEN]| Hash256([9u8; 32]);
        assert_eq!(fixed.hash(&prefix(0)).unwrap(), Hash256([9u8; 32]));
    }
}
