//! Zeroizing wrapper for secret key material.
//!
//! Replaces the teacher's `secure-gate` alias macros (tied to its AES-Crypt
//! password flow) with plain `zeroize`, the idiom the rest of the pack
//! reaches for (`whynaidu-envvault`, `Quabena-ferreus-vault`,
//! `jbgriesner-serdevault`).

use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::MASTER_KEY_LEN;
use crate::error::{Result, VaultError};

/// A 32-byte AES-256-GCM master key. Zeroized on drop, never `Copy`, and
/// its `Debug` impl never prints the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; MASTER_KEY_LEN]);

impl MasterKey {
    /// Fill 32 bytes from the platform cryptographic RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; MASTER_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw key bytes, failing unless exactly 32 bytes were supplied.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != MASTER_KEY_LEN {
            return Err(VaultError::KeyLength(bytes.len()));
        }
        let mut buf = [0u8; MASTER_KEY_LEN];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub fn expose_secret(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}
