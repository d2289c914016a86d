//! Passphrase-based key derivation using Argon2id.
//!
//! The Argon2id cost parameters are a versioned constant, not a user
//! setting.  Every vault file records the format version it was written
//! with, and the version selects the parameter set used to re-derive its
//! key.  Changing the parameters therefore means adding a new version,
//! never editing an existing one.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{VaultError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations (time cost).
    pub iterations: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
}

/// Parameters for format version 1: 64 MiB, 3 passes, 1 lane.
pub const KDF_V1: KdfParams = KdfParams {
    memory_kib: 65_536,
    iterations: 3,
    parallelism: 1,
};

/// The format version new vaults are written with.
pub const CURRENT_KDF_VERSION: u32 = 1;

impl KdfParams {
    /// Look up the parameter set for a vault format version.
    pub fn for_version(version: u32) -> Result<Self> {
        match version {
            1 => Ok(KDF_V1),
            other => Err(VaultError::Format(format!(
                "unsupported vault version {other}, expected {CURRENT_KDF_VERSION}"
            ))),
        }
    }
}

/// Derive a 32-byte key from a passphrase and a 16-byte salt using the
/// current parameter set.
///
/// The same passphrase + salt always produce the same key.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    derive_key_with_params(passphrase, salt, &KDF_V1)
}

/// Derive a 32-byte key with an explicit parameter set.
pub fn derive_key_with_params(
    passphrase: &[u8],
    salt: &[u8],
    kdf_params: &KdfParams,
) -> Result<[u8; KEY_LEN]> {
    if salt.len() != SALT_LEN {
        return Err(VaultError::Derivation(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::Derivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| VaultError::Derivation(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_salt() {
        let result = derive_key(b"passphrase", &[0u8; 8]);
        assert!(matches!(result, Err(VaultError::Derivation(_))));
    }

    #[test]
    fn rejects_long_salt() {
        let result = derive_key(b"passphrase", &[0u8; 32]);
        assert!(matches!(result, Err(VaultError::Derivation(_))));
    }

    #[test]
    fn unknown_version_is_a_format_error() {
        assert_eq!(KdfParams::for_version(1).unwrap(), KDF_V1);
        assert!(matches!(
            KdfParams::for_version(2),
            Err(VaultError::Format(_))
        ));
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
