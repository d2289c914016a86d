//! Zeroizing handle for the derived vault key.

use zeroize::Zeroize;

use super::kdf::{self, KdfParams, KEY_LEN};
use crate::errors::Result;

/// A wrapper around the 32-byte key derived from the master passphrase
/// that automatically zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a new `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the key for `passphrase` + `salt` under `params`.
    ///
    /// The intermediate stack copy is wiped before returning.
    pub fn derive(passphrase: &[u8], salt: &[u8], params: &KdfParams) -> Result<Self> {
        let mut raw = kdf::derive_key_with_params(passphrase, salt, params)?;
        let key = Self::new(raw);
        raw.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(..)")
    }
}
