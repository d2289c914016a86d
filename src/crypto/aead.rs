//! AES-256-GCM authenticated encryption.
//!
//! The nonce is passed explicitly because the vault container stores it
//! in its own field.  `seal` draws a fresh random nonce on every call and
//! is the only entry point the vault engine uses for encryption, so a
//! nonce is never reused under a key.
//!
//! No associated data is authenticated.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::errors::{VaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Generate a random 12-byte nonce.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let generated = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&generated);
    nonce
}

/// Encrypt `plaintext` under a 32-byte `key` and the given nonce.
///
/// Returns the ciphertext with the 16-byte tag appended.
pub fn encrypt(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::Encryption(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| VaultError::Encryption(format!("encryption error: {e}")))
}

/// Encrypt `plaintext` under a freshly generated nonce.
///
/// Returns `(nonce, ciphertext)`.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let nonce = generate_nonce();
    let ciphertext = encrypt(key, &nonce, plaintext)?;
    Ok((nonce, ciphertext))
}

/// Decrypt and verify `ciphertext`.
///
/// Any failure (wrong key, flipped bit, truncated input) is reported as
/// `VaultError::Authentication`; the cause is deliberately not exposed.
pub fn decrypt(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if ciphertext.len() < TAG_LEN {
        return Err(VaultError::Authentication);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::Authentication)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::Authentication)
}
