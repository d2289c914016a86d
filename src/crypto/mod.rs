//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption (`aead`)
//! - A zeroizing handle for the derived key (`keys`)

pub mod aead;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, seal, decrypt, ...};
pub use aead::{decrypt, encrypt, generate_nonce, seal, NONCE_LEN};
pub use kdf::{derive_key, generate_salt, KdfParams, CURRENT_KDF_VERSION, KEY_LEN, SALT_LEN};
pub use keys::VaultKey;
