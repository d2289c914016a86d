use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Authentication failed: wrong passphrase or corrupted vault")]
    Authentication,

    // --- Vault file errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    Format(String),

    // --- Entry / store errors ---
    #[error("Invalid entry: {0}")]
    Validation(String),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Entry {0} already exists")]
    DuplicateEntry(Uuid),

    #[error("Id prefix '{0}' matches more than one entry")]
    AmbiguousId(String),

    // --- Session errors ---
    #[error("Vault is locked; unlock it first")]
    Locked,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Audit error: {0}")]
    Audit(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
