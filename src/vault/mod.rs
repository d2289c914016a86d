//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `CredentialEntry` and `EntryFields` types (`entry`)
//! - The in-memory `CredentialStore` with its ordering invariant (`store`)
//! - The JSON container format and atomic writes (`format`)
//! - Open/save/verify/change-passphrase operations (`engine`)
//! - The lock/unlock `Session` state machine (`session`)

pub mod engine;
pub mod entry;
pub mod format;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{normalize_url, CredentialEntry, EntryFields, RequiredField};
pub use format::{VaultFile, CURRENT_VERSION};
pub use session::{LockPolicy, LockReason, Session, SessionState};
pub use store::CredentialStore;
