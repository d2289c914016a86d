//! Vault operations: open, save, verify, change passphrase.
//!
//! The whole entry map is serialized to JSON and encrypted as one unit.
//! Every save draws a new salt and a new nonce, derives a new key, and
//! rewrites the container atomically, so a key/nonce pair is never used
//! twice and a crash mid-save leaves the previous file readable.
//!
//! None of these functions lock the vault file.  Callers must not run two
//! saves against the same path at the same time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::{aead, generate_salt, KdfParams, VaultKey};
use crate::errors::{VaultError, Result};

use super::entry::CredentialEntry;
use super::format::{self, VaultFile, CURRENT_VERSION};
use super::store::CredentialStore;

/// Open and decrypt the vault at `path`.
///
/// Fails with `VaultNotFound` if the file is absent, `Format` if it is
/// structurally broken, and `Authentication` if the passphrase is wrong
/// or the ciphertext was modified.
pub fn open(path: &Path, passphrase: &str) -> Result<CredentialStore> {
    let vault = format::read_vault(path)?;
    let store = unseal(&vault, passphrase)?;
    info!(path = %path.display(), entries = store.len(), "vault opened");
    Ok(store)
}

/// Check a passphrase against the vault at `path`.
///
/// Returns `Ok(false)` only for an authentication failure; a missing or
/// malformed file is still an error.
pub fn verify(path: &Path, passphrase: &str) -> Result<bool> {
    match open(path, passphrase) {
        Ok(_) => Ok(true),
        Err(VaultError::Authentication) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Encrypt `store` under `passphrase` and write it to `path`.
pub fn save(path: &Path, passphrase: &str, store: &CredentialStore) -> Result<()> {
    let vault = seal(passphrase, store)?;
    format::write_vault(path, &vault)?;
    info!(path = %path.display(), entries = store.len(), "vault saved");
    Ok(())
}

/// Create a new, empty vault at `path` (first run).
pub fn create(path: &Path, passphrase: &str) -> Result<CredentialStore> {
    if path.exists() {
        return Err(VaultError::VaultAlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let store = CredentialStore::new();
    save(path, passphrase, &store)?;
    info!(path = %path.display(), "vault created");
    Ok(store)
}

/// Re-encrypt the vault under a new passphrase.
///
/// The old passphrase must open the vault.  The write is atomic, so if
/// anything fails the file still opens with the old passphrase.
pub fn change_passphrase(path: &Path, old_passphrase: &str, new_passphrase: &str) -> Result<()> {
    let store = open(path, old_passphrase)?;
    save(path, new_passphrase, &store)?;
    info!(path = %path.display(), "vault passphrase changed");
    Ok(())
}

/// Copy the encrypted vault to `dest` without decrypting it.
pub fn backup(path: &Path, dest: &Path) -> Result<()> {
    if same_location(path, dest) {
        return Err(VaultError::CommandFailed(
            "backup destination is the vault file itself".into(),
        ));
    }

    let vault = format::read_vault(path)?;
    format::write_vault(dest, &vault)?;
    info!(from = %path.display(), to = %dest.display(), "vault backed up");
    Ok(())
}

/// Replace the vault at `path` with the vault file at `src`.
///
/// `src_passphrase` must open `src`; afterwards it is the passphrase of
/// the vault at `path`.
pub fn restore(src: &Path, path: &Path, src_passphrase: &str) -> Result<CredentialStore> {
    if same_location(src, path) {
        return Err(VaultError::CommandFailed(
            "cannot restore a vault from itself".into(),
        ));
    }

    let vault = format::read_vault(src)?;
    let store = unseal(&vault, src_passphrase)?;
    format::write_vault(path, &vault)?;
    info!(from = %src.display(), to = %path.display(), entries = store.len(), "vault restored");
    Ok(store)
}

/// Encrypt a store into a container with a fresh salt and nonce.
pub fn seal(passphrase: &str, store: &CredentialStore) -> Result<VaultFile> {
    let params = KdfParams::for_version(CURRENT_VERSION)?;
    let salt = generate_salt();
    let key = VaultKey::derive(passphrase.as_bytes(), &salt, &params)?;

    let payload = Zeroizing::new(
        serde_json::to_vec(store.entries())
            .map_err(|e| VaultError::Serialization(format!("entries: {e}")))?,
    );
    let (nonce, ciphertext) = aead::seal(key.as_bytes(), &payload)?;
    debug!(bytes = ciphertext.len(), "entries encrypted");

    Ok(VaultFile {
        version: CURRENT_VERSION,
        salt,
        nonce,
        ciphertext,
        entries_order: store.order().to_vec(),
    })
}

/// Decrypt a container into a store.
pub fn unseal(vault: &VaultFile, passphrase: &str) -> Result<CredentialStore> {
    let params = KdfParams::for_version(vault.version)?;
    let key = VaultKey::derive(passphrase.as_bytes(), &vault.salt, &params)?;

    let payload = aead::decrypt(key.as_bytes(), &vault.nonce, &vault.ciphertext)?;

    // The payload authenticated, so a parse failure is a format problem,
    // not a wrong passphrase.
    let entries: HashMap<Uuid, CredentialEntry> = serde_json::from_slice(&payload)
        .map_err(|e| VaultError::Format(format!("decrypted entries: {e}")))?;

    CredentialStore::from_parts(entries, vault.entries_order.clone())
}

/// Whether two paths name the same file (the second may not exist yet).
pub(crate) fn same_location(a: &Path, b: &Path) -> bool {
    resolve_path(a) == resolve_path(b)
}

fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::entry::EntryFields;
    use tempfile::TempDir;

    fn store_with_one() -> CredentialStore {
        let mut store = CredentialStore::new();
        store
            .add(
                CredentialEntry::new(EntryFields {
                    website_name: "Example".into(),
                    url: "example.com".into(),
                    username: "me".into(),
                    password: "s3cret".into(),
                    note: "n".into(),
                })
                .unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn seal_then_unseal() {
        let store = store_with_one();
        let vault = seal("pw", &store).unwrap();
        assert_eq!(vault.entries_order, store.order());
        assert_eq!(unseal(&vault, "pw").unwrap(), store);
    }

    #[test]
    fn ciphertext_hides_field_values() {
        let vault = seal("pw", &store_with_one()).unwrap();
        let needle = b"s3cret";
        assert!(!vault
            .ciphertext
            .windows(needle.len())
            .any(|w| w == needle));
    }

    #[test]
    fn unknown_version_is_rejected_before_decrypting() {
        let mut vault = seal("pw", &store_with_one()).unwrap();
        vault.version = 99;
        assert!(matches!(unseal(&vault, "pw"), Err(VaultError::Format(_))));
    }

    #[test]
    fn backup_refuses_same_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.vault");
        create(&path, "pw").unwrap();
        assert!(backup(&path, &path).is_err());
    }
}
