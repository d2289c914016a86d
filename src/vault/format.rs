//! Vault container file format.
//!
//! A vault file is a small JSON document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "salt": "<base64, 16 bytes>",
//!   "nonce": "<base64, 12 bytes>",
//!   "ciphertext": "<base64, AES-256-GCM output>",
//!   "entries_order": ["<uuid>", ...]
//! }
//! ```
//!
//! - **version**: selects the KDF parameter set; absent means `1`.
//! - **salt**: Argon2id salt, fresh on every save.
//! - **nonce**: AES-GCM nonce, fresh on every save.
//! - **ciphertext**: the JSON entry map, encrypted as one unit.
//! - **entries_order**: display order, stored in the clear.
//!
//! Reading only checks structure.  Whether the ciphertext authenticates is
//! the engine's concern, so a structurally valid file with a bad tag is
//! *not* a format error.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::errors::{VaultError, Result};

/// The current container format version.
pub const CURRENT_VERSION: u32 = crate::crypto::CURRENT_KDF_VERSION;

fn default_version() -> u32 {
    1
}

/// Everything stored in a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    pub version: u32,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub entries_order: Vec<Uuid>,
}

/// The on-disk shape, before length checks.
#[derive(Serialize, Deserialize)]
struct RawVaultFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    salt: Vec<u8>,
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    nonce: Vec<u8>,
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    ciphertext: Vec<u8>,
    entries_order: Vec<Uuid>,
}

impl VaultFile {
    /// Serialize to the pretty-printed JSON container.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let raw = RawVaultFile {
            version: self.version,
            salt: self.salt.to_vec(),
            nonce: self.nonce.to_vec(),
            ciphertext: self.ciphertext.clone(),
            entries_order: self.entries_order.clone(),
        };
        serde_json::to_vec_pretty(&raw)
            .map_err(|e| VaultError::Serialization(format!("vault container: {e}")))
    }

    /// Parse and structurally validate a JSON container.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let raw: RawVaultFile = serde_json::from_slice(data)
            .map_err(|e| VaultError::Format(format!("container JSON: {e}")))?;

        let salt: [u8; SALT_LEN] = raw.salt.as_slice().try_into().map_err(|_| {
            VaultError::Format(format!(
                "salt must be {SALT_LEN} bytes (got {})",
                raw.salt.len()
            ))
        })?;
        let nonce: [u8; NONCE_LEN] = raw.nonce.as_slice().try_into().map_err(|_| {
            VaultError::Format(format!(
                "nonce must be {NONCE_LEN} bytes (got {})",
                raw.nonce.len()
            ))
        })?;

        let mut seen = HashSet::with_capacity(raw.entries_order.len());
        if let Some(dup) = raw.entries_order.iter().find(|id| !seen.insert(**id)) {
            return Err(VaultError::Format(format!(
                "entries_order lists {dup} more than once"
            )));
        }

        Ok(Self {
            version: raw.version,
            salt,
            nonce,
            ciphertext: raw.ciphertext,
            entries_order: raw.entries_order,
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a vault file to disk **atomically**.
///
/// 1. Serialize the container.
/// 2. Write it to a temp file in the same directory and fsync it.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file, and a
/// failure at any step leaves the previous vault untouched.
pub fn write_vault(path: &Path, vault: &VaultFile) -> Result<()> {
    let bytes = vault.to_bytes()?;
    write_atomic(path, &bytes)
}

/// Read a vault file from disk and check its structure.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(VaultError::VaultNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(VaultError::Io(e)),
    };

    VaultFile::from_bytes(&data)
}

/// Replace `path` with `bytes` via temp file + rename.
///
/// The temp file lives next to the target so the rename stays on one
/// filesystem.  Its name is random and it is created exclusively, so a
/// file or symlink already at that name is never written through.  On
/// Unix the file is created owner-only (`0o600`).
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path_for(path);

    let result = write_and_sync(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        // An existing file at the temp name is not ours to remove.
        if e.kind() != ErrorKind::AlreadyExists {
            let _ = fs::remove_file(&tmp_path);
        }
        return Err(VaultError::Io(e));
    }

    // Persist the rename itself.
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }

    Ok(())
}

fn write_and_sync(tmp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.{:016x}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        rand::rng().next_u64()
    ))
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> VaultFile {
        VaultFile {
            version: CURRENT_VERSION,
            salt: [1u8; SALT_LEN],
            nonce: [2u8; NONCE_LEN],
            ciphertext: vec![3u8; 40],
            entries_order: vec![Uuid::new_v4(), Uuid::new_v4()],
        }
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.vault");
        let vault = sample();

        write_vault(&path, &vault).unwrap();
        assert_eq!(read_vault(&path).unwrap(), vault);
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[test]
    fn temp_names_are_unpredictable() {
        let path = Path::new("dir/v.vault");
        let a = temp_path_for(path);
        let b = temp_path_for(path);
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("dir")));
        assert!(a.file_name().unwrap().to_string_lossy().starts_with(".v.vault."));
    }

    #[test]
    fn container_fields_are_named_json() {
        let text = String::from_utf8(sample().to_bytes().unwrap()).unwrap();
        for field in ["\"version\"", "\"salt\"", "\"nonce\"", "\"ciphertext\"", "\"entries_order\""] {
            assert!(text.contains(field), "missing {field}");
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_vault(&dir.path().join("absent.vault"));
        assert!(matches!(result, Err(VaultError::VaultNotFound(_))));
    }

    #[test]
    fn missing_version_defaults_to_one() {
        let json = format!(
            r#"{{"salt":"{}","nonce":"{}","ciphertext":"AAAA","entries_order":[]}}"#,
            BASE64.encode([0u8; SALT_LEN]),
            BASE64.encode([0u8; NONCE_LEN])
        );
        let vault = VaultFile::from_bytes(json.as_bytes()).unwrap();
        assert_eq!(vault.version, 1);
    }

    #[test]
    fn structural_problems_are_format_errors() {
        let good_salt = BASE64.encode([0u8; SALT_LEN]);
        let good_nonce = BASE64.encode([0u8; NONCE_LEN]);
        let id = Uuid::new_v4();
        let cases = [
            "not json".to_string(),
            r#"{"salt":"AAAA"}"#.to_string(),
            format!(r#"{{"salt":"!!","nonce":"{good_nonce}","ciphertext":"","entries_order":[]}}"#),
            format!(
                r#"{{"salt":"{}","nonce":"{good_nonce}","ciphertext":"","entries_order":[]}}"#,
                BASE64.encode([0u8; 8])
            ),
            format!(
                r#"{{"salt":"{good_salt}","nonce":"{}","ciphertext":"","entries_order":[]}}"#,
                BASE64.encode([0u8; 16])
            ),
            format!(
                r#"{{"salt":"{good_salt}","nonce":"{good_nonce}","ciphertext":"","entries_order":["{id}","{id}"]}}"#
            ),
        ];
        for case in cases {
            let result = VaultFile::from_bytes(case.as_bytes());
            assert!(matches!(result, Err(VaultError::Format(_))), "{case}");
        }
    }

    #[test]
    fn failed_write_cleans_up_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.vault");
        // A non-empty directory at the target makes the rename fail.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(write_vault(&path, &sample()).is_err());

        assert_eq!(fs::read(path.join("keep")).unwrap(), b"x");
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[test]
    fn existing_temp_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let taken = dir.path().join("taken.tmp");
        fs::write(&taken, b"someone else's").unwrap();

        assert!(write_and_sync(&taken, b"secret").is_err());
        assert_eq!(fs::read(&taken).unwrap(), b"someone else's");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_at_temp_name_is_not_followed() {
        let dir = TempDir::new().unwrap();
        let victim = dir.path().join("victim");
        fs::write(&victim, b"original").unwrap();
        let link = dir.path().join("link.tmp");
        std::os::unix::fs::symlink(&victim, &link).unwrap();

        assert!(write_and_sync(&link, b"plaintext").is_err());
        assert_eq!(fs::read(&victim).unwrap(), b"original");
    }

    #[cfg(unix)]
    #[test]
    fn vault_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.vault");
        write_vault(&path, &sample()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
