use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{VaultError, Result};
use crate::generator::PasswordPolicy;
use crate::vault::LockPolicy;

/// Per-vault configuration, loaded from `<vault_dir>/settings.toml`.
///
/// Every field has a sensible default so passvault works out-of-the-box
/// without any config file at all.  Key derivation parameters are not
/// configurable; they are fixed per vault format version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// File name of the vault inside the vault directory.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Lock after this many idle minutes (0 disables auto-lock).
    #[serde(default = "default_auto_lock_minutes")]
    pub auto_lock_minutes: u64,

    /// Lock when the window is minimized.
    #[serde(default = "default_true")]
    pub lock_on_minimize: bool,

    /// Clear a copied password from the clipboard after this many seconds
    /// (0 leaves it in place).
    #[serde(default = "default_clipboard_clear_seconds")]
    pub clipboard_clear_seconds: u64,

    /// Valid rows shown before confirming an import.
    #[serde(default = "default_import_preview_rows")]
    pub import_preview_rows: usize,

    /// Default length for generated passwords.
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Leave `0O1lI` out of generated passwords.
    #[serde(default)]
    pub exclude_similar: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "passwords.vault".to_string()
}

fn default_auto_lock_minutes() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_clipboard_clear_seconds() -> u64 {
    15
}

fn default_import_preview_rows() -> usize {
    10
}

fn default_password_length() -> usize {
    crate::generator::DEFAULT_LENGTH
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            auto_lock_minutes: default_auto_lock_minutes(),
            lock_on_minimize: default_true(),
            clipboard_clear_seconds: default_clipboard_clear_seconds(),
            import_preview_rows: default_import_preview_rows(),
            password_length: default_password_length(),
            exclude_similar: false,
        }
    }
}

impl Settings {
    /// Name of the config file inside the vault directory.
    pub const FILE_NAME: &'static str = "settings.toml";

    /// Load settings from `<vault_dir>/settings.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(vault_dir: &Path) -> Result<Self> {
        let config_path = vault_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "settings loaded");
        Ok(settings)
    }

    /// Write these settings to `<vault_dir>/settings.toml`.
    pub fn save(&self, vault_dir: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(vault_dir.join(Self::FILE_NAME), text)?;
        Ok(())
    }

    /// Full path of the vault file: `<vault_dir>/<vault_file>`.
    pub fn vault_path(&self, vault_dir: &Path) -> PathBuf {
        vault_dir.join(&self.vault_file)
    }

    /// Session lock behaviour derived from these settings.
    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy {
            idle_timeout: (self.auto_lock_minutes > 0)
                .then(|| Duration::from_secs(self.auto_lock_minutes * 60)),
            lock_on_minimize: self.lock_on_minimize,
        }
    }

    /// Generator defaults derived from these settings.
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            length: self.password_length,
            exclude_similar: self.exclude_similar,
            ..PasswordPolicy::default()
        }
    }

    /// Clipboard clearing delay, if enabled.
    pub fn clipboard_clear_after(&self) -> Option<Duration> {
        (self.clipboard_clear_seconds > 0).then(|| Duration::from_secs(self.clipboard_clear_seconds))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
