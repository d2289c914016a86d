//! `passvault restore`: replace the vault with a backup.
//!
//! The backup must open with the given passphrase before anything is
//! written.  Afterwards the vault's passphrase is the backup's.

use std::fs;
use std::path::Path;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{confirm, prompt_password_with, vault_dir, vault_path, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::engine;

/// Execute the `restore` command.
pub fn execute(cli: &Cli, src: &str, force: bool) -> Result<()> {
    let src = Path::new(src);
    if !src.exists() {
        return Err(VaultError::VaultNotFound(src.to_path_buf()));
    }
    let path = vault_path(cli)?;

    if path.exists() && !force {
        let prompt = format!("Replace the vault at {}?", path.display());
        if !confirm(&prompt, false)? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    fs::create_dir_all(vault_dir(cli)?)?;
    let password = prompt_password_with("Backup passphrase")?;
    let store = engine::restore(src, &path, &password)?;

    log_audit(
        cli,
        AuditOp::Restore,
        None,
        Some(&format!("{} entries from {}", store.len(), src.display())),
    );
    output::success(&format!(
        "Restored {} credential(s) from {}",
        store.len(),
        src.display()
    ));

    Ok(())
}
