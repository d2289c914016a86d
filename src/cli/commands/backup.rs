//! `passvault backup`: copy the encrypted vault file elsewhere.
//!
//! The passphrase is checked first so a backup is known to open, but the
//! file is copied as-is (still encrypted, same salt and nonce).

use std::path::Path;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{prompt_password, vault_path, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::engine;

/// Execute the `backup` command.
pub fn execute(cli: &Cli, dest: &str) -> Result<()> {
    let path = vault_path(cli)?;
    let dest = Path::new(dest);

    let password = prompt_password()?;
    if !engine::verify(&path, &password)? {
        return Err(VaultError::Authentication);
    }

    engine::backup(&path, dest)?;

    log_audit(
        cli,
        AuditOp::Backup,
        None,
        Some(&format!("to {}", dest.display())),
    );
    output::success(&format!("Vault backed up to {}", dest.display()));

    Ok(())
}
