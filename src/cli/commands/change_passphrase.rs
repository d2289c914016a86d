//! `passvault change-passphrase`: re-encrypt the vault under a new passphrase.
//!
//! The current passphrase is checked against the file, a new salt and
//! nonce are drawn, and the vault is rewritten atomically.  If anything
//! fails the old passphrase keeps working.

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, prompt_password_with, vault_path, Cli, NEW_PASSWORD_ENV};
use crate::errors::{Result, VaultError};
use crate::vault::{LockReason, Session};

/// Execute the `change-passphrase` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = vault_path(cli)?;
    if !path.exists() {
        return Err(VaultError::VaultNotFound(path));
    }
    let settings = load_settings(cli)?;

    // 1. Unlock with the current passphrase.
    let old_password = prompt_password_with("Current vault passphrase")?;
    let mut session = Session::new(&path, settings.lock_policy());
    session.unlock(&old_password)?;

    // 2. Prompt for the new one.
    output::info("Choose your new vault passphrase.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. Re-encrypt and save.
    session.change_passphrase(&old_password, &new_password)?;
    let count = session.store()?.len();
    session.lock(LockReason::Explicit);

    log_audit(
        cli,
        AuditOp::ChangePassphrase,
        None,
        Some(&format!("{count} entries re-encrypted")),
    );
    output::success(&format!(
        "Passphrase changed ({count} entries re-encrypted)"
    ));

    Ok(())
}
