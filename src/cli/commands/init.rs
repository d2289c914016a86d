//! `passvault init`: create a new, empty vault.

use std::fs;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{prompt_new_password, vault_dir, Cli, PASSWORD_ENV};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::Session;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = vault_dir(cli)?;

    // 1. Create the vault directory if it doesn't exist.
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
        output::info(&format!("Created vault directory: {}", dir.display()));
    }

    // 2. Refuse to overwrite an existing vault.
    let settings = Settings::load(&dir)?;
    let path = settings.vault_path(&dir);
    if path.exists() {
        output::tip("Use `passvault add` to add credentials to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(path));
    }

    // 3. Prompt for a new passphrase (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 4. Create the vault file.
    let mut session = Session::new(&path, settings.lock_policy());
    session.create(&password)?;

    // 5. Write default settings so they are easy to discover and edit.
    if !dir.join(Settings::FILE_NAME).exists() {
        settings.save(&dir)?;
    }

    log_audit(cli, AuditOp::Init, None, Some("vault created"));

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `passvault add` to store your first credential.");
    output::tip("Run `passvault import <file>` to bring in an existing list.");

    Ok(())
}
