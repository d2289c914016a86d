//! `passvault add`: store a new credential.
//!
//! Fields not given as flags are prompted for.  `--generate` fills the
//! password from the generator using the settings' defaults.

use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{open_session, Cli, FieldArgs};
use crate::errors::{Result, VaultError};
use crate::generator;
use crate::vault::{CredentialEntry, EntryFields};

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &FieldArgs, generate: bool) -> Result<()> {
    let (mut session, settings) = open_session(cli)?;

    let password = match (&args.password, generate) {
        (Some(pw), _) => Zeroizing::new(pw.clone()),
        (None, true) => generator::generate(&settings.password_policy())?,
        (None, false) => prompt_secret("Password")?,
    };

    let fields = EntryFields {
        website_name: value_or_prompt(args.website.as_deref(), "Website", false)?,
        url: value_or_prompt(args.url.as_deref(), "URL", false)?,
        username: value_or_prompt(args.username.as_deref(), "Username", false)?,
        password: password.to_string(),
        note: value_or_prompt(args.note.as_deref(), "Note (optional)", true)?,
    };

    let entry = CredentialEntry::new(fields)?;
    let short_id = entry.short_id();
    let website = entry.website_name().to_string();

    session.store_mut()?.add(entry)?;
    session.save()?;

    log_audit(cli, AuditOp::Add, Some(&short_id), None);
    output::success(&format!("Added '{website}' ({short_id})"));
    if generate && args.password.is_none() {
        output::tip(&format!("Run `passvault copy {short_id}` to copy the generated password."));
    }

    Ok(())
}

/// Use the flag value if given, otherwise ask on the terminal.
pub(crate) fn value_or_prompt(value: Option<&str>, prompt: &str, optional: bool) -> Result<String> {
    if let Some(v) = value {
        return Ok(v.to_string());
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(optional)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

pub(crate) fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
