//! `passvault copy`: put a password on the clipboard.
//!
//! The process stays in the foreground until the clear delay passes, then
//! empties the clipboard if it still holds the copied password.  The vault
//! is locked before waiting.

use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use tracing::debug;
use zeroize::Zeroizing;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::LockReason;

/// Execute the `copy` command.
pub fn execute(cli: &Cli, id: &str, clear_after: Option<u64>) -> Result<()> {
    let (mut session, settings) = open_session(cli)?;

    let (password, short_id, website) = {
        let store = session.store()?;
        let id = store.resolve(id)?;
        let entry = store
            .get(id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;
        (
            Zeroizing::new(entry.password().to_string()),
            entry.short_id(),
            entry.website_name().to_string(),
        )
    };
    session.lock(LockReason::Explicit);

    let mut clipboard = Clipboard::new().map_err(|e| VaultError::Clipboard(format!("init: {e}")))?;
    clipboard
        .set_text(password.as_str())
        .map_err(|e| VaultError::Clipboard(format!("set: {e}")))?;

    log_audit(cli, AuditOp::Copy, Some(&short_id), None);

    let delay = match clear_after {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => settings.clipboard_clear_after(),
    };
    let Some(delay) = delay else {
        output::success(&format!("Copied password for '{website}'"));
        return Ok(());
    };

    output::success(&format!(
        "Copied password for '{website}' (clears in {}s)",
        delay.as_secs()
    ));
    thread::sleep(delay);

    let still_ours = clipboard
        .get_text()
        .map(|current| Zeroizing::new(current).as_str() == password.as_str())
        .unwrap_or(false);
    if still_ours {
        clipboard
            .clear()
            .map_err(|e| VaultError::Clipboard(format!("clear: {e}")))?;
        output::info("Clipboard cleared.");
    } else {
        debug!("clipboard changed since copy; left as is");
    }

    Ok(())
}
