//! `passvault delete`: remove credentials from the vault.

use std::collections::HashSet;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{confirm, open_session, Cli};
use crate::errors::Result;
use crate::vault::entry::short_id;

/// Execute the `delete` command.
///
/// All ids are resolved before anything is removed; one unknown or
/// ambiguous id aborts the whole deletion.
pub fn execute(cli: &Cli, ids: &[String], force: bool) -> Result<()> {
    let (mut session, _settings) = open_session(cli)?;

    let store = session.store()?;
    let resolved = ids
        .iter()
        .map(|id| store.resolve(id))
        .collect::<Result<HashSet<_>>>()?;
    let names: Vec<String> = store
        .iter()
        .filter(|e| resolved.contains(&e.id()))
        .map(|e| format!("{} ({})", e.website_name(), e.short_id()))
        .collect();

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let prompt = format!("Delete {} credential(s): {}?", names.len(), names.join(", "));
        if !confirm(&prompt, false)? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let removed = session.store_mut()?.remove(&resolved)?;
    session.save()?;

    let short_ids: Vec<String> = resolved.iter().map(|id| short_id(*id)).collect();
    log_audit(cli, AuditOp::Delete, Some(&short_ids.join(",")), None);
    output::success(&format!("Deleted {removed} credential(s)"));

    Ok(())
}
