//! `passvault move`: change an entry's display position.

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::entry::short_id;

/// Execute the `move` command.  `position` is 1-based.
pub fn execute(cli: &Cli, id: &str, position: usize) -> Result<()> {
    if position == 0 {
        return Err(VaultError::Validation("positions start at 1".into()));
    }

    let (mut session, _settings) = open_session(cli)?;
    let store = session.store_mut()?;
    let id = store.resolve(id)?;
    store.move_entry(id, position - 1)?;
    let now_at = store.position(id).map_or(position, |i| i + 1);
    session.save()?;

    let short = short_id(id);
    log_audit(
        cli,
        AuditOp::Move,
        Some(&short),
        Some(&format!("to position {now_at}")),
    );
    output::success(&format!("Moved {short} to position {now_at}"));

    Ok(())
}
