//! `passvault get`: show a single credential.

use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: &str, show: bool) -> Result<()> {
    let (session, _settings) = open_session(cli)?;
    let store = session.store()?;

    let id = store.resolve(id)?;
    let entry = store
        .get(id)
        .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;

    output::print_entry(entry, show);

    Ok(())
}
