//! `passvault list`: display all credentials in a table.

use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (session, _settings) = open_session(cli)?;
    let store = session.store()?;

    if store.is_empty() {
        output::info("No credentials in this vault yet.");
        output::tip("Run `passvault add` to add your first credential.");
        return Ok(());
    }

    output::info(&format!("{} credential(s)", store.len()));
    let rows: Vec<_> = store.iter().enumerate().map(|(i, e)| (i + 1, e)).collect();
    output::print_entries_table(&rows);

    Ok(())
}
