//! `passvault search`: filter credentials by text.

use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(cli: &Cli, query: &str) -> Result<()> {
    let (session, _settings) = open_session(cli)?;
    let store = session.store()?;

    let matches = store.filter(query);
    if matches.is_empty() {
        output::info(&format!("No credentials match '{query}'."));
        return Ok(());
    }

    let rows: Vec<_> = matches
        .into_iter()
        .map(|e| (store.position(e.id()).map_or(0, |i| i + 1), e))
        .collect();
    output::info(&format!("{} match(es)", rows.len()));
    output::print_entries_table(&rows);

    Ok(())
}
