//! `passvault export`: write all credentials to a plaintext file.
//!
//! Supported formats:
//! - `csv`: `website,url,username,password,note` with a header row
//! - `text`: labeled blocks (`Website: ...`) separated by dashed lines
//!
//! Both re-import with `passvault import`.

use std::path::Path;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::Result;
use crate::export::{self, ExportFormat};

/// Execute the `export` command.
pub fn execute(cli: &Cli, file: &str, format: Option<&str>) -> Result<()> {
    let dest = Path::new(file);
    let format = match format {
        Some(name) => ExportFormat::parse(name)?,
        None => ExportFormat::from_path(dest),
    };

    let (session, _settings) = open_session(cli)?;
    let count = export::export_to(session.store()?, dest, format, session.path())?;

    log_audit(
        cli,
        AuditOp::Export,
        None,
        Some(&format!("{count} entries, format: {format:?}")),
    );
    output::success(&format!("Exported {count} credential(s) to {}", dest.display()));
    output::warning("The export file is not encrypted. Delete it when you are done.");

    Ok(())
}
