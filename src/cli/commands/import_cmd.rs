//! `passvault import`: bulk-add credentials from a CSV or text file.
//!
//! The file is parsed once; a preview of the valid rows and every
//! rejected row is shown, and the valid rows are added after
//! confirmation (or straight away with `--yes`).

use std::path::Path;

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{confirm, open_session, Cli};
use crate::errors::{Result, VaultError};
use crate::import::BatchImporter;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str, yes: bool) -> Result<()> {
    let source = Path::new(file_path);
    if !source.exists() {
        return Err(VaultError::CommandFailed(format!(
            "import file not found: {}",
            source.display()
        )));
    }

    let (mut session, settings) = open_session(cli)?;

    let report = BatchImporter::new().parse(source);
    output::print_import_preview(&report.preview(settings.import_preview_rows));

    if report.valid.is_empty() {
        output::warning("No valid credentials found in the import file.");
        return Ok(());
    }

    if !yes {
        let prompt = format!(
            "Import {} credential(s) ({} row(s) skipped)?",
            report.valid.len(),
            report.invalid.len()
        );
        if !confirm(&prompt, true)? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let skipped = report.invalid.len();
    let count = session.store_mut()?.extend(report.valid)?;
    session.save()?;

    log_audit(
        cli,
        AuditOp::Import,
        None,
        Some(&format!("{count} added, {skipped} skipped, from {}", source.display())),
    );
    output::success(&format!(
        "Imported {count} credential(s) from {}",
        source.display()
    ));

    Ok(())
}
