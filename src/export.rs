//! Plaintext export of decrypted entries.
//!
//! Both formats re-import through `BatchImporter`:
//! - `csv`: header `website,url,username,password,note`, every data field quoted
//! - `text`: labeled blocks separated by a dashed line

use std::fmt::Write as _;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use tracing::info;
use zeroize::Zeroizing;

use crate::errors::{VaultError, Result};
use crate::import::labeled::SEPARATOR;
use crate::vault::format::write_atomic;
use crate::vault::CredentialStore;

/// CSV header row.
pub const CSV_HEADER: [&str; 5] = ["website", "url", "username", "password", "note"];

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Text,
}

impl ExportFormat {
    /// `.csv` (any case) exports CSV, anything else labeled text.
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            ExportFormat::Csv
        } else {
            ExportFormat::Text
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(VaultError::CommandFailed(format!(
                "unknown export format '{other}', use 'csv' or 'text'"
            ))),
        }
    }
}

/// Render every entry, in display order.
pub fn render(store: &CredentialStore, format: ExportFormat) -> Result<Zeroizing<String>> {
    match format {
        ExportFormat::Csv => render_csv(store),
        ExportFormat::Text => Ok(render_text(store)),
    }
}

fn render_csv(store: &CredentialStore) -> Result<Zeroizing<String>> {
    // Plain header, then every data field quoted: a value starting with `#`
    // or carrying edge whitespace must survive the importer's line handling.
    let mut header = CSV_HEADER.join(",").into_bytes();
    header.push(b'\n');
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(header);
    let csv_err = |e: csv::Error| VaultError::Serialization(format!("CSV export: {e}"));

    for entry in store.iter() {
        writer
            .write_record([
                entry.website_name(),
                entry.url(),
                entry.username(),
                entry.password(),
                entry.note().unwrap_or_default(),
            ])
            .map_err(csv_err)?;
    }

    let bytes = Zeroizing::new(
        writer
            .into_inner()
            .map_err(|e| VaultError::Serialization(format!("CSV export: {e}")))?,
    );
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| VaultError::Serialization(format!("CSV export: {e}")))?;
    Ok(Zeroizing::new(text.to_string()))
}

fn render_text(store: &CredentialStore) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::new());
    for (i, entry) in store.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "{SEPARATOR}");
        }
        let _ = writeln!(out, "Website: {}", entry.website_name());
        let _ = writeln!(out, "URL: {}", entry.url());
        let _ = writeln!(out, "Username: {}", entry.username());
        let _ = writeln!(out, "Password: {}", entry.password());
        if let Some(note) = entry.note() {
            let _ = writeln!(out, "Note: {note}");
        }
    }
    out
}

/// Write the export file.  Refuses to write over the vault itself.
pub fn export_to(
    store: &CredentialStore,
    dest: &Path,
    format: ExportFormat,
    vault_path: &Path,
) -> Result<usize> {
    let targets_vault = dest
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("vault"))
        || crate::vault::engine::same_location(dest, vault_path);
    if targets_vault {
        return Err(VaultError::CommandFailed(
            "refusing to export over a vault file".into(),
        ));
    }

    let content = render(store, format)?;
    write_atomic(dest, content.as_bytes())?;
    info!(dest = %dest.display(), ?format, entries = store.len(), "vault exported");
    Ok(store.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::BatchImporter;
    use crate::vault::{CredentialEntry, EntryFields};

    fn store() -> CredentialStore {
        let mut store = CredentialStore::new();
        for (site, pass, note) in [
            ("GitHub", "p,w\"x", "work"),
            ("星辰云", "密码1", ""),
            ("#1 Bank", "pin 1234", "branch office"),
        ] {
            store
                .add(
                    CredentialEntry::new(EntryFields {
                        website_name: site.into(),
                        url: format!("{site}.example"),
                        username: "me".into(),
                        password: pass.into(),
                        note: note.into(),
                    })
                    .unwrap(),
                )
                .unwrap();
        }
        store
    }

    fn assert_reimports(format: ExportFormat, name: &str) {
        let store = store();
        let text = render(&store, format).unwrap();
        let report = BatchImporter::new().parse_text(name, &text);
        assert!(report.invalid.is_empty(), "{:?}", report.invalid);

        let original: Vec<_> = store.iter().map(|e| e.fields()).collect();
        let reimported: Vec<_> = report.valid.iter().map(|e| e.fields()).collect();
        assert_eq!(original, reimported);
    }

    #[test]
    fn csv_reimports() {
        assert_reimports(ExportFormat::Csv, "out.csv");
    }

    #[test]
    fn text_reimports() {
        assert_reimports(ExportFormat::Text, "out.txt");
    }

    #[test]
    fn csv_starts_with_header() {
        let text = render(&store(), ExportFormat::Csv).unwrap();
        assert!(text.starts_with("website,url,username,password,note\n"));
    }

    #[test]
    fn csv_data_fields_are_quoted() {
        let text = render(&store(), ExportFormat::Csv).unwrap();
        assert!(text.contains("\n\"#1 Bank\",\"https://#1 Bank.example\",\"me\",\"pin 1234\","));
        assert!(!text.lines().skip(1).any(|line| line.starts_with('#')));
    }

    #[test]
    fn csv_keeps_password_edge_spaces() {
        let mut store = CredentialStore::new();
        store
            .add(
                CredentialEntry::new(EntryFields {
                    website_name: "Edge".into(),
                    url: "edge.example".into(),
                    username: "me".into(),
                    password: " pw with edge ".into(),
                    note: String::new(),
                })
                .unwrap(),
            )
            .unwrap();

        let text = render(&store, ExportFormat::Csv).unwrap();
        let report = BatchImporter::new().parse_text("out.csv", &text);
        assert_eq!(report.valid.len(), 1, "{:?}", report.invalid);
        assert_eq!(report.valid[0].password(), " pw with edge ");
    }

    #[test]
    fn format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a.txt")), ExportFormat::Text);
        assert!(ExportFormat::parse("xml").is_err());
    }

    #[test]
    fn refuses_vault_destination() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = dir.path().join("passwords.vault");
        let result = export_to(&store(), &dir.path().join("x.vault"), ExportFormat::Csv, &vault);
        assert!(result.is_err());
    }
}
