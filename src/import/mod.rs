//! Batch import of credentials from CSV and plain-text files.
//!
//! `BatchImporter::parse` never fails as a whole: every problem is reported
//! per row in `ImportReport::invalid`, with file-level problems (unreadable
//! file, unknown encoding) reported as row `0`.
//!
//! Supported inputs:
//! - `.csv`: comma separated, quoting honoured, optional header row
//! - labeled blocks (`Website: ...` / `网站名：...`, separated by `---`);
//!   any other line in such a file is reported as unlabeled
//! - any other text: one entry per line, split on `,` `;` tab or whitespace

pub mod decode;
pub mod labeled;
pub mod rows;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use self::labeled::BlockRow;
use crate::vault::entry::{describe_fields, CredentialEntry, EntryFields, RequiredField};

/// Minimum number of cells in a data row.
pub const MIN_COLUMNS: usize = 4;

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("could not read file: {0}")]
    Read(String),

    #[error("could not decode file (tried {})", decode::supported_names())]
    Encoding,

    #[error("at least 4 columns required (website, url, username, password), found {found}")]
    TooFewColumns { found: usize },

    #[error("missing required fields: {}", describe_fields(.0))]
    MissingFields(Vec<RequiredField>),

    #[error("line has no recognised label in a labeled file (expected `Label: value`)")]
    UnlabeledLine,
}

/// A rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRow {
    /// 1-based row number among content lines (or blocks); 0 for the whole file.
    pub row: usize,
    pub raw_fields: Vec<String>,
    pub reason: ImportError,
}

/// Outcome of parsing one file.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub valid: Vec<CredentialEntry>,
    pub invalid: Vec<InvalidRow>,
}

impl ImportReport {
    fn file_error(reason: ImportError) -> Self {
        Self {
            valid: Vec::new(),
            invalid: vec![InvalidRow {
                row: 0,
                raw_fields: Vec::new(),
                reason,
            }],
        }
    }

    /// The first `max_rows` valid entries plus every invalid row.
    pub fn preview(&self, max_rows: usize) -> ImportPreview {
        ImportPreview {
            entries: self.valid.iter().take(max_rows).cloned().collect(),
            invalid: self.invalid.clone(),
            total_valid: self.valid.len(),
        }
    }
}

/// A bounded view of an import for confirmation before committing.
#[derive(Debug, Clone)]
pub struct ImportPreview {
    pub entries: Vec<CredentialEntry>,
    pub invalid: Vec<InvalidRow>,
    pub total_valid: usize,
}

/// How the lines of a source should be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Text,
}

impl SourceKind {
    /// `.csv` (any case) is CSV; everything else is text.
    pub fn from_name(name: &str) -> Self {
        let is_csv = Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            SourceKind::Csv
        } else {
            SourceKind::Text
        }
    }
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Converts import files into validated credential entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchImporter;

impl BatchImporter {
    pub fn new() -> Self {
        Self
    }

    /// Read, decode and parse the file at `path`.
    pub fn parse(&self, path: &Path) -> ImportReport {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import file unreadable");
                return ImportReport::file_error(ImportError::Read(e.to_string()));
            }
        };

        let Some((text, encoding)) = decode::decode_text(&bytes) else {
            warn!(path = %path.display(), "import file encoding not recognised");
            return ImportReport::file_error(ImportError::Encoding);
        };
        debug!(path = %path.display(), encoding = encoding.name(), "import file decoded");

        let name = path.file_name().unwrap_or_default().to_string_lossy();
        self.parse_text(&name, &text)
    }

    /// Parse already-decoded text; `name` picks CSV or text handling.
    pub fn parse_text(&self, name: &str, text: &str) -> ImportReport {
        self.parse_text_at(name, text, Utc::now())
    }

    /// Parse a file and keep only the first `max_rows` valid entries.
    pub fn get_preview(&self, path: &Path, max_rows: usize) -> ImportPreview {
        self.parse(path).preview(max_rows)
    }

    fn parse_text_at(&self, name: &str, text: &str, now: DateTime<Utc>) -> ImportReport {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        let kind = SourceKind::from_name(name);
        let rows: Vec<BlockRow> = match kind {
            SourceKind::Csv => {
                let mut rows: Vec<Vec<String>> =
                    lines.iter().map(|line| rows::split_csv_line(line)).collect();
                if rows.first().is_some_and(|first| rows::is_header_row(first)) {
                    // Keep row numbers aligned with file lines.
                    rows[0].clear();
                }
                rows.into_iter().map(BlockRow::Block).collect()
            }
            SourceKind::Text if labeled::looks_labeled(&lines) => labeled::parse_blocks(&lines),
            SourceKind::Text => lines
                .iter()
                .map(|line| BlockRow::Block(rows::split_freeform_line(line)))
                .collect(),
        };

        let mut report = ImportReport::default();
        for (index, row) in rows.into_iter().enumerate() {
            let cells = match row {
                BlockRow::Block(cells) => cells,
                BlockRow::Unlabeled(line) => {
                    report.invalid.push(InvalidRow {
                        row: index + 1,
                        raw_fields: vec![line],
                        reason: ImportError::UnlabeledLine,
                    });
                    continue;
                }
            };
            if cells.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            match row_to_entry(&cells, now) {
                Ok(entry) => report.valid.push(entry),
                Err(reason) => report.invalid.push(InvalidRow {
                    row: index + 1,
                    raw_fields: cells,
                    reason,
                }),
            }
        }

        info!(
            source = name,
            ?kind,
            valid = report.valid.len(),
            invalid = report.invalid.len(),
            "import parsed"
        );
        report
    }
}

/// Validate one row of cells and build the entry.
fn row_to_entry(cells: &[String], now: DateTime<Utc>) -> Result<CredentialEntry, ImportError> {
    if cells.len() < MIN_COLUMNS {
        return Err(ImportError::TooFewColumns { found: cells.len() });
    }

    let fields = EntryFields {
        website_name: cells[0].clone(),
        url: cells[1].clone(),
        username: cells[2].clone(),
        password: cells[3].clone(),
        note: cells.get(4).cloned().unwrap_or_default(),
    };
    let missing = fields.missing_fields();
    if !missing.is_empty() {
        return Err(ImportError::MissingFields(missing));
    }

    CredentialEntry::new_at(fields, now)
        .map_err(|_| ImportError::MissingFields(RequiredField::ALL.to_vec()))
}
