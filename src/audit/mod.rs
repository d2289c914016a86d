//! Audit trail of vault operations.
//!
//! Each event names the operation, the vault file and optionally the short
//! ids of the credentials it touched.  Field values and passphrases are
//! never recorded.  Events live in `<vault_dir>/audit.db` (SQLite, behind
//! the `audit-log` feature).
//!
//! Recording never fails the operation being recorded: if the database
//! can't be opened or written, the event is dropped with a debug log.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cli::Cli;

/// Operations that leave a trace in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditOp {
    Init,
    Add,
    Edit,
    Delete,
    Move,
    Import,
    Export,
    ChangePassphrase,
    Backup,
    Restore,
    Copy,
}

impl AuditOp {
    pub const ALL: [AuditOp; 11] = [
        AuditOp::Init,
        AuditOp::Add,
        AuditOp::Edit,
        AuditOp::Delete,
        AuditOp::Move,
        AuditOp::Import,
        AuditOp::Export,
        AuditOp::ChangePassphrase,
        AuditOp::Backup,
        AuditOp::Restore,
        AuditOp::Copy,
    ];

    /// Name stored in the database and shown to the user.
    pub fn as_str(self) -> &'static str {
        match self {
            AuditOp::Init => "init",
            AuditOp::Add => "add",
            AuditOp::Edit => "edit",
            AuditOp::Delete => "delete",
            AuditOp::Move => "move",
            AuditOp::Import => "import",
            AuditOp::Export => "export",
            AuditOp::ChangePassphrase => "change-passphrase",
            AuditOp::Backup => "backup",
            AuditOp::Restore => "restore",
            AuditOp::Copy => "copy",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
    }

    /// Whether the operation put a password in plaintext outside the vault
    /// (clipboard or export file).
    pub fn exposes_plaintext(self) -> bool {
        matches!(self, AuditOp::Copy | AuditOp::Export)
    }

    /// Whether the operation changed which credentials the vault holds.
    pub fn changes_contents(self) -> bool {
        matches!(
            self,
            AuditOp::Add | AuditOp::Edit | AuditOp::Delete | AuditOp::Import | AuditOp::Restore
        )
    }
}

impl fmt::Display for AuditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded event.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub op: AuditOp,
    pub vault: String,
    /// Short ids of the credentials involved, comma separated.
    pub entries: Option<String>,
    pub details: Option<String>,
}

/// Which events to read back.
#[derive(Debug, Clone)]
pub struct AuditFilter {
    pub limit: usize,
    pub since: Option<DateTime<Utc>>,
    /// Only events naming this short id (or a prefix of it).
    pub entry: Option<String>,
    pub op: Option<AuditOp>,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            since: None,
            entry: None,
            op: None,
        }
    }
}

/// Path of the audit database inside a vault directory.
pub fn db_path(vault_dir: &Path) -> PathBuf {
    vault_dir.join("audit.db")
}

#[cfg(feature = "audit-log")]
pub use sqlite::AuditLog;

#[cfg(feature = "audit-log")]
mod sqlite {
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use rusqlite::Connection;

    use super::{db_path, AuditEvent, AuditFilter, AuditOp};
    use crate::errors::{Result, VaultError};

    /// SQLite-backed audit log.
    pub struct AuditLog {
        conn: Connection,
    }

    impl AuditLog {
        /// Open (or create) the database at `<vault_dir>/audit.db`.
        ///
        /// `None` means auditing is unavailable; callers carry on without it.
        pub fn open(vault_dir: &Path) -> Option<Self> {
            let db_path = db_path(vault_dir);
            let conn = Connection::open(&db_path).ok()?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(&db_path, std::fs::Permissions::from_mode(0o600));
            }

            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS audit_log (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp TEXT NOT NULL,
                    operation TEXT NOT NULL,
                    vault     TEXT NOT NULL,
                    entry_id  TEXT,
                    details   TEXT
                );",
            )
            .ok()?;

            Some(Self { conn })
        }

        pub fn record(&self, op: AuditOp, vault: &str, entries: Option<&str>, details: Option<&str>) {
            let now = Utc::now().to_rfc3339();
            let result = self.conn.execute(
                "INSERT INTO audit_log (timestamp, operation, vault, entry_id, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![now, op.as_str(), vault, entries, details],
            );
            if let Err(e) = result {
                tracing::debug!(error = %e, op = op.as_str(), "audit write failed");
            }
        }

        /// Events matching `filter`, most recent first.
        pub fn events(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>> {
            let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
            // An empty lower bound matches every RFC 3339 timestamp.
            let since = filter.since.map(|ts| ts.to_rfc3339()).unwrap_or_default();
            let entry = filter.entry.as_deref().map(str::to_lowercase);
            let op = filter.op.map(AuditOp::as_str);

            let mut stmt = self
                .conn
                .prepare(
                    "SELECT id, timestamp, operation, vault, entry_id, details
                     FROM audit_log
                     WHERE timestamp >= ?1
                       AND (?2 IS NULL OR instr(entry_id, ?2) > 0)
                       AND (?3 IS NULL OR operation = ?3)
                     ORDER BY id DESC
                     LIMIT ?4",
                )
                .map_err(|e| VaultError::Audit(format!("query prepare: {e}")))?;

            let rows = stmt
                .query_map(rusqlite::params![since, entry, op, limit], |row| {
                    let at: String = row.get(1)?;
                    let op: String = row.get(2)?;
                    Ok((
                        row.get::<_, i64>(0)?,
                        at,
                        op,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                })
                .map_err(|e| VaultError::Audit(format!("query exec: {e}")))?;

            let mut events = Vec::new();
            for row in rows {
                let (id, at, op, vault, entries, details) =
                    row.map_err(|e| VaultError::Audit(format!("row parse: {e}")))?;
                let Some(op) = AuditOp::parse(&op) else {
                    tracing::debug!(id, operation = %op, "skipping unknown audit operation");
                    continue;
                };
                let Ok(at) = DateTime::parse_from_rfc3339(&at) else {
                    tracing::debug!(id, "skipping audit row with bad timestamp");
                    continue;
                };
                events.push(AuditEvent {
                    id,
                    at: at.with_timezone(&Utc),
                    op,
                    vault,
                    entries,
                    details,
                });
            }
            Ok(events)
        }
    }
}

/// Record an event for the vault `cli` points at.
///
/// Never fails the parent operation.
pub fn log_audit(cli: &Cli, op: AuditOp, entries: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    {
        let Ok(vault_dir) = crate::cli::vault_dir(cli) else {
            return;
        };
        let vault = crate::cli::vault_file_name(cli);
        if let Some(audit) = AuditLog::open(&vault_dir) {
            audit.record(op, &vault, entries, details);
        }
    }
    #[cfg(not(feature = "audit-log"))]
    {
        let _ = (cli, op, entries, details);
    }
}

#[cfg(test)]
mod op_tests {
    use super::AuditOp;

    #[test]
    fn names_parse_back() {
        for op in AuditOp::ALL {
            assert_eq!(AuditOp::parse(op.as_str()), Some(op));
        }
        assert_eq!(AuditOp::parse(" Change-Passphrase "), Some(AuditOp::ChangePassphrase));
        assert_eq!(AuditOp::parse("rename"), None);
    }

    #[test]
    fn only_copy_and_export_expose_plaintext() {
        let exposing: Vec<_> = AuditOp::ALL
            .into_iter()
            .filter(|op| op.exposes_plaintext())
            .collect();
        assert_eq!(exposing, [AuditOp::Export, AuditOp::Copy]);
        assert!(!AuditOp::Backup.exposes_plaintext());
    }
}
