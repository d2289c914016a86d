//! `passvault audit`: show who-did-what history for the vault.
//!
//! Usage:
//!   passvault audit                    # last 50 events
//!   passvault audit --since 7d         # events from the last week
//!   passvault audit --since 2026-01-01 # events since a date
//!   passvault audit --entry 1b4e28ba   # events touching one credential
//!   passvault audit --op copy          # clipboard copies only

use chrono::{DateTime, NaiveDate, Utc};

use crate::audit::{AuditEvent, AuditFilter, AuditOp};
use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Options of the `audit` command as given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct AuditArgs<'a> {
    pub last: usize,
    pub since: Option<&'a str>,
    pub entry: Option<&'a str>,
    pub op: Option<&'a str>,
}

impl AuditArgs<'_> {
    fn to_filter(self) -> Result<AuditFilter> {
        let op = self
            .op
            .map(|name| {
                AuditOp::parse(name).ok_or_else(|| {
                    let known: Vec<_> = AuditOp::ALL.iter().map(|op| op.as_str()).collect();
                    VaultError::CommandFailed(format!(
                        "unknown operation '{name}', expected one of: {}",
                        known.join(", ")
                    ))
                })
            })
            .transpose()?;
        Ok(AuditFilter {
            limit: self.last,
            since: self.since.map(parse_since).transpose()?,
            entry: self.entry.map(|id| id.trim().to_string()),
            op,
        })
    }
}

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, args: AuditArgs<'_>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::output;

    let filter = args.to_filter()?;

    let vault_dir = crate::cli::vault_dir(cli)?;
    if !vault_dir.exists() {
        return Err(VaultError::Audit(format!(
            "no vault directory at {}",
            vault_dir.display()
        )));
    }
    let audit = AuditLog::open(&vault_dir)
        .ok_or_else(|| VaultError::Audit("failed to open audit database".into()))?;

    let events = audit.events(&filter)?;
    if events.is_empty() {
        output::info("No audit events match.");
        return Ok(());
    }

    print_events(&events);
    Ok(())
}

/// Execute the `audit` command (audit log support not compiled in).
#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, args: AuditArgs<'_>) -> Result<()> {
    args.to_filter()?;
    Err(VaultError::Audit(
        "this build has no audit log support (enable the `audit-log` feature)".into(),
    ))
}

/// Lower time bound from `30m`, `24h`, `7d`, `2w` or a `YYYY-MM-DD` date (UTC).
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid --since '{input}', use 30m, 24h, 7d, 2w or a date like 2026-01-31"
        ))
    };
    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }
    let span = match unit {
        'm' => chrono::Duration::try_minutes(amount),
        'h' => chrono::Duration::try_hours(amount),
        'd' => chrono::Duration::try_days(amount),
        'w' => chrono::Duration::try_weeks(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Utc::now().checked_sub_signed(span).ok_or_else(invalid)
}

/// Print events as a table with a one-line summary underneath.
fn print_events(events: &[AuditEvent]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When (UTC)", "Action", "Credentials", "Details"]);

    for event in events {
        table.add_row(vec![
            event.at.format("%Y-%m-%d %H:%M:%S").to_string(),
            styled_op(event.op),
            event.entries.as_deref().unwrap_or("-").replace(',', ", "),
            event.details.as_deref().unwrap_or("-").to_string(),
        ]);
    }
    println!("{table}");

    let exposed = events.iter().filter(|e| e.op.exposes_plaintext()).count();
    let summary = format!("{} event(s)", events.len());
    if exposed > 0 {
        println!(
            "{}, {}",
            summary,
            style(format!("{exposed} put passwords in plaintext (copy/export)")).yellow()
        );
    } else {
        println!("{summary}");
    }
}

fn styled_op(op: AuditOp) -> String {
    use console::style;

    if op.exposes_plaintext() {
        style(op.as_str()).yellow().bold().to_string()
    } else if op == AuditOp::Delete {
        style(op.as_str()).red().to_string()
    } else if op.changes_contents() {
        style(op.as_str()).green().to_string()
    } else {
        style(op.as_str()).cyan().to_string()
    }
}
