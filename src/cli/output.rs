//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::import::{ImportPreview, InvalidRow};
use crate::vault::CredentialEntry;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print entries as a table (#, ID, Website, URL, Username, Updated).
///
/// `positions` are the 1-based display positions matching `entries`.
pub fn print_entries_table(entries: &[(usize, &CredentialEntry)]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "ID", "Website", "URL", "Username", "Updated"]);

    for (position, e) in entries {
        table.add_row(vec![
            position.to_string(),
            e.short_id(),
            e.website_name().to_string(),
            e.url().to_string(),
            e.username().to_string(),
            e.updated_at().format(TIME_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print one entry as a two-column table.  The password is masked
/// unless `show_password` is set.
pub fn print_entry(entry: &CredentialEntry, show_password: bool) {
    let password = if show_password {
        entry.password().to_string()
    } else {
        "\u{2022}".repeat(8)
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["ID".to_string(), entry.id().to_string()]);
    table.add_row(vec!["Website".to_string(), entry.website_name().to_string()]);
    table.add_row(vec!["URL".to_string(), entry.url().to_string()]);
    table.add_row(vec!["Username".to_string(), entry.username().to_string()]);
    table.add_row(vec!["Password".to_string(), password]);
    table.add_row(vec![
        "Note".to_string(),
        entry.note().unwrap_or("-").to_string(),
    ]);
    table.add_row(vec![
        "Created".to_string(),
        entry.created_at().format(TIME_FORMAT).to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        entry.updated_at().format(TIME_FORMAT).to_string(),
    ]);

    println!("{table}");
}

/// Print the import preview: the first valid rows, then every rejected row.
pub fn print_import_preview(preview: &ImportPreview) {
    if !preview.entries.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Website", "URL", "Username", "Note"]);
        for e in &preview.entries {
            table.add_row(vec![
                e.website_name(),
                e.url(),
                e.username(),
                e.note().unwrap_or(""),
            ]);
        }
        println!(
            "{}",
            style(format!(
                "Showing {} of {} valid entries:",
                preview.entries.len(),
                preview.total_valid
            ))
            .bold()
        );
        println!("{table}");
    }

    if !preview.invalid.is_empty() {
        print_invalid_rows(&preview.invalid);
    }
}

fn print_invalid_rows(rows: &[InvalidRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Row", "Problem", "Website"]);
    for row in rows {
        let row_label = if row.row == 0 {
            "file".to_string()
        } else {
            row.row.to_string()
        };
        // Only the first cell is shown; later cells may hold a password.
        let website = row.raw_fields.first().map(String::as_str).unwrap_or("-");
        table.add_row(vec![row_label, row.reason.to_string(), website.to_string()]);
    }

    println!(
        "{}",
        style(format!("{} rows skipped:", rows.len())).yellow().bold()
    );
    println!("{table}");
}
