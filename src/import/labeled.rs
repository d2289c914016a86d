//! Labeled-block text format.
//!
//! ```text
//! Website: GitHub
//! URL: https://github.com
//! Username: octocat
//! Password: hunter2
//! Note: work account
//! --------------------------------------------------
//! 网站名：星辰云
//! 网址：x.cn
//! ...
//! ```
//!
//! Labels are matched case-insensitively in English or Chinese, with an
//! ASCII or full-width colon.  A line starting with `---` ends a block.
//! Lines without a known label are returned as they are, so the importer
//! can report them.

/// Column index for each recognised label.
const LABELS: &[(&str, usize)] = &[
    ("website", 0),
    ("website name", 0),
    ("网站名", 0),
    ("网站", 0),
    ("url", 1),
    ("网址", 1),
    ("username", 2),
    ("账号", 2),
    ("password", 3),
    ("密码", 3),
    ("note", 4),
    ("notes", 4),
    ("备注", 4),
];

/// Number of columns in a block row.
pub const BLOCK_COLUMNS: usize = 5;

/// Separator written between blocks by the exporter.
pub const SEPARATOR: &str = "--------------------------------------------------";

fn is_separator(line: &str) -> bool {
    line.starts_with("---")
}

/// Split `Label: value` into (column, value).  `None` if the label is unknown.
fn parse_label_line(line: &str) -> Option<(usize, &str)> {
    let colon = line.find(|c: char| c == ':' || c == '：')?;
    let label = line[..colon].trim().to_lowercase();
    let rest = &line[colon..];
    let value = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('：'))
        .unwrap_or(rest);

    LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, column)| (*column, value.trim()))
}

/// Whether the first line opens a labeled block.
pub fn looks_labeled(lines: &[&str]) -> bool {
    lines
        .iter()
        .find(|line| !is_separator(line))
        .is_some_and(|line| parse_label_line(line).is_some())
}

/// One item of a labeled file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRow {
    /// A block's cells, `[site, url, user, pass, note]`.
    Block(Vec<String>),
    /// A line with no recognised label.
    Unlabeled(String),
}

/// Turn filtered lines into blocks and stray lines.
///
/// A block sits at the position of its first labeled line, so stray
/// lines inside a block are numbered after it.
pub fn parse_blocks(lines: &[&str]) -> Vec<BlockRow> {
    let mut rows = Vec::new();
    let mut open: Option<usize> = None;

    for line in lines {
        if is_separator(line) {
            open = None;
            continue;
        }
        let Some((column, value)) = parse_label_line(line) else {
            rows.push(BlockRow::Unlabeled(line.to_string()));
            continue;
        };
        let index = *open.get_or_insert_with(|| {
            rows.push(BlockRow::Block(vec![String::new(); BLOCK_COLUMNS]));
            rows.len() - 1
        });
        if let BlockRow::Block(cells) = &mut rows[index] {
            cells[column] = value.to_string();
        }
    }
    rows
}
