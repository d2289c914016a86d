//! Splitting import lines into cells.

use csv::{ReaderBuilder, Trim};

/// Header labels accepted per column (lowercase).
const HEADER_LABELS: [&[&str]; 4] = [
    &["website", "website_name", "website name", "name", "site", "title", "网站名", "网站"],
    &["url", "网址", "login_uri"],
    &["username", "user", "account", "login", "账号", "用户名"],
    &["password", "密码"],
];

/// Parse one line as a CSV record with quotes honoured.
///
/// Cell content is kept as written, so leading or trailing spaces in a
/// password survive.  A line the csv reader rejects falls back to a plain
/// comma split.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        Some(Err(_)) => line.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    }
}

/// Split a free-form text line.
///
/// Full-width `，` and `；` count as their ASCII forms.  The first of
/// comma, semicolon and tab present in the line is the delimiter;
/// otherwise the line splits on runs of whitespace.
pub fn split_freeform_line(line: &str) -> Vec<String> {
    let line = line.replace('，', ",").replace('；', ";");

    match [',', ';', '\t'].into_iter().find(|d| line.contains(*d)) {
        Some(delimiter) => line
            .split(delimiter)
            .map(|c| c.trim().to_string())
            .collect(),
        None => line.split_whitespace().map(str::to_string).collect(),
    }
}

/// Whether a row is a column-label header rather than data.
pub fn is_header_row(cells: &[String]) -> bool {
    cells.len() >= HEADER_LABELS.len()
        && HEADER_LABELS
            .iter()
            .zip(cells)
            .all(|(labels, cell)| labels.contains(&cell.trim().to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_and_escapes() {
        let cells = split_csv_line(r#"A,"b, c",u,"p""q""#);
        assert_eq!(cells, ["A", "b, c", "u", "p\"q"]);
    }

    #[test]
    fn csv_keeps_cell_whitespace() {
        let cells = split_csv_line(r#"A,a.com,u,"  secret  ",n"#);
        assert_eq!(cells[3], "  secret  ");
        assert_eq!(split_csv_line("A, a.com ,u,p")[1], " a.com ");
    }

    #[test]
    fn freeform_full_width_comma() {
        let cells = split_freeform_line("Steam，store.steampowered.com，gamer，pw，note");
        assert_eq!(cells, ["Steam", "store.steampowered.com", "gamer", "pw", "note"]);
    }

    #[test]
    fn freeform_delimiter_priority() {
        assert_eq!(split_freeform_line("a;b,c;d"), ["a;b", "c;d"]);
        assert_eq!(split_freeform_line("a;b;c;d"), ["a", "b", "c", "d"]);
        assert_eq!(split_freeform_line("a\tb\tc\td"), ["a", "b", "c", "d"]);
        assert_eq!(split_freeform_line("a  b c   d"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn header_detection() {
        let header: Vec<String> = ["Website", "URL", "Username", "Password", "Note"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(is_header_row(&header));

        let chinese: Vec<String> = ["网站名", "网址", "账号", "密码"].iter().map(|s| s.to_string()).collect();
        assert!(is_header_row(&chinese));

        let data: Vec<String> = ["GitHub", "github.com", "me", "pw"].iter().map(|s| s.to_string()).collect();
        assert!(!is_header_row(&data));
    }
}
