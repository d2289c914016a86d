//! Integration tests for batch import and export.

use std::fs;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use encoding_rs::GBK;
use passvault::export::{self, ExportFormat};
use passvault::import::{BatchImporter, ImportError};
use passvault::vault::{CredentialEntry, CredentialStore, EntryFields, RequiredField};

fn importer() -> BatchImporter {
    BatchImporter::new()
}

// ---------------------------------------------------------------------------
// Row validation
// ---------------------------------------------------------------------------

#[test]
fn utf8_file_with_one_row() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("list.txt");
    file.write_str("N网,nexusmods.com,user1,pass1\n").unwrap();

    let report = importer().parse(file.path());
    assert!(report.invalid.is_empty());
    assert_eq!(report.valid.len(), 1);

    let e = &report.valid[0];
    assert_eq!(e.website_name(), "N网");
    assert_eq!(e.url(), "https://nexusmods.com");
    assert_eq!(e.username(), "user1");
    assert_eq!(e.password(), "pass1");
    assert_eq!(e.note(), None);
    assert_eq!(e.created_at(), e.updated_at());
}

#[test]
fn full_width_commas_with_note() {
    let report = importer().parse_text("list.txt", "星辰云，xingchenyun.cn，me，secret，备用账号");
    assert_eq!(report.valid.len(), 1);
    let e = &report.valid[0];
    assert_eq!(e.website_name(), "星辰云");
    assert_eq!(e.url(), "https://xingchenyun.cn");
    assert_eq!(e.note(), Some("备用账号"));
}

#[test]
fn short_and_blank_rows_are_reported() {
    let text = "a,b,c\na,,c,d\nGood,good.com,u,p\n";
    let report = importer().parse_text("list.txt", text);

    assert_eq!(report.valid.len(), 1);
    assert_eq!(report.invalid.len(), 2);

    assert_eq!(report.invalid[0].row, 1);
    assert_eq!(report.invalid[0].raw_fields, ["a", "b", "c"]);
    assert_eq!(report.invalid[0].reason, ImportError::TooFewColumns { found: 3 });

    assert_eq!(report.invalid[1].row, 2);
    assert_eq!(
        report.invalid[1].reason,
        ImportError::MissingFields(vec![RequiredField::Url])
    );
}

#[test]
fn every_blank_required_field_is_named() {
    let report = importer().parse_text("list.txt", "Site,,,");
    assert_eq!(
        report.invalid[0].reason,
        ImportError::MissingFields(vec![
            RequiredField::Url,
            RequiredField::Username,
            RequiredField::Password
        ])
    );
    assert_eq!(
        report.invalid[0].reason.to_string(),
        "missing required fields: url, username, password"
    );
}

#[test]
fn full_width_row_keeps_explicit_url() {
    let report = importer().parse_text("list.txt", "星辰云，https://x.cn/，u，p，note");
    assert!(report.invalid.is_empty(), "{:?}", report.invalid);
    let e = &report.valid[0];
    assert_eq!(e.website_name(), "星辰云");
    assert_eq!(e.url(), "https://x.cn/");
    assert_eq!(e.username(), "u");
    assert_eq!(e.password(), "p");
    assert_eq!(e.note(), Some("note"));
}

#[test]
fn explicit_scheme_is_kept() {
    let report = importer().parse_text("list.txt", "Intranet,http://intra.local,u,p");
    assert_eq!(report.valid[0].url(), "http://intra.local");
}

#[test]
fn whitespace_separated_lines() {
    let report = importer().parse_text("list.txt", "GitHub  github.com\toctocat hunter2");
    // A tab is present, so the line splits on tabs only.
    assert_eq!(report.invalid[0].reason, ImportError::TooFewColumns { found: 2 });

    let report = importer().parse_text("list.txt", "GitHub   github.com  octocat   hunter2");
    assert_eq!(report.valid.len(), 1);
    assert_eq!(report.valid[0].password(), "hunter2");
}

#[test]
fn partition_is_deterministic() {
    let text = "A,a.com,u,p\nbroken\nB;b.com;u;p;n\n,,,\n";
    let first = importer().parse_text("l.txt", text);
    let second = importer().parse_text("l.txt", text);

    let fields = |r: &passvault::import::ImportReport| -> Vec<_> {
        r.valid.iter().map(|e| e.fields()).collect()
    };
    assert_eq!(fields(&first), fields(&second));
    assert_eq!(first.invalid, second.invalid);
    // ",,," is all-empty and skipped entirely.
    assert_eq!(first.invalid.len(), 1);
    assert_eq!(first.invalid[0].row, 2);
}

// ---------------------------------------------------------------------------
// Files and encodings
// ---------------------------------------------------------------------------

#[test]
fn gbk_file_is_decoded() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("gbk.txt");
    let (bytes, _, _) = GBK.encode("百度,baidu.com,张三,密码123\n");
    file.write_binary(&bytes).unwrap();

    let report = importer().parse(file.path());
    assert!(report.invalid.is_empty(), "{:?}", report.invalid);
    assert_eq!(report.valid[0].website_name(), "百度");
    assert_eq!(report.valid[0].username(), "张三");
}

#[test]
fn utf16_file_is_decoded() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("utf16.txt");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "网易,163.com,u,p\r\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    file.write_binary(&bytes).unwrap();

    let report = importer().parse(file.path());
    assert_eq!(report.valid.len(), 1);
    assert_eq!(report.valid[0].website_name(), "网易");
}

#[test]
fn undecodable_file_is_one_row_zero_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("junk.txt");
    file.write_binary(&[0xFF, 0xFF, 0xFF]).unwrap();

    let report = importer().parse(file.path());
    assert!(report.valid.is_empty());
    assert_eq!(report.invalid.len(), 1);
    assert_eq!(report.invalid[0].row, 0);
    assert_eq!(report.invalid[0].reason, ImportError::Encoding);
}

#[test]
fn missing_file_is_one_row_zero_error() {
    let dir = TempDir::new().unwrap();
    let report = importer().parse(&dir.path().join("absent.csv"));
    assert_eq!(report.invalid.len(), 1);
    assert_eq!(report.invalid[0].row, 0);
    assert!(matches!(report.invalid[0].reason, ImportError::Read(_)));
}

#[test]
fn csv_file_with_header_and_quotes() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("export.csv");
    file.write_str(
        "website,url,username,password,note\n\
         \"Acme, Inc\",acme.com,me,\"p,w\",\n\
         # comment\n\
         Beta,beta.io,you,pw2,remember me\n",
    )
    .unwrap();

    let report = importer().parse(file.path());
    assert!(report.invalid.is_empty(), "{:?}", report.invalid);
    assert_eq!(report.valid.len(), 2);
    assert_eq!(report.valid[0].website_name(), "Acme, Inc");
    assert_eq!(report.valid[0].password(), "p,w");
    assert_eq!(report.valid[1].note(), Some("remember me"));
}

#[test]
fn csv_file_keeps_password_spaces() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("spaces.csv");
    file.write_str("A,a.com,u,\"  secret  \"\n").unwrap();

    let report = importer().parse(file.path());
    assert!(report.invalid.is_empty(), "{:?}", report.invalid);
    assert_eq!(report.valid[0].password(), "  secret  ");
    assert_eq!(report.valid[0].url(), "https://a.com");
}

#[test]
fn labeled_text_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("passwords.txt");
    file.write_str(
        "网站名：哔哩哔哩\n网址：bilibili.com\n账号：up主\n密码：666\n\
         --------------------------------------------------\n\
         Website: GitHub\nURL: github.com\nUsername: octocat\n\
         --------------------------------------------------\n",
    )
    .unwrap();

    let report = importer().parse(file.path());
    assert_eq!(report.valid.len(), 1);
    assert_eq!(report.valid[0].website_name(), "哔哩哔哩");
    assert_eq!(report.invalid.len(), 1);
    assert_eq!(report.invalid[0].row, 2);
    assert_eq!(
        report.invalid[0].reason,
        ImportError::MissingFields(vec![RequiredField::Password])
    );
}

#[test]
fn preview_from_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.child("many.txt");
    let mut text: String = (0..25).map(|i| format!("Site{i},s{i}.com,u,p\n")).collect();
    text.push_str("bad row\n");
    file.write_str(&text).unwrap();

    let preview = importer().get_preview(file.path(), 10);
    assert_eq!(preview.entries.len(), 10);
    assert_eq!(preview.total_valid, 25);
    assert_eq!(preview.invalid.len(), 1);
    assert_eq!(preview.entries[0].website_name(), "Site0");
}

// ---------------------------------------------------------------------------
// Export round trip
// ---------------------------------------------------------------------------

#[test]
fn export_then_import_both_formats() {
    let dir = TempDir::new().unwrap();
    let source = importer().parse_text(
        "seed.txt",
        "GitHub,github.com,octocat,\"quoted\"\n星辰云，x.cn，我，密码，note with, comma\n",
    );
    assert_eq!(source.valid.len(), 2, "{:?}", source.invalid);

    let mut store = CredentialStore::new();
    store.extend(source.valid).unwrap();
    // A leading '#' would read as a comment line if left unquoted.
    store
        .add(
            CredentialEntry::new(EntryFields {
                website_name: "#1 Bank".into(),
                url: "bank.example".into(),
                username: "me".into(),
                password: "pin".into(),
                note: String::new(),
            })
            .unwrap(),
        )
        .unwrap();
    let vault = dir.path().join("passwords.vault");

    for (name, format) in [("out.csv", ExportFormat::Csv), ("out.txt", ExportFormat::Text)] {
        let dest = dir.path().join(name);
        assert_eq!(export::export_to(&store, &dest, format, &vault).unwrap(), 3);

        let report = importer().parse(&dest);
        assert!(report.invalid.is_empty(), "{name}: {:?}", report.invalid);
        let original: Vec<_> = store.iter().map(|e| e.fields()).collect();
        let reimported: Vec<_> = report.valid.iter().map(|e| e.fields()).collect();
        assert_eq!(original, reimported, "{name}");
    }

    assert!(fs::metadata(dir.path().join("out.csv")).unwrap().len() > 0);
}

#[test]
fn export_refuses_to_overwrite_vault() {
    let dir = TempDir::new().unwrap();
    let vault = dir.path().join("passwords.vault");
    fs::write(&vault, b"{}").unwrap();

    let result = export::export_to(&CredentialStore::new(), &vault, ExportFormat::Csv, &vault);
    assert!(result.is_err());
    assert_eq!(fs::read(&vault).unwrap(), b"{}");
}
