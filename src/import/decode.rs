//! Text decoding for import files of unknown encoding.
//!
//! Candidates are tried in a fixed order and the first one that decodes
//! the whole input without a malformed sequence wins.  A decode that
//! yields NUL characters is also treated as a failure: that is what
//! UTF-16 text looks like when read as UTF-8 or GBK.

use std::borrow::Cow;

use encoding_rs::{Encoding, GBK, UTF_16BE, UTF_16LE, UTF_8};

/// A text encoding the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// GBK (also covers GB2312 input).
    Gbk,
    /// UTF-16, big-endian if a BE byte-order mark is present, else little-endian.
    Utf16,
}

/// Decoding order.
pub const CANDIDATES: [TextEncoding; 3] = [TextEncoding::Utf8, TextEncoding::Gbk, TextEncoding::Utf16];

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Gbk => "GBK",
            TextEncoding::Utf16 => "UTF-16",
        }
    }

    /// Decode `bytes` strictly; `None` on any malformed input.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let (text, malformed) = match self {
            TextEncoding::Utf8 => UTF_8.decode_with_bom_removal(bytes),
            TextEncoding::Gbk => GBK.decode_without_bom_handling(bytes),
            TextEncoding::Utf16 => utf16_for(bytes).decode_with_bom_removal(bytes),
        };
        if malformed || has_nul(&text, self) {
            None
        } else {
            Some(text.into_owned())
        }
    }
}

fn utf16_for(bytes: &[u8]) -> &'static Encoding {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        UTF_16BE
    } else {
        UTF_16LE
    }
}

fn has_nul(text: &Cow<'_, str>, encoding: TextEncoding) -> bool {
    encoding != TextEncoding::Utf16 && text.contains('\0')
}

/// Decode with the first candidate that accepts the input.
pub fn decode_text(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    CANDIDATES
        .into_iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (text, encoding)))
}

/// Human-readable list of supported encodings, for error messages.
pub fn supported_names() -> String {
    CANDIDATES
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_wins_and_bom_is_removed() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("星辰云,x.cn,u,p".as_bytes());
        let (text, enc) = decode_text(&bytes).unwrap();
        assert_eq!(enc, TextEncoding::Utf8);
        assert_eq!(text, "星辰云,x.cn,u,p");
    }

    #[test]
    fn gbk_fallback() {
        let (bytes, _, _) = GBK.encode("网站,b.com,账号,密码");
        let (text, enc) = decode_text(&bytes).unwrap();
        assert_eq!(enc, TextEncoding::Gbk);
        assert_eq!(text, "网站,b.com,账号,密码");
    }

    #[test]
    fn utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "a,b,c,d".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (text, enc) = decode_text(&bytes).unwrap();
        assert_eq!(enc, TextEncoding::Utf16);
        assert_eq!(text, "a,b,c,d");
    }

    #[test]
    fn utf16be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "网,b,c,d".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        let (text, _) = decode_text(&bytes).unwrap();
        assert_eq!(text, "网,b,c,d");
    }

    #[test]
    fn undecodable_input() {
        // 0xFF is not valid in UTF-8 or GBK; an odd length is not UTF-16.
        assert!(decode_text(&[0xFF, 0xFF, 0xFF]).is_none());
    }
}
