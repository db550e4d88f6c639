//! Decoded header structures: the 40×80 textual header and the 400-byte
//! binary header.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Endianness, LayoutRevision};

/// Size of the free-text textual header at the start of a SEG-Y file.
pub const TEXTUAL_HEADER_BYTES: usize = 3200;
/// Number of card-image lines in the textual header.
pub const TEXTUAL_LINES: usize = 40;
/// Width of each card-image line, in characters.
pub const TEXTUAL_LINE_WIDTH: usize = 80;
/// Size of the fixed-layout binary header that follows the textual header.
pub const BINARY_HEADER_BYTES: usize = 400;

/// Supported textual header encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// Plain 7-bit ASCII. Wins ties against EBCDIC.
    Ascii,
    /// IBM mainframe EBCDIC, code page 037.
    Ebcdic,
}

impl TextEncoding {
    /// Stable tag used in reports and error messages.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Ebcdic => "ebcdic-cp037",
        }
    }
}

/// The decoded 3200-byte textual header: exactly 40 lines of exactly 80
/// characters, trailing spaces preserved. Immutable once constructed;
/// downstream heuristics may depend on column positions, so no trimming
/// happens here or anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextualHeader {
    /// The 40 decoded lines, each exactly 80 characters.
    pub lines: Vec<String>,
    /// Encoding the raw bytes were decoded under.
    pub encoding: TextEncoding,
}

impl TextualHeader {
    /// Line by 1-based number, the convention used in all provenance
    /// records (SEG-Y card images are labeled C01..C40).
    #[must_use]
    pub fn line(&self, lineno: u32) -> Option<&str> {
        if lineno == 0 {
            return None;
        }
        self.lines.get(lineno as usize - 1).map(String::as_str)
    }
}

/// The decoded 400-byte binary header plus the raw buffer it came from.
///
/// The decoded `fields` view is immutable; `raw` is retained so the patch
/// applier can rewrite individual field byte ranges later. The patch
/// applier is the only writer, and callers own persistence of `raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryHeader {
    /// Decoded integer fields, keyed by layout-table field name.
    pub fields: BTreeMap<String, i64>,
    /// The original 400 bytes, mutated only by the patch applier.
    pub raw: Vec<u8>,
    /// Endianness the buffer was decoded with, retained for auditing.
    pub endianness: Endianness,
    /// Layout revision the field table came from.
    pub revision: LayoutRevision,
}

impl BinaryHeader {
    /// Decoded value of a field, if the layout defines it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_lookup_is_one_based() {
        let header = TextualHeader {
            lines: vec!["A".repeat(80), "B".repeat(80)],
            encoding: TextEncoding::Ascii,
        };
        assert_eq!(header.line(1).unwrap().chars().next(), Some('A'));
        assert_eq!(header.line(2).unwrap().chars().next(), Some('B'));
        assert!(header.line(0).is_none());
        assert!(header.line(3).is_none());
    }
}
