//! Encoding detection for the 3200-byte textual header.
//!
//! Both candidate encodings are tried, each decoding is scored by a
//! printability-plus-structure heuristic, and the highest score wins, with
//! ties broken by fixed priority (ASCII first). Detection fails only when
//! neither candidate clears the minimum printable-content bar; callers must
//! treat that as "header unreadable", not as a field-level parse failure.

use segyrec_error::{Result, SegyError};
use segyrec_types::{TextEncoding, TEXTUAL_HEADER_BYTES, TEXTUAL_LINES, TEXTUAL_LINE_WIDTH};
use tracing::debug;

use crate::cp037;

/// Minimum printable-character ratio for a decoding to be considered
/// readable at all.
const MIN_PRINTABLE_RATIO: f64 = 0.60;

/// Field labels that appear in virtually every real textual header. Each
/// hit adds a small structural bonus to the candidate's score.
const STRUCTURAL_LABELS: [&str; 6] = ["CLIENT", "COMPANY", "SURVEY", "SAMPLE", "RECORD", "SEG"];

#[derive(Debug, Clone, Copy)]
struct CandidateScore {
    printable_ratio: f64,
    score: f64,
}

/// Pick the encoding of a 3200-byte textual header.
pub fn detect_encoding(raw: &[u8]) -> Result<TextEncoding> {
    if raw.len() < TEXTUAL_HEADER_BYTES {
        return Err(SegyError::truncated_textual(raw.len()));
    }
    let raw = &raw[..TEXTUAL_HEADER_BYTES];

    // ASCII is disqualified outright by any high byte; EBCDIC always
    // decodes (CP037 is total) and competes on score alone.
    let ascii = if raw.iter().all(|&b| b < 0x80) {
        Some(score_decoding(raw.iter().map(|&b| b as char)))
    } else {
        None
    };
    let ebcdic = score_decoding(raw.iter().map(|&b| cp037::decode_byte(b)));

    if let Some(a) = ascii {
        debug!(
            ascii_score = a.score,
            ebcdic_score = ebcdic.score,
            "textual encoding candidates scored"
        );
    } else {
        debug!(
            ebcdic_score = ebcdic.score,
            "high bytes present, ascii disqualified"
        );
    }

    // Ties go to ASCII by fixed priority.
    match ascii {
        Some(a) if a.printable_ratio >= MIN_PRINTABLE_RATIO && a.score >= ebcdic.score => {
            Ok(TextEncoding::Ascii)
        }
        _ if ebcdic.printable_ratio >= MIN_PRINTABLE_RATIO => Ok(TextEncoding::Ebcdic),
        Some(a) if a.printable_ratio >= MIN_PRINTABLE_RATIO => Ok(TextEncoding::Ascii),
        _ => Err(SegyError::Decode {
            attempted: format!("{}, {}", TextEncoding::Ascii.tag(), TextEncoding::Ebcdic.tag()),
            detail: format!(
                "no candidate reached printable ratio {MIN_PRINTABLE_RATIO}: ascii={}, ebcdic={:.3}",
                ascii.map_or_else(|| "n/a".to_owned(), |a| format!("{:.3}", a.printable_ratio)),
                ebcdic.printable_ratio
            ),
        }),
    }
}

fn score_decoding(chars: impl Iterator<Item = char>) -> CandidateScore {
    let text: Vec<char> = chars.collect();
    let printable = text.iter().filter(|ch| (' '..='~').contains(*ch)).count();
    let printable_ratio = if text.is_empty() {
        0.0
    } else {
        printable as f64 / text.len() as f64
    };

    // Card-image marker: conventional headers start each line with `C`.
    // Indexing is per character; one decoded char per input byte.
    let marker_lines = (0..TEXTUAL_LINES)
        .filter(|i| text.get(i * TEXTUAL_LINE_WIDTH) == Some(&'C'))
        .count();
    let marker_bonus = marker_lines as f64 / TEXTUAL_LINES as f64 * 0.5;

    let flat: String = text.iter().collect();
    let label_bonus = STRUCTURAL_LABELS
        .iter()
        .filter(|label| flat.contains(*label))
        .count() as f64
        * 0.05;

    CandidateScore {
        printable_ratio,
        score: printable_ratio + marker_bonus + label_bonus.min(0.3),
    }
}
