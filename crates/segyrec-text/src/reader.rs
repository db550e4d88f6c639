//! Textual header reader: raw bytes + encoding tag → 40 fixed-width lines.

use segyrec_error::{Result, SegyError};
use segyrec_types::{TextEncoding, TextualHeader, TEXTUAL_HEADER_BYTES, TEXTUAL_LINES, TEXTUAL_LINE_WIDTH};
use tracing::debug;

use crate::cp037;

/// Decode a 3200-byte textual header under the given encoding.
///
/// Lines keep their original whitespace: downstream heuristics may rely on
/// column positions, so nothing is trimmed.
pub fn decode_textual(raw: &[u8], encoding: TextEncoding) -> Result<TextualHeader> {
    if raw.len() < TEXTUAL_HEADER_BYTES {
        return Err(SegyError::truncated_textual(raw.len()));
    }
    let raw = &raw[..TEXTUAL_HEADER_BYTES];

    let mut lines = Vec::with_capacity(TEXTUAL_LINES);
    for chunk in raw.chunks_exact(TEXTUAL_LINE_WIDTH) {
        let mut line = String::with_capacity(TEXTUAL_LINE_WIDTH);
        for &byte in chunk {
            line.push(decode_byte(byte, encoding)?);
        }
        lines.push(line);
    }
    debug!(encoding = encoding.tag(), "textual header decoded");
    Ok(TextualHeader { lines, encoding })
}

/// Re-encode a decoded header under its own encoding.
///
/// For any header produced by [`decode_textual`] this reproduces the
/// original 3200 bytes exactly.
pub fn encode_textual(header: &TextualHeader) -> Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(TEXTUAL_HEADER_BYTES);
    for line in &header.lines {
        for ch in line.chars() {
            raw.push(encode_char(ch, header.encoding)?);
        }
    }
    Ok(raw)
}

fn decode_byte(byte: u8, encoding: TextEncoding) -> Result<char> {
    match encoding {
        TextEncoding::Ascii => {
            if byte < 0x80 {
                Ok(byte as char)
            } else {
                Err(SegyError::Decode {
                    attempted: encoding.tag().to_owned(),
                    detail: format!("byte 0x{byte:02X} is not ASCII"),
                })
            }
        }
        TextEncoding::Ebcdic => Ok(cp037::decode_byte(byte)),
    }
}

fn encode_char(ch: char, encoding: TextEncoding) -> Result<u8> {
    let encoded = match encoding {
        TextEncoding::Ascii => {
            let cp = ch as u32;
            (cp < 0x80).then(|| cp as u8)
        }
        TextEncoding::Ebcdic => cp037::encode_char(ch),
    };
    encoded.ok_or_else(|| SegyError::Decode {
        attempted: encoding.tag().to_owned(),
        detail: format!("character U+{:04X} is not representable", ch as u32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_into_forty_lines_of_eighty() {
        let mut raw = vec![b' '; TEXTUAL_HEADER_BYTES];
        raw[0] = b'C';
        raw[80] = b'C';
        let header = decode_textual(&raw, TextEncoding::Ascii).unwrap();
        assert_eq!(header.lines.len(), TEXTUAL_LINES);
        assert!(header.lines.iter().all(|l| l.chars().count() == TEXTUAL_LINE_WIDTH));
        assert!(header.lines[0].starts_with('C'));
        assert!(header.lines[1].starts_with('C'));
    }

    #[test]
    fn trailing_spaces_are_preserved() {
        let mut raw = vec![b' '; TEXTUAL_HEADER_BYTES];
        raw[..3].copy_from_slice(b"C01");
        let header = decode_textual(&raw, TextEncoding::Ascii).unwrap();
        assert_eq!(header.lines[0].len(), 80);
        assert!(header.lines[0].ends_with(' '));
    }

    #[test]
    fn truncated_input_fails() {
        let err = decode_textual(&[b' '; 3199], TextEncoding::Ascii).unwrap_err();
        assert!(matches!(
            err,
            SegyError::TruncatedHeader {
                expected: 3200,
                got: 3199,
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn ascii_round_trip(bytes in proptest::collection::vec(0x20u8..0x7F, TEXTUAL_HEADER_BYTES)) {
            let header = decode_textual(&bytes, TextEncoding::Ascii).unwrap();
            prop_assert_eq!(encode_textual(&header).unwrap(), bytes);
        }

        #[test]
        fn ebcdic_round_trip(bytes in proptest::collection::vec(any::<u8>(), TEXTUAL_HEADER_BYTES)) {
            let header = decode_textual(&bytes, TextEncoding::Ebcdic).unwrap();
            prop_assert_eq!(encode_textual(&header).unwrap(), bytes);
        }
    }
}
