//! Textual-header decoding: encoding detection plus the fixed 40×80 line
//! reader.
//!
//! The only hard failures here are `Decode` (unreadable under every
//! supported encoding) and `TruncatedHeader`; everything downstream treats
//! the resulting [`segyrec_types::TextualHeader`] as immutable.

pub mod cp037;
pub mod detect;
pub mod reader;

pub use detect::detect_encoding;
pub use reader::{decode_textual, encode_textual};

use segyrec_error::Result;
use segyrec_types::TextualHeader;

/// Detect the encoding of `raw` and decode it in one step.
pub fn read_textual(raw: &[u8]) -> Result<TextualHeader> {
    let encoding = detect_encoding(raw)?;
    decode_textual(raw, encoding)
}
