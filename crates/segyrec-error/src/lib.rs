//! Error taxonomy for SEG-Y header reconciliation.
//!
//! Three failure classes exist, and they fail independently:
//! - [`SegyError::Decode`]: the textual header is unreadable under every
//!   supported encoding. Fatal for the textual sub-pipeline of that file.
//! - [`SegyError::TruncatedHeader`]: fewer bytes than the fixed header size.
//!   Fatal only for the reader that observed it.
//! - [`SegyError::Patch`]: a value does not fit the target field's byte
//!   width. Fatal for that single patch; other patches are still attempted.
//!
//! Field-level extraction misses, an absent external extractor, and
//! inconsistent CRS cues are deliberately *not* errors: partial metadata is
//! the expected common case and is modeled as absence or diagnostics.

use thiserror::Error;

/// Convenience alias used across all segyrec crates.
pub type Result<T> = std::result::Result<T, SegyError>;

/// Everything that can go wrong while reading or patching SEG-Y headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegyError {
    /// No supported encoding produced readable text from the 3200-byte
    /// textual header. `attempted` lists the encodings tried, in order.
    #[error("textual header unreadable (tried {attempted}): {detail}")]
    Decode { attempted: String, detail: String },

    /// A fixed-size header region was shorter than its defined size.
    #[error("{header} header truncated: expected {expected} bytes, got {got}")]
    TruncatedHeader {
        header: &'static str,
        expected: usize,
        got: usize,
    },

    /// A patch value cannot be encoded into the target field's byte width.
    #[error("patch for `{field}` does not fit {width}-byte field: value {value}")]
    Patch {
        field: String,
        width: usize,
        value: i64,
    },

    /// An extraction result referenced a field the layout table does not
    /// define (programming error in a caller-supplied table, not file data).
    #[error("unknown binary header field `{field}`")]
    UnknownField { field: String },
}

impl SegyError {
    /// Construct a truncation error for the 3200-byte textual header.
    #[must_use]
    pub const fn truncated_textual(got: usize) -> Self {
        Self::TruncatedHeader {
            header: "textual",
            expected: 3200,
            got,
        }
    }

    /// Construct a truncation error for the 400-byte binary header.
    #[must_use]
    pub const fn truncated_binary(got: usize) -> Self {
        Self::TruncatedHeader {
            header: "binary",
            expected: 400,
            got,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = SegyError::truncated_textual(128);
        assert_eq!(
            err.to_string(),
            "textual header truncated: expected 3200 bytes, got 128"
        );

        let err = SegyError::Patch {
            field: "sample_interval_us".to_owned(),
            width: 2,
            value: 70_000,
        };
        assert!(err.to_string().contains("sample_interval_us"));
        assert!(err.to_string().contains("70000"));
    }
}
