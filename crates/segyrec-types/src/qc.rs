//! Cross-check results: contradictions between textual- and binary-derived
//! values, and the record of binary-header patches.

use serde::{Deserialize, Serialize};

use crate::record::Value;

/// How much a disagreement matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The field is essential to correct trace decoding (sample interval,
    /// samples per trace). Eligible for auto-patching.
    Critical,
    /// Worth reporting, never auto-patched.
    Advisory,
}

/// A disagreement between the textual-derived and binary-derived value of
/// one field. Equal values never produce a contradiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Field name in the merged-record vocabulary (e.g. `sample_interval_ms`).
    pub field: String,
    pub textual: Value,
    pub binary: Value,
    pub severity: Severity,
    /// 1-based textual header lines backing the textual value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<u32>,
}

/// One successfully rewritten byte range in the binary header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEntry {
    pub field: String,
    /// Byte offset within the 400-byte buffer.
    pub offset: usize,
    pub before: Vec<u8>,
    pub after: Vec<u8>,
    /// Decoded field value before and after the write.
    pub decoded_before: i64,
    pub decoded_after: i64,
}

/// A patch that could not be applied. Does not abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchFailure {
    pub field: String,
    pub reason: String,
}

/// Outcome of applying a batch of patches to one binary header buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatchResult {
    pub entries: Vec<PatchEntry>,
    pub failures: Vec<PatchFailure>,
    /// True when every eligible patch applied cleanly.
    pub ok: bool,
}

impl PatchResult {
    /// Total bytes rewritten.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.entries.iter().map(|e| e.after.len()).sum()
    }
}
