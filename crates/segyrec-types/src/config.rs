//! Pipeline configuration.
//!
//! Configuration is an explicit value threaded through each call, never
//! process-wide state, so pipelines for different files can run with
//! different settings concurrently without interference.

use serde::{Deserialize, Serialize};

/// Byte order used to decode (and re-encode) binary header fields.
///
/// SEG-Y Rev1 mandates big-endian; enough writers violate the standard that
/// the choice is a configuration option, and the chosen order is echoed in
/// [`crate::BinaryHeader`] for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    #[default]
    Big,
    Little,
}

/// Which binary-header layout table to decode with.
///
/// The tables are versioned constant data (see `segyrec-binary`); new
/// revisions are added as tables, never as changes to decode logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutRevision {
    Rev0,
    #[default]
    Rev1,
    Rev2,
}

/// Which header source is authoritative when auto-patching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustDirection {
    /// The textual header is authoritative: critical contradictions rewrite
    /// the binary buffer to match it.
    #[default]
    Textual,
    /// The binary header is authoritative: nothing is rewritten.
    Binary,
}

/// Configuration surface recognized by the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Consider external-extractor values during the merge.
    pub use_external_extractor: bool,
    pub binary_endianness: Endianness,
    pub patch_trust_direction: TrustDirection,
    pub layout_revision: LayoutRevision,
}
