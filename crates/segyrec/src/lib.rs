//! SEG-Y header reconciliation.
//!
//! Legacy SEG-Y files routinely carry a textual header that disagrees with
//! the binary header next to it. This crate decodes both, extracts
//! confidence-scored fields from the free text, detects contradictions,
//! optionally patches the binary buffer from the textual values, and infers
//! ranked coordinate-reference-system candidates from whatever cues the
//! text drops.
//!
//! The sub-crates are re-exported so most callers only depend on this one:
//!
//! ```
//! use segyrec::{reconcile, PipelineConfig};
//!
//! let textual = vec![b' '; 3200];
//! let report = reconcile(&textual, None, PipelineConfig::default())?;
//! assert!(report.binary.is_none());
//! # Ok::<(), segyrec::SegyError>(())
//! ```

pub mod pipeline;

pub use pipeline::{reconcile, Pipeline, Report};

pub use segyrec_binary::{apply_patches, decode_binary};
pub use segyrec_crs::{solve as solve_crs, CueWeights};
pub use segyrec_error::{Result, SegyError};
pub use segyrec_extract::{merge_candidates, run_baseline, ExternalExtractor, NullExtractor};
pub use segyrec_qc::detect_contradictions;
pub use segyrec_text::read_textual;
pub use segyrec_types::{
    BinaryHeader, Contradiction, CrsCandidate, CrsSolution, Endianness, FieldValue, HeaderRecord,
    LayoutRevision, PatchResult, PipelineConfig, Severity, Source, TextEncoding, TextualHeader,
    TrustDirection, Value,
};
