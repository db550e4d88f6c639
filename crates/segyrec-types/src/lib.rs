//! Core type definitions for SEG-Y header reconciliation.
//!
//! Everything here is plain data: decoded headers, confidence-scored field
//! values with provenance, contradictions, patch results, and CRS
//! candidates. The algorithms that produce these live in the sibling crates
//! (`segyrec-text`, `segyrec-binary`, `segyrec-extract`, `segyrec-qc`,
//! `segyrec-crs`).

pub mod config;
pub mod crs;
pub mod header;
pub mod qc;
pub mod record;

pub use config::{Endianness, LayoutRevision, PipelineConfig, TrustDirection};
pub use crs::{CrsCandidate, CrsDiagnostics, CrsSolution, MatchedCue};
pub use header::{BinaryHeader, TextEncoding, TextualHeader, TEXTUAL_HEADER_BYTES, TEXTUAL_LINES, TEXTUAL_LINE_WIDTH, BINARY_HEADER_BYTES};
pub use qc::{Contradiction, PatchEntry, PatchFailure, PatchResult, Severity};
pub use record::{AuditEntry, FieldValue, HeaderRecord, Source, Span, Value};
