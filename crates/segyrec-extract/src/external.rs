//! Optional external extractor seam.
//!
//! The pipeline can consult a second, typically higher-quality extractor
//! (an NLP service, a vendor library) alongside the baseline matchers. The
//! trait keeps that integration behind a seam so the merge policy can be
//! tested without a live backend.

use std::collections::BTreeMap;

use segyrec_types::{FieldValue, TextualHeader};

/// A pluggable secondary extractor.
///
/// Returning `None` means the extractor was unavailable or produced
/// nothing; the pipeline proceeds on baseline results alone.
pub trait ExternalExtractor: Send + Sync {
    fn extract(&self, header: &TextualHeader) -> Option<BTreeMap<String, FieldValue>>;
}

/// The default extractor: never produces anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExtractor;

impl ExternalExtractor for NullExtractor {
    fn extract(&self, _header: &TextualHeader) -> Option<BTreeMap<String, FieldValue>> {
        None
    }
}
