//! Confidence-scored field values with provenance, and the merged header
//! record that keeps every extraction attempt for audit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A typed extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    /// Acquisition dates are recorded at year granularity; the textual
    /// header rarely carries more.
    Year(i32),
}

impl Value {
    /// Numeric view, if the value is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Year(v) => Some(f64::from(*v)),
            Self::Text(_) => None,
        }
    }

    /// Integer view. `Float` values qualify only when they are whole.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Year(v) => Some(i64::from(*v)),
            Self::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Self::Float(_) | Self::Text(_) => None,
        }
    }
}

/// Where a [`FieldValue`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Source {
    /// A baseline heuristic matcher, identified by its stable rule id.
    Rule(String),
    /// The optional external extractor.
    External,
    /// Decoded directly from the binary header.
    BinaryHeader,
}

impl Source {
    #[must_use]
    pub fn rule(id: &str) -> Self {
        Self::Rule(id.to_owned())
    }
}

/// A character span within one textual header line (0-based, half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// 1-based line number (C01..C40).
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

/// A typed value with confidence and provenance.
///
/// Invariant: `source == Source::BinaryHeader` implies `confidence == 1.0`;
/// use [`FieldValue::from_binary`] to uphold it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Value,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub source: Source,
    /// 1-based line numbers the value was read from (empty for binary).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<u32>,
    /// Character spans backing the value, for UI highlighting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<Span>,
    /// Byte range within the 400-byte binary header, for binary-sourced
    /// values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<(u32, u32)>,
}

impl FieldValue {
    /// A value produced by a baseline matcher or the external extractor.
    #[must_use]
    pub fn new(value: Value, confidence: f64, source: Source) -> Self {
        Self {
            value,
            confidence: confidence.clamp(0.0, 1.0),
            source,
            lines: Vec::new(),
            spans: Vec::new(),
            byte_range: None,
        }
    }

    /// A value decoded from the binary header. Always confidence 1.0.
    #[must_use]
    pub fn from_binary(value: Value, byte_range: (u32, u32)) -> Self {
        Self {
            value,
            confidence: 1.0,
            source: Source::BinaryHeader,
            lines: Vec::new(),
            spans: Vec::new(),
            byte_range: Some(byte_range),
        }
    }

    /// Attach a 1-based source line.
    #[must_use]
    pub fn with_line(mut self, lineno: u32) -> Self {
        self.lines.push(lineno);
        self
    }

    /// Attach a character span (also records its line).
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if !self.lines.contains(&span.line) {
            self.lines.push(span.line);
        }
        self.spans.push(span);
        self
    }
}

/// One extraction attempt, kept whether or not it won the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub field: String,
    pub candidate: FieldValue,
    /// Whether this candidate ended up as the field's merged value.
    pub accepted: bool,
}

/// The merged, final per-field record. Read-only after the merger builds it.
///
/// `audit` records every candidate considered, including overridden ones —
/// never discarded, so a reviewer can reconstruct why a value won.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub fields: BTreeMap<String, FieldValue>,
    pub audit: Vec<AuditEntry>,
}

impl HeaderRecord {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Audit entries for one field, in the order they were considered.
    pub fn audit_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a AuditEntry> {
        self.audit.iter().filter(move |e| e.field == field)
    }
}
