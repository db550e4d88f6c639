//! The end-to-end reconciliation pipeline.
//!
//! Raw header bytes in, full [`Report`] out: textual decode, field
//! extraction and merge, optional binary decode with contradiction
//! detection and patching, and CRS inference. Configuration is an explicit
//! value threaded through the call; there is no process-wide state, so
//! pipelines for different files run independently.

use segyrec_crs::CueWeights;
use segyrec_error::Result;
use segyrec_extract::{merge_candidates, run_baseline, ExternalExtractor, NullExtractor};
use segyrec_types::{
    BinaryHeader, Contradiction, CrsSolution, FieldValue, HeaderRecord, PatchResult,
    PipelineConfig, Source, TextualHeader, Value,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything one file's reconciliation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub textual: TextualHeader,
    pub record: HeaderRecord,
    /// Absent when no binary header bytes were supplied.
    pub binary: Option<BinaryHeader>,
    pub contradictions: Vec<Contradiction>,
    /// Absent when there was no binary header to check against.
    pub patches: Option<PatchResult>,
    pub crs: CrsSolution,
}

/// A configured reconciliation pipeline.
///
/// The external extractor defaults to [`NullExtractor`]; the CRS weights
/// default to the standard set.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    weights: CueWeights,
    external: &'a dyn ExternalExtractor,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            weights: CueWeights::default(),
            external: &NullExtractor,
        }
    }

    #[must_use]
    pub fn with_external(mut self, external: &'a dyn ExternalExtractor) -> Self {
        self.external = external;
        self
    }

    #[must_use]
    pub fn with_crs_weights(mut self, weights: CueWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Run the full pipeline over one file's header bytes.
    ///
    /// `binary_raw` may be absent; the textual side still runs in full and
    /// the contradiction/patch stages are skipped.
    pub fn run(&self, textual_raw: &[u8], binary_raw: Option<&[u8]>) -> Result<Report> {
        let textual = segyrec_text::read_textual(textual_raw)?;

        let baseline = run_baseline(&textual);
        // The extractor is only consulted when the configuration enables
        // it; a disabled extractor is never even called.
        let external = if self.config.use_external_extractor {
            self.external.extract(&textual)
        } else {
            None
        };
        let mut record =
            merge_candidates(baseline, external, self.config.use_external_extractor);
        derive_record_length(&mut record);

        let crs = segyrec_crs::solve(&textual, &self.weights);

        let (binary, contradictions, patches) = match binary_raw {
            Some(raw) => {
                let mut binary = segyrec_binary::decode_binary(
                    raw,
                    self.config.binary_endianness,
                    self.config.layout_revision,
                )?;
                let contradictions = segyrec_qc::detect_contradictions(&record, &binary);
                let patches = segyrec_binary::apply_patches(
                    &mut binary,
                    &contradictions,
                    self.config.patch_trust_direction,
                );
                (Some(binary), contradictions, Some(patches))
            }
            None => (None, Vec::new(), None),
        };

        info!(
            fields = record.fields.len(),
            contradictions = contradictions.len(),
            crs_candidates = crs.candidates.len(),
            "reconciliation complete"
        );
        Ok(Report {
            textual,
            record,
            binary,
            contradictions,
            patches,
            crs,
        })
    }
}

/// Run with a given configuration and no external extractor.
pub fn reconcile(
    textual_raw: &[u8],
    binary_raw: Option<&[u8]>,
    config: PipelineConfig,
) -> Result<Report> {
    Pipeline::new(config).run(textual_raw, binary_raw)
}

/// When the header states a sample interval and a trace length in samples
/// but no record length, derive it: length_ms = interval_ms × samples.
/// The derived value can only be as trustworthy as its weakest input.
fn derive_record_length(record: &mut HeaderRecord) {
    if record.fields.contains_key("record_length_ms") {
        return;
    }
    let Some(interval) = record.get("sample_interval_ms") else {
        return;
    };
    let Some(samples) = record.get("samples_per_trace") else {
        return;
    };
    let (Some(interval_ms), Some(count)) = (interval.value.as_f64(), samples.value.as_i64())
    else {
        return;
    };

    let length_ms = interval_ms * count as f64;
    let confidence = interval.confidence.min(samples.confidence);
    let mut lines: Vec<u32> = interval.lines.clone();
    for line in &samples.lines {
        if !lines.contains(line) {
            lines.push(*line);
        }
    }
    let mut value = FieldValue::new(
        value_from(length_ms),
        confidence,
        Source::rule("record-length-derived"),
    );
    value.lines = lines;
    debug!(length_ms, confidence, "record length derived");

    let entry = segyrec_types::AuditEntry {
        field: "record_length_ms".to_owned(),
        candidate: value.clone(),
        accepted: true,
    };
    record.fields.insert("record_length_ms".to_owned(), value);
    record.audit.push(entry);
}

fn value_from(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        Value::Int(v as i64)
    } else {
        Value::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segyrec_types::Severity;

    fn textual(lines: &[&str]) -> Vec<u8> {
        let mut raw = Vec::with_capacity(3200);
        for line in lines {
            raw.extend_from_slice(format!("{line:<80}").as_bytes());
        }
        raw.resize(3200, b' ');
        raw
    }

    fn binary_with_interval(us: u16, samples: u16) -> Vec<u8> {
        let mut raw = vec![0u8; 400];
        raw[16..18].copy_from_slice(&us.to_be_bytes());
        raw[20..22].copy_from_slice(&samples.to_be_bytes());
        raw
    }

    #[test]
    fn agreeing_headers_reconcile_cleanly() {
        let text = textual(&["C12 SAMPLE INTERVAL: 4 MS", "C13 SAMPLES/TRACE 1500"]);
        let bin = binary_with_interval(4000, 1500);
        let report = reconcile(&text, Some(&bin), PipelineConfig::default()).unwrap();
        assert!(report.contradictions.is_empty());
        assert!(report.patches.unwrap().entries.is_empty());
    }

    #[test]
    fn disagreement_is_detected_and_patched() {
        let text = textual(&["C12 SAMPLE INTERVAL: 4 MS"]);
        let bin = binary_with_interval(2000, 0);
        let report = reconcile(&text, Some(&bin), PipelineConfig::default()).unwrap();

        let critical: Vec<_> = report
            .contradictions
            .iter()
            .filter(|c| c.severity == Severity::Critical)
            .collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].field, "sample_interval_ms");

        let binary = report.binary.unwrap();
        assert_eq!(&binary.raw[16..18], &4000u16.to_be_bytes());
    }

    #[test]
    fn record_length_is_derived_when_absent() {
        let text = textual(&["C12 SAMPLE INTERVAL: 4 MS", "C13 SAMPLES/TRACE 1500"]);
        let report = reconcile(&text, None, PipelineConfig::default()).unwrap();
        let length = report.record.get("record_length_ms").unwrap();
        assert_eq!(length.value, Value::Int(6000));
        // min(0.9 interval, 0.9 samples)
        assert_eq!(length.confidence, 0.9);
        assert_eq!(length.lines, vec![1, 2]);
    }

    #[test]
    fn explicit_record_length_is_not_overwritten() {
        let text = textual(&[
            "C12 SAMPLE INTERVAL: 4 MS",
            "C13 SAMPLES/TRACE 1500",
            "C14 RECORD LENGTH: 5000 MS",
        ]);
        let report = reconcile(&text, None, PipelineConfig::default()).unwrap();
        assert_eq!(
            report.record.get("record_length_ms").unwrap().value,
            Value::Int(5000)
        );
    }

    #[test]
    fn no_binary_header_skips_qc_stages() {
        let text = textual(&["C12 SAMPLE INTERVAL: 4 MS"]);
        let report = reconcile(&text, None, PipelineConfig::default()).unwrap();
        assert!(report.binary.is_none());
        assert!(report.patches.is_none());
        assert!(report.contradictions.is_empty());
    }
}
