//! Candidate merge policy.
//!
//! Baseline candidates arrive in registry order; external candidates are
//! considered after them when the external extractor is enabled. A later
//! candidate displaces the current winner only with strictly higher
//! confidence, so on equal confidence the earlier-added value stands.
//! Every candidate is recorded in the audit trail regardless of outcome.

use std::collections::BTreeMap;

use segyrec_types::{AuditEntry, FieldValue, HeaderRecord, Source};
use tracing::debug;

/// Merge baseline and (optionally) external candidates into the final
/// per-field record.
///
/// External values are ignored entirely when `use_external` is false; they
/// do not even enter the audit trail, since the extractor was never
/// consulted.
#[must_use]
pub fn merge_candidates(
    baseline: Vec<(String, FieldValue)>,
    external: Option<BTreeMap<String, FieldValue>>,
    use_external: bool,
) -> HeaderRecord {
    let mut record = HeaderRecord::default();

    for (field, candidate) in baseline {
        consider(&mut record, field, candidate);
    }
    if use_external {
        if let Some(external) = external {
            for (field, mut candidate) in external {
                candidate.source = Source::External;
                consider(&mut record, field, candidate);
            }
        }
    }
    record
}

fn consider(record: &mut HeaderRecord, field: String, candidate: FieldValue) {
    let accepted = match record.fields.get(&field) {
        Some(current) => candidate.confidence > current.confidence,
        None => true,
    };
    if accepted {
        debug!(
            field = field.as_str(),
            confidence = candidate.confidence,
            "merge: candidate accepted"
        );
        // The displaced value stays in the audit trail; flip its flag so
        // the trail names exactly one winner per field.
        for entry in record.audit.iter_mut().filter(|e| e.field == field) {
            entry.accepted = false;
        }
        record.fields.insert(field.clone(), candidate.clone());
    }
    record.audit.push(AuditEntry {
        field,
        candidate,
        accepted,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use segyrec_types::Value;

    fn fv(value: i64, confidence: f64, rule: &str) -> FieldValue {
        FieldValue::new(Value::Int(value), confidence, Source::rule(rule))
    }

    #[test]
    fn higher_confidence_external_wins_when_enabled() {
        let baseline = vec![("samples_per_trace".to_owned(), fv(1500, 0.4, "weak"))];
        let mut external = BTreeMap::new();
        external.insert("samples_per_trace".to_owned(), fv(1501, 0.9, "ignored"));

        let record = merge_candidates(baseline, Some(external), true);
        let winner = record.get("samples_per_trace").unwrap();
        assert_eq!(winner.value, Value::Int(1501));
        assert_eq!(winner.source, Source::External);
        // Both attempts are on the audit trail.
        assert_eq!(record.audit_for("samples_per_trace").count(), 2);
    }

    #[test]
    fn external_ignored_when_disabled() {
        let baseline = vec![("samples_per_trace".to_owned(), fv(1500, 0.4, "weak"))];
        let mut external = BTreeMap::new();
        external.insert("samples_per_trace".to_owned(), fv(1501, 0.9, "ignored"));

        let record = merge_candidates(baseline, Some(external), false);
        assert_eq!(
            record.get("samples_per_trace").unwrap().value,
            Value::Int(1500)
        );
        assert_eq!(record.audit.len(), 1);
    }

    #[test]
    fn equal_confidence_keeps_earlier_candidate() {
        let baseline = vec![
            ("client".to_owned(), fv(1, 0.7, "first")),
            ("client".to_owned(), fv(2, 0.7, "second")),
        ];
        let record = merge_candidates(baseline, None, true);
        assert_eq!(record.get("client").unwrap().value, Value::Int(1));
    }

    #[test]
    fn audit_names_exactly_one_winner() {
        let baseline = vec![
            ("si".to_owned(), fv(4, 0.7, "weak")),
            ("si".to_owned(), fv(4, 0.9, "strong")),
        ];
        let record = merge_candidates(baseline, None, false);
        let accepted: Vec<_> = record.audit_for("si").filter(|e| e.accepted).collect();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].candidate.source, Source::rule("strong"));
    }

    #[test]
    fn lower_confidence_external_loses() {
        let baseline = vec![("area".to_owned(), fv(1, 0.8, "baseline"))];
        let mut external = BTreeMap::new();
        external.insert("area".to_owned(), fv(2, 0.8, "x"));
        let record = merge_candidates(baseline, Some(external), true);
        let winner = record.get("area").unwrap();
        assert_eq!(winner.value, Value::Int(1));
        // The losing external attempt is still auditable.
        assert!(record
            .audit_for("area")
            .any(|e| e.candidate.source == Source::External && !e.accepted));
    }
}
