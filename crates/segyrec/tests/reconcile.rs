//! End-to-end reconciliation over realistic header pairs.

use std::collections::BTreeMap;

use segyrec::{
    reconcile, ExternalExtractor, FieldValue, Pipeline, PipelineConfig, Severity, Source,
    TextualHeader, TrustDirection, Value,
};

/// Build a 3200-byte ASCII textual header, placing each `(lineno, text)` at
/// its 1-based card position.
fn textual_raw(cards: &[(usize, &str)]) -> Vec<u8> {
    let mut lines = vec![" ".repeat(80); 40];
    for (lineno, text) in cards {
        lines[lineno - 1] = format!("{text:<80}");
    }
    lines.concat().into_bytes()
}

fn binary_raw(interval_us: u16, samples: u16) -> Vec<u8> {
    let mut raw = vec![0u8; 400];
    raw[16..18].copy_from_slice(&interval_us.to_be_bytes());
    raw[20..22].copy_from_slice(&samples.to_be_bytes());
    raw
}

#[test]
fn agreeing_sample_interval_yields_no_contradictions() {
    let text = textual_raw(&[(12, "C12 SAMPLE INTERVAL: 4 MS")]);
    let bin = binary_raw(4000, 0);
    let report = reconcile(&text, Some(&bin), PipelineConfig::default()).unwrap();
    assert!(report.contradictions.is_empty());

    let interval = report.record.get("sample_interval_ms").unwrap();
    assert_eq!(interval.value, Value::Int(4));
    assert_eq!(interval.lines, vec![12]);
}

#[test]
fn conflicting_sample_interval_is_critical_and_patchable() {
    let text = textual_raw(&[(12, "C12 SAMPLE INTERVAL: 4 MS")]);
    let bin = binary_raw(2000, 0);
    let report = reconcile(&text, Some(&bin), PipelineConfig::default()).unwrap();

    assert_eq!(report.contradictions.len(), 1);
    let c = &report.contradictions[0];
    assert_eq!(c.field, "sample_interval_ms");
    assert_eq!(c.severity, Severity::Critical);
    assert_eq!(c.textual, Value::Int(4));
    assert_eq!(c.binary, Value::Int(2));

    // Trust direction is textual by default: the buffer now decodes to
    // 4000 microseconds exactly.
    let binary = report.binary.unwrap();
    assert_eq!(&binary.raw[16..18], &4000u16.to_be_bytes());
    let patches = report.patches.unwrap();
    assert!(patches.ok);
    assert_eq!(patches.entries.len(), 1);
    assert_eq!(patches.entries[0].decoded_after, 4000);
}

#[test]
fn binary_trust_direction_reports_but_never_patches() {
    let text = textual_raw(&[(12, "C12 SAMPLE INTERVAL: 4 MS")]);
    let bin = binary_raw(2000, 0);
    let config = PipelineConfig {
        patch_trust_direction: TrustDirection::Binary,
        ..PipelineConfig::default()
    };
    let report = reconcile(&text, Some(&bin), config).unwrap();

    assert_eq!(report.contradictions.len(), 1);
    let binary = report.binary.unwrap();
    assert_eq!(&binary.raw[16..18], &2000u16.to_be_bytes());
    assert!(report.patches.unwrap().entries.is_empty());
}

#[test]
fn utm_cue_cluster_beats_single_cue_candidates() {
    let text = textual_raw(&[
        (18, "C18 COORDINATES: UTM ZONE 15 NORTH, METERS"),
        (19, "C19 DATUM: WGS84"),
    ]);
    let report = reconcile(&text, None, PipelineConfig::default()).unwrap();

    let best = report.crs.best().unwrap();
    assert_eq!(best.epsg, Some(32615));
    assert_eq!(best.label, "WGS84 / UTM zone 15N");
    // The winner combines UTM, zone, hemisphere, datum, and units; every
    // other candidate is missing at least the datum cue.
    for other in &report.crs.candidates[1..] {
        assert!(best.score > other.score);
        assert!(best.cues.len() > other.cues.len());
    }
}

#[test]
fn crs_solution_is_deterministic() {
    let text = textual_raw(&[
        (18, "C18 UTM ZONE 31"),
        (20, "C20 AREA: NORTH SEA"),
    ]);
    let a = reconcile(&text, None, PipelineConfig::default()).unwrap();
    let b = reconcile(&text, None, PipelineConfig::default()).unwrap();
    assert_eq!(a.crs, b.crs);
}

/// A canned extractor for exercising the merge policy end to end.
struct Canned(BTreeMap<String, FieldValue>);

impl ExternalExtractor for Canned {
    fn extract(&self, _header: &TextualHeader) -> Option<BTreeMap<String, FieldValue>> {
        Some(self.0.clone())
    }
}

#[test]
fn external_extractor_wins_only_when_enabled_and_stronger() {
    let text = textual_raw(&[(2, "C02 CLIENT: NORTHSTAR ENERGY")]);
    let mut canned = BTreeMap::new();
    canned.insert(
        "client".to_owned(),
        FieldValue::new(
            Value::Text("NORTHSTAR ENERGY ASA".to_owned()),
            0.9,
            Source::External,
        ),
    );
    let extractor = Canned(canned);

    let enabled = Pipeline::new(PipelineConfig {
        use_external_extractor: true,
        ..PipelineConfig::default()
    })
    .with_external(&extractor)
    .run(&text, None)
    .unwrap();
    let client = enabled.record.get("client").unwrap();
    assert_eq!(client.source, Source::External);
    assert_eq!(client.value, Value::Text("NORTHSTAR ENERGY ASA".to_owned()));
    // The overridden baseline attempt is still in the audit trail.
    assert_eq!(enabled.record.audit_for("client").count(), 2);

    let disabled = Pipeline::new(PipelineConfig::default())
        .with_external(&extractor)
        .run(&text, None)
        .unwrap();
    let client = disabled.record.get("client").unwrap();
    assert!(matches!(client.source, Source::Rule(_)));
    assert_eq!(client.value, Value::Text("NORTHSTAR ENERGY".to_owned()));
}

#[test]
fn truncated_binary_header_fails_while_textual_side_stands_alone() {
    let text = textual_raw(&[(12, "C12 SAMPLE INTERVAL: 4 MS")]);
    let short = vec![0u8; 399];
    assert!(reconcile(&text, Some(&short), PipelineConfig::default()).is_err());
    // The same textual bytes without a binary header reconcile fine.
    assert!(reconcile(&text, None, PipelineConfig::default()).is_ok());
}

#[test]
fn full_report_serializes() {
    let text = textual_raw(&[
        (1, "C01 CLIENT: ACME  AREA: GULF OF MEXICO"),
        (12, "C12 SAMPLE INTERVAL: 4 MS"),
        (18, "C18 UTM ZONE 15 N  DATUM: NAD27"),
    ]);
    let bin = binary_raw(4000, 1200);
    let report = reconcile(&text, Some(&bin), PipelineConfig::default()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("sample_interval_ms"));
    assert!(json.contains("NAD27"));
}
