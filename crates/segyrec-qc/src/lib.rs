//! Contradiction detection between textual-derived and binary-derived
//! header values.
//!
//! The cross-checked field list is fixed ([`CROSS_CHECKS`]): sample interval
//! and samples-per-trace are `critical` (they govern trace decoding),
//! everything else is `advisory`. Unit conversion goes through exactly one
//! function per direction ([`ms_to_us`]); the patch applier re-encodes
//! through the same function, so detection and patching cannot round
//! differently and manufacture spurious mismatches.

use segyrec_types::{BinaryHeader, Contradiction, HeaderRecord, Severity, Value};
use tracing::warn;

/// Milliseconds → microseconds with a fixed rounding convention
/// (round-half-away-from-zero, the behavior of `f64::round`).
///
/// This is the only place the conversion happens; both the detector and the
/// patch applier call it.
#[must_use]
pub fn ms_to_us(ms: f64) -> i64 {
    (ms * 1000.0).round() as i64
}

/// Microseconds → milliseconds, exact.
#[must_use]
pub fn us_to_ms(us: i64) -> f64 {
    us as f64 / 1000.0
}

/// How a textual value is compared against (and re-encoded into) its binary
/// counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitConversion {
    /// Textual milliseconds vs binary microseconds.
    MsToUs,
    /// Same unit on both sides; integer comparison.
    Count,
    /// Textual METRIC/FEET vs binary measurement-system code (1 = meters,
    /// 2 = feet).
    MeasurementCode,
}

/// One entry of the fixed cross-check table.
#[derive(Debug, Clone, Copy)]
pub struct CrossCheck {
    /// Field name in the merged-record vocabulary.
    pub field: &'static str,
    /// Field name in the binary layout table.
    pub binary_field: &'static str,
    pub severity: Severity,
    pub unit: UnitConversion,
}

/// The fields checked against the binary header, and how.
pub const CROSS_CHECKS: &[CrossCheck] = &[
    CrossCheck {
        field: "sample_interval_ms",
        binary_field: "sample_interval_us",
        severity: Severity::Critical,
        unit: UnitConversion::MsToUs,
    },
    CrossCheck {
        field: "samples_per_trace",
        binary_field: "samples_per_trace",
        severity: Severity::Critical,
        unit: UnitConversion::Count,
    },
    CrossCheck {
        field: "data_traces_per_record",
        binary_field: "data_traces_per_ensemble",
        severity: Severity::Advisory,
        unit: UnitConversion::Count,
    },
    CrossCheck {
        field: "auxiliary_traces_per_record",
        binary_field: "aux_traces_per_ensemble",
        severity: Severity::Advisory,
        unit: UnitConversion::Count,
    },
    CrossCheck {
        field: "measurement_system",
        binary_field: "measurement_system",
        severity: Severity::Advisory,
        unit: UnitConversion::MeasurementCode,
    },
];

/// Look up a cross-check entry by merged-record field name.
#[must_use]
pub fn cross_check_for(field: &str) -> Option<&'static CrossCheck> {
    CROSS_CHECKS.iter().find(|c| c.field == field)
}

/// Compare the merged record against the binary header.
///
/// A field contributes at most one contradiction, and only when both sides
/// have a value. Equal values (after unit conversion) produce nothing.
#[must_use]
pub fn detect_contradictions(record: &HeaderRecord, binary: &BinaryHeader) -> Vec<Contradiction> {
    let mut out = Vec::new();
    for check in CROSS_CHECKS {
        let Some(textual) = record.get(check.field) else {
            continue;
        };
        let Some(binary_value) = binary.field(check.binary_field) else {
            continue;
        };
        let Some(contradiction) = compare(check, &textual.value, binary_value, &textual.lines)
        else {
            continue;
        };
        warn!(
            field = check.field,
            severity = ?contradiction.severity,
            "textual and binary headers disagree"
        );
        out.push(contradiction);
    }
    out
}

fn compare(
    check: &CrossCheck,
    textual: &Value,
    binary: i64,
    lines: &[u32],
) -> Option<Contradiction> {
    let (mismatch, binary_view) = match check.unit {
        UnitConversion::MsToUs => {
            let textual_us = ms_to_us(textual.as_f64()?);
            (textual_us != binary, ms_value(binary))
        }
        UnitConversion::Count => (textual.as_i64()? != binary, Value::Int(binary)),
        UnitConversion::MeasurementCode => {
            let textual_system = match textual {
                Value::Text(t) => t.as_str(),
                _ => return None,
            };
            let binary_system = measurement_system_name(binary)?;
            (textual_system != binary_system, Value::Text(binary_system.to_owned()))
        }
    };
    mismatch.then(|| Contradiction {
        field: check.field.to_owned(),
        textual: textual.clone(),
        binary: binary_view,
        severity: check.severity,
        lines: lines.to_vec(),
    })
}

/// Render a microsecond count in milliseconds, as an integer when whole.
fn ms_value(us: i64) -> Value {
    if us % 1000 == 0 {
        Value::Int(us / 1000)
    } else {
        Value::Float(us_to_ms(us))
    }
}

fn measurement_system_name(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("METRIC"),
        2 => Some("FEET"),
        _ => None,
    }
}
