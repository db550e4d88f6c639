//! Binary-header patch application.
//!
//! Given contradictions and a trust direction, rewrites the affected byte
//! ranges of the raw 400-byte buffer so the binary header matches the
//! textual-derived values. Only `critical` contradictions are eligible;
//! advisory ones are never auto-patched. A patch that does not fit its
//! field is recorded as a failure and the rest of the batch continues.
//!
//! The raw buffer is the only thing mutated in the whole system; the
//! decoded `fields` view keeps its pre-patch values, and callers persist
//! the buffer themselves.

use segyrec_error::{Result, SegyError};
use segyrec_qc::{cross_check_for, ms_to_us, UnitConversion};
use segyrec_types::{
    BinaryHeader, Contradiction, PatchEntry, PatchFailure, PatchResult, Severity, TrustDirection,
    Value,
};
use tracing::{info, warn};

use crate::layout::{field_spec, FieldSpec};
use crate::reader::{encode_field, read_field};

/// Apply every eligible patch for `contradictions` to `header`'s raw buffer.
///
/// With `TrustDirection::Binary` nothing is eligible (the buffer already
/// holds the authoritative values) and the result is empty and ok.
pub fn apply_patches(
    header: &mut BinaryHeader,
    contradictions: &[Contradiction],
    trust: TrustDirection,
) -> PatchResult {
    let mut result = PatchResult {
        ok: true,
        ..PatchResult::default()
    };
    if trust == TrustDirection::Binary {
        return result;
    }

    for contradiction in contradictions {
        if contradiction.severity != Severity::Critical {
            continue;
        }
        match apply_one(header, contradiction) {
            Ok(entry) => {
                info!(
                    field = %entry.field,
                    before = entry.decoded_before,
                    after = entry.decoded_after,
                    "binary header patched from textual value"
                );
                result.entries.push(entry);
            }
            Err(err) => {
                warn!(field = %contradiction.field, %err, "patch skipped");
                result.failures.push(PatchFailure {
                    field: contradiction.field.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    result.ok = result.failures.is_empty();
    result
}

fn apply_one(header: &mut BinaryHeader, contradiction: &Contradiction) -> Result<PatchEntry> {
    let (spec, value) = patch_target(header, contradiction)?;
    let after = encode_field(value, spec, header.endianness)?;

    let range = spec.offset..spec.offset + spec.width;
    let before = header.raw[range.clone()].to_vec();
    let decoded_before = read_field(&header.raw, spec, header.endianness);
    header.raw[range].copy_from_slice(&after);

    Ok(PatchEntry {
        field: spec.name.to_owned(),
        offset: spec.offset,
        before,
        after,
        decoded_before,
        decoded_after: value,
    })
}

/// Resolve a contradiction to the binary field it rewrites and the value to
/// write, re-encoded in the binary field's unit.
fn patch_target<'a>(
    header: &BinaryHeader,
    contradiction: &Contradiction,
) -> Result<(&'a FieldSpec, i64)> {
    let check = cross_check_for(&contradiction.field).ok_or_else(|| SegyError::UnknownField {
        field: contradiction.field.clone(),
    })?;
    let spec =
        field_spec(header.revision, check.binary_field).ok_or_else(|| SegyError::UnknownField {
            field: check.binary_field.to_owned(),
        })?;

    let value = match (&check.unit, &contradiction.textual) {
        // Same conversion function as the detector; the two sites cannot
        // round differently.
        (UnitConversion::MsToUs, v) => v.as_f64().map(ms_to_us),
        (UnitConversion::Count, v) => v.as_i64(),
        (UnitConversion::MeasurementCode, Value::Text(t)) => match t.as_str() {
            "METRIC" => Some(1),
            "FEET" => Some(2),
            _ => None,
        },
        (UnitConversion::MeasurementCode, _) => None,
    };
    let value = value.ok_or_else(|| SegyError::UnknownField {
        field: format!("{} (textual value not convertible)", contradiction.field),
    })?;
    Ok((spec, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::decode_binary;
    use segyrec_types::{Endianness, LayoutRevision, Severity, BINARY_HEADER_BYTES};

    fn header_with_interval_us(us: u16) -> BinaryHeader {
        let mut raw = vec![0u8; BINARY_HEADER_BYTES];
        raw[16..18].copy_from_slice(&us.to_be_bytes());
        decode_binary(&raw, Endianness::Big, LayoutRevision::Rev1).unwrap()
    }

    fn interval_contradiction(textual_ms: i64, binary_ms: i64) -> Contradiction {
        Contradiction {
            field: "sample_interval_ms".to_owned(),
            textual: Value::Int(textual_ms),
            binary: Value::Int(binary_ms),
            severity: Severity::Critical,
            lines: vec![12],
        }
    }

    #[test]
    fn rewrites_interval_from_textual_value() {
        let mut header = header_with_interval_us(2000);
        let result = apply_patches(
            &mut header,
            &[interval_contradiction(4, 2)],
            TrustDirection::Textual,
        );
        assert!(result.ok);
        assert_eq!(result.entries.len(), 1);
        let entry = &result.entries[0];
        assert_eq!(entry.field, "sample_interval_us");
        assert_eq!(entry.offset, 16);
        assert_eq!(entry.before, vec![0x07, 0xD0]);
        assert_eq!(entry.after, vec![0x0F, 0xA0]);
        assert_eq!((entry.decoded_before, entry.decoded_after), (2000, 4000));
        assert_eq!(&header.raw[16..18], &[0x0F, 0xA0]);
    }

    #[test]
    fn patching_is_idempotent() {
        let mut once = header_with_interval_us(2000);
        let contradictions = [interval_contradiction(4, 2)];
        apply_patches(&mut once, &contradictions, TrustDirection::Textual);
        let mut twice = once.clone();
        apply_patches(&mut twice, &contradictions, TrustDirection::Textual);
        assert_eq!(once.raw, twice.raw);
    }

    #[test]
    fn binary_trust_patches_nothing() {
        let mut header = header_with_interval_us(2000);
        let original = header.raw.clone();
        let result = apply_patches(
            &mut header,
            &[interval_contradiction(4, 2)],
            TrustDirection::Binary,
        );
        assert!(result.ok);
        assert!(result.entries.is_empty());
        assert_eq!(header.raw, original);
    }

    #[test]
    fn advisory_contradictions_are_never_patched() {
        let mut header = header_with_interval_us(2000);
        let original = header.raw.clone();
        let advisory = Contradiction {
            field: "data_traces_per_record".to_owned(),
            textual: Value::Int(240),
            binary: Value::Int(120),
            severity: Severity::Advisory,
            lines: vec![5],
        };
        let result = apply_patches(&mut header, &[advisory], TrustDirection::Textual);
        assert!(result.ok);
        assert!(result.entries.is_empty());
        assert_eq!(header.raw, original);
    }

    #[test]
    fn overflow_fails_that_patch_only() {
        let mut header = header_with_interval_us(2000);
        // 70 s = 70_000_000 µs does not fit a u16 field; the second patch
        // must still be attempted.
        let overflow = interval_contradiction(70_000, 2);
        let mut fits = interval_contradiction(4, 2);
        fits.field = "samples_per_trace".to_owned();
        fits.textual = Value::Int(1500);

        let result = apply_patches(&mut header, &[overflow, fits], TrustDirection::Textual);
        assert!(!result.ok);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].field, "sample_interval_ms");
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].field, "samples_per_trace");
        // The failed patch left its bytes alone.
        assert_eq!(&header.raw[16..18], &[0x07, 0xD0]);
    }
}
