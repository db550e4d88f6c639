//! Versioned binary-header layout tables.
//!
//! Each revision is a constant table of `(name, offset, width, signedness)`
//! entries; decode logic never hardcodes an offset. Adding a revision means
//! adding a table. Offsets are 0-based within the 400-byte buffer (the
//! SEG-Y standard numbers them from byte 3201 of the file).
//!
//! Reserved/unknown bytes are simply not listed, and are never interpreted.

use segyrec_types::LayoutRevision;

/// One fixed-offset integer field of the binary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    /// 2, 4 or 8 bytes.
    pub width: usize,
    pub signed: bool,
}

impl FieldSpec {
    /// Byte range of this field within the 400-byte buffer.
    #[must_use]
    pub const fn byte_range(&self) -> (u32, u32) {
        (self.offset as u32, (self.offset + self.width) as u32)
    }

    /// Inclusive bounds a value must satisfy to fit this field.
    #[must_use]
    pub const fn value_bounds(&self) -> (i64, i64) {
        match (self.width, self.signed) {
            (2, true) => (i16::MIN as i64, i16::MAX as i64),
            (2, false) => (0, u16::MAX as i64),
            (4, true) => (i32::MIN as i64, i32::MAX as i64),
            (4, false) => (0, u32::MAX as i64),
            // 8-byte fields hold counts; negative values never fit.
            _ => (if self.signed { i64::MIN } else { 0 }, i64::MAX),
        }
    }
}

const fn spec(name: &'static str, offset: usize, width: usize, signed: bool) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
        signed,
    }
}

/// Fields shared by every revision since SEG-Y (1975).
const REV0: &[FieldSpec] = &[
    spec("job_id", 0, 4, true),
    spec("line_number", 4, 4, true),
    spec("reel_number", 8, 4, true),
    spec("data_traces_per_ensemble", 12, 2, true),
    spec("aux_traces_per_ensemble", 14, 2, true),
    spec("sample_interval_us", 16, 2, false),
    spec("sample_interval_orig_us", 18, 2, false),
    spec("samples_per_trace", 20, 2, false),
    spec("samples_per_trace_orig", 22, 2, false),
    spec("format_code", 24, 2, true),
    spec("ensemble_fold", 26, 2, true),
    spec("trace_sorting", 28, 2, true),
    spec("measurement_system", 54, 2, true),
];

/// Rev1 (2002) adds the revision stamp and extended-textual bookkeeping.
const REV1: &[FieldSpec] = &[
    spec("job_id", 0, 4, true),
    spec("line_number", 4, 4, true),
    spec("reel_number", 8, 4, true),
    spec("data_traces_per_ensemble", 12, 2, true),
    spec("aux_traces_per_ensemble", 14, 2, true),
    spec("sample_interval_us", 16, 2, false),
    spec("sample_interval_orig_us", 18, 2, false),
    spec("samples_per_trace", 20, 2, false),
    spec("samples_per_trace_orig", 22, 2, false),
    spec("format_code", 24, 2, true),
    spec("ensemble_fold", 26, 2, true),
    spec("trace_sorting", 28, 2, true),
    spec("measurement_system", 54, 2, true),
    spec("segy_revision", 300, 2, false),
    spec("fixed_length_flag", 302, 2, true),
    spec("extended_textual_headers", 304, 2, true),
];

/// Rev2 (2017) adds wide trace counts and stream offsets.
const REV2: &[FieldSpec] = &[
    spec("job_id", 0, 4, true),
    spec("line_number", 4, 4, true),
    spec("reel_number", 8, 4, true),
    spec("data_traces_per_ensemble", 12, 2, true),
    spec("aux_traces_per_ensemble", 14, 2, true),
    spec("sample_interval_us", 16, 2, false),
    spec("sample_interval_orig_us", 18, 2, false),
    spec("samples_per_trace", 20, 2, false),
    spec("samples_per_trace_orig", 22, 2, false),
    spec("format_code", 24, 2, true),
    spec("ensemble_fold", 26, 2, true),
    spec("trace_sorting", 28, 2, true),
    spec("measurement_system", 54, 2, true),
    spec("segy_revision", 300, 2, false),
    spec("fixed_length_flag", 302, 2, true),
    spec("extended_textual_headers", 304, 2, true),
    spec("max_extra_trace_headers", 306, 4, false),
    spec("time_basis_code", 310, 2, false),
    spec("traces_in_stream", 312, 8, false),
    spec("first_trace_offset", 320, 8, false),
];

/// The field table for a revision.
#[must_use]
pub fn layout(revision: LayoutRevision) -> &'static [FieldSpec] {
    match revision {
        LayoutRevision::Rev0 => REV0,
        LayoutRevision::Rev1 => REV1,
        LayoutRevision::Rev2 => REV2,
    }
}

/// Look up one field of a revision by name.
#[must_use]
pub fn field_spec(revision: LayoutRevision, name: &str) -> Option<&'static FieldSpec> {
    layout(revision).iter().find(|s| s.name == name)
}
