//! Baseline heuristic matchers.
//!
//! Each matcher is an independent, order-insensitive rule scoped to one
//! semantic field: it scans all 40 lines for label/value patterns and emits
//! at most one [`FieldValue`] with a confidence derived from match strength
//! and provenance pointing at the matched line and span. Finding nothing is
//! not an error. When several rules claim the same field the merger
//! resolves it, not the matchers.
//!
//! New fields register here without touching the merger.

use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};
use segyrec_types::{FieldValue, Source, Span, TextualHeader, Value};
use tracing::debug;

use crate::normalize::{clean_text_capture, parse_number, to_milliseconds, unitless_interval_ms};

/// One baseline extraction rule: `TextualHeader` in, optional `FieldValue`
/// out. Implementations never mutate the header.
pub trait FieldMatcher: Send + Sync {
    /// Merged-record field this rule feeds.
    fn field(&self) -> &'static str;
    /// Stable rule id recorded as the value's provenance source.
    fn rule_id(&self) -> &'static str;
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue>;
}

/// The full baseline rule set, in fixed registry order (numeric rules
/// first, mirroring their priority under the merge tie-break). Built once;
/// every pattern is compiled exactly one time for the process.
static REGISTRY: LazyLock<Vec<Box<dyn FieldMatcher>>> = LazyLock::new(|| {
    vec![
        Box::new(SampleIntervalUnits::new()),
        Box::new(SampleIntervalUnitless::new()),
        Box::new(IntAfterLabel::new(
            "samples_per_trace",
            "samples-per-trace",
            r"SAMPLES\s*/\s*TRACE\s*[:=]?\s*(\d+)",
            0.9,
        )),
        Box::new(RecordLength::new()),
        Box::new(
            IntAfterLabel::new(
                "data_traces_per_record",
                "data-traces-per-record",
                r"(?:DATA\s+)?TRACES?\s*/\s*RECORDS?\s*[:=]?\s*(\d+)",
                0.8,
            )
            // The broad TRACES/RECORD pattern would also swallow the
            // auxiliary-trace count.
            .skip_lines_containing("AUX"),
        ),
        Box::new(IntAfterLabel::new(
            "auxiliary_traces_per_record",
            "aux-traces-per-record",
            r"AUXILIARY\s+TRACES?\s*/\s*RECORDS?\s*[:=]?\s*(\d+)",
            0.7,
        )),
        Box::new(IntAfterLabel::new(
            "bytes_per_sample",
            "bytes-per-sample",
            r"BYTES\s*/\s*SAMPLE\s*[:=]?\s*(\d+)",
            0.8,
        )),
        Box::new(FloatAfterLabel::new(
            "inline_spacing_m",
            "inline-spacing",
            r"\bINLINE\s+SPACING\s*[:=]?\s*([0-9]*\.?[0-9]+)\s*M(?:ETERS?|ETRES?)?\b",
            0.8,
        )),
        Box::new(FloatAfterLabel::new(
            "crossline_spacing_m",
            "crossline-spacing",
            r"\bCROSSLINE\s+SPACING\s*[:=]?\s*([0-9]*\.?[0-9]+)\s*M(?:ETERS?|ETRES?)?\b",
            0.8,
        )),
        Box::new(FloatAfterLabel::new(
            "bin_size_m",
            "bin-size",
            r"\bBIN\s+SIZE\s*[:=]?\s*([0-9]*\.?[0-9]+)\s*M(?:ETERS?|ETRES?)?\b",
            0.75,
        )),
        Box::new(AcquisitionYear::new()),
        Box::new(
            TextAfterLabel::new("company", "company-label", "COMPANY", 0.8)
                // A processing shop is not the acquisition company.
                .not_after(&["PROCESSING"]),
        ),
        Box::new(TextAfterLabel::new("client", "client-label", "CLIENT", 0.7)),
        Box::new(TextAfterLabel::new("area", "area-label", "AREA", 0.7)),
        Box::new(TextAfterLabel::new(
            "contractor",
            "contractor-label",
            "CONTRACTOR",
            0.7,
        )),
        Box::new(TextAfterLabel::new("vessel", "vessel-label", "VESSEL", 0.7)),
        Box::new(SurveyName::new()),
        Box::new(RecordingFormat::new()),
        Box::new(MeasurementSystem::new()),
        Box::new(EndianHint::new()),
    ]
});

/// The shared baseline registry.
#[must_use]
pub fn baseline_registry() -> &'static [Box<dyn FieldMatcher>] {
    &REGISTRY
}

/// Run every registered matcher, collecting candidates in registry order.
#[must_use]
pub fn run_baseline(header: &TextualHeader) -> Vec<(String, FieldValue)> {
    let mut out = Vec::new();
    for matcher in baseline_registry() {
        if let Some(value) = matcher.scan(header) {
            debug!(
                field = matcher.field(),
                rule = matcher.rule_id(),
                confidence = value.confidence,
                "baseline matcher hit"
            );
            out.push((matcher.field().to_owned(), value));
        }
    }
    out
}

fn re_ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("static matcher pattern")
}

/// First match of `re` across the 40 lines; 1-based line number.
fn first_match<'h>(header: &'h TextualHeader, re: &Regex) -> Option<(u32, Captures<'h>)> {
    header
        .lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| re.captures(line).map(|caps| (i as u32 + 1, caps)))
}

fn capture_span(caps: &Captures<'_>, group: usize, line: u32) -> Option<Span> {
    caps.get(group).map(|m| Span {
        line,
        start: m.start() as u32,
        end: m.end() as u32,
    })
}

/// Whole numbers become `Int`, everything else `Float`.
fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        Value::Int(v as i64)
    } else {
        Value::Float(v)
    }
}

// ---------------------------------------------------------------------
// sample_interval_ms
// ---------------------------------------------------------------------

/// `SAMPLE INTERVAL: 4 MS` (and MSEC/US/USEC/S/SEC spellings). The `\w*`
/// after INTER tolerates the common INTERNAL typo, and the geophysicist's
/// `DT` shorthand is accepted as a label.
struct SampleIntervalUnits {
    re: Regex,
}

impl SampleIntervalUnits {
    fn new() -> Self {
        Self {
            re: re_ci(
                r"(?:SAMPLE\s+INTER\w*|\bDT\b)\s*[:=]?\s*([0-9,._ ]*\.?[0-9]+)\s*(MSEC|MILLISECONDS?|MS|USEC|MICROSECONDS?|US|SECONDS?|SEC|S)\b",
            ),
        }
    }
}

impl FieldMatcher for SampleIntervalUnits {
    fn field(&self) -> &'static str {
        "sample_interval_ms"
    }
    fn rule_id(&self) -> &'static str {
        "si-explicit-units"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let value = parse_number(&caps[1])?;
        let unit = caps[2].to_ascii_uppercase();
        let ms = to_milliseconds(value, &unit);
        // An exact-unit match in milliseconds is the strongest signal.
        let confidence = if matches!(unit.as_str(), "MS" | "MSEC" | "MILLISECOND" | "MILLISECONDS") {
            0.9
        } else {
            0.88
        };
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(number_value(ms), confidence, Source::rule(self.rule_id())).with_span(span))
    }
}

/// `SAMPLE INTERVAL: 2000` with no unit; microsecond-range values are
/// normalized heuristically.
struct SampleIntervalUnitless {
    re: Regex,
}

impl SampleIntervalUnitless {
    fn new() -> Self {
        Self {
            re: re_ci(r"SAMPLE\s+INTER\w*\s*[:=]?\s*([0-9,._ ]*\.?[0-9]+)(?:\s|$)"),
        }
    }
}

impl FieldMatcher for SampleIntervalUnitless {
    fn field(&self) -> &'static str {
        "sample_interval_ms"
    }
    fn rule_id(&self) -> &'static str {
        "si-unitless"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let raw = parse_number(&caps[1])?;
        let (ms, confident) = unitless_interval_ms(raw);
        let confidence = if confident { 0.85 } else { 0.7 };
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(number_value(ms), confidence, Source::rule(self.rule_id())).with_span(span))
    }
}

// ---------------------------------------------------------------------
// record_length_ms
// ---------------------------------------------------------------------

struct RecordLength {
    re: Regex,
}

impl RecordLength {
    fn new() -> Self {
        Self {
            re: re_ci(
                r"(?:RECORD\s+LENGTH|RLEN(?:GTH)?)\s*[:=]?\s*([0-9,._ ]*\.?[0-9]+)\s*(MSEC|MILLISECONDS?|MS|SECONDS?|SEC|S)\b",
            ),
        }
    }
}

impl FieldMatcher for RecordLength {
    fn field(&self) -> &'static str {
        "record_length_ms"
    }
    fn rule_id(&self) -> &'static str {
        "record-length-units"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let value = parse_number(&caps[1])?;
        let ms = to_milliseconds(value, &caps[2]);
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(number_value(ms), 0.9, Source::rule(self.rule_id())).with_span(span))
    }
}

// ---------------------------------------------------------------------
// Generic integer-after-label rule
// ---------------------------------------------------------------------

struct IntAfterLabel {
    field: &'static str,
    rule: &'static str,
    re: Regex,
    confidence: f64,
    skip_containing: Option<&'static str>,
}

impl IntAfterLabel {
    fn new(field: &'static str, rule: &'static str, pattern: &str, confidence: f64) -> Self {
        Self {
            field,
            rule,
            re: re_ci(pattern),
            confidence,
            skip_containing: None,
        }
    }

    fn skip_lines_containing(mut self, token: &'static str) -> Self {
        self.skip_containing = Some(token);
        self
    }
}

impl FieldMatcher for IntAfterLabel {
    fn field(&self) -> &'static str {
        self.field
    }
    fn rule_id(&self) -> &'static str {
        self.rule
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = header.lines.iter().enumerate().find_map(|(i, text)| {
            if let Some(token) = self.skip_containing {
                if text.to_ascii_uppercase().contains(token) {
                    return None;
                }
            }
            self.re.captures(text).map(|caps| (i as u32 + 1, caps))
        })?;
        let value: i64 = caps[1].parse().ok()?;
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(Value::Int(value), self.confidence, Source::rule(self.rule)).with_span(span))
    }
}

// ---------------------------------------------------------------------
// Generic decimal-after-label rule (geometry spacings, bin size)
// ---------------------------------------------------------------------

struct FloatAfterLabel {
    field: &'static str,
    rule: &'static str,
    re: Regex,
    confidence: f64,
}

impl FloatAfterLabel {
    fn new(field: &'static str, rule: &'static str, pattern: &str, confidence: f64) -> Self {
        Self {
            field,
            rule,
            re: re_ci(pattern),
            confidence,
        }
    }
}

impl FieldMatcher for FloatAfterLabel {
    fn field(&self) -> &'static str {
        self.field
    }
    fn rule_id(&self) -> &'static str {
        self.rule
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let value = parse_number(&caps[1])?;
        let span = capture_span(&caps, 1, line)?;
        Some(
            FieldValue::new(number_value(value), self.confidence, Source::rule(self.rule))
                .with_span(span),
        )
    }
}

// ---------------------------------------------------------------------
// Generic free-text-after-label rule
// ---------------------------------------------------------------------

struct TextAfterLabel {
    field: &'static str,
    rule: &'static str,
    label: &'static str,
    re: Regex,
    confidence: f64,
    not_after: &'static [&'static str],
}

impl TextAfterLabel {
    fn new(field: &'static str, rule: &'static str, label: &'static str, confidence: f64) -> Self {
        // The leading boundary keeps compound labels (SUBAREA, RESURVEY)
        // from feeding the plain field; values end at a double space
        // (column gap) or end of line.
        let pattern = format!(r"\b{label}\s*[:=]?\s*([A-Z0-9 .,&'\-_/]+?)(?:\s{{2,}}|$)");
        Self {
            field,
            rule,
            label,
            re: re_ci(&pattern),
            confidence,
            not_after: &[],
        }
    }

    /// Reject a match whose label is the second word of a longer label,
    /// e.g. PROCESSING COMPANY.
    fn not_after(mut self, words: &'static [&'static str]) -> Self {
        self.not_after = words;
        self
    }
}

impl FieldMatcher for TextAfterLabel {
    fn field(&self) -> &'static str {
        self.field
    }
    fn rule_id(&self) -> &'static str {
        self.rule
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = header.lines.iter().enumerate().find_map(|(i, text)| {
            let caps = self.re.captures(text)?;
            let start = caps.get(0)?.start();
            let prefix = text[..start].trim_end().to_ascii_uppercase();
            if self.not_after.iter().any(|word| prefix.ends_with(word)) {
                return None;
            }
            Some((i as u32 + 1, caps))
        })?;
        let value = clean_text_capture(&caps[1], self.label)?;
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(Value::Text(value), self.confidence, Source::rule(self.rule)).with_span(span))
    }
}

// ---------------------------------------------------------------------
// survey_name
// ---------------------------------------------------------------------

struct SurveyName {
    re: Regex,
}

impl SurveyName {
    fn new() -> Self {
        Self {
            re: re_ci(r"(?:PROJECT\s+NAME|SURVEY)\s*[:=]?\s*([A-Z0-9 .,&'\-_/]+?)(?:\s{2,}|$)"),
        }
    }
}

impl FieldMatcher for SurveyName {
    fn field(&self) -> &'static str {
        "survey_name"
    }
    fn rule_id(&self) -> &'static str {
        "survey-name-label"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let value = clean_text_capture(&caps[1], "SURVEY")?;
        if value == "PROJECT NAME" {
            return None;
        }
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(Value::Text(value), 0.75, Source::rule(self.rule_id())).with_span(span))
    }
}

// ---------------------------------------------------------------------
// acquisition_year
// ---------------------------------------------------------------------

struct AcquisitionYear {
    /// (pattern, confidence) in priority order: explicit year labels beat a
    /// bare DATE.
    patterns: Vec<(Regex, f64)>,
}

impl AcquisitionYear {
    fn new() -> Self {
        Self {
            patterns: vec![
                (re_ci(r"ACQUISITION\s+YEAR\D*?((?:19|20)\d{2})"), 0.9),
                (re_ci(r"RECORDED\s+YEAR\D*?((?:19|20)\d{2})"), 0.9),
                (re_ci(r"\bDATE\s*[:=]?\s*(\d{4})\b"), 0.6),
            ],
        }
    }
}

impl FieldMatcher for AcquisitionYear {
    fn field(&self) -> &'static str {
        "acquisition_year"
    }
    fn rule_id(&self) -> &'static str {
        "acquisition-year"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        for (re, confidence) in &self.patterns {
            let Some((line, caps)) = first_match(header, re) else {
                continue;
            };
            let Ok(year) = caps[1].parse::<i32>() else {
                continue;
            };
            if !(1900..=2100).contains(&year) {
                continue;
            }
            let span = capture_span(&caps, 1, line)?;
            return Some(
                FieldValue::new(Value::Year(year), *confidence, Source::rule(self.rule_id()))
                    .with_span(span),
            );
        }
        None
    }
}

// ---------------------------------------------------------------------
// recording_format
// ---------------------------------------------------------------------

struct RecordingFormat {
    re: Regex,
}

impl RecordingFormat {
    fn new() -> Self {
        Self {
            re: re_ci(r"(?:RECORDING\s+FORMAT|FORMAT\s+THIS\s+REEL)\s*[:=]?\s*([A-Z0-9\-_/. ]+?)(?:\s{2,}|$)"),
        }
    }
}

impl FieldMatcher for RecordingFormat {
    fn field(&self) -> &'static str {
        "recording_format"
    }
    fn rule_id(&self) -> &'static str {
        "recording-format"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let value = clean_text_capture(&caps[1], "RECORDING FORMAT")?;
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(Value::Text(value), 0.75, Source::rule(self.rule_id())).with_span(span))
    }
}

// ---------------------------------------------------------------------
// measurement_system
// ---------------------------------------------------------------------

/// `MEASUREMENT SYSTEM: METRIC`; the MEASURMENT typo is accepted for
/// matching, and SI/IMPERIAL spellings normalize to METRIC/FEET.
struct MeasurementSystem {
    re: Regex,
}

impl MeasurementSystem {
    fn new() -> Self {
        Self {
            re: re_ci(r"MEASURE?MENT\s+SYSTEM\s*[:=]?\s*([A-Z]+)"),
        }
    }
}

impl FieldMatcher for MeasurementSystem {
    fn field(&self) -> &'static str {
        "measurement_system"
    }
    fn rule_id(&self) -> &'static str {
        "measurement-system"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        let raw = caps[1].to_ascii_uppercase();
        let value = match raw.as_str() {
            "SI" | "METRIC" => "METRIC".to_owned(),
            "IMPERIAL" | "FEET" | "FT" => "FEET".to_owned(),
            _ => raw,
        };
        let span = capture_span(&caps, 1, line)?;
        Some(FieldValue::new(Value::Text(value), 0.65, Source::rule(self.rule_id())).with_span(span))
    }
}

// ---------------------------------------------------------------------
// endianness hint
// ---------------------------------------------------------------------

/// A textual LITTLE ENDIAN claim contradicts SEG-Y Rev1 and is worth a
/// note even before looking at the binary header.
struct EndianHint {
    re: Regex,
}

impl EndianHint {
    fn new() -> Self {
        Self {
            re: re_ci(r"\b(LITTLE|BIG)\s+ENDIAN\b"),
        }
    }
}

impl FieldMatcher for EndianHint {
    fn field(&self) -> &'static str {
        "notes"
    }
    fn rule_id(&self) -> &'static str {
        "endian-hint"
    }
    fn scan(&self, header: &TextualHeader) -> Option<FieldValue> {
        let (line, caps) = first_match(header, &self.re)?;
        if !caps[1].eq_ignore_ascii_case("LITTLE") {
            return None;
        }
        let note = "Textual header indicates LITTLE ENDIAN; SEG-Y Rev1 specifies big-endian. \
                    File may be non-standard."
            .to_owned();
        Some(
            FieldValue::new(Value::Text(note), 0.5, Source::rule(self.rule_id())).with_line(line),
        )
    }
}
