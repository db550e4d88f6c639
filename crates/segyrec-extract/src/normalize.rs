//! Shared text-cleaning helpers for the baseline matchers.
//!
//! Headers are typed by humans on deadline: numbers carry thousands
//! separators, values hide behind placeholders, and units come in a dozen
//! spellings. Everything here cleans a *matching view only* — raw lines are
//! never altered.

/// Parse a numeric capture allowing `,`, `_` and space separators:
/// `"2,000"` → 2000.0, `"1 000.5"` → 1000.5.
#[must_use]
pub fn parse_number(capture: &str) -> Option<f64> {
    let cleaned: String = capture
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    cleaned.parse().ok()
}

/// Convert a number with a unit suffix to milliseconds.
#[must_use]
pub fn to_milliseconds(value: f64, unit: &str) -> f64 {
    match unit.to_ascii_uppercase().as_str() {
        "US" | "USEC" | "MICROSECOND" | "MICROSECONDS" => value / 1000.0,
        "S" | "SEC" | "SECOND" | "SECONDS" => value * 1000.0,
        // MS/MSEC/MILLISECONDS and anything unrecognized: already ms.
        _ => value,
    }
}

/// Normalize a unitless sample-interval number to milliseconds.
///
/// Field crews commonly write the interval in microseconds without saying
/// so: a bare value in [100, 10000] is treated as µs, anything below 50 as
/// ms. Returns `(milliseconds, confident)` where `confident` reflects how
/// safe the guess was.
#[must_use]
pub fn unitless_interval_ms(value: f64) -> (f64, bool) {
    if (100.0..=10000.0).contains(&value) {
        (value / 1000.0, true)
    } else {
        (value, value < 50.0)
    }
}

/// Placeholder tokens that mean "nobody filled this in".
const PLACEHOLDERS: [&str; 6] = ["N/A", "NA", "NONE", "UNKNOWN", "NULL", "-"];

/// Clean a free-text capture: trim, uppercase, drop placeholders and
/// captures that merely repeat the label.
#[must_use]
pub fn clean_text_capture(raw: &str, label_hint: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('.').trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_ascii_uppercase();
    if PLACEHOLDERS.contains(&upper.as_str()) || upper == label_hint.to_ascii_uppercase() {
        return None;
    }
    Some(upper)
}
