//! Candidate generation and scoring.
//!
//! Each candidate is one internally-consistent datum/zone/hemisphere
//! combination; its score is the sum of its corroborating cue weights
//! (scaled down for cues from boilerplate lines) minus ambiguity and
//! inconsistency penalties, plus small acquisition-vintage and region
//! priors. Scoring is purely additive and the sort is fully deterministic:
//! score descending, then cue count, then earliest supporting line, then
//! generation order.

use segyrec_types::{CrsCandidate, CrsDiagnostics, CrsSolution, TextualHeader};
use tracing::debug;

use crate::catalog::{utm_epsg, utm_from_epsg, utm_label, Datum};
use crate::cues::{scan_cues, Cue, CueSet, Hemisphere, Region, Units};

/// Scoring weights. Callers tune these per pipeline configuration; there
/// is no process-wide override mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueWeights {
    /// Explicit `EPSG:nnnnn` mention. Large enough that a header which
    /// names its code outranks any combination inferred from scattered
    /// cues.
    pub epsg: f64,
    pub utm: f64,
    pub zone: f64,
    pub datum: f64,
    pub hemi: f64,
    pub units_m: f64,
    /// Negative: feet contradict a UTM interpretation.
    pub units_ft: f64,
    /// Negative: a zone without any datum mention.
    pub no_datum: f64,
    /// Negative: several datums mentioned.
    pub ambig_datum: f64,
}

impl Default for CueWeights {
    fn default() -> Self {
        Self {
            epsg: 10.0,
            utm: 2.0,
            zone: 3.0,
            datum: 4.0,
            hemi: 2.0,
            units_m: 1.0,
            units_ft: -2.0,
            no_datum: -1.0,
            ambig_datum: -2.0,
        }
    }
}

/// UTM zone assumed when the header names none; zones around the North Sea
/// and Gulf of Mexico cluster near the low 30s and mid teens, and 32 is the
/// historically most common default in legacy archives.
const DEFAULT_ZONE: u8 = 32;

/// Candidates below the top scorer past this count are dropped.
const MAX_CANDIDATES: usize = 10;

/// Top-two scores closer than this get an ambiguity note.
const AMBIGUITY_MARGIN: f64 = 1.0;

struct Scored {
    candidate: CrsCandidate,
    cue_count: usize,
    first_line: u32,
}

/// Solve for CRS candidates from the textual header alone.
#[must_use]
pub fn solve(header: &TextualHeader, weights: &CueWeights) -> CrsSolution {
    let cues = scan_cues(header, weights);

    let mut diagnostics = CrsDiagnostics {
        matched: cues.matched.clone(),
        conflicts: Vec::new(),
        notes: cues.notes.clone(),
    };

    if cues.is_empty() {
        diagnostics
            .notes
            .push("no coordinate-system cues found in textual header".to_owned());
        return CrsSolution {
            candidates: Vec::new(),
            diagnostics,
        };
    }

    if cues.zone.is_some() && cues.datum.is_none() {
        diagnostics
            .notes
            .push("zone present but no datum named".to_owned());
    }
    if cues.ambiguous_datum {
        diagnostics.conflicts.push("datum ambiguity".to_owned());
    }
    if cues.unit_conflict {
        diagnostics
            .conflicts
            .push("conflicting unit cues".to_owned());
    }
    if matches!(cues.units, Some(Cue { value: Units::Feet, .. })) {
        diagnostics.conflicts.push("feet with UTM".to_owned());
    }

    let mut scored: Vec<Scored> = Vec::new();

    // An explicit code goes in first; stable sort keeps it ahead on full
    // ties, and its weight keeps it ahead of anything merely inferred.
    if let Some(epsg) = cues.epsg.as_ref() {
        scored.push(explicit_candidate(&cues, weights, epsg));
    }

    let inferable = cues.utm.is_some()
        || cues.zone.is_some()
        || cues.datum.is_some()
        || cues.hemisphere.is_some()
        || cues.units.is_some();
    if inferable {
        let zone = cues.zone.as_ref().map_or(DEFAULT_ZONE, |c| c.value);
        if cues.zone.is_none() {
            diagnostics.notes.push(format!(
                "no zone named; assuming common default zone {DEFAULT_ZONE}"
            ));
        }
        let hemi_options: &[Hemisphere] = match cues.hemisphere.as_ref().map(|c| c.value) {
            Some(Hemisphere::North) => &[Hemisphere::North],
            Some(Hemisphere::South) => &[Hemisphere::South],
            None => &[Hemisphere::North, Hemisphere::South],
        };

        // Detected datum first, then the rest in canonical order.
        let mut families: Vec<Datum> = Vec::with_capacity(Datum::ALL.len());
        if let Some(datum) = cues.datum.as_ref() {
            families.push(datum.value);
        }
        for family in Datum::ALL {
            if !families.contains(&family) {
                families.push(family);
            }
        }

        let explicit_code = cues.epsg.as_ref().map(|c| c.value);
        for family in families {
            for &hemi in hemi_options {
                let Some(epsg) = utm_epsg(family, zone, hemi) else {
                    continue;
                };
                // The explicit candidate already covers this combination.
                if Some(epsg) == explicit_code {
                    continue;
                }
                scored.push(score_candidate(&cues, weights, family, zone, hemi, epsg));
            }
        }
    }

    // Deterministic order: score desc, cue count desc, first line asc;
    // stable sort keeps generation order on full ties.
    scored.sort_by(|a, b| {
        b.candidate
            .score
            .total_cmp(&a.candidate.score)
            .then_with(|| b.cue_count.cmp(&a.cue_count))
            .then_with(|| a.first_line.cmp(&b.first_line))
    });
    scored.truncate(MAX_CANDIDATES);

    if let [first, second, ..] = scored.as_slice() {
        if first.candidate.score - second.candidate.score < AMBIGUITY_MARGIN {
            diagnostics
                .notes
                .push("ambiguous; consider manual confirmation".to_owned());
        }
    }

    let candidates: Vec<CrsCandidate> = scored.into_iter().map(|s| s.candidate).collect();
    if let Some(best) = candidates.first() {
        debug!(label = best.label.as_str(), score = best.score, "crs solved");
    }

    CrsSolution {
        candidates,
        diagnostics,
    }
}

/// Candidate for a header that names its EPSG code outright. When the code
/// sits in a known UTM range it is scored like any other combination of
/// that family/zone/hemisphere, plus the explicit-mention weight; an
/// unrecognized code still becomes a candidate carrying the code alone.
fn explicit_candidate(cues: &CueSet, weights: &CueWeights, epsg: &Cue<u32>) -> Scored {
    let code = epsg.value;
    if let Some((family, zone, hemi)) = utm_from_epsg(code) {
        let mut scored = score_candidate(cues, weights, family, zone, hemi, code);
        scored.candidate.score += weights.epsg * epsg.scale;
        scored.candidate.cues.insert(0, format!("explicit EPSG:{code}"));
        scored.cue_count += 1;
        scored.first_line = scored.first_line.min(epsg.line);
        scored
    } else {
        Scored {
            candidate: CrsCandidate {
                epsg: Some(code),
                label: format!("EPSG:{code}"),
                score: weights.epsg * epsg.scale,
                cues: vec![format!("explicit EPSG:{code}")],
            },
            cue_count: 1,
            first_line: epsg.line,
        }
    }
}

fn score_candidate(
    cues: &CueSet,
    weights: &CueWeights,
    family: Datum,
    zone: u8,
    hemi: Hemisphere,
    epsg: u32,
) -> Scored {
    let mut score = 0.0;
    let mut reasons: Vec<String> = Vec::new();
    let mut cue_count = 0usize;
    let mut first_line = u32::MAX;
    let mut corroborate = |cue_line: u32, cue_scale: f64, weight: f64, reason: String| {
        score += weight * cue_scale;
        reasons.push(reason);
        cue_count += 1;
        first_line = first_line.min(cue_line);
    };

    if let Some(utm) = cues.utm.as_ref() {
        corroborate(utm.line, utm.scale, weights.utm, "found 'UTM'".to_owned());
    }
    if let Some(z) = cues.zone.as_ref() {
        if z.value == zone {
            corroborate(z.line, z.scale, weights.zone, format!("zone {}", z.value));
        }
    }
    if let Some(datum) = cues.datum.as_ref() {
        if datum.value == family {
            corroborate(
                datum.line,
                datum.scale,
                weights.datum,
                format!("datum '{}'", family.label()),
            );
        }
    }
    if let Some(h) = cues.hemisphere.as_ref() {
        if h.value == hemi {
            corroborate(
                h.line,
                h.scale,
                weights.hemi,
                format!("hemisphere '{}'", hemi.letter()),
            );
        }
    }
    match cues.units.as_ref() {
        Some(units) if units.value == Units::Meters => {
            corroborate(units.line, units.scale, weights.units_m, "meters unit".to_owned());
        }
        Some(units) => {
            // Feet count against a UTM interpretation, not for it.
            score += weights.units_ft * units.scale;
            reasons.push("feet unit conflicts with UTM".to_owned());
        }
        None => {}
    }

    if cues.zone.is_some() && cues.datum.is_none() {
        score += weights.no_datum;
    }
    if cues.ambiguous_datum {
        score += weights.ambig_datum;
    }

    let year = cues.year.as_ref().map(|c| c.value);
    let region = cues.region.as_ref().map(|c| c.value);
    let (prior, prior_reasons) = vintage_prior(family, year, region);
    score += prior;
    reasons.extend(prior_reasons);

    Scored {
        candidate: CrsCandidate {
            epsg: Some(epsg),
            label: utm_label(family, zone, hemi),
            score,
            cues: reasons,
        },
        cue_count,
        first_line,
    }
}

/// Acquisition-vintage and region priors per datum family. Small nudges
/// with human-readable reasons, never decisive on their own.
fn vintage_prior(family: Datum, year: Option<i32>, region: Option<Region>) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if let Some(year) = year {
        if year <= 1975 {
            if family == Datum::Nad27 {
                score += 2.0;
                reasons.push("vintage <=1975 favors NAD27".to_owned());
            }
            if family == Datum::Wgs84 {
                score -= 2.0;
                reasons.push("vintage <=1975 penalizes WGS84".to_owned());
            }
        } else if year <= 1990 {
            if matches!(family, Datum::Nad83 | Datum::Ed50) {
                score += 1.0;
                reasons.push("1976-1990 favors NAD83/ED50".to_owned());
            }
        } else {
            if matches!(family, Datum::Wgs84 | Datum::Etrs89) {
                score += 2.0;
                reasons.push(">=1991 favors WGS84/ETRS89".to_owned());
            }
            if family == Datum::Nad27 {
                score -= 2.0;
                reasons.push(">=1991 penalizes NAD27".to_owned());
            }
        }
    }

    match region {
        Some(Region::NorthAmerica) if family == Datum::Nad83 => {
            score += 1.0;
            reasons.push("region NA favors NAD83".to_owned());
        }
        Some(Region::Europe) if matches!(family, Datum::Etrs89 | Datum::Ed50) => {
            score += 1.0;
            reasons.push("region Europe favors ETRS89/ED50".to_owned());
        }
        Some(Region::MiddleEastIndia) if family == Datum::Wgs84 => {
            score += 1.0;
            reasons.push("region ME/India favors WGS84".to_owned());
        }
        _ => {}
    }

    (score, reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use segyrec_types::TextEncoding;

    fn header(lines: &[&str]) -> TextualHeader {
        let mut padded: Vec<String> = lines.iter().map(|l| format!("{l:<80}")).collect();
        padded.resize(40, " ".repeat(80));
        TextualHeader {
            lines: padded,
            encoding: TextEncoding::Ascii,
        }
    }

    fn solve_lines(lines: &[&str]) -> CrsSolution {
        solve(&header(lines), &CueWeights::default())
    }

    #[test]
    fn corroborated_candidate_outranks_single_cue() {
        let solution = solve_lines(&["C18 UTM ZONE 15 NORTH, METERS", "C19 WGS84"]);
        let best = solution.best().unwrap();
        assert_eq!(best.epsg, Some(32615));
        assert_eq!(best.label, "WGS84 / UTM zone 15N");
        // UTM + zone + datum + hemisphere + meters all contribute.
        assert!(best.cues.len() >= 5);
        // Any non-WGS84 candidate lacks the datum cue and scores strictly
        // lower.
        let runner_up = &solution.candidates[1];
        assert!(best.score > runner_up.score);
        assert!(best.score - runner_up.score >= CueWeights::default().datum - f64::EPSILON);
    }

    #[test]
    fn explicit_epsg_mention_yields_candidate() {
        let solution = solve_lines(&["C18 COORDINATE SYSTEM EPSG:32615"]);
        let best = solution.best().unwrap();
        assert_eq!(best.epsg, Some(32615));
        assert_eq!(best.label, "WGS84 / UTM zone 15N");
        assert!(best.cues.iter().any(|c| c.contains("explicit EPSG:32615")));
        // The code alone answers the question; no default-zone guessing.
        assert_eq!(solution.candidates.len(), 1);
        assert!(solution
            .diagnostics
            .notes
            .iter()
            .all(|n| !n.contains("default zone")));
    }

    #[test]
    fn explicit_epsg_outranks_inferred_combinations() {
        let solution = solve_lines(&[
            "C18 PROJECTION: EPSG:26714",
            "C19 UTM ZONE 14 NORTH, METERS",
        ]);
        let best = solution.best().unwrap();
        assert_eq!(best.epsg, Some(26714));
        assert_eq!(best.label, "NAD27 / UTM zone 14N");
        // No duplicate of the explicit combination in the inferred set,
        // and the explicit score clears the strongest inferred one by at
        // least the explicit-mention weight less the datum cue it lacks.
        assert_eq!(
            solution.candidates.iter().filter(|c| c.epsg == Some(26714)).count(),
            1
        );
        let runner_up = &solution.candidates[1];
        assert!(best.score > runner_up.score);
    }

    #[test]
    fn unrecognized_epsg_code_is_still_reported() {
        let solution = solve_lines(&["C18 HORIZONTAL CRS EPSG 4326"]);
        let best = solution.best().unwrap();
        assert_eq!(best.epsg, Some(4326));
        assert_eq!(best.label, "EPSG:4326");
    }

    #[test]
    fn no_cues_means_empty_with_note() {
        let solution = solve_lines(&["C01 CLIENT: ACME", "C02 RECORDED BY CREW 7"]);
        assert!(solution.candidates.is_empty());
        assert!(solution
            .diagnostics
            .notes
            .iter()
            .any(|n| n.contains("no coordinate-system cues")));
    }

    #[test]
    fn deterministic_ordering() {
        let lines = ["C18 UTM ZONE 31", "C20 AREA: NORTH SEA"];
        let a = solve_lines(&lines);
        let b = solve_lines(&lines);
        assert_eq!(a, b);
    }

    #[test]
    fn north_only_families_skip_southern_candidates() {
        let solution = solve_lines(&["C18 UTM ZONE 20 SOUTH, METERS"]);
        for candidate in &solution.candidates {
            assert!(
                candidate.label.starts_with("WGS84"),
                "unexpected southern candidate {}",
                candidate.label
            );
        }
    }

    #[test]
    fn zone_without_datum_is_penalized_and_noted() {
        let with_datum = solve_lines(&["C18 UTM ZONE 15 N", "C19 WGS84"]);
        let without = solve_lines(&["C18 UTM ZONE 15 N"]);
        assert!(without
            .diagnostics
            .notes
            .iter()
            .any(|n| n.contains("no datum")));
        assert!(with_datum.best().unwrap().score > without.best().unwrap().score);
    }

    #[test]
    fn feet_cue_scores_as_conflict() {
        let meters = solve_lines(&["C18 UTM ZONE 15 NORTH METERS", "C19 WGS84"]);
        let feet = solve_lines(&["C18 UTM ZONE 15 NORTH FEET", "C19 WGS84"]);
        assert!(meters.best().unwrap().score > feet.best().unwrap().score);
        assert!(feet.diagnostics.conflicts.iter().any(|c| c.contains("feet")));
    }

    #[test]
    fn vintage_prior_separates_old_and_new_datums() {
        let old = solve_lines(&["C18 UTM ZONE 14 NORTH, METERS", "C19 SHOT IN 1968"]);
        let labels: Vec<_> = old.candidates.iter().map(|c| c.label.as_str()).collect();
        let nad27 = labels.iter().position(|l| l.starts_with("NAD27")).unwrap();
        let wgs84 = labels.iter().position(|l| l.starts_with("WGS84")).unwrap();
        assert!(nad27 < wgs84, "1968 vintage should rank NAD27 above WGS84");
    }

    #[test]
    fn stoplisted_datum_counts_half() {
        let clean = solve_lines(&["C18 UTM ZONE 15 N", "C19 WGS84"]);
        let suppressed = solve_lines(&["C18 UTM ZONE 15 N", "C19 WGS84 PROPRIETARY DISCLAIMER"]);
        let delta =
            clean.best().unwrap().score - suppressed.best().unwrap().score;
        assert!((delta - CueWeights::default().datum * 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_zone_uses_default_and_notes_it() {
        let solution = solve_lines(&["C19 DATUM: WGS84 UTM COORDINATES IN METERS"]);
        let best = solution.best().unwrap();
        assert!(best.label.contains("zone 32"));
        assert!(solution.diagnostics.notes.iter().any(|n| n.contains("default zone")));
    }
}
