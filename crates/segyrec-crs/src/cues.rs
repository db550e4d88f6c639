//! Cue scanning: one pass over the 40 textual lines, collecting every
//! coordinate-system signal with the line it came from and the weight it
//! will carry in scoring.
//!
//! Cues found on boilerplate lines (legal disclaimers, confidentiality
//! notices) carry half weight; the suppression is noted in diagnostics so a
//! reviewer can see why a signal was discounted.

use std::sync::LazyLock;

use regex::Regex;
use segyrec_types::{MatchedCue, TextualHeader};

use crate::solver::CueWeights;

/// UTM hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }
}

/// Horizontal distance units mentioned in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Meters,
    Feet,
}

/// Coarse geographic region, used only as a scoring prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Europe,
    NorthAmerica,
    MiddleEastIndia,
}

/// One detected cue: its value, the 1-based line it appeared on, and the
/// weight scale (1.0 normally, 0.5 on a stoplisted line).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue<T> {
    pub value: T,
    pub line: u32,
    pub scale: f64,
}

/// Everything the scan found. First occurrence wins per category; repeat
/// mentions that disagree are flagged instead of overwriting.
#[derive(Debug, Clone, Default)]
pub struct CueSet {
    /// Explicit `EPSG:nnnnn` mention, the strongest cue a header can carry.
    pub epsg: Option<Cue<u32>>,
    pub utm: Option<Cue<()>>,
    pub zone: Option<Cue<u8>>,
    pub hemisphere: Option<Cue<Hemisphere>>,
    pub datum: Option<Cue<crate::catalog::Datum>>,
    pub units: Option<Cue<Units>>,
    pub year: Option<Cue<i32>>,
    pub region: Option<Cue<Region>>,
    /// Disagreeing datum mentions were seen on different lines.
    pub ambiguous_datum: bool,
    /// Both meter and feet cues were seen.
    pub unit_conflict: bool,
    pub matched: Vec<MatchedCue>,
    pub notes: Vec<String>,
}

impl CueSet {
    /// True when no cue category matched at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.epsg.is_none()
            && self.utm.is_none()
            && self.zone.is_none()
            && self.hemisphere.is_none()
            && self.datum.is_none()
            && self.units.is_none()
    }
}

/// Boilerplate phrases marking low-information lines.
const STOPLIST: [&str; 7] = [
    "DISCLAIMER",
    "NO WARRANTY",
    "PROPRIETARY",
    "CONFIDENTIAL",
    "ALL RIGHTS RESERVED",
    "FOR INFORMATION ONLY",
    "LIABILITY",
];

/// A UTM zone number, required to sit in ZONE/UTM context so stray small
/// numbers (sample counts, card numbers) are not mistaken for zones.
static ZONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:ZONE|UTM)\D{0,8}?\b([1-9]|[1-5][0-9]|60)\s*([NS])?\b")
        .expect("static zone pattern")
});

static EPSG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"EPSG\s*[:#]?\s*(\d{4,5})\b").expect("static epsg pattern"));

static UTM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bUTM\b|UNIVERSAL\s+TRANSVERSE\s+MERCATOR").expect("static utm pattern")
});

static HEMI_N_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bN\b|\bNORTH\b|\bNORTHERN\b").expect("static hemi pattern"));
static HEMI_S_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bS\b|\bSOUTH\b|\bSOUTHERN\b").expect("static hemi pattern"));

static UNITS_M_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bM\b|\bMETERS?\b|\bMETRES?\b").expect("static units pattern")
});
static UNITS_FT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bFT\b|\bFEET\b|\bFOOT\b|US\s+SURVEY\s+FOOT").expect("static units pattern")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("static year pattern"));

const EUROPE_HINTS: [&str; 9] = [
    "NORTH SEA",
    "NORWAY",
    "UK",
    "UNITED KINGDOM",
    "GERMANY",
    "FRANCE",
    "NETHERLANDS",
    "DENMARK",
    "POLAND",
];
const NA_HINTS: [&str; 5] = ["GULF OF MEXICO", "USA", "UNITED STATES", "CANADA", "MEXICO"];
const ME_INDIA_HINTS: [&str; 6] = ["KUWAIT", "KSA", "SAUDI ARABIA", "UAE", "OMAN", "INDIA"];

/// Uppercase and collapse runs of whitespace, so multi-word aliases match
/// across the fixed-width column padding.
fn normalize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last_space = true;
    for ch in line.trim().chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch.to_ascii_uppercase());
            last_space = false;
        }
    }
    out
}

/// Scan all lines of `header` for CRS cues.
#[must_use]
pub fn scan_cues(header: &TextualHeader, weights: &CueWeights) -> CueSet {
    let mut set = CueSet::default();

    for (idx, raw) in header.lines.iter().enumerate() {
        let lineno = idx as u32 + 1;
        let line = normalize(raw);
        if line.is_empty() {
            continue;
        }

        let stoplisted = STOPLIST.iter().any(|phrase| line.contains(phrase));
        let scale = if stoplisted { 0.5 } else { 1.0 };
        let mut suppressed: Vec<String> = Vec::new();
        let mut record = |set: &mut CueSet, token: String, weight: f64| {
            if stoplisted {
                suppressed.push(token.clone());
            }
            set.matched.push(MatchedCue {
                token,
                weight: weight * scale,
                line: lineno,
            });
        };

        if set.epsg.is_none() {
            if let Some(caps) = EPSG_RE.captures(&line) {
                if let Ok(code) = caps[1].parse::<u32>() {
                    set.epsg = Some(Cue { value: code, line: lineno, scale });
                    record(&mut set, format!("EPSG:{code}"), weights.epsg);
                }
            }
        }

        if set.utm.is_none() && UTM_RE.is_match(&line) {
            set.utm = Some(Cue { value: (), line: lineno, scale });
            record(&mut set, "UTM".to_owned(), weights.utm);
        }

        if let Some(caps) = ZONE_RE.captures(&line) {
            if let Ok(zone) = caps[1].parse::<u8>() {
                if set.zone.is_none() {
                    set.zone = Some(Cue { value: zone, line: lineno, scale });
                    let suffix = caps.get(2).map_or("", |m| m.as_str());
                    record(&mut set, format!("ZONE {zone}{suffix}"), weights.zone);
                }
                if let Some(h) = caps.get(2) {
                    let hemi = if h.as_str() == "S" { Hemisphere::South } else { Hemisphere::North };
                    if set.hemisphere.is_none() {
                        set.hemisphere = Some(Cue { value: hemi, line: lineno, scale });
                        record(&mut set, format!("HEMI {}", hemi.letter()), weights.hemi);
                    }
                }
            }
        }

        if set.hemisphere.is_none() {
            let hemi = if HEMI_N_RE.is_match(&line) {
                Some(Hemisphere::North)
            } else if HEMI_S_RE.is_match(&line) {
                Some(Hemisphere::South)
            } else {
                None
            };
            if let Some(hemi) = hemi {
                set.hemisphere = Some(Cue { value: hemi, line: lineno, scale });
                record(&mut set, format!("HEMI {}", hemi.letter()), weights.hemi);
            }
        }

        for datum in crate::catalog::Datum::ALL {
            if datum.aliases().iter().any(|alias| line.contains(alias)) {
                match &set.datum {
                    Some(existing) if existing.value != datum => {
                        if !set.ambiguous_datum {
                            set.notes.push(format!(
                                "multiple datums mentioned: {} and {}",
                                existing.value.label(),
                                datum.label()
                            ));
                            set.ambiguous_datum = true;
                        }
                    }
                    Some(_) => {}
                    None => {
                        set.datum = Some(Cue { value: datum, line: lineno, scale });
                        record(&mut set, datum.label().to_owned(), weights.datum);
                    }
                }
            }
        }

        let meters = UNITS_M_RE.is_match(&line);
        let feet = UNITS_FT_RE.is_match(&line);
        if meters || feet {
            let unit = if feet { Units::Feet } else { Units::Meters };
            match &set.units {
                Some(existing) if existing.value != unit => {
                    if !set.unit_conflict {
                        set.notes.push("conflicting unit cues: meters and feet".to_owned());
                        set.unit_conflict = true;
                    }
                }
                Some(_) => {}
                None => {
                    set.units = Some(Cue { value: unit, line: lineno, scale });
                    let (token, weight) = match unit {
                        Units::Meters => ("UNITS M", weights.units_m),
                        Units::Feet => ("UNITS FT", weights.units_ft),
                    };
                    record(&mut set, token.to_owned(), weight);
                }
            }
        }

        if set.year.is_none() {
            if let Some(caps) = YEAR_RE.captures(&line) {
                if let Ok(year) = caps[1].parse::<i32>() {
                    set.year = Some(Cue { value: year, line: lineno, scale });
                    record(&mut set, format!("YEAR {year}"), 0.5);
                }
            }
        }

        if set.region.is_none() {
            let region = if EUROPE_HINTS.iter().any(|h| line.contains(h)) {
                Some((Region::Europe, "REGION EUROPE"))
            } else if NA_HINTS.iter().any(|h| line.contains(h)) {
                Some((Region::NorthAmerica, "REGION NA"))
            } else if ME_INDIA_HINTS.iter().any(|h| line.contains(h)) {
                Some((Region::MiddleEastIndia, "REGION ME_INDIA"))
            } else {
                None
            };
            if let Some((region, token)) = region {
                set.region = Some(Cue { value: region, line: lineno, scale });
                record(&mut set, token.to_owned(), 0.5);
            }
        }

        for token in suppressed {
            set.notes.push(format!(
                "cue '{token}' on boilerplate line {lineno} carries half weight"
            ));
        }
    }

    set
}
