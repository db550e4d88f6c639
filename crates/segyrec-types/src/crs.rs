//! Coordinate-reference-system candidates produced by the CRS solver.

use serde::{Deserialize, Serialize};

/// A cue string found in the textual header, with the weight it carried and
/// the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedCue {
    pub token: String,
    pub weight: f64,
    pub line: u32,
}

/// One internally-consistent combination of CRS cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsCandidate {
    /// Formal identifier when one can be resolved (e.g. 32615 for
    /// WGS84 / UTM zone 15N); `None` for descriptive-label-only candidates.
    pub epsg: Option<u32>,
    /// Human-readable label, always present.
    pub label: String,
    pub score: f64,
    /// Supporting cue strings, in the order they contributed.
    pub cues: Vec<String>,
}

/// Caveats and bookkeeping from a solver run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrsDiagnostics {
    /// Every cue that matched, including down-weighted and discarded ones.
    pub matched: Vec<MatchedCue>,
    /// Internally inconsistent cue combinations (e.g. "feet with UTM").
    pub conflicts: Vec<String>,
    /// Free-text caveats: ambiguity warnings, stoplist suppressions,
    /// absence explanations.
    pub notes: Vec<String>,
}

/// Ranked CRS candidates (descending score) plus diagnostics. Produced
/// fresh per request; never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrsSolution {
    pub candidates: Vec<CrsCandidate>,
    pub diagnostics: CrsDiagnostics,
}

impl CrsSolution {
    /// Highest-scoring candidate, if any cues were found.
    #[must_use]
    pub fn best(&self) -> Option<&CrsCandidate> {
        self.candidates.first()
    }
}
