//! Coordinate-reference-system inference from textual header cues.
//!
//! Legacy headers rarely state a CRS outright; they drop hints (a UTM zone
//! here, a datum name there, a unit word somewhere else). This crate scans
//! for those hints, assembles internally-consistent candidates, and ranks
//! them with scores and full diagnostics. It never fails: no cues means an
//! empty candidate list with an explanatory note.

pub mod catalog;
pub mod cues;
pub mod solver;

pub use catalog::{utm_epsg, utm_label, Datum};
pub use cues::{scan_cues, CueSet, Hemisphere, Region, Units};
pub use solver::{solve, CueWeights};
