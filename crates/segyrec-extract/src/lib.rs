//! Heuristic field extraction from decoded textual headers, plus the
//! merge policy that combines baseline matchers with an optional external
//! extractor into a single audited record.

pub mod external;
pub mod matchers;
pub mod merge;
pub mod normalize;

pub use external::{ExternalExtractor, NullExtractor};
pub use matchers::{baseline_registry, run_baseline, FieldMatcher};
pub use merge::merge_candidates;
