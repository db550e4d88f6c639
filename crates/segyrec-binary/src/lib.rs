//! Binary-header decoding and patching.
//!
//! Field offsets live in versioned constant tables (`layout`); the reader
//! (`reader`) and patch applier (`patch`) never hardcode an offset.

pub mod layout;
pub mod patch;
pub mod reader;

pub use layout::{field_spec, layout, FieldSpec};
pub use patch::apply_patches;
pub use reader::{decode_binary, encode_field, read_field};
