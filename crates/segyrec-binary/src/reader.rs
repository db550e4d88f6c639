//! Binary header reader: 400 raw bytes → decoded integer fields.

use std::collections::BTreeMap;

use segyrec_error::{Result, SegyError};
use segyrec_types::{BinaryHeader, Endianness, LayoutRevision, BINARY_HEADER_BYTES};
use tracing::debug;

use crate::layout::{layout, FieldSpec};

/// Decode a 400-byte binary header with the given byte order and layout
/// revision. The raw buffer is retained in the result for later patching,
/// and the chosen endianness is echoed for downstream auditing.
pub fn decode_binary(
    raw: &[u8],
    endianness: Endianness,
    revision: LayoutRevision,
) -> Result<BinaryHeader> {
    if raw.len() < BINARY_HEADER_BYTES {
        return Err(SegyError::truncated_binary(raw.len()));
    }
    let raw = &raw[..BINARY_HEADER_BYTES];

    let mut fields = BTreeMap::new();
    for spec in layout(revision) {
        fields.insert(spec.name.to_owned(), read_field(raw, spec, endianness));
    }
    debug!(
        ?endianness,
        ?revision,
        field_count = fields.len(),
        "binary header decoded"
    );
    Ok(BinaryHeader {
        fields,
        raw: raw.to_vec(),
        endianness,
        revision,
    })
}

/// Decode one field out of a 400-byte buffer.
#[must_use]
pub fn read_field(raw: &[u8], spec: &FieldSpec, endianness: Endianness) -> i64 {
    let bytes = &raw[spec.offset..spec.offset + spec.width];
    let mut unsigned: u64 = 0;
    match endianness {
        Endianness::Big => {
            for &b in bytes {
                unsigned = (unsigned << 8) | u64::from(b);
            }
        }
        Endianness::Little => {
            for &b in bytes.iter().rev() {
                unsigned = (unsigned << 8) | u64::from(b);
            }
        }
    }
    if spec.signed {
        sign_extend(unsigned, spec.width)
    } else {
        unsigned as i64
    }
}

/// Encode a value into a field's width and byte order. Fails when the value
/// does not fit — no silent truncation.
pub fn encode_field(value: i64, spec: &FieldSpec, endianness: Endianness) -> Result<Vec<u8>> {
    let (min, max) = spec.value_bounds();
    if value < min || value > max {
        return Err(SegyError::Patch {
            field: spec.name.to_owned(),
            width: spec.width,
            value,
        });
    }
    let unsigned = value as u64;
    let mut bytes = vec![0u8; spec.width];
    match endianness {
        Endianness::Big => {
            for (i, byte) in bytes.iter_mut().enumerate() {
                *byte = (unsigned >> (8 * (spec.width - 1 - i))) as u8;
            }
        }
        Endianness::Little => {
            for (i, byte) in bytes.iter_mut().enumerate() {
                *byte = (unsigned >> (8 * i)) as u8;
            }
        }
    }
    Ok(bytes)
}

fn sign_extend(unsigned: u64, width: usize) -> i64 {
    let shift = 64 - width * 8;
    ((unsigned << shift) as i64) >> shift
}
