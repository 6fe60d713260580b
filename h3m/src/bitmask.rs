//! Bitmask codec: fixed-size bit runs decoded against a finite, ordered
//! enumeration.
//!
//! The file stores one bit per enumeration value, in enumeration order,
//! packed least-significant-bit first. Decoding yields the values whose
//! bit is set (or clear, for inverted masks) in enumeration order; bits
//! beyond the enumeration's size are reserved padding and never consulted.

use crate::error::Result;
use crate::reader::ByteReader;

/// Decode a bit array against an ordered set of values.
///
/// `bits` uses file bit order (index 0 = bit 0 of byte 0). The result
/// follows `values` order. `include_if_set` inverts membership when
/// `false`, which the format uses for "disabled" masks.
pub fn decode<T: Copy>(bits: &[bool], values: &[T], include_if_set: bool) -> Vec<T> {
    debug_assert!(values.len() <= bits.len());
    values
        .iter()
        .enumerate()
        .filter(|(index, _)| bits.get(*index).copied().unwrap_or(false) == include_if_set)
        .map(|(_, value)| *value)
        .collect()
}

/// Encode a subset of `values` into `byte_count` bytes, the exact inverse
/// of [`decode`]: bit `i` is set iff `values[i]` is in the subset.
/// Trailing bits are zero padding.
pub fn encode<T: Copy + PartialEq>(subset: &[T], values: &[T], byte_count: usize) -> Vec<u8> {
    debug_assert!(values.len() <= byte_count * 8);
    let mut bytes = vec![0u8; byte_count];
    for (index, value) in values.iter().enumerate() {
        if subset.contains(value) {
            bytes[index / 8] |= 1 << (index % 8);
        }
    }
    bytes
}

/// Read `byte_count` bytes and decode them against `values`.
pub fn read_enum_set<T: Copy>(
    reader: &mut ByteReader<'_>,
    byte_count: usize,
    values: &[T],
) -> Result<Vec<T>> {
    let bits = reader.read_bit_array(byte_count)?;
    Ok(decode(&bits, values, true))
}

/// Read `byte_count` bytes and decode the values whose bit is *clear*.
pub fn read_enum_set_inverted<T: Copy>(
    reader: &mut ByteReader<'_>,
    byte_count: usize,
    values: &[T],
) -> Result<Vec<T>> {
    let bits = reader.read_bit_array(byte_count)?;
    Ok(decode(&bits, values, false))
}
