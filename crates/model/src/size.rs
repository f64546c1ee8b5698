//! Billable size computation and its wire encoding.

use std::collections::HashMap;

use photoshare_common::MIN_BILLABLE_REPRESENTATION_BYTES;

/// Bulk size result: asset id → total billable size.
pub type SizeMap = HashMap<String, u64>;

/// Billable size of one representation, floored at the minimum billing unit.
pub fn billable_size(length: u64) -> u64 {
    length.max(MIN_BILLABLE_REPRESENTATION_BYTES)
}

/// Billable size of an asset from the lengths of both representations.
///
/// # Arguments
/// * `original_length` - Byte length of the original representation
/// * `low_length` - Byte length of the low representation
pub fn total_billable_size(original_length: u64, low_length: u64) -> u64 {
    billable_size(original_length).saturating_add(billable_size(low_length))
}

/// Encode a single total size for the wire (little-endian u64).
pub fn encode_total_size(size: u64) -> [u8; 8] {
    size.to_le_bytes()
}

/// Decode a single total size from its wire form.
///
/// Returns None unless exactly eight bytes are supplied.
pub fn decode_total_size(bytes: &[u8]) -> Option<u64> {
    let array: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_le_bytes(array))
}
