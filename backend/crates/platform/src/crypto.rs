//! Secret comparison

/// Constant-time comparison to prevent timing attacks.
///
/// Only the length leaks; the position of the first differing byte does not.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
