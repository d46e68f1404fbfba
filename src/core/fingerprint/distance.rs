//! Hamming distance over fingerprints.

use super::Fingerprint;

/// Number of bit positions at which two fingerprints differ
///
/// Both fingerprints must have the same length; comparing fingerprints of
/// different lengths is a contract violation (checked in debug builds).
pub fn hamming_distance(a: &Fingerprint, b: &Fingerprint) -> u32 {
    debug_assert_eq!(
        a.bit_len(),
        b.bit_len(),
        "hamming distance requires equal-length fingerprints"
    );

    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

/// Fraction of differing bit positions, in `[0, 1]`
pub fn normalized_distance(a: &Fingerprint, b: &Fingerprint) -> f64 {
    if a.bit_len() == 0 {
        return 0.0;
    }
    f64::from(hamming_distance(a, b)) / a.bit_len() as f64
}
