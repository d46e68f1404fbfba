//! # Fingerprint Module
//!
//! Fixed-length binary fingerprints and the distance the selectors run on.
//!
//! A fingerprint is produced outside this crate (typically a 16x16 pHash,
//! i.e. 64 hex digits = 256 bits). The engine treats it as an opaque point
//! in Hamming space.
//!
//! ## Bit Layout
//! Bits are packed MSB-first. Each hex digit expands to four bits, so
//! `"a5"` is `1010 0101`.
//!
//! Serialized fingerprints are plain hex when `bit_len` is a multiple of
//! four. Other lengths append the bit count, `"ff8/9"`, so the length
//! survives a round trip.
//!
//! ## Example
//! ```rust
//! use smart_downsample::core::fingerprint::{normalized_distance, Fingerprint};
//!
//! let a: Fingerprint = "ff00".parse().unwrap();
//! let b: Fingerprint = "0f00".parse().unwrap();
//!
//! assert_eq!(a.bit_len(), 16);
//! assert_eq!(normalized_distance(&a, &b), 0.25);
//! ```

mod distance;

pub use distance::{hamming_distance, normalized_distance};

use crate::error::FingerprintError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-length binary vector summarizing one image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint {
    /// Packed bits, MSB-first; bits past `bit_len` are always zero
    bytes: Vec<u8>,
    /// Number of meaningful bits
    bit_len: usize,
}

impl Fingerprint {
    /// Build a fingerprint from individual bits
    pub fn from_bits(bits: &[bool]) -> Result<Self, FingerprintError> {
        if bits.is_empty() {
            return Err(FingerprintError::Empty);
        }

        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }

        Ok(Self {
            bytes,
            bit_len: bits.len(),
        })
    }

    /// Build a fingerprint from packed bytes, keeping the first `bit_len` bits
    pub fn from_bytes(bytes: &[u8], bit_len: usize) -> Result<Self, FingerprintError> {
        if bit_len == 0 {
            return Err(FingerprintError::Empty);
        }
        if bytes.len() * 8 < bit_len {
            return Err(FingerprintError::InsufficientBytes {
                bytes: bytes.len(),
                bit_len,
            });
        }

        let mut bytes = bytes[..bit_len.div_ceil(8)].to_vec();
        let tail_bits = bit_len % 8;
        if tail_bits != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - tail_bits);
            }
        }

        Ok(Self { bytes, bit_len })
    }

    /// Parse a hexadecimal hash string (4 bits per digit)
    pub fn from_hex(hex: &str) -> Result<Self, FingerprintError> {
        let hex = hex.trim();
        if hex.is_empty() {
            return Err(FingerprintError::Empty);
        }

        let digits = hex.chars().count();
        let mut bytes = vec![0u8; digits.div_ceil(2)];

        for (position, character) in hex.chars().enumerate() {
            let nibble = character
                .to_digit(16)
                .ok_or(FingerprintError::InvalidHex {
                    position,
                    character,
                })? as u8;

            if position % 2 == 0 {
                bytes[position / 2] |= nibble << 4;
            } else {
                bytes[position / 2] |= nibble;
            }
        }

        Ok(Self {
            bytes,
            bit_len: digits * 4,
        })
    }

    /// Parse the serialized form: hex, optionally followed by `/<bit_len>`
    pub fn parse_serialized(text: &str) -> Result<Self, FingerprintError> {
        let Some((hex, bits)) = text.trim().rsplit_once('/') else {
            return Self::from_hex(text);
        };

        let padded = Self::from_hex(hex)?;
        let bit_len = bits
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0 && n <= padded.bit_len && padded.bit_len - n < 4)
            .ok_or_else(|| FingerprintError::InvalidBitLength {
                value: bits.to_string(),
                digits: padded.bit_len / 4,
            })?;

        Self::from_bytes(&padded.bytes, bit_len)
    }

    /// Serialized form, the inverse of [`Fingerprint::parse_serialized`]
    pub fn to_serialized(&self) -> String {
        if self.bit_len % 4 == 0 {
            self.to_hex()
        } else {
            format!("{}/{}", self.to_hex(), self.bit_len)
        }
    }

    /// Number of bits in this fingerprint
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Value of bit `index` (0 = most significant bit of the first byte)
    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.bit_len, "bit index {index} out of range");
        self.bytes[index / 8] & (0x80 >> (index % 8)) != 0
    }

    /// Leading `count` bits as an integer (used for bucketing)
    pub fn prefix(&self, count: u32) -> u32 {
        let count = (count as usize).min(self.bit_len).min(32);
        (0..count).fold(0u32, |acc, i| (acc << 1) | u32::from(self.bit(i)))
    }

    /// Raw packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hexadecimal form, one digit per four bits (a short final group is zero-padded)
    pub fn to_hex(&self) -> String {
        let digits = self.bit_len.div_ceil(4);
        (0..digits)
            .map(|i| {
                let byte = self.bytes[i / 2];
                let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                char::from_digit(u32::from(nibble), 16).unwrap_or('0')
            })
            .collect()
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_serialized(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_serialized()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
