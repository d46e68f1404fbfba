//! # Error Module
//!
//! Error types for the diversity-selection engine.
//!
//! ## Design Principles
//! - **Fail before work** - configuration problems are reported before any selection step
//! - **Include context** - indices, lengths, offending values
//! - **Shortfall is not an error** - too few fingerprints degrades to "select everything"

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DownsampleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Invalid selection parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown selection mode: {name} (use 'exact' or 'rolling_window')")]
    UnknownMode { name: String },

    #[error("Invalid target count: {value} (must be at least 1)")]
    InvalidTargetCount { value: usize },

    #[error("Invalid window size: {value} (must be at least 1)")]
    InvalidWindowSize { value: usize },

    #[error("Invalid bucket bits: {value} (must be 1-16)")]
    InvalidBucketBits { value: u32 },
}

/// Inputs that violate the engine's contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Got {identifiers} identifiers but {fingerprints} fingerprints")]
    LengthMismatch {
        identifiers: usize,
        fingerprints: usize,
    },

    #[error("Fingerprint {index} has {found} bits, expected {expected}")]
    FingerprintLengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors building a fingerprint from its textual form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("Fingerprint is empty")]
    Empty,

    #[error("Invalid hex digit '{character}' at position {position}")]
    InvalidHex { position: usize, character: char },

    #[error("Bit length '{value}' does not fit {digits} hex digits")]
    InvalidBitLength { value: String, digits: usize },

    #[error("{bytes} bytes cannot hold {bit_len} bits")]
    InsufficientBytes { bytes: usize, bit_len: usize },
}

/// Errors raised while a selection is running
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection was cancelled")]
    Cancelled,
}

/// Errors reading a fingerprint manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Malformed JSON manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DownsampleError>;
