//! # Smart Downsample
//!
//! Selects a fixed-size, maximally diverse subset of an image collection,
//! measured by perceptual fingerprints rather than pixels. Built for thinning
//! near-duplicate bursts (camera traps, burst mode) before labeling or
//! training.
//!
//! ## Core Philosophy
//! - **Exactly K** - returns the requested count whenever enough valid
//!   fingerprints exist, and everything otherwise
//! - **Reproducible** - same fingerprints, seed and mode give the same output
//! - **Identity preserving** - returns the caller's identifiers untouched
//!
//! ## Architecture
//! - `core` - The selection engine (fingerprints, selectors, orchestration)
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

/// Log a selection milestone at `info` when progress is visible, `debug` otherwise.
macro_rules! milestone {
    ($visible:expr, $($arg:tt)+) => {
        if $visible {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use crate::core::{select_distinct, Fingerprint, Selection, SelectionConfig, SelectionMode};
pub use error::{DownsampleError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG`
/// controls the filter; a second call is a no-op.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
