//! # Core Module
//!
//! The diversity-selection engine.
//!
//! ## Modules
//! - `fingerprint` - Binary fingerprints and Hamming distance
//! - `selector` - Exact and rolling-window greedy selectors
//! - `pipeline` - Validates input and orchestrates one selection call
//! - `bucketed` - Proportional selection over fingerprint buckets
//! - `manifest` - Reads precomputed fingerprints for the CLI

pub mod bucketed;
pub mod fingerprint;
pub mod manifest;
pub mod pipeline;
pub mod selector;

// Re-export commonly used types
pub use bucketed::{select_bucketed, BucketConfig, BucketStats, BucketedResult};
pub use fingerprint::{hamming_distance, normalized_distance, Fingerprint};
pub use manifest::{Manifest, ManifestEntry};
pub use pipeline::{select_distinct, Selection, SelectionConfig, SelectionResult, SelectionStats};
pub use selector::{CancellationToken, SelectionMode};
