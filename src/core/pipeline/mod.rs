//! # Pipeline Module
//!
//! Orchestrates one selection call.
//!
//! ## Stages
//! 1. **Configure** - target count, mode and window are validated when the
//!    selection is built, before any fingerprint is looked at
//! 2. **Validate input** - identifier/fingerprint counts and fingerprint
//!    lengths must agree
//! 3. **Short-circuit** - when there are no more fingerprints than the
//!    target, every input is returned in input order
//! 4. **Select** - the configured greedy selector runs with the caller's seed
//!
//! ## Example
//! ```rust
//! use smart_downsample::core::fingerprint::Fingerprint;
//! use smart_downsample::core::pipeline::Selection;
//! use smart_downsample::core::selector::SelectionMode;
//!
//! let paths = vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"];
//! let fingerprints: Vec<Fingerprint> = ["00", "01", "fe", "ff"]
//!     .iter()
//!     .map(|hex| hex.parse().unwrap())
//!     .collect();
//!
//! let selection = Selection::builder()
//!     .target_count(2)
//!     .mode(SelectionMode::Exact)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let result = selection.run(&paths, &fingerprints).unwrap();
//! assert_eq!(result.selected.len(), 2);
//! ```

mod executor;

pub use executor::{
    select_distinct, validate_fingerprints, Selection, SelectionBuilder, SelectionConfig,
    SelectionResult, SelectionStats, DEFAULT_SEED,
};
