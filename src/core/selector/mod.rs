//! # Selector Module
//!
//! Farthest-point (k-center) greedy selection over fingerprints.
//!
//! ## Modes
//! - **Exact** - every candidate is measured against the whole selected
//!   set. Best diversity, suited to a few thousand fingerprints.
//! - **Rolling window** - every candidate is measured only against the last
//!   `window_size` selections. Per-step cost is bounded by the window, so it
//!   scales to hundreds of thousands of fingerprints. Two selections more
//!   than a window apart may be near-duplicates.
//!
//! ## Determinism
//! The start index is drawn from a `ChaCha8Rng` seeded with the caller's
//! seed over the ordered pool. Ties on the max-min distance go to the lowest
//! original index. Same fingerprints + same seed + same mode gives the same
//! output sequence.

mod cancel;
mod greedy;
mod pool;

pub use cancel::CancellationToken;
pub use greedy::{GreedySelector, StepSnapshot};
pub use pool::CandidatePool;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window size used when a mode is named without one
pub const DEFAULT_WINDOW_SIZE: usize = 100;

/// Which greedy variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SelectionMode {
    /// Compare against every selected fingerprint
    Exact,
    /// Compare against the most recent `window_size` selections
    RollingWindow { window_size: usize },
}

impl SelectionMode {
    /// Rolling-window mode with the given window
    pub fn rolling_window(window_size: usize) -> Self {
        SelectionMode::RollingWindow { window_size }
    }

    /// Parse a mode tag, attaching `window_size` when the tag is rolling window
    pub fn parse_with_window(name: &str, window_size: usize) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(SelectionMode::Exact),
            "rolling_window" | "rolling-window" => Ok(SelectionMode::rolling_window(window_size)),
            _ => Err(ConfigError::UnknownMode {
                name: name.to_string(),
            }),
        }
    }

    /// The mode tag
    pub fn name(&self) -> &'static str {
        match self {
            SelectionMode::Exact => "exact",
            SelectionMode::RollingWindow { .. } => "rolling_window",
        }
    }

    /// Window size, if this mode has one
    pub fn window_size(&self) -> Option<usize> {
        match self {
            SelectionMode::Exact => None,
            SelectionMode::RollingWindow { window_size } => Some(*window_size),
        }
    }

    /// Check mode-specific parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SelectionMode::RollingWindow { window_size: 0 } => {
                Err(ConfigError::InvalidWindowSize { value: 0 })
            }
            _ => Ok(()),
        }
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::rolling_window(DEFAULT_WINDOW_SIZE)
    }
}

impl FromStr for SelectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_window(s, DEFAULT_WINDOW_SIZE)
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Exact => write!(f, "exact"),
            SelectionMode::RollingWindow { window_size } => {
                write!(f, "rolling_window (window {})", window_size)
            }
        }
    }
}
