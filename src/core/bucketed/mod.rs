//! # Bucketed Module
//!
//! Proportional selection over fingerprint buckets.
//!
//! ## How It Works
//! 1. Group fingerprints by their leading `bucket_bits` bits (a band prefix,
//!    so near-identical fingerprints usually share a bucket)
//! 2. Split the target across buckets in proportion to bucket size
//!    (largest-remainder rounding)
//! 3. Run the greedy selector independently inside every bucket, in parallel
//! 4. Concatenate the picks in bucket-key order
//!
//! Every bucket is guaranteed representation proportional to its size, at the
//! cost of no diversity checks across bucket boundaries.

mod allocation;

pub use allocation::allocate_proportional;

use crate::core::fingerprint::Fingerprint;
use crate::core::pipeline::{validate_fingerprints, SelectionConfig, SelectionStats};
use crate::core::selector::GreedySelector;
use crate::error::{ConfigError, InputError, Result, SelectionError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Default number of leading bits used as the bucket key
pub const DEFAULT_BUCKET_BITS: u32 = 4;

/// Configuration for bucketed selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Leading bits that form the bucket key (1-16)
    pub bucket_bits: u32,
    /// Selection applied inside each bucket; `target_count` is the overall target
    pub selection: SelectionConfig,
}

impl BucketConfig {
    pub fn new(bucket_bits: u32, selection: SelectionConfig) -> Self {
        Self {
            bucket_bits,
            selection,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(1..=16).contains(&self.bucket_bits) {
            return Err(ConfigError::InvalidBucketBits {
                value: self.bucket_bits,
            });
        }
        self.selection.validate()
    }
}

/// Per-bucket counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    /// Bucket key (leading bits of its fingerprints)
    pub key: u32,
    /// Fingerprints in the bucket
    pub original_size: usize,
    /// Fingerprints selected from the bucket
    pub kept: usize,
    /// Fingerprints left out
    pub excluded: usize,
    /// Average number of bucket members per kept member (0 when none kept)
    pub stride: f64,
}

impl BucketStats {
    fn new(key: u32, original_size: usize, kept: usize) -> Self {
        let stride = if kept == 0 {
            0.0
        } else {
            original_size as f64 / kept as f64
        };
        Self {
            key,
            original_size,
            kept,
            excluded: original_size - kept,
            stride,
        }
    }
}

/// Outcome of a bucketed selection
#[derive(Debug, Clone)]
pub struct BucketedResult<T> {
    /// Selected identifiers, grouped by bucket key, selection order within a bucket
    pub selected: Vec<T>,
    /// Input positions of `selected`
    pub indices: Vec<usize>,
    /// Overall counters
    pub stats: SelectionStats,
    /// Counters for every non-empty bucket, ordered by key
    pub buckets: Vec<BucketStats>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Select `config.selection.target_count` entries with proportional bucket shares
pub fn select_bucketed<T: Clone + Send + Sync>(
    items: &[T],
    fingerprints: &[Fingerprint],
    config: &BucketConfig,
) -> Result<BucketedResult<T>> {
    let start_time = Instant::now();

    config.validate()?;
    if items.len() != fingerprints.len() {
        return Err(InputError::LengthMismatch {
            identifiers: items.len(),
            fingerprints: fingerprints.len(),
        }
        .into());
    }
    validate_fingerprints(fingerprints)?;

    let mut grouped: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, fingerprint) in fingerprints.iter().enumerate() {
        grouped
            .entry(fingerprint.prefix(config.bucket_bits))
            .or_default()
            .push(index);
    }
    let buckets: Vec<(u32, Vec<usize>)> = grouped.into_iter().collect();

    let sizes: Vec<usize> = buckets.iter().map(|(_, members)| members.len()).collect();
    let shares = allocate_proportional(&sizes, config.selection.target_count);

    let selection = &config.selection;
    milestone!(
        selection.show_progress,
        buckets = buckets.len(),
        total = fingerprints.len(),
        target = selection.target_count,
        "selecting across fingerprint buckets"
    );

    let picks: Vec<Vec<usize>> = buckets
        .par_iter()
        .zip(shares.par_iter())
        .map(|((key, members), &share)| -> std::result::Result<Vec<usize>, SelectionError> {
            let local: Vec<Fingerprint> =
                members.iter().map(|&i| fingerprints[i].clone()).collect();
            let chosen = GreedySelector::new(&local, bucket_seed(selection.seed, *key))
                .select(share, selection.mode)?;
            Ok(chosen.into_iter().map(|position| members[position]).collect())
        })
        .collect::<std::result::Result<_, SelectionError>>()?;

    let bucket_stats: Vec<BucketStats> = buckets
        .iter()
        .zip(&picks)
        .map(|((key, members), kept)| BucketStats::new(*key, members.len(), kept.len()))
        .collect();

    for bucket in &bucket_stats {
        milestone!(
            selection.show_progress,
            key = bucket.key,
            size = bucket.original_size,
            kept = bucket.kept,
            stride = bucket.stride,
            "bucket selected"
        );
    }

    let indices: Vec<usize> = picks.into_iter().flatten().collect();
    let selected = indices.iter().map(|&i| items[i].clone()).collect();
    let stats = SelectionStats::new(
        fingerprints.len(),
        selection.target_count,
        indices.len(),
        selection.mode,
    );

    Ok(BucketedResult {
        selected,
        indices,
        stats,
        buckets: bucket_stats,
        duration_ms: start_time.elapsed().as_millis() as u64,
    })
}

/// Independent, reproducible seed for one bucket
fn bucket_seed(seed: u64, key: u32) -> u64 {
    seed ^ u64::from(key).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
