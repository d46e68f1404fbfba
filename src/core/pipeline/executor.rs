//! Selection orchestration.

use crate::core::fingerprint::Fingerprint;
use crate::core::selector::{CancellationToken, GreedySelector, SelectionMode, DEFAULT_WINDOW_SIZE};
use crate::error::{ConfigError, InputError, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 42;

/// Configuration for one selection call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Number of fingerprints to keep
    pub target_count: usize,
    /// Greedy variant to run
    pub mode: SelectionMode,
    /// Seed for the start pick
    pub seed: u64,
    /// Log milestones at `info` instead of `debug`; never affects output
    pub show_progress: bool,
}

impl SelectionConfig {
    /// Configuration with defaults for everything but the target
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            ..Self::default()
        }
    }

    /// Reject parameters no selection could run with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.target_count == 0 {
            return Err(ConfigError::InvalidTargetCount {
                value: self.target_count,
            });
        }
        self.mode.validate()
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_count: 0,
            mode: SelectionMode::default(),
            seed: DEFAULT_SEED,
            show_progress: false,
        }
    }
}

/// Aggregate counters for one selection call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    /// Fingerprints handed to the engine
    pub considered: usize,
    /// Target count asked for
    pub requested: usize,
    /// Entries returned
    pub selected: usize,
    /// Fingerprints left out
    pub excluded: usize,
    /// How many fewer than requested were returned
    pub shortfall: usize,
    /// Mode the selection ran with
    pub mode: SelectionMode,
}

impl SelectionStats {
    pub(crate) fn new(
        considered: usize,
        requested: usize,
        selected: usize,
        mode: SelectionMode,
    ) -> Self {
        Self {
            considered,
            requested,
            selected,
            excluded: considered.saturating_sub(selected),
            shortfall: requested.saturating_sub(selected),
            mode,
        }
    }
}

/// Outcome of a selection call
#[derive(Debug, Clone)]
pub struct SelectionResult<T> {
    /// Selected identifiers, in selection order
    pub selected: Vec<T>,
    /// Input positions of `selected`
    pub indices: Vec<usize>,
    /// Counters for reporting
    pub stats: SelectionStats,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl<T> SelectionResult<T> {
    /// Whether fewer entries than requested were available
    pub fn is_short(&self) -> bool {
        self.stats.shortfall > 0
    }
}

/// Builder for a [`Selection`]
pub struct SelectionBuilder {
    config: SelectionConfig,
    window_size: usize,
    cancellation: Option<CancellationToken>,
    pending_error: Option<ConfigError>,
}

impl SelectionBuilder {
    pub fn new() -> Self {
        Self {
            config: SelectionConfig::default(),
            window_size: DEFAULT_WINDOW_SIZE,
            cancellation: None,
            pending_error: None,
        }
    }

    /// Set the number of fingerprints to keep
    pub fn target_count(mut self, target_count: usize) -> Self {
        self.config.target_count = target_count;
        self
    }

    /// Set the selection mode
    pub fn mode(mut self, mode: SelectionMode) -> Self {
        if let Some(window_size) = mode.window_size() {
            self.window_size = window_size;
        }
        self.config.mode = mode;
        self.pending_error = None;
        self
    }

    /// Set the selection mode from its tag (`exact` or `rolling_window`)
    ///
    /// An unknown tag is reported by [`SelectionBuilder::build`] unless a later
    /// `mode` or `mode_name` call replaces it.
    pub fn mode_name(mut self, name: &str) -> Self {
        match SelectionMode::parse_with_window(name, self.window_size) {
            Ok(mode) => {
                self.config.mode = mode;
                self.pending_error = None;
            }
            Err(error) => self.pending_error = Some(error),
        }
        self
    }

    /// Set the rolling window size (ignored by exact mode)
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        if let SelectionMode::RollingWindow { .. } = self.config.mode {
            self.config.mode = SelectionMode::rolling_window(window_size);
        }
        self
    }

    /// Set the seed for the start pick
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Log milestones at `info` level
    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Allow the selection to be stopped between steps
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Validate the configuration and build the selection
    pub fn build(self) -> std::result::Result<Selection, ConfigError> {
        if let Some(error) = self.pending_error {
            return Err(error);
        }
        self.config.validate()?;

        Ok(Selection {
            config: self.config,
            cancellation: self.cancellation,
        })
    }
}

impl Default for SelectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated, reusable selection
#[derive(Debug, Clone)]
pub struct Selection {
    config: SelectionConfig,
    cancellation: Option<CancellationToken>,
}

impl Selection {
    /// Create a new selection builder
    pub fn builder() -> SelectionBuilder {
        SelectionBuilder::new()
    }

    /// Build a selection from an existing configuration
    pub fn from_config(config: SelectionConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancellation: None,
        })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Select from `items`, where `fingerprints[i]` belongs to `items[i]`
    ///
    /// Returned identifiers are clones of the inputs, never derived forms.
    pub fn run<T: Clone>(
        &self,
        items: &[T],
        fingerprints: &[Fingerprint],
    ) -> Result<SelectionResult<T>> {
        let start_time = Instant::now();

        if items.len() != fingerprints.len() {
            return Err(InputError::LengthMismatch {
                identifiers: items.len(),
                fingerprints: fingerprints.len(),
            }
            .into());
        }

        let indices = self.select_indices(fingerprints)?;
        let selected = indices.iter().map(|&i| items[i].clone()).collect();
        let stats = SelectionStats::new(
            fingerprints.len(),
            self.config.target_count,
            indices.len(),
            self.config.mode,
        );

        let duration_ms = start_time.elapsed().as_millis() as u64;
        milestone!(
            self.config.show_progress,
            selected = stats.selected,
            excluded = stats.excluded,
            duration_ms,
            "selection complete"
        );

        Ok(SelectionResult {
            selected,
            indices,
            stats,
            duration_ms,
        })
    }

    /// Select input positions in selection order
    pub fn select_indices(&self, fingerprints: &[Fingerprint]) -> Result<Vec<usize>> {
        validate_fingerprints(fingerprints)?;

        let total = fingerprints.len();
        let target = self.config.target_count;

        if total <= target {
            milestone!(
                self.config.show_progress,
                total,
                target,
                "input has no more fingerprints than the target, returning all"
            );
            if total < target {
                tracing::warn!(total, target, "fewer fingerprints than requested");
            }
            return Ok((0..total).collect());
        }

        milestone!(
            self.config.show_progress,
            total,
            target,
            mode = %self.config.mode,
            "selecting most diverse fingerprints"
        );

        let mut selector = GreedySelector::new(fingerprints, self.config.seed);
        if let Some(token) = &self.cancellation {
            selector = selector.with_cancellation(token.clone());
        }

        Ok(selector.select(target, self.config.mode)?)
    }
}

/// All fingerprints must share the first fingerprint's bit length
pub fn validate_fingerprints(fingerprints: &[Fingerprint]) -> std::result::Result<(), InputError> {
    let Some(first) = fingerprints.first() else {
        return Ok(());
    };
    let expected = first.bit_len();

    match fingerprints
        .iter()
        .enumerate()
        .find(|(_, fingerprint)| fingerprint.bit_len() != expected)
    {
        Some((index, fingerprint)) => Err(InputError::FingerprintLengthMismatch {
            index,
            expected,
            found: fingerprint.bit_len(),
        }),
        None => Ok(()),
    }
}

/// Select the `config.target_count` most diverse entries of `items`
pub fn select_distinct<T: Clone>(
    items: &[T],
    fingerprints: &[Fingerprint],
    config: SelectionConfig,
) -> Result<SelectionResult<T>> {
    Selection::from_config(config)?.run(items, fingerprints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DownsampleError, SelectionError};
    use std::path::PathBuf;

    fn fp(hex: &str) -> Fingerprint {
        Fingerprint::from_hex(hex).unwrap()
    }

    fn halves() -> (Vec<String>, Vec<Fingerprint>) {
        let paths = (0..10).map(|i| format!("/traps/cam01/IMG_{i:04}.jpg")).collect();
        let mut fingerprints = vec![fp("00"); 5];
        fingerprints.extend(vec![fp("ff"); 5]);
        (paths, fingerprints)
    }

    #[test]
    fn builder_defaults_to_rolling_window() {
        let selection = Selection::builder().target_count(5).build().unwrap();

        assert_eq!(selection.config().mode, SelectionMode::rolling_window(100));
        assert_eq!(selection.config().seed, DEFAULT_SEED);
        assert!(!selection.config().show_progress);
    }

    #[test]
    fn builder_rejects_zero_target() {
        let error = Selection::builder().target_count(0).build().unwrap_err();
        assert_eq!(error, ConfigError::InvalidTargetCount { value: 0 });
    }

    #[test]
    fn builder_rejects_zero_window() {
        let error = Selection::builder()
            .target_count(3)
            .mode_name("rolling_window")
            .window_size(0)
            .build()
            .unwrap_err();
        assert_eq!(error, ConfigError::InvalidWindowSize { value: 0 });
    }

    #[test]
    fn builder_rejects_unknown_mode_name() {
        let error = Selection::builder()
            .target_count(3)
            .mode_name("clustered")
            .build()
            .unwrap_err();
        assert!(matches!(error, ConfigError::UnknownMode { .. }));
    }

    #[test]
    fn later_mode_replaces_unknown_mode_name() {
        let selection = Selection::builder()
            .target_count(3)
            .mode_name("clustered")
            .mode(SelectionMode::Exact)
            .build()
            .unwrap();
        assert_eq!(selection.config().mode, SelectionMode::Exact);

        let selection = Selection::builder()
            .target_count(3)
            .mode_name("clustered")
            .mode_name("rolling-window")
            .build()
            .unwrap();
        assert_eq!(
            selection.config().mode,
            SelectionMode::rolling_window(DEFAULT_WINDOW_SIZE)
        );
    }

    #[test]
    fn window_size_applies_in_either_order() {
        let before = Selection::builder()
            .target_count(3)
            .window_size(7)
            .mode_name("rolling_window")
            .build()
            .unwrap();
        let after = Selection::builder()
            .target_count(3)
            .mode_name("rolling_window")
            .window_size(7)
            .build()
            .unwrap();

        assert_eq!(before.config().mode, SelectionMode::rolling_window(7));
        assert_eq!(after.config().mode, SelectionMode::rolling_window(7));
    }

    #[test]
    fn exact_window_size_is_ignored() {
        let selection = Selection::builder()
            .target_count(3)
            .mode(SelectionMode::Exact)
            .window_size(0)
            .build()
            .unwrap();
        assert_eq!(selection.config().mode, SelectionMode::Exact);
    }

    #[test]
    fn fewer_inputs_than_target_returns_all_in_order() {
        let paths = vec!["c.jpg", "a.jpg", "b.jpg"];
        let fingerprints = vec![fp("01"), fp("02"), fp("03")];
        let selection = Selection::builder().target_count(5).build().unwrap();

        let result = selection.run(&paths, &fingerprints).unwrap();

        assert_eq!(result.selected, paths);
        assert_eq!(result.indices, vec![0, 1, 2]);
        assert!(result.is_short());
        assert_eq!(result.stats.shortfall, 2);
        assert_eq!(result.stats.excluded, 0);
    }

    #[test]
    fn equal_inputs_and_target_is_not_short() {
        let paths = vec!["a.jpg", "b.jpg"];
        let fingerprints = vec![fp("01"), fp("02")];
        let selection = Selection::builder().target_count(2).build().unwrap();

        let result = selection.run(&paths, &fingerprints).unwrap();

        assert_eq!(result.selected, paths);
        assert!(!result.is_short());
    }

    #[test]
    fn selects_one_from_each_half() {
        let (paths, fingerprints) = halves();
        let selection = Selection::builder()
            .target_count(2)
            .mode(SelectionMode::Exact)
            .build()
            .unwrap();

        let result = selection.run(&paths, &fingerprints).unwrap();

        assert_eq!(result.selected.len(), 2);
        assert_eq!(result.indices.iter().filter(|&&i| i < 5).count(), 1);
        assert_eq!(result.stats.considered, 10);
        assert_eq!(result.stats.excluded, 8);
        for (path, &index) in result.selected.iter().zip(&result.indices) {
            assert_eq!(path, &paths[index]);
        }
    }

    #[test]
    fn preserves_identifier_type() {
        let paths: Vec<PathBuf> = (0..6).map(|i| PathBuf::from(format!("./{i}.png"))).collect();
        let fingerprints: Vec<Fingerprint> = (0..6u8).map(|i| fp(&format!("{:02x}", i * 40))).collect();

        let config = SelectionConfig {
            mode: SelectionMode::Exact,
            ..SelectionConfig::new(3)
        };
        let result = select_distinct(&paths, &fingerprints, config).unwrap();

        assert_eq!(result.selected.len(), 3);
        assert!(result.selected.iter().all(|p| paths.contains(p)));
    }

    #[test]
    fn mismatched_lengths_are_rejected_before_selection() {
        let paths = vec!["a", "b", "c"];
        let fingerprints = vec![fp("00"), fp("0000"), fp("ff")];
        let selection = Selection::builder().target_count(1).build().unwrap();

        let error = selection.run(&paths, &fingerprints).unwrap_err();

        assert!(matches!(
            error,
            DownsampleError::Input(InputError::FingerprintLengthMismatch {
                index: 1,
                expected: 8,
                found: 16
            })
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected_even_when_short_circuiting() {
        let fingerprints = vec![fp("00"), fp("000")];
        let selection = Selection::builder().target_count(10).build().unwrap();

        assert!(selection.select_indices(&fingerprints).is_err());
    }

    #[test]
    fn identifier_count_must_match() {
        let selection = Selection::builder().target_count(1).build().unwrap();
        let error = selection.run(&["only"], &[fp("00"), fp("ff")]).unwrap_err();

        assert!(matches!(
            error,
            DownsampleError::Input(InputError::LengthMismatch {
                identifiers: 1,
                fingerprints: 2
            })
        ));
    }

    #[test]
    fn empty_input_returns_empty() {
        let selection = Selection::builder().target_count(5).build().unwrap();
        let result = selection.run::<String>(&[], &[]).unwrap();

        assert!(result.selected.is_empty());
        assert_eq!(result.stats.shortfall, 5);
    }

    #[test]
    fn same_config_is_reproducible() {
        let (paths, fingerprints) = halves();
        let selection = Selection::builder()
            .target_count(4)
            .mode_name("rolling_window")
            .window_size(2)
            .seed(1234)
            .build()
            .unwrap();

        let first = selection.run(&paths, &fingerprints).unwrap();
        let second = selection.run(&paths, &fingerprints).unwrap();

        assert_eq!(first.selected, second.selected);
    }

    #[test]
    fn cancellation_surfaces_as_selection_error() {
        let (paths, fingerprints) = halves();
        let token = CancellationToken::new();
        token.cancel();

        let selection = Selection::builder()
            .target_count(3)
            .cancellation(token)
            .build()
            .unwrap();

        let error = selection.run(&paths, &fingerprints).unwrap_err();
        assert!(matches!(
            error,
            DownsampleError::Selection(SelectionError::Cancelled)
        ));
    }

    #[test]
    fn stats_are_serializable() {
        let stats = SelectionStats::new(100, 10, 10, SelectionMode::Exact);
        let json = serde_json::to_string(&stats).unwrap();

        assert!(json.contains("\"excluded\":90"));
        assert!(json.contains("\"method\":\"exact\""));
    }
}
