//! Exact and rolling-window farthest-point traversal.

use super::{CancellationToken, CandidatePool, SelectionMode};
use crate::core::fingerprint::{hamming_distance, Fingerprint};
use crate::error::SelectionError;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// State after one selection step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSnapshot {
    /// Index chosen at this step
    pub chosen: usize,
    /// Bits between the chosen fingerprint and its nearest compared
    /// selection (`None` for the random start)
    pub min_distance: Option<u32>,
    /// Candidates still in the pool
    pub pool_len: usize,
    /// Indices selected so far, including `chosen`
    pub selected_len: usize,
}

/// Greedy max-min selector over a slice of equal-length fingerprints
///
/// Fingerprint lengths are not checked here; the orchestrator validates
/// them before a selector is built.
pub struct GreedySelector<'a> {
    fingerprints: &'a [Fingerprint],
    seed: u64,
    cancellation: Option<CancellationToken>,
}

impl<'a> GreedySelector<'a> {
    pub fn new(fingerprints: &'a [Fingerprint], seed: u64) -> Self {
        Self {
            fingerprints,
            seed,
            cancellation: None,
        }
    }

    /// Stop between steps once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Select `target` indices in selection order
    pub fn select(&self, target: usize, mode: SelectionMode) -> Result<Vec<usize>, SelectionError> {
        self.select_observed(target, mode, |_| {})
    }

    /// Select `target` indices, reporting every step to `observe`
    pub fn select_observed<F>(
        &self,
        target: usize,
        mode: SelectionMode,
        mut observe: F,
    ) -> Result<Vec<usize>, SelectionError>
    where
        F: FnMut(&StepSnapshot),
    {
        let total = self.fingerprints.len();
        if target >= total {
            return Ok((0..total).collect());
        }
        if target == 0 {
            return Ok(Vec::new());
        }

        self.check_cancelled()?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut pool = CandidatePool::new(total);
        let mut selected = Vec::with_capacity(target);

        let first = pool.take_at(rng.gen_range(0..pool.len()));
        selected.push(first);
        observe(&StepSnapshot {
            chosen: first,
            min_distance: None,
            pool_len: pool.len(),
            selected_len: selected.len(),
        });

        match mode {
            SelectionMode::Exact => {
                self.run_exact(target, &mut pool, &mut selected, &mut observe)?
            }
            SelectionMode::RollingWindow { window_size } => self.run_rolling_window(
                target,
                window_size.max(1),
                &mut pool,
                &mut selected,
                &mut observe,
            )?,
        }

        Ok(selected)
    }

    /// Each candidate keeps its distance to the nearest selection so far;
    /// only the newest selection needs comparing per step.
    fn run_exact<F>(
        &self,
        target: usize,
        pool: &mut CandidatePool,
        selected: &mut Vec<usize>,
        observe: &mut F,
    ) -> Result<(), SelectionError>
    where
        F: FnMut(&StepSnapshot),
    {
        let mut nearest = vec![u32::MAX; self.fingerprints.len()];

        while selected.len() < target {
            self.check_cancelled()?;

            let newest = &self.fingerprints[selected[selected.len() - 1]];
            for candidate in pool.iter() {
                let distance = hamming_distance(&self.fingerprints[candidate], newest);
                if distance < nearest[candidate] {
                    nearest[candidate] = distance;
                }
            }

            let Some((position, distance)) = farthest(pool, |candidate| nearest[candidate]) else {
                break;
            };
            Self::commit(pool, selected, position, distance, observe);
        }

        Ok(())
    }

    fn run_rolling_window<F>(
        &self,
        target: usize,
        window_size: usize,
        pool: &mut CandidatePool,
        selected: &mut Vec<usize>,
        observe: &mut F,
    ) -> Result<(), SelectionError>
    where
        F: FnMut(&StepSnapshot),
    {
        while selected.len() < target {
            self.check_cancelled()?;

            let window = &selected[selected.len().saturating_sub(window_size)..];
            let best = farthest(pool, |candidate| {
                let fingerprint = &self.fingerprints[candidate];
                window
                    .iter()
                    .map(|&member| hamming_distance(fingerprint, &self.fingerprints[member]))
                    .min()
                    .unwrap_or(u32::MAX)
            });

            let Some((position, distance)) = best else {
                break;
            };
            Self::commit(pool, selected, position, distance, observe);
        }

        Ok(())
    }

    fn commit<F>(
        pool: &mut CandidatePool,
        selected: &mut Vec<usize>,
        position: usize,
        distance: u32,
        observe: &mut F,
    ) where
        F: FnMut(&StepSnapshot),
    {
        let chosen = pool.take_at(position);
        selected.push(chosen);
        observe(&StepSnapshot {
            chosen,
            min_distance: Some(distance),
            pool_len: pool.len(),
            selected_len: selected.len(),
        });
    }

    fn check_cancelled(&self) -> Result<(), SelectionError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(SelectionError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Pool position of the candidate with the largest score.
///
/// The pool is scanned in ascending index order and only a strictly larger
/// score replaces the best, so ties go to the lowest index.
fn farthest<S>(pool: &CandidatePool, score: S) -> Option<(usize, u32)>
where
    S: Fn(usize) -> u32,
{
    let mut best: Option<(usize, u32)> = None;
    for (position, candidate) in pool.iter().enumerate() {
        let value = score(candidate);
        if best.map_or(true, |(_, current)| value > current) {
            best = Some((position, value));
        }
    }
    best
}
