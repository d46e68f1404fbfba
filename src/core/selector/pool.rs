//! Ordered pool of not-yet-selected candidates.

/// Remaining candidate indices, always in ascending order
///
/// Iteration order depends only on the input order, which makes
/// "first candidate encountered" (the tie-break) reproducible.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    remaining: Vec<usize>,
}

impl CandidatePool {
    /// Pool holding every index in `0..size`
    pub fn new(size: usize) -> Self {
        Self {
            remaining: (0..size).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Remaining indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.remaining.iter().copied()
    }

    /// Remove and return the candidate at `position` (not index), keeping order
    pub fn take_at(&mut self, position: usize) -> usize {
        self.remaining.remove(position)
    }
}
