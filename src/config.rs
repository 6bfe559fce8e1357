//! Engine configuration.

/// Limits applied to every unification call made by a
/// [`Unifier`](crate::Unifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifierConfig {
    /// Maximum number of goals processed per call. 0 means no limit.
    pub max_steps: usize,
}

impl UnifierConfig {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub(crate) fn step_limit(&self) -> Option<usize> {
        (self.max_steps != 0).then_some(self.max_steps)
    }
}

impl Default for UnifierConfig {
    fn default() -> Self {
        UnifierConfig {
            max_steps: 0, // 0 means no limit
        }
    }
}
