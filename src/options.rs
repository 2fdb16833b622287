// Section planner options.

use crate::error::DiffError;

/// Default minimum length of a common run.
pub const DEFAULT_CONTEXT_SIZE: usize = 1;

/// Configuration for section planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Trim common prefixes and suffixes before searching each window for
    /// its longest common run ("patience" heuristic).
    pub patience: bool,
    /// Minimum number of consecutive equal elements accepted as a
    /// synchronization point. Must be at least 1.
    pub context_size: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            patience: true,
            context_size: DEFAULT_CONTEXT_SIZE,
        }
    }
}

impl DiffOptions {
    pub fn with_patience(mut self, patience: bool) -> Self {
        self.patience = patience;
        self
    }

    pub fn with_context_size(mut self, context_size: usize) -> Self {
        self.context_size = context_size;
        self
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<(), DiffError> {
        if self.context_size < 1 {
            return Err(DiffError::InvalidContextSize(self.context_size));
        }
        Ok(())
    }
}
