use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Tunables for the suggestion engine. Rule thresholds and confidences are fixed; only the
/// size of the ranked output is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_suggestions: usize,
}

impl EngineConfig {
    pub fn with_limit(max_suggestions: usize) -> Self {
        Self { max_suggestions }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}
