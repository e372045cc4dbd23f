use super::rank::MAX_SUGGESTIONS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do when the sentiment classifier fails on one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// Drop the candidate, log it, and keep going (default).
    #[default]
    FailOpen,
    /// Fail the whole request with `ModelUnavailable`.
    FailFast,
}

/// Tunables for a [`SuggestionPipeline`](super::SuggestionPipeline).
///
/// Every field has a default, so partial JSON works:
///
/// ```rust
/// use joyfill::suggestion::{ClassificationPolicy, SuggestionConfig};
///
/// let config: SuggestionConfig = serde_json::from_str(r#"{ "policy": "fail_fast" }"#).unwrap();
/// assert_eq!(config.policy, ClassificationPolicy::FailFast);
/// assert_eq!(config.top_k, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Candidates requested from the predictor.
    pub top_k: usize,
    /// Words returned per request. Values above 5 are capped at 5.
    pub max_suggestions: usize,
    /// Budget for each collaborator stage, in milliseconds.
    pub timeout_ms: u64,
    /// Handling of a single failed classification.
    pub policy: ClassificationPolicy,
    /// Sentiment calls in flight at once for one request.
    pub classification_concurrency: usize,
    /// Queue calls into each collaborator one at a time.
    pub serialize_inference: bool,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_suggestions: MAX_SUGGESTIONS,
            timeout_ms: 30_000,
            policy: ClassificationPolicy::FailOpen,
            classification_concurrency: 8,
            serialize_inference: false,
        }
    }
}

impl SuggestionConfig {
    /// Collaborator stage budget.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub(crate) fn result_cap(&self) -> usize {
        self.max_suggestions.min(MAX_SUGGESTIONS)
    }

    pub(crate) fn concurrency(&self) -> usize {
        self.classification_concurrency.max(1)
    }
}
