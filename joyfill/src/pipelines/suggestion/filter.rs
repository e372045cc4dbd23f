use super::config::ClassificationPolicy;
use super::model::{SentimentClassifier, SentimentLabel};
use crate::error::{PipelineError, Result, SuggestError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Candidates that survived filtering, plus what it took to get there.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FilterOutcome {
    pub kept: Vec<String>,
    pub classified: usize,
    pub failures: usize,
}

/// Keeps the candidates the classifier calls positive, in their original order.
pub(crate) struct SentimentFilter {
    classifier: Arc<dyn SentimentClassifier>,
    policy: ClassificationPolicy,
    concurrency: usize,
    timeout: Duration,
}

impl SentimentFilter {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        policy: ClassificationPolicy,
        concurrency: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            policy,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Classify every candidate and return the positive ones.
    ///
    /// Calls fan out up to `concurrency` at a time; results come back in candidate order
    /// whatever order they finish in.
    ///
    /// # Errors
    ///
    /// `ModelUnavailable` when the stage as a whole overruns its timeout, or under
    /// [`ClassificationPolicy::FailFast`] when any single call fails.
    pub async fn filter_positive(
        &self,
        candidates: Vec<String>,
    ) -> std::result::Result<FilterOutcome, SuggestError> {
        if candidates.is_empty() {
            return Ok(FilterOutcome::default());
        }

        let verdicts = stream::iter(candidates.iter().cloned())
            .map(|word| {
                let classifier = Arc::clone(&self.classifier);
                async move {
                    tokio::task::spawn_blocking(move || classifier.classify(&word))
                        .await
                        .unwrap_or_else(|e| {
                            Err(PipelineError::Unexpected(format!(
                                "sentiment classifier task failed: {e}"
                            )))
                        })
                }
            })
            .buffered(self.concurrency)
            .collect::<Vec<Result<SentimentLabel>>>();

        let verdicts = tokio::time::timeout(self.timeout, verdicts)
            .await
            .map_err(|_| {
                tracing::warn!(timeout = ?self.timeout, "sentiment classifier timed out");
                SuggestError::ModelUnavailable(format!(
                    "sentiment classifier did not answer within {:?}",
                    self.timeout
                ))
            })?;

        let mut outcome = FilterOutcome {
            classified: candidates.len(),
            ..Default::default()
        };

        for (word, verdict) in candidates.into_iter().zip(verdicts) {
            match verdict {
                Ok(label) if label.is_positive() => outcome.kept.push(word),
                Ok(label) => {
                    tracing::trace!(word = %word, label = %label.label, "dropping candidate");
                }
                Err(e) => {
                    outcome.failures += 1;
                    match self.policy {
                        ClassificationPolicy::FailOpen => {
                            tracing::warn!(
                                word = %word,
                                error = %e,
                                "sentiment classification failed, dropping candidate"
                            );
                        }
                        ClassificationPolicy::FailFast => {
                            return Err(SuggestError::ModelUnavailable(format!(
                                "sentiment classifier failed on '{word}': {e}"
                            )));
                        }
                    }
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::suggestion::model::POSITIVE_LABEL;

    struct Lexicon;

    impl SentimentClassifier for Lexicon {
        fn classify(&self, word: &str) -> Result<SentimentLabel> {
            match word {
                "broken" => Err(PipelineError::Inference("logits were NaN".into())),
                "panic" => panic!("classifier crashed"),
                "bad" | "awful" => Ok(SentimentLabel::new("negative", 0.9)),
                _ => Ok(SentimentLabel::new(POSITIVE_LABEL, 0.8)),
            }
        }
    }

    fn filter(policy: ClassificationPolicy) -> SentimentFilter {
        SentimentFilter::new(Arc::new(Lexicon), policy, 4, Duration::from_secs(5))
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn keeps_positive_in_order() {
        let outcome = filter(ClassificationPolicy::FailOpen)
            .filter_positive(words(&["great", "bad", "good", "awful", "nice"]))
            .await
            .unwrap();
        assert_eq!(outcome.kept, words(&["great", "good", "nice"]));
        assert_eq!(outcome.classified, 5);
        assert_eq!(outcome.failures, 0);
    }

    #[tokio::test]
    async fn fail_open_drops_failed_candidates() {
        let outcome = filter(ClassificationPolicy::FailOpen)
            .filter_positive(words(&["good", "broken", "panic", "fine"]))
            .await
            .unwrap();
        assert_eq!(outcome.kept, words(&["good", "fine"]));
        assert_eq!(outcome.failures, 2);
    }

    #[tokio::test]
    async fn fail_fast_surfaces_failure() {
        let err = filter(ClassificationPolicy::FailFast)
            .filter_positive(words(&["good", "broken"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::ModelUnavailable(msg) if msg.contains("broken")));
    }

    #[tokio::test]
    async fn empty_input_skips_classifier() {
        let outcome = filter(ClassificationPolicy::FailFast)
            .filter_positive(Vec::new())
            .await
            .unwrap();
        assert_eq!(outcome, FilterOutcome::default());
    }
}
