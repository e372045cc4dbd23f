use crate::error::Result;
use std::sync::{Arc, Mutex, PoisonError};

/// The only sentiment label that lets a candidate through.
pub const POSITIVE_LABEL: &str = "positive";

/// Proposes words for a masked position.
///
/// Implementations are loaded once and shared by concurrent requests, so `predict` takes
/// `&self`. Wrap a non-reentrant model in [`Exclusive`].
pub trait CandidatePredictor: Send + Sync {
    /// Sentinel the predictor expects in place of the missing word, e.g. `[MASK]`.
    fn mask_token(&self) -> &str;

    /// Up to `top_k` words for the single masked position, most likely first.
    ///
    /// An empty list means "no ideas" and is not an error.
    fn predict(&self, masked_text: &str, top_k: usize) -> Result<Vec<String>>;
}

/// Labels the sentiment of a single word.
pub trait SentimentClassifier: Send + Sync {
    /// Classify `word`. Only an exact [`POSITIVE_LABEL`] counts as positive.
    fn classify(&self, word: &str) -> Result<SentimentLabel>;
}

/// A sentiment prediction with label and confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentLabel {
    /// The predicted sentiment (e.g. "positive", "negative", "neutral").
    pub label: String,
    /// Confidence score (0.0 to 1.0).
    pub score: f32,
}

impl SentimentLabel {
    /// Build a label with a confidence score.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// `true` only for an exact match against [`POSITIVE_LABEL`].
    pub fn is_positive(&self) -> bool {
        self.label == POSITIVE_LABEL
    }
}

impl<T: CandidatePredictor + ?Sized> CandidatePredictor for Arc<T> {
    fn mask_token(&self) -> &str {
        (**self).mask_token()
    }

    fn predict(&self, masked_text: &str, top_k: usize) -> Result<Vec<String>> {
        (**self).predict(masked_text, top_k)
    }
}

impl<T: SentimentClassifier + ?Sized> SentimentClassifier for Arc<T> {
    fn classify(&self, word: &str) -> Result<SentimentLabel> {
        (**self).classify(word)
    }
}

/// Lets one call at a time through to the wrapped collaborator.
///
/// For inference runtimes that keep mutable state behind `&self`. Requests still run
/// concurrently; only their calls into this collaborator queue up.
pub struct Exclusive<T> {
    inner: T,
    slot: Mutex<()>,
}

impl<T> Exclusive<T> {
    /// Wrap `inner` behind a single-slot lock.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            slot: Mutex::new(()),
        }
    }

    fn call<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        // A panic mid-call leaves no state behind the guard, so a poisoned slot is still usable.
        let _guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        f(&self.inner)
    }
}

impl<T: CandidatePredictor> CandidatePredictor for Exclusive<T> {
    fn mask_token(&self) -> &str {
        self.inner.mask_token()
    }

    fn predict(&self, masked_text: &str, top_k: usize) -> Result<Vec<String>> {
        self.call(|inner| inner.predict(masked_text, top_k))
    }
}

impl<T: SentimentClassifier> SentimentClassifier for Exclusive<T> {
    fn classify(&self, word: &str) -> Result<SentimentLabel> {
        self.call(|inner| inner.classify(word))
    }
}
