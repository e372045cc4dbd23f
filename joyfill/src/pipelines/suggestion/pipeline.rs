use super::config::SuggestionConfig;
use super::filter::SentimentFilter;
use super::model::CandidatePredictor;
use super::{mask, normalize, rank, validate};
use crate::error::{SuggestError, SuggestResult};
use crate::pipelines::stats::PipelineStats;
use std::sync::Arc;

// ============ Output types ============

/// Single-text output from `suggest()` / `run()`.
#[derive(Debug, Clone)]
pub struct Output {
    /// Positive words for the blank, most likely first. At most five.
    pub suggestions: Vec<String>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

/// Single result in batch output.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Input text.
    pub text: String,
    /// Suggestions or error for this input.
    pub suggestions: SuggestResult<Vec<String>>,
}

/// Batch output from `run()`.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Results for each input, in input order.
    pub results: Vec<BatchResult>,
    /// Execution statistics summed over the successful items.
    pub stats: PipelineStats,
}

// ============ Input trait for type-based dispatch ============

#[doc(hidden)]
pub trait SuggestionInput<'a> {
    /// Output type for `.run()`.
    type Output;

    #[doc(hidden)]
    fn into_texts(self) -> Vec<&'a str>;
    #[doc(hidden)]
    fn convert_output(
        texts: Vec<&'a str>,
        results: Vec<SuggestResult<Output>>,
        stats: PipelineStats,
    ) -> Self::Output;
}

impl<'a> SuggestionInput<'a> for &'a str {
    type Output = SuggestResult<Output>;

    fn into_texts(self) -> Vec<&'a str> {
        vec![self]
    }

    fn convert_output(
        _texts: Vec<&'a str>,
        mut results: Vec<SuggestResult<Output>>,
        _stats: PipelineStats,
    ) -> Self::Output {
        results.pop().unwrap_or_else(|| {
            Err(SuggestError::ModelUnavailable(
                "no result produced for input".into(),
            ))
        })
    }
}

fn batch_output(
    texts: Vec<&str>,
    results: Vec<SuggestResult<Output>>,
    stats: PipelineStats,
) -> BatchOutput {
    let results = texts
        .into_iter()
        .zip(results)
        .map(|(text, result)| BatchResult {
            text: text.to_string(),
            suggestions: result.map(|output| output.suggestions),
        })
        .collect();
    BatchOutput { results, stats }
}

impl<'a> SuggestionInput<'a> for &'a [&'a str] {
    type Output = BatchOutput;

    fn into_texts(self) -> Vec<&'a str> {
        self.to_vec()
    }

    fn convert_output(
        texts: Vec<&'a str>,
        results: Vec<SuggestResult<Output>>,
        stats: PipelineStats,
    ) -> Self::Output {
        batch_output(texts, results, stats)
    }
}

impl<'a, const N: usize> SuggestionInput<'a> for &'a [&'a str; N] {
    type Output = BatchOutput;

    fn into_texts(self) -> Vec<&'a str> {
        self.as_slice().to_vec()
    }

    fn convert_output(
        texts: Vec<&'a str>,
        results: Vec<SuggestResult<Output>>,
        stats: PipelineStats,
    ) -> Self::Output {
        batch_output(texts, results, stats)
    }
}

// ============ Pipeline ============

/// Where a request is in the pipeline. Only used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    Validated,
    Masked,
    Predicted,
    Normalized,
    Filtered,
    Ranked,
    Responded,
    Rejected,
    Failed,
}

/// Proposes positive words for the `<blank>` in a sentence.
///
/// Construct with [`SuggestionPipelineBuilder`](super::SuggestionPipelineBuilder). The
/// pipeline holds no per-request state; share one behind an `Arc` across tasks.
///
/// # Examples
///
/// ```rust,no_run
/// # use joyfill::suggestion::{ModernBertSize, SuggestionPipelineBuilder};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
///
/// // Single text - direct access
/// let output = pipeline.run("The team did a <blank> job.").await?;
/// println!("{:?}", output.suggestions);
///
/// // Batch - results include input text
/// let output = pipeline.run(&["What a <blank> idea!", "no blank here"]).await;
/// for r in output.results {
///     println!("{} -> {:?}", r.text, r.suggestions);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SuggestionPipeline {
    pub(crate) predictor: Arc<dyn CandidatePredictor>,
    pub(crate) filter: SentimentFilter,
    pub(crate) config: SuggestionConfig,
}

impl SuggestionPipeline {
    /// Suggest positive words for the single `<blank>` in `text`.
    ///
    /// # Errors
    ///
    /// - [`SuggestError::InvalidFormat`] before any model is called, when `text` has no
    ///   usable `<blank>`.
    /// - [`SuggestError::ModelUnavailable`] when the predictor fails or times out, or the
    ///   sentiment stage times out.
    pub async fn suggest(&self, text: &str) -> SuggestResult<Output> {
        let mut stats = PipelineStats::start();
        tracing::debug!(stage = ?Stage::Received, text, "received suggestion request");

        if let Err(e) = validate::check(text) {
            tracing::debug!(stage = ?Stage::Rejected, error = %e, "rejected input");
            return Err(e);
        }
        tracing::trace!(stage = ?Stage::Validated);

        let masked = mask::normalize_and_mask(text, self.predictor.mask_token());
        tracing::trace!(stage = ?Stage::Masked, masked = %masked);

        let raw = self.predict(masked).await.inspect_err(|e| {
            tracing::warn!(stage = ?Stage::Failed, error = %e, "candidate prediction failed");
        })?;
        stats.record_predicted(raw.len());
        tracing::trace!(stage = ?Stage::Predicted, candidates = ?raw);

        let candidates = normalize::normalize(raw);
        tracing::trace!(stage = ?Stage::Normalized, candidates = ?candidates);

        let outcome = self
            .filter
            .filter_positive(candidates)
            .await
            .inspect_err(|e| {
                tracing::warn!(stage = ?Stage::Failed, error = %e, "sentiment filtering failed");
            })?;
        stats.record_classified(outcome.classified, outcome.failures);
        tracing::trace!(stage = ?Stage::Filtered, kept = ?outcome.kept);

        let suggestions = rank::truncate(outcome.kept, self.config.result_cap());
        tracing::trace!(stage = ?Stage::Ranked);

        tracing::info!(stage = ?Stage::Responded, ?suggestions, "suggestions generated");
        let stats = stats.finish(suggestions.len());
        Ok(Output { suggestions, stats })
    }

    /// Suggest for one text or many.
    ///
    /// Single input -> `Result<`[`Output`]`>`, batch -> [`BatchOutput`] with a result per
    /// item. Batch items run concurrently and fail independently.
    pub async fn run<'a, I: SuggestionInput<'a>>(&self, input: I) -> I::Output {
        let mut batch_stats = PipelineStats::start();
        let texts = input.into_texts();

        let results = futures::future::join_all(texts.iter().map(|text| self.suggest(text))).await;
        for output in results.iter().flatten() {
            batch_stats.merge(&output.stats);
        }

        I::convert_output(texts, results, batch_stats.finish_batch())
    }

    /// Settings this pipeline was built with.
    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    async fn predict(&self, masked: String) -> SuggestResult<Vec<String>> {
        let predictor = Arc::clone(&self.predictor);
        let top_k = self.config.top_k;
        let timeout = self.config.timeout();

        let call = tokio::task::spawn_blocking(move || predictor.predict(&masked, top_k));
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(Ok(mut candidates))) => {
                candidates.truncate(top_k);
                Ok(candidates)
            }
            Ok(Ok(Err(e))) => Err(e.into()),
            Ok(Err(e)) => Err(SuggestError::ModelUnavailable(format!(
                "candidate predictor task failed: {e}"
            ))),
            Err(_) => Err(SuggestError::ModelUnavailable(format!(
                "candidate predictor did not answer within {timeout:?}"
            ))),
        }
    }
}
