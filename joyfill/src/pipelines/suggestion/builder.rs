use super::config::{ClassificationPolicy, SuggestionConfig};
use super::filter::SentimentFilter;
use super::model::{CandidatePredictor, Exclusive, SentimentClassifier};
use super::pipeline::SuggestionPipeline;
use crate::error::Result;
use crate::models::modernbert::{ModernBertFillMask, ModernBertSentiment};
use crate::models::ModernBertSize;
use crate::pipelines::cache::{global_cache, ModelCache};
use crate::pipelines::utils::{build_cache_key, DeviceRequest};
use std::sync::Arc;
use std::time::Duration;

enum Collaborators {
    ModernBert(ModernBertSize),
    Custom {
        predictor: Arc<dyn CandidatePredictor>,
        classifier: Arc<dyn SentimentClassifier>,
    },
}

/// Builder for creating [`SuggestionPipeline`] instances.
///
/// Use [`Self::modernbert`] for the bundled models, or [`Self::with_collaborators`] to
/// plug in your own predictor and classifier.
///
/// # Examples
///
/// ```rust,no_run
/// # use joyfill::suggestion::{ClassificationPolicy, ModernBertSize, SuggestionPipelineBuilder};
/// # use std::time::Duration;
/// # fn main() -> joyfill::error::Result<()> {
/// let pipeline = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base)
///     .cuda(0)
///     .top_k(20)
///     .timeout(Duration::from_secs(5))
///     .policy(ClassificationPolicy::FailFast)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SuggestionPipelineBuilder {
    collaborators: Collaborators,
    device_request: DeviceRequest,
    config: SuggestionConfig,
}

impl SuggestionPipelineBuilder {
    fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            device_request: DeviceRequest::Cpu,
            config: SuggestionConfig::default(),
        }
    }

    /// ModernBERT fill-mask predictions filtered by a ModernBERT sentiment classifier.
    pub fn modernbert(size: ModernBertSize) -> Self {
        Self::new(Collaborators::ModernBert(size))
    }

    /// Bring your own predictor and classifier.
    pub fn with_collaborators<P, C>(predictor: P, classifier: C) -> Self
    where
        P: CandidatePredictor + 'static,
        C: SentimentClassifier + 'static,
    {
        Self::new(Collaborators::Custom {
            predictor: Arc::new(predictor),
            classifier: Arc::new(classifier),
        })
    }

    /// Use CPU for inference (default).
    pub fn cpu(mut self) -> Self {
        self.device_request = DeviceRequest::Cpu;
        self
    }

    /// Use a specific CUDA GPU for inference.
    pub fn cuda(mut self, index: usize) -> Self {
        self.device_request = DeviceRequest::Cuda(index);
        self
    }

    /// Replace every setting at once, e.g. with a config loaded from JSON.
    pub fn config(mut self, config: SuggestionConfig) -> Self {
        self.config = config;
        self
    }

    /// Candidates requested from the predictor (default 10).
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Words returned per request (default and maximum 5).
    pub fn max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.config.max_suggestions = max_suggestions;
        self
    }

    /// Budget for each model stage (default 30 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// How a single failed classification is handled (default fail-open).
    pub fn policy(mut self, policy: ClassificationPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Sentiment calls in flight at once for one request (default 8).
    pub fn classification_concurrency(mut self, concurrency: usize) -> Self {
        self.config.classification_concurrency = concurrency;
        self
    }

    /// Queue calls into each model one at a time, for runtimes that are not reentrant.
    pub fn serialize_inference(mut self, serialize: bool) -> Self {
        self.config.serialize_inference = serialize;
        self
    }

    /// Builds the pipeline with configured settings.
    ///
    /// Bundled models are loaded once per process and shared by later builds.
    ///
    /// # Errors
    ///
    /// Returns an error if model loading or device initialization fails.
    pub fn build(self) -> Result<SuggestionPipeline> {
        let serialize = self.config.serialize_inference;
        let (predictor, classifier) = match self.collaborators {
            Collaborators::ModernBert(size) => {
                let device = self.device_request.resolve()?;
                let key = build_cache_key(&size, &device);
                let cache = global_cache();

                let predictor = cache.get_or_create::<ModernBertFillMask, _>(&key, || {
                    ModernBertFillMask::new(size, device.clone())
                })?;
                let classifier = cache.get_or_create::<ModernBertSentiment, _>(&key, || {
                    ModernBertSentiment::new(size, device.clone())
                })?;

                if serialize {
                    // The slot is cached with the model so every pipeline sharing it queues.
                    (
                        shared_exclusive(cache, &key, predictor)? as Arc<dyn CandidatePredictor>,
                        shared_exclusive(cache, &key, classifier)? as Arc<dyn SentimentClassifier>,
                    )
                } else {
                    (
                        predictor as Arc<dyn CandidatePredictor>,
                        classifier as Arc<dyn SentimentClassifier>,
                    )
                }
            }
            Collaborators::Custom {
                predictor,
                classifier,
            } if serialize => (
                Arc::new(Exclusive::new(predictor)) as Arc<dyn CandidatePredictor>,
                Arc::new(Exclusive::new(classifier)) as Arc<dyn SentimentClassifier>,
            ),
            Collaborators::Custom {
                predictor,
                classifier,
            } => (predictor, classifier),
        };

        let filter = SentimentFilter::new(
            classifier,
            self.config.policy,
            self.config.concurrency(),
            self.config.timeout(),
        );

        Ok(SuggestionPipeline {
            predictor,
            filter,
            config: self.config,
        })
    }
}

/// The one [`Exclusive`] wrapper for a cached model, created on first use.
fn shared_exclusive<M>(
    cache: &ModelCache,
    key: &str,
    model: Arc<M>,
) -> Result<Arc<Exclusive<Arc<M>>>>
where
    M: Send + Sync + 'static,
{
    cache.get_or_create(key, || Ok(Exclusive::new(model)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::{SentimentLabel, POSITIVE_LABEL};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Overlap {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SentimentClassifier for Overlap {
        fn classify(&self, _word: &str) -> Result<SentimentLabel> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(SentimentLabel::new(POSITIVE_LABEL, 1.0))
        }
    }

    #[test]
    fn exclusive_wrapper_follows_the_cached_model() {
        let cache = ModelCache::new();
        let model = Arc::new(Overlap::default());

        let first = shared_exclusive(&cache, "overlap-Cpu", Arc::clone(&model)).unwrap();
        let second = shared_exclusive(&cache, "overlap-Cpu", Arc::clone(&model)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Two pipelines' worth of callers still go through one slot.
        let handles: Vec<_> = [first, second]
            .into_iter()
            .flat_map(|wrapper| {
                (0..2).map(move |_| {
                    let wrapper = Arc::clone(&wrapper);
                    std::thread::spawn(move || wrapper.classify("good").unwrap())
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(model.peak.load(Ordering::SeqCst), 1);
    }
}
