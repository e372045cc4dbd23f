//! Positive fill-in-the-blank suggestions.
//!
//! A sentence with one `<blank>` goes in; up to five positive words for the gap come out.
//! Every request runs the same stages:
//!
//! 1. **validate**: exactly one `<blank>`, with a word somewhere beside it
//! 2. **mask**: collapse whitespace, swap `<blank>` for the predictor's mask token
//! 3. **predict**: top-k candidate words from a [`CandidatePredictor`]
//! 4. **normalize**: squeeze whitespace out of each candidate
//! 5. **filter**: keep what the [`SentimentClassifier`] labels `positive`, in order
//! 6. **rank**: truncate to five
//!
//! Bad input fails fast with [`SuggestError::InvalidFormat`](crate::error::SuggestError)
//! before any model runs. Model trouble surfaces as `ModelUnavailable`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use joyfill::suggestion::{ModernBertSize, SuggestionPipelineBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
//!
//! let output = pipeline.suggest("Have a <blank> day.").await?;
//! // e.g. ["great", "good", "nice"]
//! println!("{:?}", output.suggestions);
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Models
//!
//! Anything implementing the two collaborator traits plugs in:
//!
//! ```rust
//! use joyfill::error::Result;
//! use joyfill::suggestion::{
//!     CandidatePredictor, SentimentClassifier, SentimentLabel, SuggestionPipelineBuilder,
//! };
//!
//! struct Fixed;
//!
//! impl CandidatePredictor for Fixed {
//!     fn mask_token(&self) -> &str {
//!         "[MASK]"
//!     }
//!
//!     fn predict(&self, _masked_text: &str, _top_k: usize) -> Result<Vec<String>> {
//!         Ok(vec!["sunny".into(), "grim".into()])
//!     }
//! }
//!
//! struct Cheerful;
//!
//! impl SentimentClassifier for Cheerful {
//!     fn classify(&self, word: &str) -> Result<SentimentLabel> {
//!         let label = if word == "grim" { "negative" } else { "positive" };
//!         Ok(SentimentLabel::new(label, 1.0))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let pipeline = SuggestionPipelineBuilder::with_collaborators(Fixed, Cheerful).build()?;
//! let output = pipeline.suggest("A <blank> morning").await.unwrap();
//! assert_eq!(output.suggestions, vec!["sunny"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Models
//!
//! | Model | Sizes | Builder Method |
//! |-------|-------|----------------|
//! | ModernBERT fill-mask + ModernBERT sentiment | `Base`, `Large` | [`SuggestionPipelineBuilder::modernbert`] |

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod config;
pub(crate) mod filter;
pub(crate) mod mask;
pub(crate) mod model;
pub(crate) mod normalize;
pub(crate) mod pipeline;
pub(crate) mod rank;
pub(crate) mod validate;

// ============ Public API ============

pub use crate::models::ModernBertSize;
pub use crate::pipelines::stats::PipelineStats;
pub use builder::SuggestionPipelineBuilder;
pub use config::{ClassificationPolicy, SuggestionConfig};
pub use mask::normalize_and_mask;
pub use model::{
    CandidatePredictor, Exclusive, SentimentClassifier, SentimentLabel, POSITIVE_LABEL,
};
pub use normalize::normalize;
pub use pipeline::{BatchOutput, BatchResult, Output, SuggestionPipeline};
pub use rank::{truncate, MAX_SUGGESTIONS};
pub use validate::{check, validate, PLACEHOLDER};

#[doc(hidden)]
pub use pipeline::SuggestionInput;
