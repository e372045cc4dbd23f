//! Positive fill-in-the-blank suggestions for short sentences.
//!
//! Give JoyFill a sentence with one `<blank>` in it and it proposes words for the gap,
//! keeping only the ones a sentiment classifier calls positive. Candidate words come from
//! a masked language model and are run through a sentiment classifier, both powered by
//! [Candle](https://github.com/huggingface/candle) out of the box and swappable behind
//! two small traits.
//!
//! ```rust,no_run
//! use joyfill::suggestion::{ModernBertSize, SuggestionPipelineBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
//!
//! let output = pipeline.suggest("Have a <blank> day.").await?;
//! println!("{:?}", output.suggestions);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod error;

pub use pipelines::suggestion;
