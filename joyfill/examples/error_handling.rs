//! Mapping suggestion failures to what a web handler would answer.

use joyfill::error::{PipelineError, Result, SuggestError};
use joyfill::suggestion::{
    CandidatePredictor, SentimentClassifier, SentimentLabel, SuggestionPipelineBuilder,
};

struct Offline;

impl CandidatePredictor for Offline {
    fn mask_token(&self) -> &str {
        "[MASK]"
    }

    fn predict(&self, _masked_text: &str, _top_k: usize) -> Result<Vec<String>> {
        Err(PipelineError::Download("model weights not cached".into()))
    }
}

struct Neutral;

impl SentimentClassifier for Neutral {
    fn classify(&self, _word: &str) -> Result<SentimentLabel> {
        Ok(SentimentLabel::new("neutral", 1.0))
    }
}

fn respond(result: std::result::Result<Vec<String>, SuggestError>) -> (u16, String) {
    match result {
        Ok(words) => (200, format!("{{\"suggestions\": {words:?}}}")),
        Err(e) if e.is_client_error() => (e.status_code(), format!("Please fix your input: {e}")),
        Err(e) => (e.status_code(), format!("Try again later: {e}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let pipeline = SuggestionPipelineBuilder::with_collaborators(Offline, Neutral).build()?;

    for text in ["Have a great day.", "<blank> <blank>", "Have a <blank> day."] {
        let result = pipeline.suggest(text).await.map(|o| o.suggestions);
        let (status, body) = respond(result);
        println!("{text:?} -> {status} {body}");
    }

    Ok(())
}
