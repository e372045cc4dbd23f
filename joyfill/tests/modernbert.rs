#![cfg(feature = "cuda")]

use joyfill::suggestion::{ModernBertSize, SuggestionPipelineBuilder, MAX_SUGGESTIONS};

#[tokio::test(flavor = "multi_thread")]
async fn modernbert_suggests_positive_words() -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base)
        .cuda(0)
        .build()?;

    let output = pipeline.suggest("Have a <blank> day.").await?;
    assert!(output.suggestions.len() <= MAX_SUGGESTIONS);
    assert!(output.suggestions.iter().all(|w| !w.contains(char::is_whitespace)));
    assert!(output.stats.candidates_predicted > 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn modernbert_rebuild_reuses_loaded_models() -> Result<(), Box<dyn std::error::Error>> {
    let first = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base)
        .cuda(0)
        .build()?;
    let second = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base)
        .cuda(0)
        .build()?;

    let texts: &[&str] = &[
        "The team did a <blank> job on the presentation.",
        "The cake she baked was <blank>.",
    ];
    let a = first.run(texts).await;
    let b = second.run(texts).await;

    for (a, b) in a.results.into_iter().zip(b.results) {
        assert_eq!(a.suggestions?, b.suggestions?, "same models, same answers");
    }
    Ok(())
}
