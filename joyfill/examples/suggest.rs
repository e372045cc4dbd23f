use joyfill::suggestion::{ModernBertSize, SuggestionPipelineBuilder};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Building pipeline...");

    let pipeline = SuggestionPipelineBuilder::modernbert(ModernBertSize::Base)
        .timeout(Duration::from_secs(10))
        .build()?;

    println!("Pipeline built successfully.");

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Have a <blank> day.".to_string());

    let output = pipeline.suggest(&text).await?;

    println!("\n=== Suggestions ===");
    println!("Text: \"{}\"", text);
    for (i, word) in output.suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, word);
    }
    println!(
        "{} of {} candidates kept, completed in {:.2}ms",
        output.stats.suggestions_returned,
        output.stats.candidates_predicted,
        output.stats.total_time.as_secs_f64() * 1000.0
    );

    // Batch inference - results include input text!
    println!("\n=== Batch ===");
    let texts = &[
        "The team did a <blank> job on the presentation.",
        "This software is so <blank> to use!",
        "Learning new skills is always <blank>.",
    ];

    let output = pipeline.run(texts).await;
    for r in output.results {
        println!("{} -> {:?}", r.text, r.suggestions?);
    }

    Ok(())
}
