use std::process::exit;
use std::sync::Arc;

use clap::Parser;

use marketmind::ai::gemini::GeminiProvider;
use marketmind::report::cache::InMemoryReportCache;
use marketmind::report::flows;
use marketmind::{AppConfig, AppError, ReportPipeline};

/// Analyze a product idea and print the market report as JSON.
#[derive(Parser, Debug)]
#[command(name = "marketmind", version, about)]
struct Cli {
    /// The product idea to analyze
    idea: String,

    /// Override the configured Gemini model
    #[arg(long)]
    model: Option<String>,

    /// Also print a free-text explanation of the analysis
    #[arg(long)]
    explain: bool,
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    let mut pipeline = ReportPipeline::from_config(&config);
    if config.cache_enabled {
        pipeline = pipeline.with_cache(Arc::new(InMemoryReportCache::new()));
    }

    let report = pipeline.analyze_idea(&cli.idea).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if cli.explain {
        if !config.is_configured() {
            return Err(AppError::ConfigError(
                "Google AI is not configured. Set GOOGLE_API_KEY or GEMINI_API_KEY and restart."
                    .to_string(),
            ));
        }
        let api_key = config.api_key.clone().unwrap_or_default();
        let client = GeminiProvider::new(api_key, config.model.clone());
        let explanation = flows::explain_market_analysis(&client, &cli.idea).await?;
        println!("\n{}", explanation);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        exit(1);
    }
}
