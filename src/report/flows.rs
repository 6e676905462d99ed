//! One-shot companion flows: a free-text explanation of the market analysis
//! and a one-line summary of key insights. Unlike the report pipeline these
//! have no retry or heuristic fallback; a failing call surfaces directly.

use serde::Deserialize;
use serde_json::json;

use crate::ai::provider::CompletionClient;
use crate::error::AppError;
use crate::report::prompts;

#[derive(Debug, Deserialize)]
struct ExplainOutput {
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary: String,
}

/// Detailed explanation of the market analysis for an idea.
pub async fn explain_market_analysis(
    client: &dyn CompletionClient,
    idea_text: &str,
) -> Result<String, AppError> {
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "explanation": {"type": "STRING", "description": "A detailed AI explanation of the market analysis."}
        },
        "required": ["explanation"]
    });
    let (value, _) = client
        .generate_structured(&prompts::explain_analysis_prompt(idea_text), &schema)
        .await?;
    let output: ExplainOutput = serde_json::from_value(value)
        .map_err(|e| AppError::SchemaError(format!("invalid output schema: {}", e)))?;
    Ok(output.explanation)
}

/// One-line summary of the key insights from an analysis text.
pub async fn summarize_key_insights(
    client: &dyn CompletionClient,
    analysis: &str,
) -> Result<String, AppError> {
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "summary": {"type": "STRING", "description": "A one-line summary of the key insights."}
        },
        "required": ["summary"]
    });
    let (value, _) = client
        .generate_structured(&prompts::summarize_insights_prompt(analysis), &schema)
        .await?;
    let output: SummaryOutput = serde_json::from_value(value)
        .map_err(|e| AppError::SchemaError(format!("invalid output schema: {}", e)))?;
    Ok(output.summary)
}
