use crate::ai::provider::{CompletionClient, TokenUsage};
use crate::error::AppError;
use crate::report::prompts;
use crate::report::sanitize::sanitize;
use crate::report::schema::{self, MarketAnalysisInput, MarketAnalysisOutput};

/// Issue exactly one structured-completion request and turn the response
/// into a sanitized report.
///
/// A response that fails schema validation errors out here with a
/// `SchemaError`; the orchestrator treats that as non-transient. Coercion of
/// schema-valid but messy values (sentinel strings, score/breakdown
/// disagreements) is left to the sanitizer.
pub async fn generate_remote(
    client: &dyn CompletionClient,
    input: &MarketAnalysisInput,
) -> Result<(MarketAnalysisOutput, Option<TokenUsage>), AppError> {
    let prompt = prompts::market_analysis_prompt(&input.idea_text);
    let output_schema = schema::response_schema();

    let (value, usage) = client.generate_structured(&prompt, &output_schema).await?;
    let candidate = schema::validate_remote_report(&value)?;

    Ok((sanitize(candidate), usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct ScriptedClient {
        responses: Mutex<Vec<Result<Value, AppError>>>,
        prompts_seen: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<Value, AppError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                prompts_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn generate_structured(
            &self,
            prompt: &str,
            _output_schema: &Value,
        ) -> Result<(Value, Option<TokenUsage>), AppError> {
            self.prompts_seen.lock().unwrap().push(prompt.to_string());
            let next = self.responses.lock().unwrap().remove(0);
            next.map(|v| (v, None))
        }
    }

    fn remote_value() -> Value {
        json!({
            "verdict": "Viable with Risks",
            "growthScore": 10,
            "growthScoreBreakdown": {
                "marketSize": {"score": 14, "explanation": "Consumer market"},
                "competitionPressure": {"score": 8, "explanation": "Some competition"},
                "technicalFeasibility": {"score": 16, "explanation": "Standard stack"},
                "differentiation": {"score": 10, "explanation": "Incremental"},
                "monetizationPotential": {"score": 12, "explanation": "Plausible revenue"},
            },
            "riskLevel": "n/a",
            "summary": " A consumer app ",
            "keyInsights": ["insight one", ""],
            "explanation": "Detailed explanation",
            "profitStrategy": "Subscriptions",
            "competitors": "A few incumbents",
            "nextAction": "Validate demand",
            "visualData": [
                {"name": "Market Demand", "value": 70},
                {"name": "Competitive Pressure", "value": 60},
                {"name": "Differentiation Potential", "value": 50},
                {"name": "Profitability Potential", "value": 60},
                {"name": "Execution Complexity", "value": 20}
            ]
        })
    }

    #[tokio::test]
    async fn test_remote_report_is_sanitized() {
        let client = ScriptedClient::new(vec![Ok(remote_value())]);
        let input = MarketAnalysisInput {
            idea_text: "a consumer app".to_string(),
        };
        let (report, _) = generate_remote(&client, &input).await.unwrap();

        // Growth score recomputed from the breakdown, not trusted
        assert_eq!(report.growth_score, 60.0);
        // Sentinel risk level replaced by the default
        assert_eq!(report.risk_level, "Medium");
        assert_eq!(report.summary, "A consumer app");
        assert_eq!(report.key_insights, vec!["insight one"]);
    }

    #[tokio::test]
    async fn test_prompt_carries_idea_text() {
        let client = ScriptedClient::new(vec![Ok(remote_value())]);
        let input = MarketAnalysisInput {
            idea_text: "solar-powered bike lights".to_string(),
        };
        generate_remote(&client, &input).await.unwrap();

        let prompts_seen = client.prompts_seen.lock().unwrap();
        assert_eq!(prompts_seen.len(), 1);
        assert!(prompts_seen[0].contains("Idea to analyze: solar-powered bike lights"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_schema_error() {
        let client = ScriptedClient::new(vec![Ok(json!({"verdict": "only a verdict"}))]);
        let input = MarketAnalysisInput {
            idea_text: "anything".to_string(),
        };
        let err = generate_remote(&client, &input).await.unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let client = ScriptedClient::new(vec![Err(AppError::AiProviderError(
            "Gemini API error (429): quota".to_string(),
        ))]);
        let input = MarketAnalysisInput {
            idea_text: "anything".to_string(),
        };
        let err = generate_remote(&client, &input).await.unwrap_err();
        assert!(matches!(err, AppError::AiProviderError(_)));
    }
}
