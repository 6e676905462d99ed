use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Token usage from an AI provider call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// The single capability the report pipeline consumes from a model provider:
/// send a prompt together with a JSON output schema, get back a structured
/// JSON value the provider claims conforms to that schema.
///
/// Implementations own the wire protocol. The pipeline treats the call as an
/// opaque suspension point and never inspects transport details beyond the
/// error message text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue exactly one structured-completion request.
    async fn generate_structured(
        &self,
        prompt: &str,
        output_schema: &Value,
    ) -> Result<(Value, Option<TokenUsage>), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_default() {
        let usage = TokenUsage::default();
        assert_eq!(usage.input_tokens, 0);
        assert_eq!(usage.output_tokens, 0);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage { input_tokens: 100, output_tokens: 50 };
        assert_eq!(usage.total(), 150);
    }
}
