use std::sync::Arc;

use crate::ai::gemini::GeminiProvider;
use crate::ai::provider::CompletionClient;
use crate::ai::retry::{backoff_delay, classify_failure, FailureClass};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::report::cache::{cache_key, ReportCache};
use crate::report::generator::generate_remote;
use crate::report::heuristic::heuristic_report;
use crate::report::schema::{MarketAnalysisInput, MarketAnalysisOutput};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const MIN_IDEA_CHARS: usize = 15;

/// Top-level report policy: remote generation with bounded retry, heuristic
/// fallback once remote attempts are exhausted or fail non-transiently.
///
/// Dependencies are constructor-injected; there are no ambient globals, so
/// tests can swap in scripted clients and caches.
pub struct ReportPipeline {
    client: Option<Arc<dyn CompletionClient>>,
    cache: Option<Arc<dyn ReportCache>>,
    max_attempts: u32,
}

impl ReportPipeline {
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self {
            client,
            cache: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Build the pipeline from config: a Gemini client when the configured
    /// provider is gemini and a key is present, otherwise no client at all
    /// so `generate` fails fast with a configuration error instead of
    /// silently running heuristics-only.
    pub fn from_config(config: &AppConfig) -> Self {
        let client: Option<Arc<dyn CompletionClient>> =
            if config.ai_provider.eq_ignore_ascii_case("gemini") && config.is_configured() {
                let api_key = config.api_key.clone().unwrap_or_default();
                Some(Arc::new(GeminiProvider::new(api_key, config.model.clone())))
            } else {
                None
            };
        if !config.ai_provider.eq_ignore_ascii_case("gemini") {
            eprintln!(
                "[pipeline] unsupported ai_provider '{}', remote generation disabled",
                config.ai_provider
            );
        }
        Self::new(client).with_max_attempts(config.max_attempts)
    }

    pub fn with_cache(mut self, cache: Arc<dyn ReportCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Generate a report for the idea.
    ///
    /// Fails only when the remote capability is not configured. Every
    /// call-time failure is absorbed: transient errors are retried with
    /// backoff, anything else degrades to the deterministic heuristic
    /// scorer, and the caller always receives a sanitized report.
    pub async fn generate(
        &self,
        input: &MarketAnalysisInput,
    ) -> Result<MarketAnalysisOutput, AppError> {
        let client = self.client.as_deref().ok_or_else(|| {
            AppError::ConfigError(
                "Google AI is not configured. Set GOOGLE_API_KEY or GEMINI_API_KEY and restart."
                    .to_string(),
            )
        })?;

        for attempt in 0..self.max_attempts {
            match generate_remote(client, input).await {
                Ok((report, usage)) => {
                    if let Some(usage) = usage {
                        eprintln!(
                            "[pipeline] report generated: {} tokens ({} input / {} output)",
                            usage.total(),
                            usage.input_tokens,
                            usage.output_tokens
                        );
                    }
                    return Ok(report);
                }
                Err(err) => match classify_failure(&err) {
                    FailureClass::NonTransient => {
                        eprintln!("[pipeline] non-transient remote error, falling back: {}", err);
                        break;
                    }
                    FailureClass::Transient => {
                        if attempt + 1 < self.max_attempts {
                            let delay = backoff_delay(attempt);
                            eprintln!(
                                "[pipeline] transient remote error (attempt {}/{}), retrying in {:?}: {}",
                                attempt + 1,
                                self.max_attempts,
                                delay,
                                err
                            );
                            tokio::time::sleep(delay).await;
                        } else {
                            eprintln!(
                                "[pipeline] remote attempts exhausted ({}), falling back: {}",
                                self.max_attempts, err
                            );
                        }
                    }
                },
            }
        }

        // Remote unavailability degrades to heuristic-only operation;
        // the caller observes no failure on this path.
        Ok(heuristic_report(&input.idea_text))
    }

    /// Caller-facing service: validates input length, consults the cache,
    /// and maps configuration failures to actionable messages.
    pub async fn analyze_idea(&self, idea_text: &str) -> Result<MarketAnalysisOutput, AppError> {
        if idea_text.trim().chars().count() < MIN_IDEA_CHARS {
            return Err(AppError::InvalidInput(
                "Please provide a more detailed idea (at least 15 characters).".to_string(),
            ));
        }

        let key = cache_key(idea_text);
        if let Some(cache) = &self.cache {
            if let Some(report) = cache.get(&key) {
                eprintln!("[pipeline] returning cached analysis - no API call made");
                return Ok(report);
            }
        }

        let input = MarketAnalysisInput {
            idea_text: idea_text.to_string(),
        };
        let report = self.generate(&input).await.map_err(user_facing_error)?;

        if let Some(cache) = &self.cache {
            cache.insert(key, report.clone());
        }

        Ok(report)
    }
}

/// Rewrite quota and credential failures into messages a user can act on.
fn user_facing_error(err: AppError) -> AppError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("429") || lower.contains("quota") || lower.contains("rate limit") {
        return AppError::AiProviderError(
            "API quota exceeded. Wait 30+ minutes, get a new API key, or upgrade your plan."
                .to_string(),
        );
    }
    if lower.contains("api key") {
        return AppError::AiProviderError(
            "Invalid API key. Update your key and restart.".to_string(),
        );
    }
    err
}
