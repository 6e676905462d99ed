use std::time::Duration;

use crate::error::AppError;

/// Error-message fragments that mark a provider failure as transient.
///
/// Matching is substring-based on the lowercased message, mirroring how the
/// provider surfaces HTTP status and body text in its error strings.
/// "not found" covers the model-unavailable variant and "api key" the
/// bad/missing-key variant; both tend to resolve on retry after a key or
/// model alias rollout.
const TRANSIENT_FRAGMENTS: [&str; 8] = [
    "429",
    "quota",
    "rate limit",
    "temporarily",
    "unavailable",
    "not found",
    "api key",
    "failed to fetch",
];

/// Backoff schedule between transient attempts: 1s, 2s, 4s. Attempts beyond
/// the schedule reuse the final delay.
const BACKOFF_SECS: [u64; 3] = [1, 2, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Eligible for retry with backoff.
    Transient,
    /// Retrying will not help; fall back immediately.
    NonTransient,
}

/// Classify a provider failure by its message text.
pub fn classify_failure(error: &AppError) -> FailureClass {
    if is_transient_message(&error.to_string()) {
        FailureClass::Transient
    } else {
        FailureClass::NonTransient
    }
}

pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Delay to sleep after the given zero-based failed attempt.
pub fn backoff_delay(attempt: u32) -> Duration {
    let idx = (attempt as usize).min(BACKOFF_SECS.len() - 1);
    Duration::from_secs(BACKOFF_SECS[idx])
}
