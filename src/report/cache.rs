use std::collections::HashMap;
use std::sync::Mutex;

use crate::report::schema::MarketAnalysisOutput;

/// Request-keyed report cache. Lives outside the pipeline core; the caller
/// service consults it before generating so repeated ideas never cost an
/// API call.
pub trait ReportCache: Send + Sync {
    fn get(&self, key: &str) -> Option<MarketAnalysisOutput>;
    fn insert(&self, key: String, report: MarketAnalysisOutput);
}

/// Cache key: trimmed, lowercased idea text.
pub fn cache_key(idea_text: &str) -> String {
    idea_text.trim().to_lowercase()
}

/// In-memory cache; resets on process restart.
#[derive(Default)]
pub struct InMemoryReportCache {
    entries: Mutex<HashMap<String, MarketAnalysisOutput>>,
}

impl InMemoryReportCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportCache for InMemoryReportCache {
    fn get(&self, key: &str) -> Option<MarketAnalysisOutput> {
        self.entries
            .lock()
            .expect("report cache poisoned")
            .get(key)
            .cloned()
    }

    fn insert(&self, key: String, report: MarketAnalysisOutput) {
        self.entries
            .lock()
            .expect("report cache poisoned")
            .insert(key, report);
    }
}
