//! MarketMind: AI-generated market analysis reports for product ideas.
//!
//! A report is produced by a remote structured completion (Gemini) and
//! always passes through a sanitizer before reaching the caller. When the
//! remote path fails after bounded retries, a deterministic keyword-based
//! scorer produces the report instead, so callers never see a half-finished
//! analysis.

pub mod ai;
pub mod config;
pub mod error;
pub mod report;

pub use config::AppConfig;
pub use error::AppError;
pub use report::pipeline::ReportPipeline;
pub use report::schema::{MarketAnalysisInput, MarketAnalysisOutput};
