pub mod gemini;
pub mod provider;
pub mod retry;
