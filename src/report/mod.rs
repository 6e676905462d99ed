pub mod cache;
pub mod flows;
pub mod generator;
pub mod heuristic;
pub mod pipeline;
pub mod prompts;
pub mod sanitize;
pub mod schema;
