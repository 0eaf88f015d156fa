pub mod classifier;
pub mod formatter;
mod orchestrator;
mod rules;

pub use orchestrator::{ScoringError, ScoringPipeline, FALLBACK_REASONING};
pub use rules::rule_score;
