//! rugscan - multi-factor token safety scoring engine
//!
//! This crate evaluates a blockchain token contract across contract
//! security, holder concentration and liquidity depth, and produces a
//! composite 0-100 safety score with a risk level, a confidence value and a
//! plain-language recommendation.

pub mod safety;
pub mod types;

// Re-export main types for convenience
pub use safety::{SafetyReport, SafetyScorer, ScoringConfig};
pub use types::{Chain, ScoreRequest, TokenRef};
