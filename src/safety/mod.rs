//! Safety scoring pipeline: three independent analyzers and the scorer
//! that aggregates them.
//!
//! The scorer fans out to the contract, holder and liquidity analyzers,
//! joins their results, and emits a single composite safety report. All
//! external data enters through the provider traits in [`data_sources`].

pub mod contract;
pub mod data_sources;
pub mod holders;
pub mod liquidity;
pub mod scorer;
pub mod types;

// Re-export main types
pub use contract::ContractAnalyzer;
pub use data_sources::{
    ContractFacts, ContractFactsSource, HolderLedgerSource, HolderRecord, LiquidityPoolSource,
    PoolListing, PoolLockReport, StaticDataSources, TradeSimulation,
};
pub use holders::HolderAnalyzer;
pub use liquidity::LiquidityAnalyzer;
pub use scorer::SafetyScorer;
pub use types::{
    CentralizationRisk, ContractAnalysisResult, HolderAnalysisResult, LiquidityAnalysisResult,
    LockSignal, RiskLevel, SafetyReport, ScoreBreakdown, ScoringConfig, TradingAnalysis,
};
