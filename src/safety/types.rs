//! Core types and data structures for the safety scoring pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discrete risk level derived from the composite safety score.
///
/// The bands are fixed, contiguous and non-overlapping:
/// `[86,100]`, `[71,85]`, `[51,70]`, `[31,50]`, `[0,30]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Map a composite safety score onto its risk band.
    pub fn from_score(score: u8) -> RiskLevel {
        match score {
            86..=u8::MAX => RiskLevel::VeryLow,
            71..=85 => RiskLevel::Low,
            51..=70 => RiskLevel::Moderate,
            31..=50 => RiskLevel::High,
            0..=30 => RiskLevel::Critical,
        }
    }

    /// Display string used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

/// Holder concentration classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CentralizationRisk {
    Low,
    Medium,
    High,
    Critical,
    /// No holder data was available to classify.
    Unknown,
}

impl CentralizationRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            CentralizationRisk::Low => "Low",
            CentralizationRisk::Medium => "Medium",
            CentralizationRisk::High => "High",
            CentralizationRisk::Critical => "Critical",
            CentralizationRisk::Unknown => "Unknown",
        }
    }
}

/// Provenance of the liquidity lock figures.
///
/// Keeps observed facts distinguishable from heuristic estimates so that
/// confidence computation can discount the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockSignal {
    /// A pool data source explicitly reported the lock.
    Reported,
    /// Inferred from pool age and size; figures are conservative estimates.
    Inferred,
    /// No lock information of any kind.
    Unknown,
}

/// Outcome of the contract security analysis. Computed once per request,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAnalysisResult {
    /// False when contract facts could not be obtained at all.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub is_verified: bool,
    pub is_open_source: bool,
    pub is_honeypot: bool,
    pub has_mint_function: bool,
    pub ownership_renounced: bool,
    pub has_proxy: bool,
    pub has_blacklist: bool,
    pub transfer_pausable: bool,
    pub hidden_fees: bool,
    pub buy_tax: f64,
    pub sell_tax: f64,
    /// Whether a simulated sell completed. Feeds the trading sub-score.
    pub is_sellable: bool,
    /// Recognized dangerous function names found in the ABI.
    pub malicious_functions: Vec<String>,
    /// Security sub-score, 0..=30.
    pub security_score: u8,
    pub warnings: Vec<String>,
    pub red_flags: Vec<String>,
}

impl ContractAnalysisResult {
    /// Degraded result for when no contract data could be obtained.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            is_verified: false,
            is_open_source: false,
            is_honeypot: false,
            has_mint_function: false,
            ownership_renounced: false,
            has_proxy: false,
            has_blacklist: false,
            transfer_pausable: false,
            hidden_fees: false,
            buy_tax: 0.0,
            sell_tax: 0.0,
            is_sellable: false,
            malicious_functions: Vec::new(),
            security_score: 0,
            warnings: vec!["Contract analysis unavailable".to_string()],
            red_flags: Vec::new(),
        }
    }
}

/// Outcome of the holder distribution analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderAnalysisResult {
    /// False when the holder ledger could not be obtained.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub holder_count: u64,
    /// Largest single non-contract holder's share of supply, percent.
    pub top_holder_percentage: f64,
    /// Combined share of the ten largest holders, percent.
    pub top_10_percentage: f64,
    pub centralization_risk: CentralizationRisk,
    /// Distribution sub-score, 0..=25.
    pub score: u8,
    pub warnings: Vec<String>,
}

impl HolderAnalysisResult {
    /// Degraded result for when the holder ledger could not be obtained.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            holder_count: 0,
            top_holder_percentage: 0.0,
            top_10_percentage: 0.0,
            centralization_risk: CentralizationRisk::Unknown,
            score: 0,
            warnings: vec!["Holder analysis unavailable".to_string()],
        }
    }

    /// Internal consistency check: percentage ordering must hold.
    pub fn invariants_hold(&self) -> bool {
        const EPS: f64 = 1e-6;
        self.top_holder_percentage <= self.top_10_percentage + EPS
            && self.top_10_percentage <= 100.0 + EPS
            && self.top_holder_percentage >= 0.0
    }
}

/// Outcome of the liquidity pool and lock analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityAnalysisResult {
    /// False when pool listings could not be obtained.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub is_locked: bool,
    pub lock_duration_days: u64,
    pub locked_value_usd: f64,
    /// Share of total liquidity that is locked, percent.
    pub lock_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlock_date: Option<DateTime<Utc>>,
    /// Whether the lock figures are reported, inferred, or absent.
    pub lock_signal: LockSignal,
    pub pool_count: u64,
    pub total_liquidity_usd: f64,
    pub largest_pool_liquidity: f64,
    /// Per-DEX USD liquidity. BTreeMap keeps serialization byte-stable.
    pub dex_distribution: BTreeMap<String, f64>,
    pub liquidity_sufficient: bool,
    /// Liquidity sub-score, 0..=35.
    pub score: u8,
    pub warnings: Vec<String>,
}

impl LiquidityAnalysisResult {
    /// Degraded zero-pool result. Used both for an empty listing and for a
    /// provider failure; the latter additionally records the error.
    pub fn no_pools(error: Option<String>) -> Self {
        Self {
            success: error.is_none(),
            error,
            is_locked: false,
            lock_duration_days: 0,
            locked_value_usd: 0.0,
            lock_percentage: 0.0,
            unlock_date: None,
            lock_signal: LockSignal::Unknown,
            pool_count: 0,
            total_liquidity_usd: 0.0,
            largest_pool_liquidity: 0.0,
            dex_distribution: BTreeMap::new(),
            liquidity_sufficient: false,
            score: 0,
            warnings: vec!["No liquidity pools found - token cannot be traded".to_string()],
        }
    }
}

/// Per-component contribution to the composite score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub contract_score: u8,
    pub holder_score: u8,
    pub liquidity_score: u8,
    pub trading_score: u8,
}

/// Trading viability detail derived from the contract analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingAnalysis {
    pub is_honeypot: bool,
    pub buy_tax: f64,
    pub sell_tax: f64,
    pub is_sellable: bool,
    /// Trading sub-score, 0..=10.
    pub score: u8,
}

/// Final composite safety report for a single token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyReport {
    pub success: bool,
    pub token_address: String,
    pub chain: String,
    /// Composite safety score, 0..=100.
    pub safety_score: u8,
    /// Display string of the risk band, e.g. "Very Low".
    pub risk_level: String,
    /// How much of the scoring rested on verified data, 0..=100.
    pub confidence: u8,
    pub recommendation: String,
    pub breakdown: ScoreBreakdown,
    pub warnings: Vec<String>,
    pub red_flags: Vec<String>,
    /// RFC 3339 timestamp of the analysis.
    pub analysis_timestamp: String,
    pub analysis_time_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_analysis: Option<ContractAnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_distribution: Option<HolderAnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_status: Option<LiquidityAnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trading_analysis: Option<TradingAnalysis>,
}

/// Penalty table for the contract analyzer. All penalties subtract from
/// [`ContractPenalties::max_score`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractPenalties {
    pub max_score: u8,
    pub honeypot: u8,
    pub mint_function: u8,
    pub self_destruct: u8,
    pub blacklist: u8,
    pub hidden_fees: u8,
    pub transfer_pausable: u8,
    pub ownership_not_renounced: u8,
    pub unverified_source: u8,
    pub proxy: u8,
    /// Penalty when max(buy, sell) tax exceeds `tax_partial_threshold`.
    pub tax_partial: u8,
    /// Penalty when max(buy, sell) tax exceeds `tax_full_threshold`.
    pub tax_full: u8,
    pub tax_partial_threshold: f64,
    pub tax_full_threshold: f64,
    /// Tolerance before an observed transfer fee counts as hidden.
    pub hidden_fee_tolerance: f64,
}

impl Default for ContractPenalties {
    fn default() -> Self {
        Self {
            max_score: 30,
            honeypot: 30,
            mint_function: 10,
            self_destruct: 8,
            blacklist: 6,
            hidden_fees: 6,
            transfer_pausable: 5,
            ownership_not_renounced: 5,
            unverified_source: 5,
            proxy: 4,
            tax_partial: 2,
            tax_full: 5,
            tax_partial_threshold: 5.0,
            tax_full_threshold: 10.0,
            hidden_fee_tolerance: 1.0,
        }
    }
}

/// Threshold and scoring table for the holder analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderThresholds {
    pub max_score: u8,
    /// Top-10 share above which centralization is Critical, percent.
    pub critical_top10: f64,
    /// Top-10 share above which centralization is High, percent.
    pub high_top10: f64,
    /// Top-10 share above which centralization is Medium, percent.
    pub medium_top10: f64,
    /// Band base scores, indexed Low/Medium/High/Critical.
    pub base_low: u8,
    pub base_medium: u8,
    pub base_high: u8,
    pub base_critical: u8,
    /// Holder-count credit tiers.
    pub count_large: u64,
    pub count_large_credit: u8,
    pub count_mid: u64,
    pub count_mid_credit: u8,
    pub count_small: u64,
    pub count_small_credit: u8,
    /// Single-holder penalty tiers, percent of supply.
    pub single_holder_severe: f64,
    pub single_holder_severe_penalty: u8,
    pub single_holder_high: f64,
    pub single_holder_high_penalty: u8,
}

impl Default for HolderThresholds {
    fn default() -> Self {
        Self {
            max_score: 25,
            critical_top10: 60.0,
            high_top10: 40.0,
            medium_top10: 20.0,
            base_low: 20,
            base_medium: 12,
            base_high: 6,
            base_critical: 0,
            count_large: 1000,
            count_large_credit: 5,
            count_mid: 250,
            count_mid_credit: 3,
            count_small: 100,
            count_small_credit: 1,
            single_holder_severe: 30.0,
            single_holder_severe_penalty: 4,
            single_holder_high: 15.0,
            single_holder_high_penalty: 2,
        }
    }
}

/// Threshold and scoring table for the liquidity analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityThresholds {
    pub max_score: u8,
    /// Sufficiency bands over total USD liquidity.
    pub safe_usd: f64,
    pub moderate_usd: f64,
    pub risky_usd: f64,
    pub safe_credit: u8,
    pub moderate_credit: u8,
    pub risky_credit: u8,
    /// Lock percentage bands, 0..=15 credit.
    pub lock_pct_full: f64,
    pub lock_pct_full_credit: u8,
    pub lock_pct_major: f64,
    pub lock_pct_major_credit: u8,
    pub lock_pct_partial: f64,
    pub lock_pct_partial_credit: u8,
    pub lock_pct_minimal_credit: u8,
    /// Lock duration bands, 0..=10 credit, days.
    pub duration_full: u64,
    pub duration_full_credit: u8,
    pub duration_year: u64,
    pub duration_year_credit: u8,
    pub duration_half_year: u64,
    pub duration_half_year_credit: u8,
    pub duration_quarter: u64,
    pub duration_quarter_credit: u8,
    pub duration_minimal_credit: u8,
    /// Heuristic lock inference floors.
    pub inferred_min_age_days: i64,
    pub inferred_min_liquidity_usd: f64,
    pub inferred_lock_percentage: f64,
    pub inferred_duration_days: u64,
    /// Warning thresholds.
    pub partial_lock_warning_pct: f64,
    pub short_lock_warning_days: u64,
}

impl Default for LiquidityThresholds {
    fn default() -> Self {
        Self {
            max_score: 35,
            safe_usd: 100_000.0,
            moderate_usd: 50_000.0,
            risky_usd: 10_000.0,
            safe_credit: 10,
            moderate_credit: 6,
            risky_credit: 3,
            lock_pct_full: 75.0,
            lock_pct_full_credit: 15,
            lock_pct_major: 50.0,
            lock_pct_major_credit: 11,
            lock_pct_partial: 25.0,
            lock_pct_partial_credit: 6,
            lock_pct_minimal_credit: 3,
            duration_full: 730,
            duration_full_credit: 10,
            duration_year: 365,
            duration_year_credit: 8,
            duration_half_year: 180,
            duration_half_year_credit: 5,
            duration_quarter: 90,
            duration_quarter_credit: 3,
            duration_minimal_credit: 1,
            inferred_min_age_days: 180,
            inferred_min_liquidity_usd: 1_000_000.0,
            inferred_lock_percentage: 70.0,
            inferred_duration_days: 365,
            partial_lock_warning_pct: 50.0,
            short_lock_warning_days: 90,
        }
    }
}

/// Credit table for the trading sub-score, 0..=10 total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingCredits {
    pub not_honeypot: u8,
    pub sellable: u8,
    /// Tax tier credits over max(buy, sell) tax.
    pub tax_low_threshold: f64,
    pub tax_low_credit: u8,
    pub tax_mid_threshold: f64,
    pub tax_mid_credit: u8,
    pub tax_high_threshold: f64,
    pub tax_high_credit: u8,
}

impl Default for TradingCredits {
    fn default() -> Self {
        Self {
            not_honeypot: 5,
            sellable: 2,
            tax_low_threshold: 5.0,
            tax_low_credit: 3,
            tax_mid_threshold: 10.0,
            tax_mid_credit: 2,
            tax_high_threshold: 15.0,
            tax_high_credit: 1,
        }
    }
}

/// Confidence discount table. Each discount is applied at most once per
/// request; confidence starts at 100 and floors at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidencePenalties {
    pub contract_failure: u8,
    pub holder_failure: u8,
    pub liquidity_failure: u8,
    pub unverified_contract: u8,
    pub zero_holders: u8,
    pub low_holders: u8,
    /// Holder count below which the low-holder discount applies.
    pub low_holder_floor: u64,
    pub zero_pools: u8,
    /// Lock status was inferred rather than reported.
    pub inferred_lock: u8,
}

impl Default for ConfidencePenalties {
    fn default() -> Self {
        Self {
            contract_failure: 30,
            holder_failure: 20,
            liquidity_failure: 15,
            unverified_contract: 10,
            zero_holders: 15,
            low_holders: 5,
            low_holder_floor: 100,
            zero_pools: 10,
            inferred_lock: 5,
        }
    }
}

/// Immutable scoring configuration, constructed once and injected into every
/// analyzer so alternate threshold sets can be tested deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub contract: ContractPenalties,
    pub holders: HolderThresholds,
    pub liquidity: LiquidityThresholds,
    pub trading: TradingCredits,
    pub confidence: ConfidencePenalties,
}
