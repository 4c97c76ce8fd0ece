//! Safety scorer - combines the three sub-analyses into the final report.
//!
//! This module orchestrates the pipeline: it validates the request, runs the
//! contract, holder and liquidity analyzers concurrently, derives the
//! trading sub-score, composes the 0-100 safety score with its risk band,
//! discounts confidence for every degradation observed, and synthesizes the
//! recommendation. A sub-analyzer failure never fails the request; only a
//! malformed token reference does.

use crate::safety::contract::ContractAnalyzer;
use crate::safety::data_sources::{
    ContractFactsSource, HolderLedgerSource, LiquidityPoolSource,
};
use crate::safety::holders::HolderAnalyzer;
use crate::safety::liquidity::LiquidityAnalyzer;
use crate::safety::types::{
    ContractAnalysisResult, HolderAnalysisResult, LiquidityAnalysisResult, LockSignal,
    RiskLevel, SafetyReport, ScoreBreakdown, ScoringConfig, TradingAnalysis,
};
use crate::types::{ScoreRequest, TokenRef};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Orchestrator that owns the three analyzers and the aggregation step.
pub struct SafetyScorer {
    contract: ContractAnalyzer,
    holders: HolderAnalyzer,
    liquidity: LiquidityAnalyzer,
    config: ScoringConfig,
}

impl SafetyScorer {
    pub fn new(
        contract_source: Arc<dyn ContractFactsSource>,
        holder_source: Arc<dyn HolderLedgerSource>,
        liquidity_source: Arc<dyn LiquidityPoolSource>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            contract: ContractAnalyzer::new(contract_source, config.clone()),
            holders: HolderAnalyzer::new(holder_source, config.clone()),
            liquidity: LiquidityAnalyzer::new(liquidity_source, config.clone()),
            config,
        }
    }

    /// Score a token. Returns `Err` only for a malformed address or an
    /// unsupported chain; every data problem downstream degrades into the
    /// confidence and warning channels instead.
    #[instrument(skip(self), fields(address = %request.token_address, chain = %request.chain))]
    pub async fn score(&self, request: &ScoreRequest) -> Result<SafetyReport> {
        let start = Instant::now();
        let token = TokenRef::parse(&request.token_address, &request.chain)
            .context("invalid scoring request")?;
        let now = Utc::now();

        // The analyzers are independent; run them concurrently and join.
        let (contract, holders, liquidity) = tokio::join!(
            self.contract.analyze(&token),
            self.holders.analyze(&token),
            self.liquidity.analyze(&token, now),
        );

        let trading = self.trading_analysis(&contract);
        let safety_score = (contract.security_score as u32
            + holders.score as u32
            + liquidity.score as u32
            + trading.score as u32)
            .min(100) as u8;
        let risk_level = RiskLevel::from_score(safety_score);
        let confidence = self.confidence(&contract, &holders, &liquidity);

        // Warning order is fixed to analyzer order for reproducibility.
        let mut warnings = Vec::new();
        warnings.extend(contract.warnings.iter().cloned());
        warnings.extend(holders.warnings.iter().cloned());
        warnings.extend(liquidity.warnings.iter().cloned());
        let red_flags = contract.red_flags.clone();

        let recommendation = self.recommendation(risk_level, &red_flags);

        let breakdown = ScoreBreakdown {
            contract_score: contract.security_score,
            holder_score: holders.score,
            liquidity_score: liquidity.score,
            trading_score: trading.score,
        };

        info!(
            token = %token,
            safety_score,
            risk_level = risk_level.as_str(),
            confidence,
            red_flags = red_flags.len(),
            "scored token in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        Ok(SafetyReport {
            success: true,
            token_address: token.address().to_string(),
            chain: token.chain().as_str().to_string(),
            safety_score,
            risk_level: risk_level.as_str().to_string(),
            confidence,
            recommendation,
            breakdown,
            warnings,
            red_flags,
            analysis_timestamp: now.to_rfc3339(),
            analysis_time_seconds: start.elapsed().as_secs_f64(),
            contract_analysis: request.detailed.then(|| contract.clone()),
            holder_distribution: request.detailed.then(|| holders.clone()),
            liquidity_status: request.detailed.then(|| liquidity.clone()),
            trading_analysis: request.detailed.then(|| trading.clone()),
        })
    }

    /// Trading sub-score, 0-10, derived from the contract analysis alone:
    /// credit for not being a honeypot, for acceptable taxes, and for a
    /// completed sell simulation.
    fn trading_analysis(&self, contract: &ContractAnalysisResult) -> TradingAnalysis {
        let credits = &self.config.trading;
        let mut score = 0u8;

        if contract.success && !contract.is_honeypot {
            score += credits.not_honeypot;
        }

        let max_tax = contract.buy_tax.max(contract.sell_tax);
        if contract.success && !contract.is_honeypot {
            if max_tax <= credits.tax_low_threshold {
                score += credits.tax_low_credit;
            } else if max_tax <= credits.tax_mid_threshold {
                score += credits.tax_mid_credit;
            } else if max_tax <= credits.tax_high_threshold {
                score += credits.tax_high_credit;
            }
        }

        if contract.is_sellable {
            score += credits.sellable;
        }

        debug!(score, max_tax, "trading sub-score computed");

        TradingAnalysis {
            is_honeypot: contract.is_honeypot,
            buy_tax: contract.buy_tax,
            sell_tax: contract.sell_tax,
            is_sellable: contract.is_sellable,
            score,
        }
    }

    /// Confidence discounting: start at 100, subtract once per observed
    /// degradation condition, floor at 0.
    fn confidence(
        &self,
        contract: &ContractAnalysisResult,
        holders: &HolderAnalysisResult,
        liquidity: &LiquidityAnalysisResult,
    ) -> u8 {
        let penalties = &self.config.confidence;
        let mut confidence = 100i32;

        if !contract.success {
            confidence -= penalties.contract_failure as i32;
        }
        if !holders.success {
            confidence -= penalties.holder_failure as i32;
        }
        if !liquidity.success {
            confidence -= penalties.liquidity_failure as i32;
        }
        if contract.success && !contract.is_verified {
            confidence -= penalties.unverified_contract as i32;
        }
        if holders.success {
            if holders.holder_count == 0 {
                confidence -= penalties.zero_holders as i32;
            } else if holders.holder_count < penalties.low_holder_floor {
                confidence -= penalties.low_holders as i32;
            }
        }
        if liquidity.pool_count == 0 {
            confidence -= penalties.zero_pools as i32;
        }
        if liquidity.lock_signal == LockSignal::Inferred {
            confidence -= penalties.inferred_lock as i32;
        }

        confidence.clamp(0, 100) as u8
    }

    /// Recommendation wording. Any red flag short-circuits to the hard
    /// rejection regardless of the numeric score.
    fn recommendation(&self, risk_level: RiskLevel, red_flags: &[String]) -> String {
        if !red_flags.is_empty() {
            return format!(
                "DO NOT INVEST - critical red flags detected: {}",
                red_flags.join("; ")
            );
        }
        match risk_level {
            RiskLevel::VeryLow => {
                "Token looks safe based on available data. Standard due diligence still applies."
            }
            RiskLevel::Low => {
                "Token appears reasonably safe. Review the warnings before investing."
            }
            RiskLevel::Moderate => {
                "Exercise caution. Several risk factors were identified; only invest what you can afford to lose."
            }
            RiskLevel::High => "High risk. Significant issues were detected; investing is not advised.",
            RiskLevel::Critical => {
                "Critical risk. Multiple severe issues were detected; avoid this token."
            }
        }
        .to_string()
    }
}
