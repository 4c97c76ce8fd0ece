//! Holder distribution and concentration analysis.
//!
//! Ranks non-contract holders by balance, measures how much supply the top
//! of the list controls, and scores distribution quality on a 0-25 scale.
//! Burn addresses and pool/contract accounts are excluded before ranking so
//! locked or burned supply is not misread as a risky concentrated holder.

use crate::safety::data_sources::{HolderLedgerSource, HolderRecord};
use crate::safety::types::{CentralizationRisk, HolderAnalysisResult, ScoringConfig};
use crate::types::TokenRef;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Addresses whose balances are burned supply, not holdings.
const BURN_ADDRESSES: &[&str] = &[
    "0x0000000000000000000000000000000000000000",
    "0x000000000000000000000000000000000000dead",
    "0x0000000000000000000000000000000000000001",
];

/// Analyzer for holder concentration metrics.
pub struct HolderAnalyzer {
    source: Arc<dyn HolderLedgerSource>,
    config: ScoringConfig,
}

impl HolderAnalyzer {
    pub fn new(source: Arc<dyn HolderLedgerSource>, config: ScoringConfig) -> Self {
        Self { source, config }
    }

    /// Analyze holder distribution. Infallible: provider errors and empty
    /// ledgers both degrade rather than propagate.
    #[instrument(skip(self), fields(token = %token))]
    pub async fn analyze(&self, token: &TokenRef) -> HolderAnalysisResult {
        let records = match self.source.holder_balances(token).await {
            Ok(records) => records,
            Err(e) => {
                warn!("holder ledger unavailable for {}: {}", token, e);
                return HolderAnalysisResult::failed(e.to_string());
            }
        };

        let result = self.evaluate(records);
        if !result.invariants_hold() {
            warn!(
                top_holder = result.top_holder_percentage,
                top_10 = result.top_10_percentage,
                "holder percentages violate ordering invariant, degrading result"
            );
            return HolderAnalysisResult::failed("inconsistent holder percentages");
        }
        result
    }

    fn evaluate(&self, records: Vec<HolderRecord>) -> HolderAnalysisResult {
        let thresholds = &self.config.holders;

        // Drop burn addresses and contract accounts before ranking.
        let mut holders: Vec<HolderRecord> = records
            .into_iter()
            .filter(|r| !r.is_contract && !is_burn_address(&r.address) && r.balance > 0)
            .collect();

        let total_supply: u128 = holders.iter().map(|r| r.balance).sum();
        if holders.is_empty() || total_supply == 0 {
            debug!("no rankable holders");
            return HolderAnalysisResult {
                success: true,
                error: None,
                holder_count: 0,
                top_holder_percentage: 0.0,
                top_10_percentage: 0.0,
                centralization_risk: CentralizationRisk::Unknown,
                score: 0,
                warnings: vec!["No holder data available".to_string()],
            };
        }

        holders.sort_by(|a, b| b.balance.cmp(&a.balance));

        let holder_count = holders.len() as u64;
        let top_holder_percentage = percentage(holders[0].balance, total_supply);
        let top_10_sum: u128 = holders.iter().take(10).map(|r| r.balance).sum();
        let top_10_percentage = percentage(top_10_sum, total_supply).min(100.0);

        let centralization_risk = if top_10_percentage > thresholds.critical_top10 {
            CentralizationRisk::Critical
        } else if top_10_percentage > thresholds.high_top10 {
            CentralizationRisk::High
        } else if top_10_percentage > thresholds.medium_top10 {
            CentralizationRisk::Medium
        } else {
            CentralizationRisk::Low
        };

        let mut warnings = Vec::new();
        match centralization_risk {
            CentralizationRisk::Critical => warnings.push(format!(
                "Top 10 holders control {:.1}% of supply",
                top_10_percentage
            )),
            CentralizationRisk::High => warnings.push(format!(
                "Top 10 holders hold a large share of supply ({:.1}%)",
                top_10_percentage
            )),
            _ => {}
        }
        if top_holder_percentage > thresholds.single_holder_severe {
            warnings.push(format!(
                "A single holder controls {:.1}% of supply",
                top_holder_percentage
            ));
        }
        if holder_count < thresholds.count_small {
            warnings.push(format!("Very few holders ({})", holder_count));
        }

        let score = self.score_distribution(centralization_risk, holder_count, top_holder_percentage);

        debug!(
            holder_count,
            top_holder = top_holder_percentage,
            top_10 = top_10_percentage,
            risk = centralization_risk.as_str(),
            score,
            "holder evaluation complete"
        );

        HolderAnalysisResult {
            success: true,
            error: None,
            holder_count,
            top_holder_percentage,
            top_10_percentage,
            centralization_risk,
            score,
            warnings,
        }
    }

    /// Band base plus holder-count credit minus single-holder penalty,
    /// clamped to the 0-25 ceiling.
    fn score_distribution(
        &self,
        risk: CentralizationRisk,
        holder_count: u64,
        top_holder_percentage: f64,
    ) -> u8 {
        let thresholds = &self.config.holders;

        let base = match risk {
            CentralizationRisk::Low => thresholds.base_low,
            CentralizationRisk::Medium => thresholds.base_medium,
            CentralizationRisk::High => thresholds.base_high,
            CentralizationRisk::Critical | CentralizationRisk::Unknown => thresholds.base_critical,
        } as i32;

        let count_credit = if holder_count >= thresholds.count_large {
            thresholds.count_large_credit
        } else if holder_count >= thresholds.count_mid {
            thresholds.count_mid_credit
        } else if holder_count >= thresholds.count_small {
            thresholds.count_small_credit
        } else {
            0
        } as i32;

        let single_holder_penalty = if top_holder_percentage > thresholds.single_holder_severe {
            thresholds.single_holder_severe_penalty
        } else if top_holder_percentage > thresholds.single_holder_high {
            thresholds.single_holder_high_penalty
        } else {
            0
        } as i32;

        (base + count_credit - single_holder_penalty).clamp(0, thresholds.max_score as i32) as u8
    }
}

fn is_burn_address(address: &str) -> bool {
    let lower = address.to_ascii_lowercase();
    BURN_ADDRESSES.contains(&lower.as_str())
}

fn percentage(part: u128, total: u128) -> f64 {
    (part as f64 / total as f64) * 100.0
}
