//! DEX pool and lock-status analysis.
//!
//! Aggregates per-pool USD liquidity, judges sufficiency against fixed USD
//! floors, resolves the token-level lock status (explicitly reported by a
//! data source, or conservatively inferred from pool age and size), and
//! scores the result on a 0-35 scale.
//!
//! Evaluation time is passed in by the caller so the age heuristic is a pure
//! function of the pool listings plus one request timestamp.

use crate::safety::data_sources::{LiquidityPoolSource, PoolListing, PoolLockReport};
use crate::safety::types::{LiquidityAnalysisResult, LockSignal, ScoringConfig};
use crate::types::TokenRef;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Token-level lock figures resolved from pool listings.
struct ResolvedLock {
    locked_value_usd: f64,
    lock_percentage: f64,
    lock_duration_days: u64,
    unlock_date: Option<DateTime<Utc>>,
    signal: LockSignal,
}

/// Analyzer for liquidity depth and lock status.
pub struct LiquidityAnalyzer {
    source: Arc<dyn LiquidityPoolSource>,
    config: ScoringConfig,
}

impl LiquidityAnalyzer {
    pub fn new(source: Arc<dyn LiquidityPoolSource>, config: ScoringConfig) -> Self {
        Self { source, config }
    }

    /// Analyze pool listings at the given evaluation time. Infallible:
    /// provider errors degrade to the zero-pool result.
    #[instrument(skip(self, now), fields(token = %token))]
    pub async fn analyze(&self, token: &TokenRef, now: DateTime<Utc>) -> LiquidityAnalysisResult {
        let listings = match self.source.pool_listings(token).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!("pool listings unavailable for {}: {}", token, e);
                return LiquidityAnalysisResult::no_pools(Some(e.to_string()));
            }
        };

        if listings.is_empty() {
            debug!("no pools listed");
            return LiquidityAnalysisResult::no_pools(None);
        }

        self.evaluate(&listings, now)
    }

    fn evaluate(&self, listings: &[PoolListing], now: DateTime<Utc>) -> LiquidityAnalysisResult {
        let thresholds = &self.config.liquidity;

        let pool_count = listings.len() as u64;
        let mut total_liquidity_usd = 0.0;
        let mut largest_pool_liquidity = 0.0f64;
        let mut dex_distribution: BTreeMap<String, f64> = BTreeMap::new();

        for pool in listings {
            total_liquidity_usd += pool.liquidity_usd;
            largest_pool_liquidity = largest_pool_liquidity.max(pool.liquidity_usd);
            *dex_distribution.entry(pool.dex.clone()).or_insert(0.0) += pool.liquidity_usd;
        }

        let liquidity_sufficient = total_liquidity_usd >= thresholds.risky_usd;
        let lock = self.resolve_lock(listings, total_liquidity_usd, now);
        let is_locked = lock.lock_percentage > 0.0;

        let mut warnings = Vec::new();
        if !is_locked {
            warnings.push("Liquidity is not locked".to_string());
        } else {
            if lock.lock_percentage < thresholds.partial_lock_warning_pct {
                warnings.push(format!(
                    "Only {:.1}% of liquidity is locked",
                    lock.lock_percentage
                ));
            }
            if lock.lock_duration_days < thresholds.short_lock_warning_days {
                warnings.push(format!(
                    "Liquidity lock expires in {} days",
                    lock.lock_duration_days
                ));
            }
        }
        if lock.signal == LockSignal::Inferred {
            warnings.push(
                "Lock status inferred from pool age and size, not verified".to_string(),
            );
        }
        if total_liquidity_usd < thresholds.risky_usd {
            warnings.push(format!(
                "Very low liquidity (${:.0})",
                total_liquidity_usd
            ));
        } else if total_liquidity_usd < thresholds.moderate_usd {
            warnings.push(format!("Low liquidity (${:.0})", total_liquidity_usd));
        }
        if pool_count == 1 {
            warnings.push("All liquidity sits in a single pool".to_string());
        }

        let lock_pct_credit = self.lock_percentage_credit(lock.lock_percentage);
        let duration_credit = self.lock_duration_credit(lock.lock_duration_days, is_locked);
        let sufficiency_credit = self.sufficiency_credit(total_liquidity_usd);
        let score = (lock_pct_credit + duration_credit + sufficiency_credit)
            .min(thresholds.max_score);

        debug!(
            pool_count,
            total_liquidity_usd,
            lock_percentage = lock.lock_percentage,
            signal = ?lock.signal,
            score,
            "liquidity evaluation complete"
        );

        LiquidityAnalysisResult {
            success: true,
            error: None,
            is_locked,
            lock_duration_days: lock.lock_duration_days,
            locked_value_usd: lock.locked_value_usd,
            lock_percentage: lock.lock_percentage,
            unlock_date: lock.unlock_date,
            lock_signal: lock.signal,
            pool_count,
            total_liquidity_usd,
            largest_pool_liquidity,
            dex_distribution,
            liquidity_sufficient,
            score,
            warnings,
        }
    }

    /// Resolve token-level lock figures.
    ///
    /// Explicit lock reports win. Without any, a pool that is both old
    /// (age above the duration floor) and large (liquidity above the
    /// materiality floor) is assumed conservatively locked, and the result
    /// is tagged `Inferred` so confidence can discount it.
    fn resolve_lock(
        &self,
        listings: &[PoolListing],
        total_liquidity_usd: f64,
        now: DateTime<Utc>,
    ) -> ResolvedLock {
        let thresholds = &self.config.liquidity;

        let reported: Vec<(&PoolLockReport, f64)> = listings
            .iter()
            .filter_map(|pool| {
                pool.lock.as_ref().map(|report| {
                    let locked_value = report
                        .locked_value_usd
                        .min(pool.liquidity_usd * report.locked_percentage / 100.0)
                        .max(0.0);
                    (report, locked_value)
                })
            })
            .collect();

        // Duration and unlock date come from the largest locked pool.
        if let Some((anchor, _)) = reported.iter().max_by(|a, b| a.1.total_cmp(&b.1)) {
            let locked_value_usd: f64 = reported.iter().map(|(_, v)| v).sum();
            let lock_percentage = if total_liquidity_usd > 0.0 {
                (locked_value_usd / total_liquidity_usd * 100.0).min(100.0)
            } else {
                0.0
            };
            return ResolvedLock {
                locked_value_usd,
                lock_percentage,
                lock_duration_days: anchor.lock_duration_days,
                unlock_date: anchor.unlock_date,
                signal: LockSignal::Reported,
            };
        }

        let largest = listings
            .iter()
            .max_by(|a, b| a.liquidity_usd.total_cmp(&b.liquidity_usd));
        if let Some(pool) = largest {
            let age_days = (now - pool.created_at).num_days();
            if age_days >= thresholds.inferred_min_age_days
                && pool.liquidity_usd >= thresholds.inferred_min_liquidity_usd
            {
                let locked_value_usd =
                    pool.liquidity_usd * thresholds.inferred_lock_percentage / 100.0;
                let lock_percentage = if total_liquidity_usd > 0.0 {
                    (locked_value_usd / total_liquidity_usd * 100.0).min(100.0)
                } else {
                    0.0
                };
                return ResolvedLock {
                    locked_value_usd,
                    lock_percentage,
                    lock_duration_days: thresholds.inferred_duration_days,
                    unlock_date: None,
                    signal: LockSignal::Inferred,
                };
            }
        }

        ResolvedLock {
            locked_value_usd: 0.0,
            lock_percentage: 0.0,
            lock_duration_days: 0,
            unlock_date: None,
            signal: LockSignal::Unknown,
        }
    }

    /// 0-15 credit over the locked share of liquidity.
    fn lock_percentage_credit(&self, lock_percentage: f64) -> u8 {
        let t = &self.config.liquidity;
        if lock_percentage >= t.lock_pct_full {
            t.lock_pct_full_credit
        } else if lock_percentage >= t.lock_pct_major {
            t.lock_pct_major_credit
        } else if lock_percentage >= t.lock_pct_partial {
            t.lock_pct_partial_credit
        } else if lock_percentage > 0.0 {
            t.lock_pct_minimal_credit
        } else {
            0
        }
    }

    /// 0-10 credit over the lock duration.
    fn lock_duration_credit(&self, duration_days: u64, is_locked: bool) -> u8 {
        if !is_locked {
            return 0;
        }
        let t = &self.config.liquidity;
        if duration_days >= t.duration_full {
            t.duration_full_credit
        } else if duration_days >= t.duration_year {
            t.duration_year_credit
        } else if duration_days >= t.duration_half_year {
            t.duration_half_year_credit
        } else if duration_days >= t.duration_quarter {
            t.duration_quarter_credit
        } else if duration_days > 0 {
            t.duration_minimal_credit
        } else {
            0
        }
    }

    /// 0-10 credit over the sufficiency bands (safe/moderate/risky/very risky).
    fn sufficiency_credit(&self, total_liquidity_usd: f64) -> u8 {
        let t = &self.config.liquidity;
        if total_liquidity_usd >= t.safe_usd {
            t.safe_credit
        } else if total_liquidity_usd >= t.moderate_usd {
            t.moderate_credit
        } else if total_liquidity_usd >= t.risky_usd {
            t.risky_credit
        } else {
            0
        }
    }
}
