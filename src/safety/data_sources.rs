//! Collaborator interfaces supplying raw token facts to the analyzers.
//!
//! The engine never performs chain or HTTP I/O itself; everything it knows
//! about a token arrives through these three provider traits. Real
//! implementations (RPC nodes, block explorers, DEX aggregators) live outside
//! this crate and are expected to enforce their own timeouts, returning `Err`
//! instead of hanging.

use crate::types::TokenRef;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Simulated buy/sell round trip against the token contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSimulation {
    pub buy_succeeded: bool,
    pub sell_succeeded: bool,
    /// Declared buy tax, percent.
    pub buy_tax_pct: f64,
    /// Declared sell tax, percent.
    pub sell_tax_pct: f64,
    /// Fee actually observed on transfer during simulation, percent.
    pub observed_transfer_fee_pct: f64,
}

/// Verification status and ABI/bytecode-derived facts for a token contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractFacts {
    pub source_verified: bool,
    pub open_source: bool,
    /// Current owner address; `None` or the zero address means renounced.
    pub owner: Option<String>,
    /// Function names decoded from the verified source or ABI.
    pub functions: Vec<String>,
    /// Whether the bytecode matches a proxy pattern.
    pub is_proxy: bool,
    /// Buy/sell simulation outcome, when the simulator could run.
    pub simulation: Option<TradeSimulation>,
}

/// One entry of the holder ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderRecord {
    pub address: String,
    /// Raw token units held.
    pub balance: u128,
    /// True for pool/router/other contract accounts, which are excluded
    /// from holder ranking.
    pub is_contract: bool,
}

/// Lock report attached to a pool listing by the data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolLockReport {
    /// Share of this pool's LP tokens that is locked, percent.
    pub locked_percentage: f64,
    pub locked_value_usd: f64,
    pub lock_duration_days: u64,
    pub unlock_date: Option<DateTime<Utc>>,
}

/// One DEX pool listing for a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolListing {
    pub dex: String,
    pub pair_address: String,
    pub liquidity_usd: f64,
    pub created_at: DateTime<Utc>,
    pub lock: Option<PoolLockReport>,
}

/// Source of contract verification, ABI and simulation facts.
#[async_trait]
pub trait ContractFactsSource: Send + Sync {
    async fn contract_facts(&self, token: &TokenRef) -> Result<ContractFacts>;
}

/// Source of the ordered-by-balance holder ledger.
#[async_trait]
pub trait HolderLedgerSource: Send + Sync {
    async fn holder_balances(&self, token: &TokenRef) -> Result<Vec<HolderRecord>>;
}

/// Source of DEX pool listings and lock reports.
#[async_trait]
pub trait LiquidityPoolSource: Send + Sync {
    async fn pool_listings(&self, token: &TokenRef) -> Result<Vec<PoolListing>>;
}

/// In-memory provider backed by fixture maps keyed on token address.
///
/// Implements all three source traits; used by the demo binary and tests.
/// Tokens with no entry behave like an unavailable upstream for contracts and
/// like an empty result set for holders and pools.
#[derive(Default)]
pub struct StaticDataSources {
    contracts: Mutex<HashMap<String, ContractFacts>>,
    holders: Mutex<HashMap<String, Vec<HolderRecord>>>,
    pools: Mutex<HashMap<String, Vec<PoolListing>>>,
}

impl StaticDataSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_contract(&self, token: &TokenRef, facts: ContractFacts) {
        self.contracts
            .lock()
            .expect("contracts map poisoned")
            .insert(token.address().to_string(), facts);
    }

    pub fn insert_holders(&self, token: &TokenRef, records: Vec<HolderRecord>) {
        self.holders
            .lock()
            .expect("holders map poisoned")
            .insert(token.address().to_string(), records);
    }

    pub fn insert_pools(&self, token: &TokenRef, listings: Vec<PoolListing>) {
        self.pools
            .lock()
            .expect("pools map poisoned")
            .insert(token.address().to_string(), listings);
    }
}

#[async_trait]
impl ContractFactsSource for StaticDataSources {
    async fn contract_facts(&self, token: &TokenRef) -> Result<ContractFacts> {
        self.contracts
            .lock()
            .expect("contracts map poisoned")
            .get(token.address())
            .cloned()
            .ok_or_else(|| anyhow!("no contract data for {}", token))
    }
}

#[async_trait]
impl HolderLedgerSource for StaticDataSources {
    async fn holder_balances(&self, token: &TokenRef) -> Result<Vec<HolderRecord>> {
        Ok(self
            .holders
            .lock()
            .expect("holders map poisoned")
            .get(token.address())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl LiquidityPoolSource for StaticDataSources {
    async fn pool_listings(&self, token: &TokenRef) -> Result<Vec<PoolListing>> {
        Ok(self
            .pools
            .lock()
            .expect("pools map poisoned")
            .get(token.address())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_token() -> TokenRef {
        TokenRef::parse("0x1111111111111111111111111111111111111111", "ethereum").unwrap()
    }

    #[tokio::test]
    async fn test_static_sources_roundtrip() {
        let sources = StaticDataSources::new();
        let token = create_test_token();

        sources.insert_holders(
            &token,
            vec![HolderRecord {
                address: "0xaaaa000000000000000000000000000000000001".to_string(),
                balance: 1_000,
                is_contract: false,
            }],
        );

        let records = sources.holder_balances(&token).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].balance, 1_000);
    }

    #[tokio::test]
    async fn test_missing_contract_is_error() {
        let sources = StaticDataSources::new();
        let token = create_test_token();
        assert!(sources.contract_facts(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_pools_is_empty_not_error() {
        let sources = StaticDataSources::new();
        let token = create_test_token();
        let pools = sources.pool_listings(&token).await.unwrap();
        assert!(pools.is_empty());
    }
}
