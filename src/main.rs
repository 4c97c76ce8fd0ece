//! Main entry point for the rugscan demo
//!
//! Wires the safety scorer to in-memory fixture data sources and scores two
//! contrasting tokens: a healthy one and a honeypot.

use anyhow::Result;
use chrono::{Duration, Utc};
use rugscan::safety::{
    ContractFacts, HolderRecord, PoolListing, PoolLockReport, SafetyScorer, ScoringConfig,
    StaticDataSources, TradeSimulation,
};
use rugscan::types::{ScoreRequest, TokenRef};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber;

const HEALTHY_TOKEN: &str = "0x1111111111111111111111111111111111111111";
const HONEYPOT_TOKEN: &str = "0x2222222222222222222222222222222222222222";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting rugscan demo");

    let sources = Arc::new(StaticDataSources::new());
    seed_healthy_token(&sources)?;
    seed_honeypot_token(&sources)?;

    let scorer = SafetyScorer::new(
        sources.clone(),
        sources.clone(),
        sources,
        ScoringConfig::default(),
    );

    for address in [HEALTHY_TOKEN, HONEYPOT_TOKEN] {
        let request = ScoreRequest::new(address, "ethereum").detailed();
        let report = scorer.score(&request).await?;
        info!(
            "{} -> {} ({}), confidence {}",
            address, report.safety_score, report.risk_level, report.confidence
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// A verified, renounced token with deep locked liquidity and a wide
/// holder base.
fn seed_healthy_token(sources: &StaticDataSources) -> Result<()> {
    let token = TokenRef::parse(HEALTHY_TOKEN, "ethereum")?;

    sources.insert_contract(
        &token,
        ContractFacts {
            source_verified: true,
            open_source: true,
            owner: None,
            functions: vec![
                "transfer".to_string(),
                "transferFrom".to_string(),
                "approve".to_string(),
                "balanceOf".to_string(),
            ],
            is_proxy: false,
            simulation: Some(TradeSimulation {
                buy_succeeded: true,
                sell_succeeded: true,
                buy_tax_pct: 2.0,
                sell_tax_pct: 2.0,
                observed_transfer_fee_pct: 2.0,
            }),
        },
    );

    sources.insert_holders(
        &token,
        (0..5000u64)
            .map(|i| HolderRecord {
                address: format!("0x{:040x}", 0x1000_0000u64 + i),
                balance: 1_000 + (i as u128 % 50),
                is_contract: false,
            })
            .collect(),
    );

    sources.insert_pools(
        &token,
        vec![
            PoolListing {
                dex: "uniswap_v2".to_string(),
                pair_address: "0x3333333333333333333333333333333333333333".to_string(),
                liquidity_usd: 420_000.0,
                created_at: Utc::now() - Duration::days(400),
                lock: Some(PoolLockReport {
                    locked_percentage: 92.0,
                    locked_value_usd: 386_400.0,
                    lock_duration_days: 730,
                    unlock_date: Some(Utc::now() + Duration::days(730)),
                }),
            },
            PoolListing {
                dex: "sushiswap".to_string(),
                pair_address: "0x4444444444444444444444444444444444444444".to_string(),
                liquidity_usd: 80_000.0,
                created_at: Utc::now() - Duration::days(250),
                lock: None,
            },
        ],
    );

    Ok(())
}

/// An unverified honeypot with a minting owner, a concentrated supply and a
/// thin unlocked pool.
fn seed_honeypot_token(sources: &StaticDataSources) -> Result<()> {
    let token = TokenRef::parse(HONEYPOT_TOKEN, "ethereum")?;

    sources.insert_contract(
        &token,
        ContractFacts {
            source_verified: false,
            open_source: false,
            owner: Some("0x5555555555555555555555555555555555555555".to_string()),
            functions: vec![
                "transfer".to_string(),
                "mint".to_string(),
                "setBots".to_string(),
                "pause".to_string(),
            ],
            is_proxy: true,
            simulation: Some(TradeSimulation {
                buy_succeeded: true,
                sell_succeeded: false,
                buy_tax_pct: 3.0,
                sell_tax_pct: 25.0,
                observed_transfer_fee_pct: 31.0,
            }),
        },
    );

    let mut holders = vec![HolderRecord {
        address: "0x5555555555555555555555555555555555555555".to_string(),
        balance: 800_000,
        is_contract: false,
    }];
    holders.extend((0..40u64).map(|i| HolderRecord {
        address: format!("0x{:040x}", 0x2000_0000u64 + i),
        balance: 5_000,
        is_contract: false,
    }));
    sources.insert_holders(&token, holders);

    sources.insert_pools(
        &token,
        vec![PoolListing {
            dex: "uniswap_v2".to_string(),
            pair_address: "0x6666666666666666666666666666666666666666".to_string(),
            liquidity_usd: 6_500.0,
            created_at: Utc::now() - Duration::days(3),
            lock: None,
        }],
    );

    Ok(())
}
