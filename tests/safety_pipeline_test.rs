//! End-to-end tests for the safety scoring pipeline

use chrono::{Duration, Utc};
use rugscan::safety::{
    ContractFacts, HolderRecord, PoolListing, PoolLockReport, SafetyScorer, ScoringConfig,
    StaticDataSources, TradeSimulation,
};
use rugscan::types::{ScoreRequest, TokenRef};
use std::sync::Arc;

const TOKEN_ADDRESS: &str = "0x00000000000000000000000000000000000000f0";

fn token() -> TokenRef {
    TokenRef::parse(TOKEN_ADDRESS, "ethereum").unwrap()
}

fn scorer(sources: Arc<StaticDataSources>) -> SafetyScorer {
    SafetyScorer::new(
        sources.clone(),
        sources.clone(),
        sources,
        ScoringConfig::default(),
    )
}

fn clean_contract() -> ContractFacts {
    ContractFacts {
        source_verified: true,
        open_source: true,
        owner: None,
        functions: vec![
            "transfer".to_string(),
            "transferFrom".to_string(),
            "approve".to_string(),
        ],
        is_proxy: false,
        simulation: Some(TradeSimulation {
            buy_succeeded: true,
            sell_succeeded: true,
            buy_tax_pct: 2.0,
            sell_tax_pct: 2.0,
            observed_transfer_fee_pct: 2.0,
        }),
    }
}

fn spread_holders(count: u64) -> Vec<HolderRecord> {
    (0..count)
        .map(|i| HolderRecord {
            address: format!("0x{:040x}", 0x4000_0000u64 + i),
            balance: 1_000,
            is_contract: false,
        })
        .collect()
}

fn locked_pools() -> Vec<PoolListing> {
    vec![PoolListing {
        dex: "uniswap_v2".to_string(),
        pair_address: "0x00000000000000000000000000000000000000f1".to_string(),
        liquidity_usd: 500_000.0,
        created_at: Utc::now() - Duration::days(300),
        lock: Some(PoolLockReport {
            locked_percentage: 90.0,
            locked_value_usd: 450_000.0,
            lock_duration_days: 730,
            unlock_date: Some(Utc::now() + Duration::days(730)),
        }),
    }]
}

/// Scenario A: renounced, honest taxes, wide holder base, deep long-locked
/// liquidity. Must land in the Very Low band with no red flags.
#[tokio::test]
async fn scenario_a_healthy_token_is_very_low_risk() {
    let sources = Arc::new(StaticDataSources::new());
    sources.insert_contract(&token(), clean_contract());
    sources.insert_holders(&token(), spread_holders(5000));
    sources.insert_pools(&token(), locked_pools());

    let report = scorer(sources)
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum"))
        .await
        .unwrap();

    assert!(report.safety_score >= 86, "score was {}", report.safety_score);
    assert_eq!(report.risk_level, "Very Low");
    assert!(report.red_flags.is_empty());
    assert!(report.breakdown.liquidity_score == 35);
    assert!(report.breakdown.contract_score == 30);
}

/// Scenario B: honeypot with a mint function. Red flags must force the hard
/// rejection even though holder and liquidity sub-scores are perfect.
#[tokio::test]
async fn scenario_b_honeypot_is_rejected_regardless_of_score() {
    let sources = Arc::new(StaticDataSources::new());
    let mut facts = clean_contract();
    facts.functions.push("mint".to_string());
    facts.simulation = Some(TradeSimulation {
        buy_succeeded: true,
        sell_succeeded: false,
        buy_tax_pct: 0.0,
        sell_tax_pct: 0.0,
        observed_transfer_fee_pct: 0.0,
    });
    sources.insert_contract(&token(), facts);
    sources.insert_holders(&token(), spread_holders(5000));
    sources.insert_pools(&token(), locked_pools());

    let report = scorer(sources)
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum"))
        .await
        .unwrap();

    assert!(!report.red_flags.is_empty());
    assert!(report.red_flags.iter().any(|f| f.contains("Honeypot")));
    assert!(report.red_flags.iter().any(|f| f.contains("mint")));
    assert!(report.recommendation.starts_with("DO NOT INVEST"));
}

/// Scenario C: zero liquidity pools.
#[tokio::test]
async fn scenario_c_zero_pools() {
    let sources = Arc::new(StaticDataSources::new());
    sources.insert_contract(&token(), clean_contract());
    sources.insert_holders(&token(), spread_holders(5000));
    sources.insert_pools(&token(), Vec::new());

    let report = scorer(sources)
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum").detailed())
        .await
        .unwrap();

    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("No liquidity pools found")));
    let liquidity = report.liquidity_status.unwrap();
    assert!(!liquidity.liquidity_sufficient);
    assert_eq!(liquidity.score, 0);
    assert_eq!(report.breakdown.liquidity_score, 0);
}

/// Scenario D: zero holders. Unknown centralization, a confidence discount
/// of at least 15, and no division failure.
#[tokio::test]
async fn scenario_d_zero_holders() {
    let sources = Arc::new(StaticDataSources::new());
    sources.insert_contract(&token(), clean_contract());
    sources.insert_holders(&token(), Vec::new());
    sources.insert_pools(&token(), locked_pools());

    let report = scorer(sources)
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum").detailed())
        .await
        .unwrap();

    let holders = report.holder_distribution.unwrap();
    assert_eq!(holders.centralization_risk.as_str(), "Unknown");
    assert_eq!(holders.holder_count, 0);
    assert!(report.confidence <= 85);
}

/// Composite score and risk level stay inside the defined bands for wildly
/// different inputs.
#[tokio::test]
async fn score_and_risk_level_are_always_in_range() {
    let fixtures: Vec<Arc<StaticDataSources>> = vec![
        // Everything missing.
        Arc::new(StaticDataSources::new()),
        // Only a hostile contract.
        {
            let sources = Arc::new(StaticDataSources::new());
            let mut facts = clean_contract();
            facts.source_verified = false;
            facts.is_proxy = true;
            facts.functions.extend([
                "mint".to_string(),
                "blacklist".to_string(),
                "pause".to_string(),
                "selfdestruct".to_string(),
            ]);
            facts.owner = Some("0x00000000000000000000000000000000000000b9".to_string());
            facts.simulation = Some(TradeSimulation {
                buy_succeeded: true,
                sell_succeeded: false,
                buy_tax_pct: 40.0,
                sell_tax_pct: 60.0,
                observed_transfer_fee_pct: 90.0,
            });
            sources.insert_contract(&token(), facts);
            sources
        },
        // Fully healthy.
        {
            let sources = Arc::new(StaticDataSources::new());
            sources.insert_contract(&token(), clean_contract());
            sources.insert_holders(&token(), spread_holders(5000));
            sources.insert_pools(&token(), locked_pools());
            sources
        },
    ];

    let levels = ["Very Low", "Low", "Moderate", "High", "Critical"];
    for sources in fixtures {
        let report = scorer(sources)
            .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum"))
            .await
            .unwrap();
        assert!(report.safety_score <= 100);
        assert!(report.confidence <= 100);
        assert!(levels.contains(&report.risk_level.as_str()));
    }
}

/// Re-running the engine over byte-identical collaborator responses yields
/// an identical report apart from the timestamp fields.
#[tokio::test]
async fn identical_inputs_yield_identical_reports() {
    let sources = Arc::new(StaticDataSources::new());
    sources.insert_contract(&token(), clean_contract());
    sources.insert_holders(&token(), spread_holders(1500));
    sources.insert_pools(&token(), locked_pools());
    let scorer = scorer(sources);
    let request = ScoreRequest::new(TOKEN_ADDRESS, "ethereum").detailed();

    let first = scorer.score(&request).await.unwrap();
    let second = scorer.score(&request).await.unwrap();

    let mut a = serde_json::to_value(&first).unwrap();
    let mut b = serde_json::to_value(&second).unwrap();
    for value in [&mut a, &mut b] {
        let map = value.as_object_mut().unwrap();
        map.remove("analysis_timestamp");
        map.remove("analysis_time_seconds");
    }
    assert_eq!(a, b);
}

/// A validation failure is the only hard error: no report, no panic.
#[tokio::test]
async fn malformed_requests_fail_validation_only() {
    let scorer = scorer(Arc::new(StaticDataSources::new()));

    for (address, chain) in [
        ("0x1234", "ethereum"),
        ("00000000000000000000000000000000000000f0", "ethereum"),
        ("0x00000000000000000000000000000000000000zz", "ethereum"),
        (TOKEN_ADDRESS, "tron"),
    ] {
        let result = scorer.score(&ScoreRequest::new(address, chain)).await;
        assert!(result.is_err(), "expected validation error for {address}@{chain}");
    }
}

/// Provider-level failures degrade into confidence, never into an `Err`.
#[tokio::test]
async fn provider_failures_degrade_gracefully() {
    struct FailingSources;

    #[async_trait::async_trait]
    impl rugscan::safety::ContractFactsSource for FailingSources {
        async fn contract_facts(
            &self,
            _token: &TokenRef,
        ) -> anyhow::Result<ContractFacts> {
            anyhow::bail!("explorer unreachable")
        }
    }
    #[async_trait::async_trait]
    impl rugscan::safety::HolderLedgerSource for FailingSources {
        async fn holder_balances(
            &self,
            _token: &TokenRef,
        ) -> anyhow::Result<Vec<HolderRecord>> {
            anyhow::bail!("indexer unreachable")
        }
    }
    #[async_trait::async_trait]
    impl rugscan::safety::LiquidityPoolSource for FailingSources {
        async fn pool_listings(
            &self,
            _token: &TokenRef,
        ) -> anyhow::Result<Vec<PoolListing>> {
            anyhow::bail!("aggregator unreachable")
        }
    }

    let failing = Arc::new(FailingSources);
    let scorer = SafetyScorer::new(
        failing.clone(),
        failing.clone(),
        failing,
        ScoringConfig::default(),
    );

    let report = scorer
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum"))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.safety_score, 0);
    // -30 contract, -20 holders, -15 liquidity, -10 zero pools.
    assert_eq!(report.confidence, 25);
    assert_eq!(report.risk_level, "Critical");
}

/// The inferred-lock heuristic credits the score but discounts confidence
/// relative to an explicitly reported lock.
#[tokio::test]
async fn inferred_lock_costs_confidence() {
    let reported = Arc::new(StaticDataSources::new());
    reported.insert_contract(&token(), clean_contract());
    reported.insert_holders(&token(), spread_holders(5000));
    reported.insert_pools(&token(), locked_pools());
    let reported_confidence = scorer(reported)
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum"))
        .await
        .unwrap()
        .confidence;

    let inferred = Arc::new(StaticDataSources::new());
    inferred.insert_contract(&token(), clean_contract());
    inferred.insert_holders(&token(), spread_holders(5000));
    inferred.insert_pools(
        &token(),
        vec![PoolListing {
            dex: "uniswap_v2".to_string(),
            pair_address: "0x00000000000000000000000000000000000000f1".to_string(),
            liquidity_usd: 2_500_000.0,
            created_at: Utc::now() - Duration::days(500),
            lock: None,
        }],
    );
    let inferred_report = scorer(inferred)
        .score(&ScoreRequest::new(TOKEN_ADDRESS, "ethereum").detailed())
        .await
        .unwrap();

    let liquidity = inferred_report.liquidity_status.unwrap();
    assert!(liquidity.is_locked);
    assert!(liquidity.score > 0);
    assert!(inferred_report.confidence < reported_confidence);
    assert!(inferred_report
        .warnings
        .iter()
        .any(|w| w.contains("inferred")));
}
