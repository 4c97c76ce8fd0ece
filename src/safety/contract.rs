//! Contract security analysis.
//!
//! Detects risk patterns (honeypot behavior, mint capability, blacklists,
//! pausable transfers, proxy upgrades, hidden fees) from externally supplied
//! contract facts and scores them against a fixed penalty table. The
//! analyzer never fails toward the caller: unavailable data degrades to a
//! zero-score result with `success=false`.

use crate::safety::data_sources::{ContractFacts, ContractFactsSource, TradeSimulation};
use crate::safety::types::{ContractAnalysisResult, ScoringConfig};
use crate::types::TokenRef;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Function names that indicate supply can be inflated after launch.
const MINT_FUNCTIONS: &[&str] = &["mint", "mintto", "_mint", "issue", "createtokens"];

/// Function names that indicate holders can be blocked from trading.
const BLACKLIST_FUNCTIONS: &[&str] = &[
    "blacklist",
    "addtoblacklist",
    "setblacklist",
    "banaddress",
    "setbots",
    "addbot",
];

/// Function names that indicate transfers can be suspended.
const PAUSE_FUNCTIONS: &[&str] = &["pause", "setpaused", "pausetrading", "disabletrading"];

/// Function names that indicate the contract can be destroyed.
const DESTRUCT_FUNCTIONS: &[&str] = &["selfdestruct", "destroy", "destroycontract", "kill"];

/// The renounced-ownership sentinel.
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Analyzer for contract-level security patterns.
pub struct ContractAnalyzer {
    source: Arc<dyn ContractFactsSource>,
    config: ScoringConfig,
}

impl ContractAnalyzer {
    pub fn new(source: Arc<dyn ContractFactsSource>, config: ScoringConfig) -> Self {
        Self { source, config }
    }

    /// Analyze a token contract. Infallible: provider errors degrade to a
    /// failed result rather than propagating.
    #[instrument(skip(self), fields(token = %token))]
    pub async fn analyze(&self, token: &TokenRef) -> ContractAnalysisResult {
        let facts = match self.source.contract_facts(token).await {
            Ok(facts) => facts,
            Err(e) => {
                warn!("contract facts unavailable for {}: {}", token, e);
                return ContractAnalysisResult::failed(e.to_string());
            }
        };

        self.evaluate(&facts)
    }

    /// Score contract facts against the penalty table.
    fn evaluate(&self, facts: &ContractFacts) -> ContractAnalysisResult {
        let penalties = &self.config.contract;
        let mut warnings = Vec::new();
        let mut red_flags = Vec::new();
        let mut score = penalties.max_score as i32;

        let ownership_renounced = match facts.owner.as_deref() {
            None => true,
            Some(owner) => owner.eq_ignore_ascii_case(ZERO_ADDRESS),
        };

        let has_mint = contains_any(&facts.functions, MINT_FUNCTIONS);
        let has_blacklist = contains_any(&facts.functions, BLACKLIST_FUNCTIONS);
        let pausable = contains_any(&facts.functions, PAUSE_FUNCTIONS);
        let malicious_functions = matched_functions(&facts.functions, DESTRUCT_FUNCTIONS);

        let (is_honeypot, is_sellable, buy_tax, sell_tax, hidden_fees) = match &facts.simulation {
            Some(sim) => self.evaluate_simulation(sim),
            None => {
                warnings.push("Trade simulation unavailable - sellability unverified".to_string());
                (false, false, 0.0, 0.0, false)
            }
        };

        if !facts.source_verified {
            score -= penalties.unverified_source as i32;
            warnings.push("Contract source code is not verified".to_string());
        }
        if is_honeypot {
            score -= penalties.honeypot as i32;
            red_flags.push("Honeypot: buy succeeds but sell fails".to_string());
        }
        if has_mint {
            score -= penalties.mint_function as i32;
            red_flags.push("Contract can mint new tokens".to_string());
        }
        if !malicious_functions.is_empty() {
            score -= penalties.self_destruct as i32;
            red_flags.push(format!(
                "Contract can be destroyed ({})",
                malicious_functions.join(", ")
            ));
        }
        if has_blacklist {
            score -= penalties.blacklist as i32;
            red_flags.push("Contract can blacklist holders".to_string());
        }
        if facts.is_proxy {
            score -= penalties.proxy as i32;
            red_flags.push("Upgradeable proxy: logic can change after launch".to_string());
        }
        if pausable {
            score -= penalties.transfer_pausable as i32;
            warnings.push("Transfers can be paused by the owner".to_string());
        }
        if !ownership_renounced {
            score -= penalties.ownership_not_renounced as i32;
            warnings.push("Ownership has not been renounced".to_string());
        }
        if hidden_fees {
            score -= penalties.hidden_fees as i32;
            warnings.push("Observed transfer fee exceeds declared taxes".to_string());
        }

        let max_tax = buy_tax.max(sell_tax);
        if max_tax > penalties.tax_full_threshold {
            score -= penalties.tax_full as i32;
            warnings.push(format!(
                "High trading tax: buy {:.1}% / sell {:.1}%",
                buy_tax, sell_tax
            ));
        } else if max_tax > penalties.tax_partial_threshold {
            score -= penalties.tax_partial as i32;
            warnings.push(format!(
                "Elevated trading tax: buy {:.1}% / sell {:.1}%",
                buy_tax, sell_tax
            ));
        }

        let security_score = score.clamp(0, penalties.max_score as i32) as u8;
        debug!(
            security_score,
            honeypot = is_honeypot,
            mint = has_mint,
            blacklist = has_blacklist,
            "contract evaluation complete"
        );

        ContractAnalysisResult {
            success: true,
            error: None,
            is_verified: facts.source_verified,
            is_open_source: facts.open_source,
            is_honeypot,
            has_mint_function: has_mint,
            ownership_renounced,
            has_proxy: facts.is_proxy,
            has_blacklist,
            transfer_pausable: pausable,
            hidden_fees,
            buy_tax,
            sell_tax,
            is_sellable,
            malicious_functions,
            security_score,
            warnings,
            red_flags,
        }
    }

    /// Interpret a buy/sell simulation: honeypot, sellability, taxes and
    /// hidden fee extraction.
    fn evaluate_simulation(&self, sim: &TradeSimulation) -> (bool, bool, f64, f64, bool) {
        let is_honeypot = sim.buy_succeeded && !sim.sell_succeeded;
        let is_sellable = sim.sell_succeeded;
        let declared_max = sim.buy_tax_pct.max(sim.sell_tax_pct);
        let hidden_fees = sim.observed_transfer_fee_pct
            > declared_max + self.config.contract.hidden_fee_tolerance;
        (
            is_honeypot,
            is_sellable,
            sim.buy_tax_pct,
            sim.sell_tax_pct,
            hidden_fees,
        )
    }
}

/// Case-insensitive membership test against a closed signature table.
/// Unknown function names never match, so the analyzer cannot flag beyond
/// the defined rubric.
fn contains_any(functions: &[String], table: &[&str]) -> bool {
    functions
        .iter()
        .any(|f| table.contains(&f.to_ascii_lowercase().as_str()))
}

/// Returns the function names (as supplied) that match a signature table.
fn matched_functions(functions: &[String], table: &[&str]) -> Vec<String> {
    functions
        .iter()
        .filter(|f| table.contains(&f.to_ascii_lowercase().as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::data_sources::StaticDataSources;

    fn create_test_token() -> TokenRef {
        TokenRef::parse("0x00000000000000000000000000000000000000a1", "ethereum").unwrap()
    }

    fn create_clean_facts() -> ContractFacts {
        ContractFacts {
            source_verified: true,
            open_source: true,
            owner: None,
            functions: vec![
                "transfer".to_string(),
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
        }
    }

    fn analyzer_with(facts: ContractFacts) -> (ContractAnalyzer, TokenRef) {
        let token = create_test_token();
        let sources = Arc::new(StaticDataSources::new());
        sources.insert_contract(&token, facts);
        (
            ContractAnalyzer::new(sources, ScoringConfig::default()),
            token,
        )
    }

    #[tokio::test]
    async fn test_clean_contract_scores_full() {
        let (analyzer, token) = analyzer_with(create_clean_facts());
        let result = analyzer.analyze(&token).await;

        assert!(result.success);
        assert_eq!(result.security_score, 30);
        assert!(result.red_flags.is_empty());
        assert!(result.ownership_renounced);
        assert!(result.is_sellable);
    }

    #[tokio::test]
    async fn test_honeypot_is_red_flagged() {
        let mut facts = create_clean_facts();
        facts.simulation = Some(TradeSimulation {
            buy_succeeded: true,
            sell_succeeded: false,
            buy_tax_pct: 0.0,
            sell_tax_pct: 0.0,
            observed_transfer_fee_pct: 0.0,
        });
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert!(result.is_honeypot);
        assert!(!result.is_sellable);
        assert_eq!(result.security_score, 0);
        assert!(result.red_flags.iter().any(|f| f.contains("Honeypot")));
    }

    #[tokio::test]
    async fn test_mint_function_detected_case_insensitive() {
        let mut facts = create_clean_facts();
        facts.functions.push("MintTo".to_string());
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert!(result.has_mint_function);
        assert_eq!(result.security_score, 20);
        assert!(result.red_flags.iter().any(|f| f.contains("mint")));
    }

    #[tokio::test]
    async fn test_unknown_functions_are_ignored() {
        let mut facts = create_clean_facts();
        facts
            .functions
            .extend(["fooBar".to_string(), "migrateV2".to_string()]);
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert_eq!(result.security_score, 30);
        assert!(result.red_flags.is_empty());
    }

    #[tokio::test]
    async fn test_unverified_contract_warns_but_succeeds() {
        let mut facts = create_clean_facts();
        facts.source_verified = false;
        facts.open_source = false;
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert!(result.success);
        assert!(!result.is_verified);
        assert_eq!(result.security_score, 25);
        assert!(result.warnings.iter().any(|w| w.contains("not verified")));
    }

    #[tokio::test]
    async fn test_tax_tiers() {
        // 2% taxes: no penalty.
        let (analyzer, token) = analyzer_with(create_clean_facts());
        assert_eq!(analyzer.analyze(&token).await.security_score, 30);

        // 8% sell tax: partial penalty.
        let mut facts = create_clean_facts();
        facts.simulation.as_mut().unwrap().sell_tax_pct = 8.0;
        facts.simulation.as_mut().unwrap().observed_transfer_fee_pct = 8.0;
        let (analyzer, token) = analyzer_with(facts);
        assert_eq!(analyzer.analyze(&token).await.security_score, 28);

        // 15% sell tax: full penalty.
        let mut facts = create_clean_facts();
        facts.simulation.as_mut().unwrap().sell_tax_pct = 15.0;
        facts.simulation.as_mut().unwrap().observed_transfer_fee_pct = 15.0;
        let (analyzer, token) = analyzer_with(facts);
        assert_eq!(analyzer.analyze(&token).await.security_score, 25);
    }

    #[tokio::test]
    async fn test_hidden_fee_detection() {
        let mut facts = create_clean_facts();
        facts.simulation.as_mut().unwrap().observed_transfer_fee_pct = 12.0;
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert!(result.hidden_fees);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("exceeds declared")));
    }

    #[tokio::test]
    async fn test_unrenounced_ownership_and_pause() {
        let mut facts = create_clean_facts();
        facts.owner = Some("0x00000000000000000000000000000000000000b2".to_string());
        facts.functions.push("pause".to_string());
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert!(!result.ownership_renounced);
        assert!(result.transfer_pausable);
        assert_eq!(result.security_score, 20);
        assert!(result.red_flags.is_empty());
    }

    #[tokio::test]
    async fn test_zero_address_owner_counts_as_renounced() {
        let mut facts = create_clean_facts();
        facts.owner = Some(ZERO_ADDRESS.to_string());
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;
        assert!(result.ownership_renounced);
    }

    #[tokio::test]
    async fn test_missing_provider_data_degrades() {
        let token = create_test_token();
        let sources = Arc::new(StaticDataSources::new());
        let analyzer = ContractAnalyzer::new(sources, ScoringConfig::default());
        let result = analyzer.analyze(&token).await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(result.security_score, 0);
        assert!(result.red_flags.is_empty());
    }

    #[tokio::test]
    async fn test_self_destruct_red_flag() {
        let mut facts = create_clean_facts();
        facts.functions.push("destroyContract".to_string());
        let (analyzer, token) = analyzer_with(facts);
        let result = analyzer.analyze(&token).await;

        assert_eq!(result.malicious_functions, vec!["destroyContract"]);
        assert!(result.red_flags.iter().any(|f| f.contains("destroyed")));
        assert_eq!(result.security_score, 22);
    }
}
