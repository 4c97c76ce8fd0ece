//! Core types and data structures for the rugscan scoring engine.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chains supported by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Bsc,
    Polygon,
    Arbitrum,
    Base,
    Optimism,
    Avalanche,
}

impl Chain {
    /// Returns the canonical lowercase identifier for the chain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Bsc => "bsc",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
            Chain::Base => "base",
            Chain::Optimism => "optimism",
            Chain::Avalanche => "avalanche",
        }
    }

    /// Returns all supported chains.
    pub fn all() -> Vec<Chain> {
        vec![
            Chain::Ethereum,
            Chain::Bsc,
            Chain::Polygon,
            Chain::Arbitrum,
            Chain::Base,
            Chain::Optimism,
            Chain::Avalanche,
        ]
    }

    /// Parse a chain identifier. Unknown chains are a validation error.
    pub fn parse(s: &str) -> Result<Chain> {
        let normalized = s.trim().to_ascii_lowercase();
        for chain in Chain::all() {
            if chain.as_str() == normalized {
                return Ok(chain);
            }
        }
        bail!("unsupported chain: {s}")
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated token reference, the join key across all sub-analyses.
///
/// Can only be constructed through [`TokenRef::parse`], so every instance
/// carries a well-formed, lowercase `0x`-prefixed 40-hex-char address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    address: String,
    chain: Chain,
}

impl TokenRef {
    /// Validate and normalize a token address for a chain.
    pub fn parse(address: &str, chain: &str) -> Result<TokenRef> {
        let chain = Chain::parse(chain)?;
        let trimmed = address.trim();
        let hex = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(hex) => hex,
            None => bail!("invalid token address {trimmed:?}: missing 0x prefix"),
        };
        if hex.len() != 40 {
            bail!(
                "invalid token address {trimmed:?}: expected 40 hex chars, got {}",
                hex.len()
            );
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid token address {trimmed:?}: non-hex characters");
        }
        Ok(TokenRef {
            address: format!("0x{}", hex.to_ascii_lowercase()),
            chain,
        })
    }

    /// The normalized `0x`-prefixed address.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.address, self.chain)
    }
}

/// External scoring request as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Token contract address, `0x` + 40 hex chars.
    pub token_address: String,
    /// Chain identifier (e.g., "ethereum", "bsc").
    pub chain: String,
    /// Include per-analyzer detail sections in the report.
    #[serde(default)]
    pub detailed: bool,
}

impl ScoreRequest {
    pub fn new(token_address: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            token_address: token_address.into(),
            chain: chain.into(),
            detailed: false,
        }
    }

    pub fn detailed(mut self) -> Self {
        self.detailed = true;
        self
    }
}
