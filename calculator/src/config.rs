//! Calculator configuration

use anyhow::{Context, Result};
use ethers::types::Address;
use refund_engine::RefundPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC URL for the Ethereum node
    pub rpc_url: String,

    /// Lending pool (cauldron) holding the borrower's debt
    pub lending_pool: Address,

    /// Vote-escrow token contract
    pub vote_escrow: Address,

    /// Gauge controller contract
    pub gauge_controller: Address,

    /// Bribe distributor contract
    pub bribe_distributor: Address,

    /// Spot price oracle; required when no fixed token_price is set
    pub price_oracle: Option<Address>,

    /// The incentivized gauge
    pub gauge: Address,

    /// Reward token the bribes and refund are denominated in
    pub reward_token: Address,

    /// Address whose debt caps the refund
    pub borrower: Address,

    /// Address whose gauge votes earn the bribe share
    pub voter: Address,

    /// Refund selection policy: "floor-first" or "minimum-of-two"
    pub policy: RefundPolicy,

    /// Decimal scale of the token price (8 or 18)
    pub price_decimals: u32,

    /// Fixed token price in base units at price_decimals scale
    /// (e.g. "53604" for $0.00053604 at 8 decimals); omit to read the
    /// oracle instead
    pub token_price: Option<String>,

    /// Query payload for the oracle's peekSpot, 0x-prefixed hex
    pub oracle_data: Option<String>,

    /// Pin all reads to the first block after the Thursday following
    /// this date (YYYY-MM-DD); omit for latest
    pub snapshot_date: Option<String>,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("REFUND_CONFIG").unwrap_or_else(|_| "refund-config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config =
            toml::from_str(&config_str).context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Built-in mainnet configuration for the original deployment
    pub fn default_mainnet() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            lending_pool: "0x207763511da879a900973A5E092382117C3c1588"
                .parse()
                .unwrap(),
            vote_escrow: "0x5f3b5DfEb7B28CDbD7FAba78963EE202a494e2A2"
                .parse()
                .unwrap(),
            gauge_controller: "0x2F50D538606Fa9EDD2B11E2446BEb18C9D5846bB"
                .parse()
                .unwrap(),
            bribe_distributor: "0x7893bbb46613d7a4FbcC31Dab4C9b823FfeE1026"
                .parse()
                .unwrap(),
            price_oracle: None,
            gauge: "0xd8b712d29381748db89c36bca0138d7c75866ddf"
                .parse()
                .unwrap(),
            reward_token: "0x090185f2135308bad17527004364ebcc2d37e5f6"
                .parse()
                .unwrap(),
            borrower: "0x7a16ff8270133f063aab6c9977183d9e72835428"
                .parse()
                .unwrap(),
            voter: "0x9B44473E223f8a3c047AD86f387B80402536B029"
                .parse()
                .unwrap(),
            policy: RefundPolicy::FloorFirst,
            price_decimals: 8,
            token_price: Some("53604".to_string()), // $0.00053604
            oracle_data: None,
            snapshot_date: None,
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_mainnet();
        let toml_str =
            toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }

    /// Reject scale/price-source pairings the arithmetic cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.price_decimals != 8 && self.price_decimals != 18 {
            anyhow::bail!(
                "price_decimals must be 8 or 18, got {}",
                self.price_decimals
            );
        }
        if self.token_price.is_none() {
            if self.price_oracle.is_none() {
                anyhow::bail!("either token_price or price_oracle must be configured");
            }
            // The oracle path always produces an 18-decimal price
            if self.price_decimals != 18 {
                anyhow::bail!(
                    "the oracle price path requires price_decimals = 18, got {}",
                    self.price_decimals
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_mainnet();
        assert_eq!(config.rpc_url, "https://eth.llamarpc.com");
        assert_eq!(config.price_decimals, 8);
        assert_eq!(config.policy, RefundPolicy::FloorFirst);
        config.validate().unwrap();
    }

    #[test]
    fn test_policy_parses_kebab_case() {
        let mut config = Config::default_mainnet();
        config.policy = RefundPolicy::MinimumOfTwo;
        let rendered = toml::to_string(&config).unwrap();
        assert!(rendered.contains("minimum-of-two"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.policy, RefundPolicy::MinimumOfTwo);
    }

    #[test]
    fn test_validate_rejects_odd_price_scale() {
        let mut config = Config::default_mainnet();
        config.price_decimals = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_a_price_source() {
        let mut config = Config::default_mainnet();
        config.token_price = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oracle_path_forces_18_decimals() {
        let mut config = Config::default_mainnet();
        config.token_price = None;
        config.price_oracle = Some(Address::repeat_byte(0x55));
        assert!(config.validate().is_err());

        config.price_decimals = 18;
        config.validate().unwrap();
    }
}
