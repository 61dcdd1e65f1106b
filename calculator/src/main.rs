//! Weekly Refund Calculator
//!
//! Reads lending-pool debt and gauge-bribe state over JSON-RPC and
//! reports the refund owed to the borrower for the week: the dollar
//! amount and the reward tokens to send back.

mod blocks;
mod chain;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ethers::providers::{Http, Provider};
use ethers::types::{Bytes, U256};
use refund_engine::decimal::format_units;
use refund_engine::{BlockReference, EngineConfig, RefundEngine};

use blocks::{closest_block_after, next_thursday};
use chain::ChainPorts;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|_| {
        log::warn!("Failed to load config, using built-in mainnet defaults");
        Config::default_mainnet()
    });
    config.validate()?;

    log::info!("Connected to RPC: {}", config.rpc_url);
    log::info!(
        "Borrower: {:?}, voter: {:?}, policy: {:?}",
        config.borrower,
        config.voter,
        config.policy
    );

    let provider = Arc::new(
        Provider::<Http>::try_from(config.rpc_url.as_str()).context("invalid RPC url")?,
    );

    // Pin reads to a weekly snapshot block when a date is configured
    let block = match &config.snapshot_date {
        Some(raw) => {
            let date: NaiveDate = raw.parse().context("snapshot_date must be YYYY-MM-DD")?;
            let cutoff = next_thursday(date);
            let height = closest_block_after(provider.as_ref(), cutoff.timestamp() as u64)
                .await
                .context("failed to locate snapshot block")?;
            log::info!("Snapshot: {} -> block {}", cutoff, height);
            BlockReference::Height(height)
        }
        None => BlockReference::Latest,
    };

    let ports = ChainPorts::new(provider, &config);
    let engine = RefundEngine::new(
        ports,
        EngineConfig {
            borrower: config.borrower,
            voter: config.voter,
            gauge: config.gauge,
            reward_token: config.reward_token,
            block,
            policy: config.policy,
            price_decimals: config.price_decimals,
        },
    );

    let token_price = match &config.token_price {
        Some(raw) => U256::from_dec_str(raw)
            .context("token_price must be a base-unit integer string")?,
        None => {
            let data: Bytes = config
                .oracle_data
                .as_deref()
                .unwrap_or("0x")
                .parse()
                .context("oracle_data must be 0x-prefixed hex")?;
            let price = engine.token_price_from_oracle(data).await?;
            log::info!("Oracle price: {} (18 decimals)", price);
            price
        }
    };

    let quote = engine.quote(token_price).await?;

    println!("Borrow amount ($):         {}", format_units(quote.borrow_amount, 18, 2)?);
    println!("Total bribes received ($): {}", format_units(quote.voter_bribe_value_usd, 18, 2)?);
    println!("Max weekly refund ($):     {}", format_units(quote.max_weekly_refund_usd, 18, 2)?);
    println!("Total refund amount ($):   {}", format_units(quote.refund_amount_usd, 18, 2)?);
    println!("Tokens to return:          {}", format_units(quote.token_to_return, 18, 2)?);

    Ok(())
}
