//! Date and block-height utilities for weekly snapshots
//!
//! Gauge votes settle on Thursdays, so a snapshot date maps to the
//! Thursday after it, and that wall-clock instant maps to a block
//! height by binary search over block timestamps.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use ethers::providers::{Http, Middleware, Provider};

/// Minimal view of the chain needed to locate a block by time.
pub trait BlockTimestamps {
    async fn latest_block(&self) -> Result<u64>;
    async fn timestamp_of(&self, block: u64) -> Result<u64>;
}

impl BlockTimestamps for Provider<Http> {
    async fn latest_block(&self) -> Result<u64> {
        let number = self
            .get_block_number()
            .await
            .context("getBlockNumber failed")?;
        Ok(number.as_u64())
    }

    async fn timestamp_of(&self, block: u64) -> Result<u64> {
        let block = self
            .get_block(block)
            .await
            .context("getBlock failed")?
            .context("block not found")?;
        Ok(block.timestamp.as_u64())
    }
}

/// The Thursday strictly after `date` (UTC midnight): the coming
/// Thursday for Sunday through Wednesday, the following week's
/// Thursday from Thursday on.
pub fn next_thursday(date: NaiveDate) -> DateTime<Utc> {
    let dow = date.weekday().num_days_from_sunday(); // Sunday = 0, Thursday = 4
    let days_ahead = if dow < 4 { 4 - dow } else { 11 - dow };
    let thursday = date + Days::new(days_ahead as u64);
    thursday.and_time(NaiveTime::MIN).and_utc()
}

/// Binary-search the first block whose timestamp is past `target_ts`.
///
/// Precondition: block timestamps are non-decreasing with height (not
/// re-verified here). If the chain tip is older than the target, the
/// tip is returned.
pub async fn closest_block_after<C: BlockTimestamps>(chain: &C, target_ts: u64) -> Result<u64> {
    let mut lower = 0u64;
    let mut upper = chain.latest_block().await?;

    loop {
        let middle = (lower + upper) / 2;
        if chain.timestamp_of(middle).await? > target_ts {
            upper = middle;
        } else {
            lower = middle;
        }
        if lower + 1 >= upper {
            return Ok(upper);
        }
    }
}
