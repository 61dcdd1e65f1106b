//! Chain-snapshot types and the computed quote

use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Where contract reads are pinned.
///
/// Pinning every read of one computation to the same height guarantees
/// the inputs describe a single, mutually consistent chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockReference {
    #[default]
    Latest,
    Height(u64),
}

/// Rebasing debt snapshot.
///
/// `base_total` tracks proportional ownership shares and
/// `elastic_total` the total value those shares represent, so interest
/// accrues without per-user balance updates. `base_total` is positive
/// whenever `elastic_total` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowPosition {
    pub elastic_total: U256,
    pub base_total: U256,
    pub user_base_part: U256,
}

/// A voter's vote-escrow balance and the basis-point fraction of it
/// allocated to the gauge under consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotingPower {
    pub ve_balance: U256,
    pub gauge_share_bps: U256,
}

/// Total weighted votes cast for the gauge, read straight from the
/// gauge controller; never recomputed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeTotals {
    pub total_votes: U256,
}

/// Bribe accruals and claims for one (gauge, reward token) pair as of
/// one block. The distributable amount includes rollover from earlier
/// weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BribePool {
    pub rewards_accrued: U256,
    pub rewards_claimed: U256,
}

/// How the final refund is chosen between the rate-capped weekly
/// amount and the voter's bribe dollar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefundPolicy {
    /// Return the rate cap whenever it is positive, otherwise the
    /// bribe value.
    FloorFirst,
    /// Return the lesser of the two candidates.
    MinimumOfTwo,
}

/// Full output of one refund computation. Ephemeral: recomputed per
/// invocation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundQuote {
    /// Token price used, at the configured price decimal scale.
    pub token_price_usd: U256,
    /// Borrower's outstanding debt (18 decimals).
    pub borrow_amount: U256,
    /// Rate-capped weekly refund in dollars (18 decimals).
    pub max_weekly_refund_usd: U256,
    /// Voter's share of the weekly bribe pool in dollars (18 decimals).
    pub voter_bribe_value_usd: U256,
    /// Policy-selected refund in dollars (18 decimals).
    pub refund_amount_usd: U256,
    /// Refund converted back into reward tokens (18 decimals).
    pub token_to_return: U256,
}
