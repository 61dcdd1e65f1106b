//! The read-then-compute refund pipeline
//!
//! [`RefundEngine`] is immutable after construction and holds no state
//! beyond its parameters, so concurrent invocations are safe by
//! construction. Every operation re-reads its inputs through the ports
//! (no caching) and combines them with the pure formulas in
//! [`crate::math`]; independent reads are issued concurrently and
//! joined before the combine step.

use ethers::types::{Address, Bytes, U256};

use crate::error::RefundError;
use crate::math::{
    self, max_weekly_refund_usd, pro_rata_share, select_refund, token_quantity, usd_value,
};
use crate::ports::{PriceOraclePort, ReadPorts};
use crate::types::{
    BlockReference, BorrowPosition, BribePool, GaugeTotals, RefundPolicy, RefundQuote, VotingPower,
};

/// Construction parameters, fixed for the engine's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Address whose debt position caps the refund.
    pub borrower: Address,
    /// Address whose gauge votes earn the bribe share.
    pub voter: Address,
    /// The incentivized gauge.
    pub gauge: Address,
    /// Reward token the bribes (and the refund) are denominated in.
    pub reward_token: Address,
    /// Block pin applied to every read of a computation.
    pub block: BlockReference,
    /// Active refund-selection policy.
    pub policy: RefundPolicy,
    /// Decimal scale of the token price fed into dollar conversions
    /// (8 for the fixed price feed, 18 for the oracle path).
    pub price_decimals: u32,
}

/// Computes the weekly refund owed to the borrower from on-chain
/// lending and gauge-bribe state.
pub struct RefundEngine<P> {
    ports: P,
    cfg: EngineConfig,
}

impl<P> RefundEngine<P> {
    pub fn new(ports: P, cfg: EngineConfig) -> Self {
        Self { ports, cfg }
    }

    /// The refund-selection policy this engine was built with.
    pub fn policy(&self) -> RefundPolicy {
        self.cfg.policy
    }

    /// The block every read is pinned to.
    pub fn block(&self) -> BlockReference {
        self.cfg.block
    }
}

impl<P: ReadPorts> RefundEngine<P> {
    /// Snapshot the borrower's rebasing debt position.
    pub async fn borrow_position(&self) -> Result<BorrowPosition, RefundError> {
        let (totals, user_base_part) = tokio::try_join!(
            self.ports.total_borrow(self.cfg.block),
            self.ports.user_borrow_part(self.cfg.borrower, self.cfg.block),
        )?;
        Ok(BorrowPosition {
            elastic_total: totals.0,
            base_total: totals.1,
            user_base_part,
        })
    }

    /// Debt currently owed by the borrower (18 decimals).
    pub async fn borrow_amount(&self) -> Result<U256, RefundError> {
        self.borrow_position().await?.borrow_amount()
    }

    /// Weekly refund cap implied by the interest-rate reduction.
    pub async fn max_weekly_refund(&self) -> Result<U256, RefundError> {
        Ok(max_weekly_refund_usd(self.borrow_amount().await?))
    }

    /// Snapshot the voter's balance and gauge allocation.
    pub async fn voting_power(&self) -> Result<VotingPower, RefundError> {
        let (ve_balance, gauge_share_bps) = tokio::try_join!(
            self.ports.ve_balance_of(self.cfg.voter, self.cfg.block),
            self.ports
                .vote_power_bps(self.cfg.voter, self.cfg.gauge, self.cfg.block),
        )?;
        Ok(VotingPower {
            ve_balance,
            gauge_share_bps,
        })
    }

    /// The voter's balance weighted by its gauge allocation.
    pub async fn voter_weighted_votes(&self) -> Result<U256, RefundError> {
        Ok(self.voting_power().await?.weighted_votes())
    }

    /// Total weighted votes for the gauge, straight from the
    /// controller.
    pub async fn gauge_totals(&self) -> Result<GaugeTotals, RefundError> {
        let total_votes = self.ports.gauge_weight(self.cfg.gauge, self.cfg.block).await?;
        Ok(GaugeTotals { total_votes })
    }

    /// Pass-through of [`GaugeTotals::total_votes`].
    pub async fn total_gauge_votes(&self) -> Result<U256, RefundError> {
        Ok(self.gauge_totals().await?.total_votes)
    }

    /// Snapshot bribe accruals and claims for (gauge, reward token).
    pub async fn bribe_pool(&self) -> Result<BribePool, RefundError> {
        let (rewards_accrued, rewards_claimed) = tokio::try_join!(
            self.ports
                .reward_per_gauge(self.cfg.gauge, self.cfg.reward_token, self.cfg.block),
            self.ports
                .claims_per_gauge(self.cfg.gauge, self.cfg.reward_token, self.cfg.block),
        )?;
        Ok(BribePool {
            rewards_accrued,
            rewards_claimed,
        })
    }

    /// Rewards distributable this week, rollover included.
    pub async fn weekly_bribe_pool(&self) -> Result<U256, RefundError> {
        self.bribe_pool().await?.distributable()
    }

    /// The voter's slice of this week's bribe pool, in reward tokens.
    pub async fn voter_bribe_share(&self) -> Result<U256, RefundError> {
        let (pool, power, totals) = tokio::try_join!(
            self.bribe_pool(),
            self.voting_power(),
            self.gauge_totals(),
        )?;
        pro_rata_share(pool.distributable()?, power.weighted_votes(), totals.total_votes)
    }

    /// Dollar value of the voter's bribe share at `token_price_usd`.
    pub async fn voter_bribe_dollar_value(
        &self,
        token_price_usd: U256,
    ) -> Result<U256, RefundError> {
        Ok(usd_value(
            self.voter_bribe_share().await?,
            token_price_usd,
            self.cfg.price_decimals,
        ))
    }

    /// The final dollar refund, selected between the weekly cap and
    /// the bribe value per the active policy.
    pub async fn refund_amount(&self, token_price_usd: U256) -> Result<U256, RefundError> {
        let (max_weekly, bribe_value) = tokio::try_join!(
            self.max_weekly_refund(),
            self.voter_bribe_dollar_value(token_price_usd),
        )?;
        Ok(select_refund(self.cfg.policy, max_weekly, bribe_value))
    }

    /// Reward tokens to send back, worth the dollar refund at
    /// `token_price_usd`.
    pub async fn token_amount_to_return(
        &self,
        token_price_usd: U256,
    ) -> Result<U256, RefundError> {
        token_quantity(
            self.refund_amount(token_price_usd).await?,
            token_price_usd,
            self.cfg.price_decimals,
        )
    }

    /// Compute the full report from one consistent set of reads.
    pub async fn quote(&self, token_price_usd: U256) -> Result<RefundQuote, RefundError> {
        let (position, power, pool, totals) = tokio::try_join!(
            self.borrow_position(),
            self.voting_power(),
            self.bribe_pool(),
            self.gauge_totals(),
        )?;

        let borrow_amount = position.borrow_amount()?;
        let max_weekly = max_weekly_refund_usd(borrow_amount);
        let share = pro_rata_share(
            pool.distributable()?,
            power.weighted_votes(),
            totals.total_votes,
        )?;
        let bribe_value = usd_value(share, token_price_usd, self.cfg.price_decimals);
        let refund = select_refund(self.cfg.policy, max_weekly, bribe_value);
        let token_to_return = token_quantity(refund, token_price_usd, self.cfg.price_decimals)?;

        Ok(RefundQuote {
            token_price_usd,
            borrow_amount,
            max_weekly_refund_usd: max_weekly,
            voter_bribe_value_usd: bribe_value,
            refund_amount_usd: refund,
            token_to_return,
        })
    }
}

impl<P: PriceOraclePort> RefundEngine<P> {
    /// Read the spot oracle and invert its quote into an 18-decimal
    /// USD price. Callers using this path must construct the engine
    /// with `price_decimals = 18`.
    pub async fn token_price_from_oracle(&self, data: Bytes) -> Result<U256, RefundError> {
        math::invert_spot(self.ports.peek_spot(data, self.cfg.block).await?)
    }
}
