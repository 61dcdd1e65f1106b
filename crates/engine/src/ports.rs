//! Read-only contract access, one trait per upstream contract
//!
//! Implementations perform a single eth_call pinned at the given
//! [`BlockReference`] and map transport failures into
//! [`RefundError::ReadFailure`]. No retries, no caching: the engine
//! owns freshness by re-reading per computation.

use ethers::types::{Address, Bytes, U256};

use crate::error::RefundError;
use crate::types::BlockReference;

/// Lending pool with rebasing debt accounting.
pub trait LendingPoolPort {
    /// `totalBorrow()`: the pool's (elastic, base) debt totals.
    async fn total_borrow(&self, at: BlockReference) -> Result<(U256, U256), RefundError>;

    /// `userBorrowPart(user)`: the user's debt share count.
    async fn user_borrow_part(
        &self,
        user: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError>;
}

/// Vote-escrow token.
pub trait VoteEscrowPort {
    /// `balanceOf(user)`: the voter's decaying vote-escrow balance.
    async fn ve_balance_of(&self, user: Address, at: BlockReference)
        -> Result<U256, RefundError>;
}

/// Gauge controller.
pub trait GaugeControllerPort {
    /// The `power` leg of `vote_user_slopes(user, gauge)`: the bps
    /// fraction of the voter's balance allocated to the gauge.
    async fn vote_power_bps(
        &self,
        user: Address,
        gauge: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError>;

    /// `get_gauge_weight(gauge)`: total weighted votes for the gauge.
    async fn gauge_weight(&self, gauge: Address, at: BlockReference)
        -> Result<U256, RefundError>;
}

/// Bribe distributor, keyed by (gauge, reward token).
pub trait BribeDistributorPort {
    /// Cumulative rewards accrued to the gauge for the token.
    async fn reward_per_gauge(
        &self,
        gauge: Address,
        token: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError>;

    /// Cumulative rewards already claimed.
    async fn claims_per_gauge(
        &self,
        gauge: Address,
        token: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError>;
}

/// Spot price oracle with an inverted quote representation (see
/// [`crate::math::invert_spot`]).
pub trait PriceOraclePort {
    /// `peekSpot(data)`: the current spot value for the oracle-specific
    /// query payload.
    async fn peek_spot(&self, data: Bytes, at: BlockReference) -> Result<U256, RefundError>;
}

/// The full read surface the engine needs for a refund computation.
pub trait ReadPorts:
    LendingPoolPort + VoteEscrowPort + GaugeControllerPort + BribeDistributorPort
{
}

impl<T> ReadPorts for T where
    T: LendingPoolPort + VoteEscrowPort + GaugeControllerPort + BribeDistributorPort
{
}
