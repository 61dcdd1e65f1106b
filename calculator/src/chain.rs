//! ethers-backed implementations of the contract read ports

use std::sync::Arc;

use anyhow::Context;
use ethers::contract::abigen;
use ethers::providers::{Http, Provider};
use ethers::types::{Address, Bytes, U256};
use refund_engine::{
    BlockReference, BribeDistributorPort, GaugeControllerPort, LendingPoolPort, PriceOraclePort,
    RefundError, VoteEscrowPort,
};

use crate::config::Config;

abigen!(
    LendingPool,
    r#"[
        function totalBorrow() external view returns (uint128 elastic, uint128 base)
        function userBorrowPart(address user) external view returns (uint256)
    ]"#
);

abigen!(
    VoteEscrow,
    r#"[
        function balanceOf(address user) external view returns (uint256)
    ]"#
);

abigen!(
    GaugeController,
    r#"[
        function vote_user_slopes(address user, address gauge) external view returns (uint256 slope, uint256 power, uint256 end)
        function get_gauge_weight(address gauge) external view returns (uint256)
    ]"#
);

abigen!(
    BribeDistributor,
    r#"[
        function reward_per_gauge(address gauge, address reward_token) external view returns (uint256)
        function claims_per_gauge(address gauge, address reward_token) external view returns (uint256)
    ]"#
);

abigen!(
    PriceOracle,
    r#"[
        function peekSpot(bytes data) external view returns (uint256 rate)
    ]"#
);

type Client = Provider<Http>;

/// Read-only bindings for every contract the engine consults.
pub struct ChainPorts {
    lending_pool: LendingPool<Client>,
    vote_escrow: VoteEscrow<Client>,
    gauge_controller: GaugeController<Client>,
    bribe_distributor: BribeDistributor<Client>,
    price_oracle: Option<PriceOracle<Client>>,
}

impl ChainPorts {
    pub fn new(client: Arc<Client>, config: &Config) -> Self {
        Self {
            lending_pool: LendingPool::new(config.lending_pool, client.clone()),
            vote_escrow: VoteEscrow::new(config.vote_escrow, client.clone()),
            gauge_controller: GaugeController::new(config.gauge_controller, client.clone()),
            bribe_distributor: BribeDistributor::new(config.bribe_distributor, client.clone()),
            price_oracle: config
                .price_oracle
                .map(|addr| PriceOracle::new(addr, client)),
        }
    }
}

/// Apply the block pin to a contract call. Latest is the provider
/// default, so only explicit heights need an override.
macro_rules! pin {
    ($call:expr, $at:expr) => {{
        let mut call = $call;
        if let BlockReference::Height(h) = $at {
            call = call.block(h);
        }
        call
    }};
}

impl LendingPoolPort for ChainPorts {
    async fn total_borrow(&self, at: BlockReference) -> Result<(U256, U256), RefundError> {
        let (elastic, base) = pin!(self.lending_pool.total_borrow(), at)
            .call()
            .await
            .context("totalBorrow read failed")?;
        Ok((U256::from(elastic), U256::from(base)))
    }

    async fn user_borrow_part(
        &self,
        user: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError> {
        let part = pin!(self.lending_pool.user_borrow_part(user), at)
            .call()
            .await
            .context("userBorrowPart read failed")?;
        Ok(part)
    }
}

impl VoteEscrowPort for ChainPorts {
    async fn ve_balance_of(
        &self,
        user: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError> {
        let balance = pin!(self.vote_escrow.balance_of(user), at)
            .call()
            .await
            .context("vote-escrow balanceOf read failed")?;
        Ok(balance)
    }
}

impl GaugeControllerPort for ChainPorts {
    async fn vote_power_bps(
        &self,
        user: Address,
        gauge: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError> {
        let (_slope, power, _end) = pin!(self.gauge_controller.vote_user_slopes(user, gauge), at)
            .call()
            .await
            .context("vote_user_slopes read failed")?;
        Ok(power)
    }

    async fn gauge_weight(
        &self,
        gauge: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError> {
        let weight = pin!(self.gauge_controller.get_gauge_weight(gauge), at)
            .call()
            .await
            .context("get_gauge_weight read failed")?;
        Ok(weight)
    }
}

impl BribeDistributorPort for ChainPorts {
    async fn reward_per_gauge(
        &self,
        gauge: Address,
        token: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError> {
        let accrued = pin!(self.bribe_distributor.reward_per_gauge(gauge, token), at)
            .call()
            .await
            .context("reward_per_gauge read failed")?;
        Ok(accrued)
    }

    async fn claims_per_gauge(
        &self,
        gauge: Address,
        token: Address,
        at: BlockReference,
    ) -> Result<U256, RefundError> {
        let claimed = pin!(self.bribe_distributor.claims_per_gauge(gauge, token), at)
            .call()
            .await
            .context("claims_per_gauge read failed")?;
        Ok(claimed)
    }
}

impl PriceOraclePort for ChainPorts {
    async fn peek_spot(&self, data: Bytes, at: BlockReference) -> Result<U256, RefundError> {
        let oracle = self.price_oracle.as_ref().ok_or_else(|| {
            RefundError::ReadFailure(anyhow::anyhow!("no price oracle configured"))
        })?;
        let spot = pin!(oracle.peek_spot(data), at)
            .call()
            .await
            .context("peekSpot read failed")?;
        Ok(spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_every_contract_from_default_config() {
        let config = Config::default_mainnet();
        let client = Arc::new(Provider::<Http>::try_from(config.rpc_url.as_str()).unwrap());
        let ports = ChainPorts::new(client, &config);

        assert_eq!(ports.lending_pool.address(), config.lending_pool);
        assert_eq!(ports.gauge_controller.address(), config.gauge_controller);
        assert!(ports.price_oracle.is_none());
    }
}
