//! Refund Engine
//!
//! Computes the weekly token refund owed to a borrower from on-chain
//! lending and gauge-bribe state: the borrower's outstanding debt caps
//! the refund at a fixed interest-rate reduction, the voter's share of
//! the weekly bribe pool provides the other candidate, and a
//! configurable policy selects between the two dollar values.
//!
//! All reads go through the port traits in [`ports`]; the arithmetic in
//! [`math`] is pure and separately testable.

#![allow(async_fn_in_trait)]

pub mod decimal;
pub mod engine;
pub mod error;
pub mod math;
pub mod ports;
pub mod types;

pub use engine::{EngineConfig, RefundEngine};
pub use error::RefundError;
pub use ports::{
    BribeDistributorPort, GaugeControllerPort, LendingPoolPort, PriceOraclePort, ReadPorts,
    VoteEscrowPort,
};
pub use types::{
    BlockReference, BorrowPosition, BribePool, GaugeTotals, RefundPolicy, RefundQuote, VotingPower,
};
