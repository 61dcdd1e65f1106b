//! Error taxonomy for the refund pipeline

use ethers::types::U256;
use thiserror::Error;

/// Failure causes for refund computations.
///
/// Every top-level operation either succeeds in full or fails with one
/// of these; there are no partial results, retries, or fallback values.
#[derive(Debug, Error)]
pub enum RefundError {
    /// Underlying RPC/network failure. Surfaced to the caller as-is;
    /// the engine never retries.
    #[error("chain read failed: {0}")]
    ReadFailure(#[from] anyhow::Error),

    /// A formula hit a zero divisor. Zero debt shares or zero gauge
    /// votes mean "no refund computable", which is distinct from an
    /// RPC fault.
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),

    /// Claimed bribes exceeding accrued bribes means the snapshot is
    /// stale or inconsistent. Never clamped to zero.
    #[error("bribe claims exceed accruals: {claimed} claimed vs {accrued} accrued")]
    InconsistentBribePool { accrued: U256, claimed: U256 },

    /// Asked to display more fractional digits than the source decimal
    /// scale carries.
    #[error("cannot render {display_decimals} decimals from a {source_decimals}-decimal value")]
    PrecisionLoss {
        source_decimals: u32,
        display_decimals: u32,
    },
}
