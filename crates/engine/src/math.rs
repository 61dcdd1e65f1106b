//! Refund arithmetic
//!
//! Pure formulas over unsigned 256-bit fixed point. All division is
//! integer floor division and the operation order within each formula
//! is load-bearing for rounding, so it must not be rearranged.

use ethers::types::U256;

use crate::decimal::scale_factor;
use crate::error::RefundError;
use crate::types::{BorrowPosition, BribePool, RefundPolicy, VotingPower};

/// Interest-rate reduction cap in basis points (18% down to 11%).
pub const MAX_REFUND_RATE_BPS: u64 = 700;

/// Weeks per year used to pro-rate the annual cap.
pub const WEEKS_IN_YEAR: u64 = 52;

/// Basis-point denominator (10,000 bps = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

impl BorrowPosition {
    /// Debt owed by the user: `user_base_part * elastic_total / base_total`.
    pub fn borrow_amount(&self) -> Result<U256, RefundError> {
        if self.base_total.is_zero() {
            return Err(RefundError::DivisionByZero("total debt base is zero"));
        }
        Ok(self.user_base_part * self.elastic_total / self.base_total)
    }
}

impl VotingPower {
    /// Vote-escrow balance weighted by the bps fraction allocated to
    /// the gauge.
    pub fn weighted_votes(&self) -> U256 {
        self.ve_balance * self.gauge_share_bps / U256::from(BPS_DENOMINATOR)
    }
}

impl BribePool {
    /// Rewards still distributable this week, rollover included.
    ///
    /// Claims exceeding accruals indicate a stale or inconsistent
    /// snapshot and fail loudly rather than clamping to zero.
    pub fn distributable(&self) -> Result<U256, RefundError> {
        if self.rewards_claimed > self.rewards_accrued {
            return Err(RefundError::InconsistentBribePool {
                accrued: self.rewards_accrued,
                claimed: self.rewards_claimed,
            });
        }
        Ok(self.rewards_accrued - self.rewards_claimed)
    }
}

/// Weekly refund cap: multiply by the rate first, then divide by the
/// bps denominator, then by weeks.
pub fn max_weekly_refund_usd(borrow_amount: U256) -> U256 {
    borrow_amount * U256::from(MAX_REFUND_RATE_BPS) / U256::from(BPS_DENOMINATOR)
        / U256::from(WEEKS_IN_YEAR)
}

/// The voter's pro-rata slice of a pool: `pool * votes / total_votes`.
pub fn pro_rata_share(
    pool: U256,
    voter_weighted_votes: U256,
    total_gauge_votes: U256,
) -> Result<U256, RefundError> {
    if total_gauge_votes.is_zero() {
        return Err(RefundError::DivisionByZero("gauge has no votes"));
    }
    Ok(pool * voter_weighted_votes / total_gauge_votes)
}

/// Dollar value of a token amount at `price_usd` (carrying
/// `price_decimals`).
pub fn usd_value(token_amount: U256, price_usd: U256, price_decimals: u32) -> U256 {
    token_amount * price_usd / scale_factor(price_decimals)
}

/// Token quantity worth `usd_amount` at `price_usd`. The numerator is
/// scaled by the same factor the price carries, so the scales cancel.
pub fn token_quantity(
    usd_amount: U256,
    price_usd: U256,
    price_decimals: u32,
) -> Result<U256, RefundError> {
    if price_usd.is_zero() {
        return Err(RefundError::DivisionByZero("token price is zero"));
    }
    Ok(usd_amount * scale_factor(price_decimals) / price_usd)
}

/// Select the final dollar refund between the two candidates.
pub fn select_refund(policy: RefundPolicy, max_weekly_usd: U256, bribe_value_usd: U256) -> U256 {
    match policy {
        RefundPolicy::FloorFirst => {
            if max_weekly_usd.is_zero() {
                bribe_value_usd
            } else {
                max_weekly_usd
            }
        }
        RefundPolicy::MinimumOfTwo => max_weekly_usd.min(bribe_value_usd),
    }
}

/// Convert an inverted oracle quote into a conventional 18-decimal USD
/// price.
///
/// The spot oracle reports how much token buys one unit of the quote
/// asset, so exactly one reciprocal (`10^36 / spot`) yields USD per
/// token at 18 decimals.
pub fn invert_spot(spot: U256) -> Result<U256, RefundError> {
    if spot.is_zero() {
        return Err(RefundError::DivisionByZero("oracle spot value is zero"));
    }
    Ok(U256::exp10(36) / spot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn borrow_amount_is_share_of_elastic_debt() {
        let pos = BorrowPosition {
            elastic_total: e18(1_000_000),
            base_total: e18(900_000),
            user_base_part: e18(9_000),
        };
        // 9000/900000 of 1000000 = 10000
        assert_eq!(pos.borrow_amount().unwrap(), e18(10_000));
    }

    #[test]
    fn borrow_amount_fails_on_zero_base() {
        let pos = BorrowPosition {
            elastic_total: e18(1),
            base_total: U256::zero(),
            user_base_part: e18(1),
        };
        assert!(matches!(
            pos.borrow_amount(),
            Err(RefundError::DivisionByZero(_))
        ));
    }

    #[test]
    fn weekly_cap_floors_at_the_final_division() {
        // 10000 * 700 / 10000 / 52 = 13.461538...
        let cap = max_weekly_refund_usd(e18(10_000));
        assert_eq!(cap, U256::from_dec_str("13461538461538461538").unwrap());
    }

    #[test]
    fn fully_allocated_voter_keeps_whole_balance() {
        let power = VotingPower {
            ve_balance: e18(500),
            gauge_share_bps: U256::from(10_000u64),
        };
        assert_eq!(power.weighted_votes(), e18(500));
    }

    #[test]
    fn half_allocated_voter_keeps_half() {
        let power = VotingPower {
            ve_balance: e18(500),
            gauge_share_bps: U256::from(5_000u64),
        };
        assert_eq!(power.weighted_votes(), e18(250));
    }

    #[test]
    fn distributable_pool_subtracts_claims() {
        let pool = BribePool {
            rewards_accrued: e18(200),
            rewards_claimed: e18(50),
        };
        assert_eq!(pool.distributable().unwrap(), e18(150));
    }

    #[test]
    fn claims_exceeding_accruals_fail_loudly() {
        let pool = BribePool {
            rewards_accrued: e18(50),
            rewards_claimed: e18(200),
        };
        assert!(matches!(
            pool.distributable(),
            Err(RefundError::InconsistentBribePool { .. })
        ));
    }

    #[test]
    fn pro_rata_share_of_weekly_pool() {
        // 150e18 * 500e18 / 100000e18 = 0.75e18
        let share = pro_rata_share(e18(150), e18(500), e18(100_000)).unwrap();
        assert_eq!(share, U256::from_dec_str("750000000000000000").unwrap());
    }

    #[test]
    fn pro_rata_share_fails_with_no_votes() {
        assert!(matches!(
            pro_rata_share(e18(150), e18(500), U256::zero()),
            Err(RefundError::DivisionByZero(_))
        ));
    }

    #[test]
    fn usd_value_at_8_decimal_price() {
        // 10000 tokens at $0.00053604 = $5.3604
        let value = usd_value(e18(10_000), U256::from(53_604u64), 8);
        assert_eq!(value, U256::from_dec_str("5360400000000000000").unwrap());
    }

    #[test]
    fn token_quantity_inverts_usd_value() {
        // $5.3604 at $0.00053604 buys back exactly 10000 tokens
        let qty = token_quantity(
            U256::from_dec_str("5360400000000000000").unwrap(),
            U256::from(53_604u64),
            8,
        )
        .unwrap();
        assert_eq!(qty, e18(10_000));
    }

    #[test]
    fn token_quantity_rejects_zero_price() {
        assert!(matches!(
            token_quantity(e18(1), U256::zero(), 8),
            Err(RefundError::DivisionByZero(_))
        ));
    }

    #[test]
    fn floor_first_prefers_positive_cap() {
        let chosen = select_refund(RefundPolicy::FloorFirst, e18(13), e18(999));
        assert_eq!(chosen, e18(13));
    }

    #[test]
    fn floor_first_falls_back_to_bribes_on_zero_cap() {
        let chosen = select_refund(RefundPolicy::FloorFirst, U256::zero(), e18(999));
        assert_eq!(chosen, e18(999));
    }

    #[test]
    fn minimum_of_two_takes_the_lesser() {
        assert_eq!(select_refund(RefundPolicy::MinimumOfTwo, e18(13), e18(999)), e18(13));
        assert_eq!(select_refund(RefundPolicy::MinimumOfTwo, e18(999), e18(13)), e18(13));
    }

    #[test]
    fn spot_inversion_yields_usd_per_token() {
        // spot 2000e18 -> 10^36 / 2000e18 = 0.0005e18
        let price = invert_spot(e18(2_000)).unwrap();
        assert_eq!(price, U256::from_dec_str("500000000000000").unwrap());
    }

    #[test]
    fn spot_inversion_rejects_zero() {
        assert!(matches!(
            invert_spot(U256::zero()),
            Err(RefundError::DivisionByZero(_))
        ));
    }

    proptest! {
        #[test]
        fn borrow_amount_matches_u128_model(
            elastic in 0u64..,
            base in 1u64..,
            part in 0u64..,
        ) {
            let pos = BorrowPosition {
                elastic_total: U256::from(elastic),
                base_total: U256::from(base),
                user_base_part: U256::from(part),
            };
            let expected = part as u128 * elastic as u128 / base as u128;
            prop_assert_eq!(pos.borrow_amount().unwrap(), U256::from(expected));
        }

        #[test]
        fn weekly_cap_is_monotone_in_borrow_amount(a in 0u128.., b in 0u128..) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                max_weekly_refund_usd(U256::from(lo)) <= max_weekly_refund_usd(U256::from(hi))
            );
        }

        #[test]
        fn minimum_policy_never_exceeds_either_candidate(a in 0u128.., b in 0u128..) {
            let chosen = select_refund(RefundPolicy::MinimumOfTwo, U256::from(a), U256::from(b));
            prop_assert!(chosen <= U256::from(a));
            prop_assert!(chosen <= U256::from(b));
        }

        #[test]
        fn floor_first_returns_cap_whenever_positive(a in 1u128.., b in 0u128..) {
            let chosen = select_refund(RefundPolicy::FloorFirst, U256::from(a), U256::from(b));
            prop_assert_eq!(chosen, U256::from(a));
        }

        #[test]
        fn usd_round_trip_within_one_price_unit(
            usd in 0u128..,
            price in 1u64..,
        ) {
            // token_quantity then usd_value loses at most one floor step
            let qty = token_quantity(U256::from(usd), U256::from(price), 8).unwrap();
            let back = usd_value(qty, U256::from(price), 8);
            prop_assert!(back <= U256::from(usd));
            prop_assert!(U256::from(usd) - back <= U256::from(price));
        }
    }
}
