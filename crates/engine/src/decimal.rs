//! Fixed-point helpers for 256-bit token amounts

use ethers::types::U256;

use crate::error::RefundError;

/// 10^decimals as a U256 (token scales routinely exceed u64 range).
pub fn scale_factor(decimals: u32) -> U256 {
    U256::exp10(decimals as usize)
}

/// Render `value` with exactly `display_decimals` fractional digits.
///
/// Truncates (never rounds): the value is floor-divided down to the
/// display scale first, then printed with a fixed-width fraction.
/// Fails with [`RefundError::PrecisionLoss`] when asked for more
/// precision than the source scale carries.
pub fn format_units(
    value: U256,
    source_decimals: u32,
    display_decimals: u32,
) -> Result<String, RefundError> {
    if source_decimals < display_decimals {
        return Err(RefundError::PrecisionLoss {
            source_decimals,
            display_decimals,
        });
    }

    let truncated = value / scale_factor(source_decimals - display_decimals);
    if display_decimals == 0 {
        return Ok(truncated.to_string());
    }

    let base = scale_factor(display_decimals);
    let whole = truncated / base;
    let frac = truncated % base;
    Ok(format!(
        "{}.{:0>width$}",
        whole,
        frac.to_string(),
        width = display_decimals as usize
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_spans_token_decimals() {
        assert_eq!(scale_factor(0), U256::one());
        assert_eq!(scale_factor(8), U256::from(100_000_000u64));
        assert_eq!(scale_factor(18), U256::from_dec_str("1000000000000000000").unwrap());
    }

    #[test]
    fn formats_with_fixed_fraction_width() {
        // 13.461538... at 18 decimals, shown at 2
        let v = U256::from_dec_str("13461538461538461538").unwrap();
        assert_eq!(format_units(v, 18, 2).unwrap(), "13.46");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 1.999 at 3 decimals shown at 2 is 1.99, not 2.00
        let v = U256::from(1_999u64);
        assert_eq!(format_units(v, 3, 2).unwrap(), "1.99");
    }

    #[test]
    fn pads_small_fractions_with_zeros() {
        // 0.05 at 8 decimals
        let v = U256::from(5_000_000u64);
        assert_eq!(format_units(v, 8, 2).unwrap(), "0.05");
    }

    #[test]
    fn zero_display_decimals_prints_whole_number() {
        let v = U256::from_dec_str("10000000000000000000000").unwrap(); // 10000e18
        assert_eq!(format_units(v, 18, 0).unwrap(), "10000");
    }

    #[test]
    fn zero_value_formats_cleanly() {
        assert_eq!(format_units(U256::zero(), 18, 2).unwrap(), "0.00");
    }

    #[test]
    fn rejects_display_precision_beyond_source() {
        let err = format_units(U256::from(1u64), 8, 18).unwrap_err();
        assert!(matches!(
            err,
            RefundError::PrecisionLoss {
                source_decimals: 8,
                display_decimals: 18
            }
        ));
    }
}
