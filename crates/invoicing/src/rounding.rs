//! Rounding rules for invoice amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// VAT percentage applied when none is supplied.
pub const DEFAULT_VAT_PERCENTAGE: Decimal = Decimal::from_parts(1100, 0, 0, false, 2);

const HALF: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Round a final invoice total to a whole currency unit.
///
/// `floor(x)` when the fractional part is below 0.50, `floor(x) + 1` otherwise.
/// The comparison is done explicitly so the rule does not depend on a library
/// midpoint strategy.
pub fn domain_round(value: Decimal) -> Decimal {
    let floor = value.floor();
    if value - floor < HALF {
        floor
    } else {
        floor + Decimal::ONE
    }
}

/// VAT amount for `subtotal` at `percentage`, rounded to 2 decimal places
/// with midpoints away from zero. `None` when the product does not fit a
/// `Decimal`.
pub fn round_vat(subtotal: Decimal, percentage: Decimal) -> Option<Decimal> {
    subtotal
        .checked_mul(percentage)?
        .checked_div(Decimal::ONE_HUNDRED)
        .map(|vat| vat.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_vat_is_eleven_percent() {
        assert_eq!(DEFAULT_VAT_PERCENTAGE, dec!(11.00));
    }

    #[test]
    fn domain_round_below_half_floors() {
        assert_eq!(domain_round(dec!(17999.49)), dec!(17999));
        assert_eq!(domain_round(dec!(17999.499999)), dec!(17999));
    }

    #[test]
    fn domain_round_half_and_above_rounds_up() {
        assert_eq!(domain_round(dec!(17999.50)), dec!(18000));
        assert_eq!(domain_round(dec!(17999.999)), dec!(18000));
    }

    #[test]
    fn domain_round_differs_from_bankers_rounding() {
        // Banker's rounding would give 18000 for 18000.5 and 17998 for 17998.5.
        assert_eq!(domain_round(dec!(18000.5)), dec!(18001));
        assert_eq!(domain_round(dec!(17998.5)), dec!(17999));
    }

    #[test]
    fn domain_round_keeps_whole_values() {
        assert_eq!(domain_round(dec!(5550000.00)), dec!(5550000));
        assert_eq!(domain_round(dec!(0)), dec!(0));
    }

    #[test]
    fn round_vat_uses_two_decimals() {
        assert_eq!(round_vat(dec!(5000000), dec!(11)), Some(dec!(550000.00)));
        assert_eq!(round_vat(dec!(100.05), dec!(11)), Some(dec!(11.01)));
        // 0.125 is a midpoint: away from zero.
        assert_eq!(round_vat(dec!(1.25), dec!(10)), Some(dec!(0.13)));
    }

    #[test]
    fn round_vat_reports_overflow() {
        assert_eq!(round_vat(dec!(70000000000000000000000000000), dec!(11)), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: the result is a whole number within (x - 0.5, x + 0.5].
        #[test]
        fn domain_round_is_nearest_whole_unit(cents in 0i64..10_000_000_000i64) {
            let value = Decimal::new(cents, 2);
            let rounded = domain_round(value);

            prop_assert_eq!(rounded, rounded.trunc());
            prop_assert!(rounded - value <= dec!(0.5));
            prop_assert!(value - rounded < dec!(0.5));
        }

        /// Property: rounding is stable (rounding twice changes nothing).
        #[test]
        fn domain_round_is_idempotent(mils in 0i64..10_000_000_000i64) {
            let once = domain_round(Decimal::new(mils, 3));
            prop_assert_eq!(domain_round(once), once);
        }
    }
}
