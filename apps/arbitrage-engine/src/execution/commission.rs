//! Commission calculation for simulated fills.

use rust_decimal::Decimal;

use crate::config::FeeSchedule;

/// Commission for a fill: `quantity * execution_price * venue_fee_rate`.
///
/// Venues missing from the schedule are charged the default rate. Pure
/// function, no side effects.
#[must_use]
pub fn commission_for(
    fees: &FeeSchedule,
    quantity: Decimal,
    execution_price: Decimal,
    venue: &str,
) -> Decimal {
    quantity * execution_price * fees.rate_for(venue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn commission_is_notional_times_rate() {
        let fees = FeeSchedule::default();
        // 0.5 BTC at 50,000 on binance (0.1%): 0.5 * 50000 * 0.001 = 25
        let commission = commission_for(&fees, dec!(0.5), dec!(50000), "binance");
        assert_eq!(commission, dec!(25.0000));
    }

    #[test]
    fn higher_rate_venue_charges_more() {
        let fees = FeeSchedule::default();
        let binance = commission_for(&fees, dec!(1), dec!(1000), "binance");
        let gate = commission_for(&fees, dec!(1), dec!(1000), "gate");
        assert_eq!(binance, dec!(1.000));
        assert_eq!(gate, dec!(2.000));
    }

    #[test]
    fn unknown_venue_uses_default_rate() {
        let fees = FeeSchedule::default();
        let commission = commission_for(&fees, dec!(2), dec!(100), "some-new-dex");
        assert_eq!(commission, dec!(0.200));
    }

    #[test]
    fn commission_non_negative_for_valid_inputs() {
        let fees = FeeSchedule::default();
        for venue in ["binance", "gate", "unknown"] {
            let commission = commission_for(&fees, dec!(0.00001), dec!(0.01), venue);
            assert!(commission >= Decimal::ZERO);
        }
    }

    #[test]
    fn zero_quantity_zero_commission() {
        let fees = FeeSchedule::default();
        assert_eq!(
            commission_for(&fees, Decimal::ZERO, dec!(50000), "binance"),
            Decimal::ZERO
        );
    }
}
