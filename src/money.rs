//! Currency rounding helpers.
//!
//! Every monetary total in the system goes through [`round2`]: commission
//! rows are rounded individually before they are summed, and each settlement
//! total is rounded independently before totals are combined. This keeps
//! stored values free of cross-row floating drift and matches the 2-decimal
//! convention of exported reports.

/// Rounds a currency amount to 2 decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Commission owed for a labor line: `base * rate / 100`, rounded to cents.
///
/// `rate` is a percentage (e.g. `10.0` for 10%).
#[must_use]
pub fn commission_for(base_amount: f64, rate: f64) -> f64 {
    round2(base_amount * rate / 100.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_round2_basic() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(129.999), 130.0);
        assert_eq!(round2(-2.346), -2.35);
    }

    #[test]
    fn test_round2_is_idempotent() {
        for v in [0.01, 10.55, 99.99, 1234.56] {
            assert_eq!(round2(round2(v)), round2(v));
        }
    }

    #[test]
    fn test_commission_for() {
        assert_eq!(commission_for(40.0, 10.0), 4.0);
        assert_eq!(commission_for(60.0, 10.0), 6.0);
        // 33.33 * 15% = 4.9995 -> 5.00
        assert_eq!(commission_for(33.33, 15.0), 5.0);
        assert_eq!(commission_for(100.0, 0.0), 0.0);
    }
}
