//! GST amount helpers for tax-inclusive ledger figures

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive};

/// Tax embedded in a GST-inclusive gross amount
///
/// Reverse calculation: for a gross of 1180 at 18% the base is 1000 and the
/// embedded tax is 180.
pub fn tax_portion(gross_amount: f64, rate: f64) -> f64 {
    gross_amount * rate / (100.0 + rate)
}

/// Round an amount to 2 decimal places, halves away from zero
pub fn round_currency(amount: f64) -> f64 {
    to_currency(amount)
        .and_then(|d| d.to_f64())
        .unwrap_or(amount)
}

/// Convert an amount to a 2-place decimal, `None` for non-finite input
pub fn to_currency(amount: f64) -> Option<BigDecimal> {
    BigDecimal::from_f64(amount).map(|d| d.with_scale_round(2, RoundingMode::HalfUp))
}

/// Render a decimal amount with exactly 2 places, e.g. `0.00` or `-13.47`
pub fn format_currency(amount: &BigDecimal) -> String {
    let (units, _) = amount
        .with_scale_round(2, RoundingMode::HalfUp)
        .as_bigint_and_exponent();
    let units = units.to_string();
    let (sign, digits) = match units.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", units.as_str()),
    };
    let padded = format!("{digits:0>3}");
    let (whole, cents) = padded.split_at(padded.len() - 2);
    format!("{sign}{whole}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_portion_reverse_calculation() {
        assert!((tax_portion(1180.0, 18.0) - 180.0).abs() < 1e-9);
        assert!((tax_portion(1050.0, 5.0) - 50.0).abs() < 1e-9);
        assert_eq!(tax_portion(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(13.4654), 13.47);
        assert_eq!(round_currency(2.5), 2.5);
        assert_eq!(round_currency(0.125), 0.13);
        assert_eq!(round_currency(-0.125), -0.13);
        assert!(round_currency(f64::NAN).is_nan());
    }

    #[test]
    fn test_to_currency_scale() {
        let value = to_currency(152.542372).unwrap();
        assert_eq!(value.to_string(), "152.54");
        assert!(to_currency(f64::INFINITY).is_none());
    }

    #[test]
    fn test_format_currency_keeps_two_places() {
        assert_eq!(format_currency(&BigDecimal::from(0)), "0.00");
        assert_eq!(format_currency(&to_currency(0.0).unwrap()), "0.00");
        assert_eq!(format_currency(&to_currency(13.47).unwrap()), "13.47");
        assert_eq!(format_currency(&to_currency(0.05).unwrap()), "0.05");
        assert_eq!(format_currency(&to_currency(-0.5).unwrap()), "-0.50");
        assert_eq!(format_currency(&BigDecimal::from(1200)), "1200.00");
    }
}
