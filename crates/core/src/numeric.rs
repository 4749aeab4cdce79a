//! Decimal rounding shared by rates, totals and averages.

/// Round `value` to `places` decimal places, halves rounding away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Format `value` with exactly one decimal place.
pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", round_to(value, 1))
}

/// Parse a stored decimal string (rates and totals) back into a number.
///
/// Returns `None` for anything that is not a finite number, including the
/// `"N/A"` marker.
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(format_one_decimal(1.25), "1.3");
        assert_eq!(format_one_decimal(12.5), "12.5");
        assert_eq!(format_one_decimal(66.666_666), "66.7");
    }

    #[test]
    fn whole_numbers_keep_one_decimal() {
        assert_eq!(format_one_decimal(80.0), "80.0");
        assert_eq!(format_one_decimal(0.0), "0.0");
        assert_eq!(format_one_decimal(100.0), "100.0");
    }

    #[test]
    fn round_to_two_places() {
        assert_eq!(round_to(85.0 / 3.0, 2), 28.33);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
    }

    #[test]
    fn parse_decimal_rejects_markers() {
        assert_eq!(parse_decimal("80.0"), Some(80.0));
        assert_eq!(parse_decimal(" 412.5 "), Some(412.5));
        assert_eq!(parse_decimal("N/A"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }
}
