//! Shortest-form number formatting for report columns.

/// Formats `value` with `precision` significant digits in the shorter of
/// fixed and scientific notation, dropping trailing zeros.
///
/// Scientific notation is used when the decimal exponent is below `-4` or
/// at least `precision`; the exponent carries a sign and two or more digits.
///
/// # Examples
///
/// ```rust
/// use qmc_core::rqmc::format_general;
///
/// assert_eq!(format_general(1.0, 6), "1");
/// assert_eq!(format_general(0.999_876_54, 6), "0.999877");
/// assert_eq!(format_general(1.234_567e-7, 6), "1.23457e-07");
/// assert_eq!(format_general(2.5e6, 6), "2.5e+06");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let p = precision.max(1);
    let scientific = format!("{:.*e}", p - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= p as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (p as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_general(1.0, 6), "1");
        assert_eq!(format_general(-0.5, 6), "-0.5");
        assert_eq!(format_general(123456.0, 6), "123456");
        assert_eq!(format_general(0.000_123_456, 6), "0.000123456");
        assert_eq!(format_general(1.000_000_4, 6), "1");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(format_general(1_234_567.0, 6), "1.23457e+06");
        assert_eq!(format_general(0.000_012_5, 6), "1.25e-05");
        assert_eq!(format_general(3.0e-120, 6), "3e-120");
    }

    #[test]
    fn test_rounding_carries_into_exponent() {
        assert_eq!(format_general(999_999.7, 6), "1e+06");
        assert_eq!(format_general(9.999_999_9, 6), "10");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_general(0.0, 6), "0");
        assert_eq!(format_general(f64::NAN, 6), "nan");
        assert_eq!(format_general(f64::NEG_INFINITY, 6), "-inf");
    }
}
