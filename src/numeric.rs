//! Normalization of locale-variant measurement strings.

/// Canonicalizes a raw measurement field.
///
/// Steps, in order: trim whitespace, strip `-` from both ends, turn `,` into
/// `.`, and when a decimal point is present drop trailing zeros and then a
/// dangling point. `"12,300"` becomes `"12.3"` and `"5.000"` becomes `"5"`.
///
/// Stripping `-` also discards the sign of genuine negative readings. This
/// matches the behaviour of the instrument scripts the logs come from.
pub fn normalize(raw: &str) -> String {
    let value = raw.trim().trim_matches('-').replace(',', ".");

    if value.contains('.') {
        value
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        value
    }
}

/// Normalizes and parses a measurement.
///
/// On failure the normalized text is handed back so the caller can still
/// show it in the sheet.
pub fn parse_measurement(raw: &str) -> Result<f64, String> {
    let normalized = normalize(raw);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(normalized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_zeros_after_the_point_are_dropped() {
        assert_eq!(normalize("12.300"), "12.3");
        assert_eq!(normalize("5.000"), "5");
        assert_eq!(normalize("100,0"), "100");
        assert_eq!(normalize("25,50"), "25.5");
    }

    #[test]
    fn leading_zeros_survive() {
        assert_eq!(normalize("0005.10"), "0005.1");
        assert_eq!(normalize("0.0"), "0");
    }

    #[test]
    fn integers_are_left_alone() {
        assert_eq!(normalize("1200"), "1200");
        assert_eq!(normalize("  40 "), "40");
    }

    #[test]
    fn dashes_are_stripped_from_both_ends() {
        assert_eq!(normalize("-3,5"), "3.5");
        assert_eq!(normalize("7-"), "7");
        assert_eq!(normalize("--2.50--"), "2.5");
        assert_eq!(normalize(" -1,0 "), "1");
        assert_eq!(parse_measurement("-12,5"), Ok(12.5));
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["12,300", "0005.10", "100,0", "-4,20", "abc", "7", "1.50e3", ""] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn parse_failures_return_normalized_text() {
        assert_eq!(parse_measurement("n/a"), Err("n/a".to_string()));
        assert_eq!(parse_measurement("12,5x0"), Err("12.5x".to_string()));
        assert_eq!(parse_measurement(""), Err(String::new()));
        assert_eq!(parse_measurement("inf"), Err("inf".to_string()));
    }

    #[test]
    fn parses_comma_decimals() {
        assert_eq!(parse_measurement("100,0"), Ok(100.0));
        assert_eq!(parse_measurement("25,50"), Ok(25.5));
        assert_eq!(parse_measurement("1.5e2"), Ok(150.0));
    }
}
