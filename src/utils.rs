//! Miscellaneous helper utilities.

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::Signed;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Digits, at most one decimal separator, digits. No sign, no exponent.
pub static AMOUNT_INPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*[.,]?[0-9]*$").expect("amount pattern compiles"));

/// Parse a user-typed decimal amount. Accepts `,` as the decimal separator
/// and a bare leading or trailing point (`".5"`, `"3."`).
///
/// Returns `None` for text that is not a plain non-negative decimal;
/// exponent notation such as `"1e3"` is rejected.
pub fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let raw = raw.trim();
    if !AMOUNT_INPUT.is_match(raw) {
        return None;
    }
    let trimmed = raw.replace(',', ".");
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let normalized = match (trimmed.starts_with('.'), trimmed.ends_with('.')) {
        (true, _) => format!("0{trimmed}"),
        (_, true) => format!("{trimmed}0"),
        _ => trimmed,
    };
    let value = BigDecimal::from_str(&normalized).ok()?;
    if value.is_negative() {
        return None;
    }
    Some(value)
}

/// Render `value` with exactly `digits` fraction digits, rounding half-up.
/// Never switches to exponent notation.
pub fn to_fixed(value: &BigDecimal, digits: i64) -> String {
    let rounded = value.with_scale_round(digits, RoundingMode::HalfUp);
    let (int, scale) = rounded.as_bigint_and_exponent();
    let negative = int.is_negative();
    let mut text = int.magnitude().to_string();

    if scale <= 0 {
        return format!("{}{}", if negative { "-" } else { "" }, text);
    }
    let scale = scale as usize;
    if text.len() <= scale {
        text = format!("{}{}", "0".repeat(scale + 1 - text.len()), text);
    }
    let split = text.len() - scale;
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        &text[..split],
        &text[split..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_accepts_user_shapes() {
        assert_eq!(parse_amount("100"), Some(BigDecimal::from(100)));
        assert_eq!(parse_amount("1,5"), BigDecimal::from_str("1.5").ok());
        assert_eq!(parse_amount(".5"), BigDecimal::from_str("0.5").ok());
        assert_eq!(parse_amount("3."), Some(BigDecimal::from(3)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-2"), None);
    }

    #[test]
    fn parse_amount_rejects_exponent_notation() {
        assert_eq!(parse_amount("1e3"), None);
        assert_eq!(parse_amount("1E-2"), None);
        assert_eq!(parse_amount("1e2000000000"), None);
        assert_eq!(parse_amount("+1"), None);
    }

    #[test]
    fn to_fixed_pads_and_rounds() {
        let v = BigDecimal::from_str("34.895").unwrap();
        assert_eq!(to_fixed(&v, 6), "34.895000");

        let v = BigDecimal::from_str("0.0000005").unwrap();
        assert_eq!(to_fixed(&v, 6), "0.000001");

        let v = BigDecimal::from_str("0.00000049").unwrap();
        assert_eq!(to_fixed(&v, 6), "0.000000");

        let v = BigDecimal::from_str("2450.5").unwrap();
        assert_eq!(to_fixed(&v, 2), "2450.50");

        let v = BigDecimal::from(7);
        assert_eq!(to_fixed(&v, 0), "7");
    }
}
