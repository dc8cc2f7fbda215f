use crate::domain::round_cents;

use super::ParseError;

/// Regex fragment matching an amount token such as `$1,200.50`, `12,5` or `2k`.
/// A leading minus is captured so that [`parse_amount`] can reject it.
pub(crate) const AMOUNT: &str = r"-?\$?\d[\d,]*(?:\.\d+)?[kK]?";

/// Parses an amount token into a positive value rounded to cents.
///
/// A comma followed by exactly one or two digits at the end is treated as a
/// decimal separator; every other comma is a thousands separator.
pub fn parse_amount(raw: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidAmount(raw.trim().to_string());
    let mut text = raw.trim().trim_start_matches('$').to_string();
    let mut multiplier = 1.0;
    if text.ends_with(['k', 'K']) {
        text.pop();
        multiplier = 1000.0;
    }
    if text.is_empty() {
        return Err(invalid());
    }
    let normalized = if text.contains('.') {
        text.replace(',', "")
    } else if let Some((head, tail)) = text.rsplit_once(',') {
        if (1..=2).contains(&tail.len()) {
            format!("{}.{}", head.replace(',', ""), tail)
        } else {
            text.replace(',', "")
        }
    } else {
        text
    };
    let value: f64 = normalized.parse().map_err(|_| invalid())?;
    let value = round_cents(value * multiplier);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_amount_shapes() {
        assert_eq!(parse_amount("50").unwrap(), 50.0);
        assert_eq!(parse_amount("$12.5").unwrap(), 12.5);
        assert_eq!(parse_amount("1,200").unwrap(), 1200.0);
        assert_eq!(parse_amount("1,200.75").unwrap(), 1200.75);
        assert_eq!(parse_amount("12,50").unwrap(), 12.5);
        assert_eq!(parse_amount("2k").unwrap(), 2000.0);
        assert_eq!(parse_amount("1.5K").unwrap(), 1500.0);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(matches!(parse_amount("0"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_amount("$"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_amount("1.2.3"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-5"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-$5"), Err(ParseError::InvalidAmount(_))));
    }
}
