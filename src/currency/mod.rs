//! Amount formatting for terminal output.

use crate::config::Config;

/// Separators used when rendering numbers for a locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub decimal: char,
    pub grouping: char,
}

impl Separators {
    /// Best-effort mapping from a BCP 47 tag (`en-US`, `pt-BR`, ...) to separators.
    pub fn for_locale(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "fr" | "sv" | "nb" | "fi" | "cs" | "pl" => Self {
                decimal: ',',
                grouping: ' ',
            },
            "de" | "pt" | "es" | "it" | "nl" | "da" | "tr" | "id" => Self {
                decimal: ',',
                grouping: '.',
            },
            _ => Self {
                decimal: '.',
                grouping: ',',
            },
        }
    }
}

/// Formats amounts in one currency and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    code: String,
    separators: Separators,
}

impl MoneyFormat {
    pub fn new(code: &str, locale: &str) -> Self {
        Self {
            code: code.trim().to_ascii_uppercase(),
            separators: Separators::for_locale(locale),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.currency, &config.locale)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn format(&self, amount: f64) -> String {
        let body = format_number(self.separators, amount.abs(), minor_units_for(&self.code));
        let sign = if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
            "-"
        } else {
            ""
        };
        match symbol_for(&self.code) {
            Some(symbol) => format!("{}{}{}", sign, symbol, body),
            None => format!("{}{} {}", sign, self.code, body),
        }
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

pub fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "BRL" => Some("R$"),
        "AUD" => Some("A$"),
        "INR" => Some("₹"),
        _ => None,
    }
}

pub fn minor_units_for(code: &str) -> usize {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

fn format_number(separators: Separators, value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body.as_str(), None),
    };
    let mut grouped = String::new();
    for (count, ch) in int_part.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separators.grouping);
        }
        grouped.insert(0, ch);
    }
    match frac_part {
        Some(frac) => format!("{}{}{}", grouped, separators.decimal, frac),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_symbol_and_grouping() {
        let money = MoneyFormat::default();
        assert_eq!(money.format(1234567.891), "$1,234,567.89");
        assert_eq!(money.format(-42.5), "-$42.50");
        assert_eq!(money.format(-0.001), "$0.00");
    }

    #[test]
    fn locale_changes_separators() {
        assert_eq!(MoneyFormat::new("brl", "pt-BR").format(1500.0), "R$1.500,00");
        assert_eq!(MoneyFormat::new("JPY", "ja-JP").format(1500.4), "¥1,500");
        assert_eq!(MoneyFormat::new("CHF", "fr-CH").format(10.0), "CHF 10,00");
    }
}
