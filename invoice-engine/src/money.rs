//! Money rounding, lenient numeric parsing and display formatting.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round to 2 decimal places using half-up rounding. The result always
/// carries a scale of exactly 2, so `200` becomes `200.00` and serialized
/// amounts are uniform.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Parse a unit rate from untrusted form input. Malformed or absent input
/// resolves to zero; this runs on every keystroke-driven recalculation and
/// must never fail.
pub fn parse_rate(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Parse a quantity from untrusted form input. Malformed or absent input
/// resolves to one.
pub fn parse_quantity(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or(Decimal::ONE)
}

/// Display formatting for monetary amounts: fixed two decimals, grouped
/// thousands, no currency symbol. Symbol prefixing is a renderer concern.
///
/// Separators are explicit so output never depends on process locale.
#[derive(Debug, Clone)]
pub struct MoneyFormat {
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl MoneyFormat {
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = round2(amount);
        let fixed = format!("{:.2}", rounded);
        let (sign, unsigned) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (int_part, dec_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

        let mut grouped = String::new();
        let digits: Vec<char> = int_part.chars().collect();
        let mut count = 0;
        for i in (0..digits.len()).rev() {
            if count == 3 {
                grouped.push(self.thousands_separator);
                count = 0;
            }
            grouped.push(digits[i]);
            count += 1;
        }
        let int_with_sep: String = grouped.chars().rev().collect();

        format!(
            "{}{}{}{}",
            sign, int_with_sep, self.decimal_separator, dec_part
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn round2_is_half_up() {
        assert_eq!(round2(d("1.005")), d("1.01"));
        assert_eq!(round2(d("1.004")), d("1.00"));
        assert_eq!(round2(d("-1.005")), d("-1.01"));
    }

    #[test]
    fn round2_fixes_scale_to_two() {
        assert_eq!(round2(d("200")).to_string(), "200.00");
        assert_eq!(round2(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn parse_rate_defaults_to_zero() {
        assert_eq!(parse_rate(None), Decimal::ZERO);
        assert_eq!(parse_rate(Some("")), Decimal::ZERO);
        assert_eq!(parse_rate(Some("abc")), Decimal::ZERO);
        assert_eq!(parse_rate(Some(" 49.99 ")), d("49.99"));
    }

    #[test]
    fn parse_quantity_defaults_to_one() {
        assert_eq!(parse_quantity(None), Decimal::ONE);
        assert_eq!(parse_quantity(Some("")), Decimal::ONE);
        assert_eq!(parse_quantity(Some("x")), Decimal::ONE);
        assert_eq!(parse_quantity(Some("2.5")), d("2.5"));
    }

    #[test]
    fn format_groups_thousands() {
        let fmt = MoneyFormat::default();
        assert_eq!(fmt.format(d("0")), "0.00");
        assert_eq!(fmt.format(d("249.99")), "249.99");
        assert_eq!(fmt.format(d("1234567.5")), "1,234,567.50");
        assert_eq!(fmt.format(d("-1200")), "-1,200.00");
    }

    #[test]
    fn format_with_european_separators() {
        let fmt = MoneyFormat {
            thousands_separator: '.',
            decimal_separator: ',',
        };
        assert_eq!(fmt.format(d("9876.54")), "9.876,54");
    }
}
