//! Invoice totals calculator.
//!
//! Takes line-item rows as posted by a form (free-text rate and quantity)
//! and produces normalized line items plus subtotal, total and balance due
//! so the caller can persist a fully consistent record in one write.

use crate::money::{parse_quantity, parse_rate, round2};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line-item row as it arrives from an editing form. Rate and quantity
/// are untrusted strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemInput {
    pub name: Option<String>,
    pub description: String,
    pub rate: Option<String>,
    pub quantity: Option<String>,
}

/// A normalized line item. `amount` always equals `round2(rate * quantity)`
/// at the moment of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: Option<String>,
    pub description: String,
    pub rate: Decimal,
    pub quantity: Decimal,
    pub amount: Decimal,
}

/// Result of a totals computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedTotals {
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub balance_due: Decimal,
}

/// Compute invoice totals from form input. Never fails: malformed rates
/// resolve to 0, malformed quantities to 1, so an editing UI is never
/// interrupted by a half-typed number. Negative values pass through (used
/// for discount-style lines).
///
/// Amounts are rounded to 2 decimals before summation so downstream sums
/// are exact and reproducible. There is no tax or discount model:
/// `total = subtotal` and `balance_due = total`.
pub fn compute_totals(rows: &[LineItemInput]) -> ComputedTotals {
    let line_items: Vec<LineItem> = rows
        .iter()
        .map(|row| {
            let rate = parse_rate(row.rate.as_deref());
            let quantity = parse_quantity(row.quantity.as_deref());
            LineItem {
                name: row.name.clone().filter(|n| !n.trim().is_empty()),
                description: row.description.clone(),
                rate,
                quantity,
                amount: round2(rate * quantity),
            }
        })
        .collect();

    let subtotal = round2(line_items.iter().map(|item| item.amount).sum());

    ComputedTotals {
        line_items,
        subtotal,
        total: subtotal,
        balance_due: subtotal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(description: &str, rate: &str, quantity: &str) -> LineItemInput {
        LineItemInput {
            name: None,
            description: description.to_string(),
            rate: Some(rate.to_string()),
            quantity: Some(quantity.to_string()),
        }
    }

    #[test]
    fn empty_input_yields_zero_totals() {
        let result = compute_totals(&[]);
        assert!(result.line_items.is_empty());
        assert_eq!(result.subtotal, Decimal::ZERO);
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.balance_due, Decimal::ZERO);
    }

    #[test]
    fn two_line_scenario() {
        let result = compute_totals(&[
            row("Consulting", "100", "2"),
            row("License", "49.99", "1"),
        ]);
        assert_eq!(result.line_items[0].amount, d("200.00"));
        assert_eq!(result.line_items[1].amount, d("49.99"));
        assert_eq!(result.subtotal, d("249.99"));
        assert_eq!(result.total, d("249.99"));
        assert_eq!(result.balance_due, d("249.99"));
    }

    #[test]
    fn malformed_numbers_degrade_to_defaults() {
        let result = compute_totals(&[
            LineItemInput {
                name: None,
                description: "Garbage rate".to_string(),
                rate: Some("abc".to_string()),
                quantity: Some("".to_string()),
            },
            LineItemInput {
                name: None,
                description: "Missing both".to_string(),
                rate: None,
                quantity: None,
            },
        ]);
        for item in &result.line_items {
            assert_eq!(item.rate, Decimal::ZERO);
            assert_eq!(item.quantity, Decimal::ONE);
            assert_eq!(item.amount, Decimal::ZERO);
        }
        assert_eq!(result.subtotal, Decimal::ZERO);
    }

    #[test]
    fn amounts_round_half_up_before_summation() {
        // 3 x 33.335 = 100.005 each -> 100.01 stored, summed exactly
        let result = compute_totals(&[
            row("A", "33.335", "3"),
            row("B", "33.335", "3"),
        ]);
        assert_eq!(result.line_items[0].amount, d("100.01"));
        assert_eq!(result.subtotal, d("200.02"));
    }

    #[test]
    fn subtotal_is_order_independent() {
        let rows = vec![
            row("A", "12.34", "3"),
            row("B", "0.07", "11"),
            row("C", "99.99", "1"),
        ];
        let forward = compute_totals(&rows);
        let mut reversed = rows.clone();
        reversed.reverse();
        let backward = compute_totals(&reversed);
        assert_eq!(forward.subtotal, backward.subtotal);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let rows = vec![row("A", "10.50", "4"), row("B", "7", "0.5")];
        let first = compute_totals(&rows);
        let second = compute_totals(&rows);
        assert_eq!(first, second);
    }

    #[test]
    fn negative_values_pass_through() {
        let result = compute_totals(&[row("Work", "100", "1"), row("Discount", "-25", "1")]);
        assert_eq!(result.subtotal, d("75.00"));
    }

    #[test]
    fn blank_name_is_dropped() {
        let result = compute_totals(&[LineItemInput {
            name: Some("   ".to_string()),
            description: "Misc".to_string(),
            rate: Some("1".to_string()),
            quantity: Some("1".to_string()),
        }]);
        assert_eq!(result.line_items[0].name, None);
    }
}
