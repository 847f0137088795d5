//! Canonical invoice record handed in by the persistence collaborator.

use crate::totals::LineItem;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment-due policy attached to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terms {
    None,
    OnReceipt,
    OneDay,
    TwoDays,
    ThreeDays,
    FiveDays,
    SevenDays,
    FourteenDays,
    ThirtyDays,
    Custom,
}

impl Terms {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terms::None => "none",
            Terms::OnReceipt => "on_receipt",
            Terms::OneDay => "1_day",
            Terms::TwoDays => "2_days",
            Terms::ThreeDays => "3_days",
            Terms::FiveDays => "5_days",
            Terms::SevenDays => "7_days",
            Terms::FourteenDays => "14_days",
            Terms::ThirtyDays => "30_days",
            Terms::Custom => "custom",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "on_receipt" => Terms::OnReceipt,
            "1_day" => Terms::OneDay,
            "2_days" => Terms::TwoDays,
            "3_days" => Terms::ThreeDays,
            "5_days" => Terms::FiveDays,
            "7_days" => Terms::SevenDays,
            "14_days" => Terms::FourteenDays,
            "30_days" => Terms::ThirtyDays,
            "custom" => Terms::Custom,
            _ => Terms::None,
        }
    }

    /// Days until payment is due, where the terms imply a duration.
    pub fn due_in_days(&self) -> Option<i64> {
        match self {
            Terms::OnReceipt => Some(0),
            Terms::OneDay => Some(1),
            Terms::TwoDays => Some(2),
            Terms::ThreeDays => Some(3),
            Terms::FiveDays => Some(5),
            Terms::SevenDays => Some(7),
            Terms::FourteenDays => Some(14),
            Terms::ThirtyDays => Some(30),
            Terms::None | Terms::Custom => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Terms::None => "None",
            Terms::OnReceipt => "Due on receipt",
            Terms::OneDay => "Net 1 day",
            Terms::TwoDays => "Net 2 days",
            Terms::ThreeDays => "Net 3 days",
            Terms::FiveDays => "Net 5 days",
            Terms::SevenDays => "Net 7 days",
            Terms::FourteenDays => "Net 14 days",
            Terms::ThirtyDays => "Net 30 days",
            Terms::Custom => "Custom",
        }
    }
}

/// Invoice status. Transitions are one-way in normal flow but the field is
/// directly editable by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => InvoiceStatus::Sent,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Draft,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

/// One party block on an invoice (issuer or client). A flat snapshot taken
/// at creation/edit time; not linked to a stored client record, so the
/// invoice stays historically accurate if client details later change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub business_number: Option<String>,
    pub owner: Option<String>,
}

impl Party {
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// Canonical invoice record. Totals are derived as of last save and
/// persisted alongside the line items; renderers read them, never
/// recompute them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: String,
    pub invoice_number: String,
    pub invoice_name: Option<String>,
    pub date: NaiveDate,
    pub terms: Terms,
    pub status: InvoiceStatus,
    pub share_token: Option<String>,
    pub from: Party,
    pub bill_to: Party,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub balance_due: Decimal,
    pub notes: Option<String>,
}

impl Invoice {
    /// Due date derived from the invoice date and terms, where terms imply
    /// a duration.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.terms.due_in_days().map(|d| self.date + Duration::days(d))
    }

    /// Status for display: a sent invoice past its due date with an open
    /// balance shows as overdue. The stored status is never mutated here.
    pub fn effective_status(&self, today: NaiveDate) -> InvoiceStatus {
        if self.status == InvoiceStatus::Sent {
            if let Some(due) = self.due_date() {
                if due < today && self.balance_due > Decimal::ZERO {
                    return InvoiceStatus::Overdue;
                }
            }
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_round_trip_wire_names() {
        for terms in [
            Terms::None,
            Terms::OnReceipt,
            Terms::OneDay,
            Terms::TwoDays,
            Terms::ThreeDays,
            Terms::FiveDays,
            Terms::SevenDays,
            Terms::FourteenDays,
            Terms::ThirtyDays,
            Terms::Custom,
        ] {
            assert_eq!(Terms::from_string(terms.as_str()), terms);
        }
    }

    #[test]
    fn unknown_terms_fall_back_to_none() {
        assert_eq!(Terms::from_string("60_days"), Terms::None);
    }

    #[test]
    fn unknown_status_falls_back_to_draft() {
        assert_eq!(InvoiceStatus::from_string("void"), InvoiceStatus::Draft);
    }

    #[test]
    fn party_has_name_ignores_whitespace() {
        let party = Party {
            name: Some("  ".to_string()),
            ..Party::default()
        };
        assert!(!party.has_name());
    }
}
