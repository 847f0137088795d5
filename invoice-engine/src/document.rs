//! Document model builder.
//!
//! Turns a persisted [`Invoice`] into a renderer-agnostic tree of plain
//! data sections. Every output surface (screen, PDF, email, public share)
//! renders from this tree; none of them recomputes totals or re-resolves
//! line-item labels, so the surfaces cannot disagree.

use crate::invoice::{Invoice, Party};
use crate::money::MoneyFormat;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// A malformed invoice must fail loudly at render time rather than be
/// silently emailed or downloaded with sections missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("invoice number is missing")]
    MissingInvoiceNumber,
    #[error("invoice has no issuer or client name")]
    MissingPartyName,
}

/// One labeled row inside a party block. Rows for empty source fields are
/// never created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyBlock {
    pub title: &'static str,
    pub name: Option<String>,
    pub fields: Vec<LabeledField>,
}

/// One renderable line-item row. `primary`/`secondary` carry the resolved
/// display name; monetary values are pre-formatted strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRow {
    pub primary: String,
    pub secondary: Option<String>,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub invoice_number: String,
    pub invoice_name: Option<String>,
    pub date: String,
    pub due_date: Option<String>,
    pub terms: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsBlock {
    pub subtotal: String,
    pub total: String,
    pub balance_due: String,
}

/// The full document tree, sections in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub header: HeaderBlock,
    pub from: PartyBlock,
    pub bill_to: PartyBlock,
    pub lines: Vec<LineRow>,
    pub totals: TotalsBlock,
    pub notes: Option<String>,
}

/// Borrowed view of one document section, for renderers that walk the
/// document in order.
#[derive(Debug, Clone, Copy)]
pub enum Section<'a> {
    Header(&'a HeaderBlock),
    Party(&'a PartyBlock),
    Lines(&'a [LineRow]),
    Totals(&'a TotalsBlock),
    Notes(&'a str),
}

impl InvoiceDocument {
    /// Sections in display order. A notes section exists only when the
    /// invoice carries non-empty notes.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = vec![
            Section::Header(&self.header),
            Section::Party(&self.from),
            Section::Party(&self.bill_to),
            Section::Lines(&self.lines),
            Section::Totals(&self.totals),
        ];
        if let Some(notes) = self.notes.as_deref() {
            sections.push(Section::Notes(notes));
        }
        sections
    }
}

/// Resolve the display label for a line item. Implemented once, here, for
/// every renderer: a short name takes precedence, with the description as
/// a secondary line only when it adds information.
fn display_name(name: Option<&str>, description: &str) -> (String, Option<String>) {
    match name {
        Some(n) if !n.trim().is_empty() => {
            if n == description || description.trim().is_empty() {
                (n.to_string(), None)
            } else {
                (n.to_string(), Some(description.to_string()))
            }
        }
        _ => (description.to_string(), None),
    }
}

/// Dates render from calendar-local `NaiveDate`, never through UTC, so a
/// `YYYY-MM-DD` value cannot shift a day in negative-offset timezones.
fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Quantities and rates drop insignificant trailing zeros for display.
fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn party_block(title: &'static str, party: &Party) -> PartyBlock {
    let mut fields = Vec::new();
    let mut push = |label: &'static str, value: &Option<String>| {
        if let Some(v) = non_empty(value) {
            fields.push(LabeledField { label, value: v });
        }
    };
    push("Email", &party.email);
    push("Address", &party.address);
    push("Phone", &party.phone);
    push("Mobile", &party.mobile);
    push("Fax", &party.fax);
    push("Website", &party.website);
    push("Business Number", &party.business_number);
    push("Owner", &party.owner);

    PartyBlock {
        title,
        name: non_empty(&party.name),
        fields,
    }
}

/// Build the document tree for an invoice.
///
/// Fails when required header data is missing (blank invoice number, or
/// neither party named); everything else renders from the stored record
/// as-is.
pub fn build_document(
    invoice: &Invoice,
    money: &MoneyFormat,
) -> Result<InvoiceDocument, DocumentError> {
    if invoice.invoice_number.trim().is_empty() {
        return Err(DocumentError::MissingInvoiceNumber);
    }
    if !invoice.from.has_name() && !invoice.bill_to.has_name() {
        return Err(DocumentError::MissingPartyName);
    }

    let lines = invoice
        .line_items
        .iter()
        .map(|item| {
            let (primary, secondary) = display_name(item.name.as_deref(), &item.description);
            LineRow {
                primary,
                secondary,
                quantity: format_quantity(item.quantity),
                rate: money.format(item.rate),
                amount: money.format(item.amount),
            }
        })
        .collect();

    Ok(InvoiceDocument {
        header: HeaderBlock {
            invoice_number: invoice.invoice_number.clone(),
            invoice_name: non_empty(&invoice.invoice_name),
            date: format_date(invoice.date),
            due_date: invoice.due_date().map(format_date),
            terms: invoice.terms.label().to_string(),
            status: invoice.status.label().to_string(),
        },
        from: party_block("From", &invoice.from),
        bill_to: party_block("Bill To", &invoice.bill_to),
        lines,
        totals: TotalsBlock {
            subtotal: money.format(invoice.subtotal),
            total: money.format(invoice.total),
            balance_due: money.format(invoice.balance_due),
        },
        notes: non_empty(&invoice.notes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceStatus, Terms};
    use crate::totals::{compute_totals, LineItemInput};
    use std::str::FromStr;
    use uuid::Uuid;

    fn sample_invoice() -> Invoice {
        let computed = compute_totals(&[LineItemInput {
            name: Some("Consulting".to_string()),
            description: "10 hrs @ $50".to_string(),
            rate: Some("50".to_string()),
            quantity: Some("10".to_string()),
        }]);
        Invoice {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            invoice_number: "INV-0042".to_string(),
            invoice_name: None,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            terms: Terms::ThirtyDays,
            status: InvoiceStatus::Sent,
            share_token: None,
            from: Party {
                name: Some("Acme Studio".to_string()),
                email: Some("billing@acme.test".to_string()),
                ..Party::default()
            },
            bill_to: Party {
                name: Some("Globex".to_string()),
                ..Party::default()
            },
            line_items: computed.line_items,
            subtotal: computed.subtotal,
            total: computed.total,
            balance_due: computed.balance_due,
            notes: None,
        }
    }

    #[test]
    fn builds_sections_in_order_without_notes() {
        let money = MoneyFormat::default();
        let doc = build_document(&sample_invoice(), &money).unwrap();
        let sections = doc.sections();
        assert_eq!(sections.len(), 5);
        assert!(matches!(sections[0], Section::Header(_)));
        assert!(matches!(sections[4], Section::Totals(_)));
    }

    #[test]
    fn notes_section_present_only_when_non_empty() {
        let money = MoneyFormat::default();
        let mut invoice = sample_invoice();
        invoice.notes = Some("  ".to_string());
        let doc = build_document(&invoice, &money).unwrap();
        assert_eq!(doc.notes, None);

        invoice.notes = Some("Thanks for your business".to_string());
        let doc = build_document(&invoice, &money).unwrap();
        assert_eq!(doc.sections().len(), 6);
    }

    #[test]
    fn empty_party_fields_are_omitted() {
        let money = MoneyFormat::default();
        let doc = build_document(&sample_invoice(), &money).unwrap();
        assert!(doc.bill_to.fields.iter().all(|f| f.label != "Fax"));
        assert_eq!(doc.from.fields.len(), 1);
        assert_eq!(doc.from.fields[0].label, "Email");
    }

    #[test]
    fn display_name_fallback_cases() {
        assert_eq!(
            display_name(Some("Consulting"), "Consulting"),
            ("Consulting".to_string(), None)
        );
        assert_eq!(
            display_name(Some("Consulting"), "10 hrs @ $50"),
            (
                "Consulting".to_string(),
                Some("10 hrs @ $50".to_string())
            )
        );
        assert_eq!(display_name(None, "Misc"), ("Misc".to_string(), None));
    }

    #[test]
    fn missing_invoice_number_fails() {
        let money = MoneyFormat::default();
        let mut invoice = sample_invoice();
        invoice.invoice_number = "  ".to_string();
        assert_eq!(
            build_document(&invoice, &money),
            Err(DocumentError::MissingInvoiceNumber)
        );
    }

    #[test]
    fn missing_both_party_names_fails() {
        let money = MoneyFormat::default();
        let mut invoice = sample_invoice();
        invoice.from.name = None;
        invoice.bill_to.name = Some(String::new());
        assert_eq!(
            build_document(&invoice, &money),
            Err(DocumentError::MissingPartyName)
        );
    }

    #[test]
    fn totals_are_formatted_from_stored_values() {
        let money = MoneyFormat::default();
        let doc = build_document(&sample_invoice(), &money).unwrap();
        assert_eq!(doc.totals.subtotal, "500.00");
        assert_eq!(doc.totals.total, "500.00");
        assert_eq!(doc.totals.balance_due, "500.00");
        assert_eq!(doc.lines[0].primary, "Consulting");
        assert_eq!(doc.lines[0].secondary.as_deref(), Some("10 hrs @ $50"));
    }

    #[test]
    fn due_date_follows_terms() {
        let money = MoneyFormat::default();
        let doc = build_document(&sample_invoice(), &money).unwrap();
        assert_eq!(doc.header.date, "Jan 15, 2026");
        assert_eq!(doc.header.due_date.as_deref(), Some("Feb 14, 2026"));
    }

    #[test]
    fn quantity_drops_trailing_zeros() {
        let money = MoneyFormat::default();
        let mut invoice = sample_invoice();
        invoice.line_items[0].quantity = Decimal::from_str("2.50").unwrap();
        let doc = build_document(&invoice, &money).unwrap();
        assert_eq!(doc.lines[0].quantity, "2.5");
    }
}
