//! Plaintext renderer, used as the text alternative in invoice emails.

use crate::document::{InvoiceDocument, Section};

/// Render the document tree as plain text.
pub fn render_text(doc: &InvoiceDocument) -> String {
    let mut out = String::new();

    for section in doc.sections() {
        match section {
            Section::Header(header) => {
                out.push_str(&format!("INVOICE {}\n", header.invoice_number));
                if let Some(name) = &header.invoice_name {
                    out.push_str(&format!("{}\n", name));
                }
                out.push_str(&format!("Date: {}\n", header.date));
                if let Some(due) = &header.due_date {
                    out.push_str(&format!("Due: {} ({})\n", due, header.terms));
                } else {
                    out.push_str(&format!("Terms: {}\n", header.terms));
                }
                out.push('\n');
            }
            Section::Party(party) => {
                if party.name.is_none() && party.fields.is_empty() {
                    continue;
                }
                out.push_str(&format!("{}:\n", party.title));
                if let Some(name) = &party.name {
                    out.push_str(&format!("  {}\n", name));
                }
                for field in &party.fields {
                    out.push_str(&format!("  {}: {}\n", field.label, field.value));
                }
                out.push('\n');
            }
            Section::Lines(lines) => {
                for line in lines {
                    out.push_str(&format!(
                        "  {}  ({} x {}) = {}\n",
                        line.primary, line.quantity, line.rate, line.amount
                    ));
                    if let Some(secondary) = &line.secondary {
                        out.push_str(&format!("      {}\n", secondary));
                    }
                }
                out.push('\n');
            }
            Section::Totals(totals) => {
                out.push_str(&format!("Subtotal: {}\n", totals.subtotal));
                out.push_str(&format!("Total: {}\n", totals.total));
                out.push_str(&format!("Balance Due: {}\n", totals.balance_due));
            }
            Section::Notes(notes) => {
                out.push_str(&format!("\nNotes:\n{}\n", notes));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;
    use crate::invoice::{Invoice, InvoiceStatus, Party, Terms};
    use crate::money::MoneyFormat;
    use crate::totals::{compute_totals, LineItemInput};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn renders_totals_and_omits_empty_fields() {
        let computed = compute_totals(&[LineItemInput {
            name: None,
            description: "Misc".to_string(),
            rate: Some("100".to_string()),
            quantity: Some("2".to_string()),
        }]);
        let invoice = Invoice {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            invoice_number: "7".to_string(),
            invoice_name: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            terms: Terms::None,
            status: InvoiceStatus::Draft,
            share_token: None,
            from: Party {
                name: Some("Me".to_string()),
                ..Party::default()
            },
            bill_to: Party::default(),
            line_items: computed.line_items,
            subtotal: computed.subtotal,
            total: computed.total,
            balance_due: computed.balance_due,
            notes: None,
        };
        let doc = build_document(&invoice, &MoneyFormat::default()).unwrap();
        let text = render_text(&doc);

        assert!(text.contains("INVOICE 7"));
        assert!(text.contains("Balance Due: 200.00"));
        assert!(!text.contains("Fax"));
        assert!(!text.contains("Notes"));
        // Empty bill-to block is skipped entirely
        assert!(!text.contains("Bill To"));
    }
}
