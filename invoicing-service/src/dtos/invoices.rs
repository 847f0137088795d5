use chrono::{NaiveDate, Utc};
use invoice_engine::{Invoice, LineItem, LineItemInput, Party};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// Party block as posted by the invoice form. All fields optional; empty
/// strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyPayload {
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

impl PartyPayload {
    pub fn into_party(self) -> Party {
        fn clean(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Party {
            name: clean(self.name),
            email: clean(self.email),
            address: clean(self.address),
            phone: clean(self.phone),
            mobile: clean(self.mobile),
            fax: clean(self.fax),
            website: clean(self.website),
            business_number: clean(self.business_number),
            owner: clean(self.owner),
        }
    }
}

/// Line-item row as posted by the form. Rate and quantity stay strings
/// here; the totals calculator owns their (lenient) parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemPayload {
    pub name: Option<String>,
    pub description: String,
    pub rate: Option<String>,
    pub quantity: Option<String>,
}

impl LineItemPayload {
    pub fn into_input(self) -> LineItemInput {
        LineItemInput {
            name: self.name,
            description: self.description,
            rate: self.rate,
            quantity: self.quantity,
        }
    }
}

/// Full invoice payload, used for both create and full-overwrite update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct InvoicePayload {
    #[validate(length(max = 64))]
    pub invoice_number: Option<String>,
    #[validate(length(max = 256))]
    pub invoice_name: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub terms: Option<String>,
    pub status: Option<String>,
    pub from: Option<PartyPayload>,
    pub bill_to: Option<PartyPayload>,
    #[serde(default)]
    pub line_items: Vec<LineItemPayload>,
    pub notes: Option<String>,
}

impl InvoicePayload {
    /// Parse the invoice date as a calendar-local date. Going through UTC
    /// here would shift the displayed day in negative-offset timezones.
    pub fn parse_date(&self) -> Result<NaiveDate, AppError> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid date '{}': {}", self.date, e)))
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub user_id: String,
    pub invoice_number: String,
    pub invoice_name: Option<String>,
    pub date: String,
    pub terms: String,
    pub status: String,
    /// Display status: `sent` past its due date with an open balance
    /// reports as `overdue`.
    pub effective_status: String,
    pub share_token: Option<String>,
    pub from: Party,
    pub bill_to: Party,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub balance_due: Decimal,
    pub notes: Option<String>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: invoice.id.to_string(),
            effective_status: invoice.effective_status(today).as_str().to_string(),
            user_id: invoice.user_id,
            invoice_number: invoice.invoice_number,
            invoice_name: invoice.invoice_name,
            date: invoice.date.to_string(),
            terms: invoice.terms.as_str().to_string(),
            status: invoice.status.as_str().to_string(),
            share_token: invoice.share_token,
            from: invoice.from,
            bill_to: invoice.bill_to,
            line_items: invoice.line_items,
            subtotal: invoice.subtotal,
            total: invoice.total,
            balance_due: invoice.balance_due,
            notes: invoice.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailInvoiceRequest {
    #[validate(email)]
    pub to: String,
    #[validate(length(max = 256))]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_token: String,
    pub share_path: String,
}
