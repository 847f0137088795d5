//! Invoice and line-item rows as persisted in Postgres.
//!
//! The canonical in-memory shape is `invoice_engine::Invoice`; these rows
//! exist only at the storage boundary. Party fields are stored flat
//! (`from_*` / `bill_to_*`) because they are point-in-time snapshots, not
//! references to a client record.

use chrono::{DateTime, NaiveDate, Utc};
use invoice_engine::{Invoice, InvoiceStatus, LineItem, Party, Terms};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRow {
    pub invoice_id: Uuid,
    pub user_id: String,
    pub invoice_number: String,
    pub invoice_name: Option<String>,
    pub invoice_date: NaiveDate,
    pub terms: String,
    pub status: String,
    pub share_token: Option<String>,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub from_address: Option<String>,
    pub from_phone: Option<String>,
    pub from_mobile: Option<String>,
    pub from_fax: Option<String>,
    pub from_website: Option<String>,
    pub from_business_number: Option<String>,
    pub from_owner: Option<String>,
    pub bill_to_name: Option<String>,
    pub bill_to_email: Option<String>,
    pub bill_to_address: Option<String>,
    pub bill_to_phone: Option<String>,
    pub bill_to_mobile: Option<String>,
    pub bill_to_fax: Option<String>,
    pub bill_to_website: Option<String>,
    pub bill_to_business_number: Option<String>,
    pub bill_to_owner: Option<String>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub balance_due: Decimal,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LineItemRow {
    pub line_item_id: Uuid,
    pub invoice_id: Uuid,
    pub name: Option<String>,
    pub description: String,
    pub rate: Decimal,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub sort_order: i32,
}

impl InvoiceRow {
    /// Assemble the canonical record from a header row and its line items,
    /// already ordered by `sort_order`.
    pub fn into_invoice(self, items: Vec<LineItemRow>) -> Invoice {
        Invoice {
            id: self.invoice_id,
            user_id: self.user_id,
            invoice_number: self.invoice_number,
            invoice_name: self.invoice_name,
            date: self.invoice_date,
            terms: Terms::from_string(&self.terms),
            status: InvoiceStatus::from_string(&self.status),
            share_token: self.share_token,
            from: Party {
                name: self.from_name,
                email: self.from_email,
                address: self.from_address,
                phone: self.from_phone,
                mobile: self.from_mobile,
                fax: self.from_fax,
                website: self.from_website,
                business_number: self.from_business_number,
                owner: self.from_owner,
            },
            bill_to: Party {
                name: self.bill_to_name,
                email: self.bill_to_email,
                address: self.bill_to_address,
                phone: self.bill_to_phone,
                mobile: self.bill_to_mobile,
                fax: self.bill_to_fax,
                website: self.bill_to_website,
                business_number: self.bill_to_business_number,
                owner: self.bill_to_owner,
            },
            line_items: items
                .into_iter()
                .map(|item| LineItem {
                    name: item.name,
                    description: item.description,
                    rate: item.rate,
                    quantity: item.quantity,
                    amount: item.amount,
                })
                .collect(),
            subtotal: self.subtotal,
            total: self.total,
            balance_due: self.balance_due,
            notes: self.notes,
        }
    }
}
