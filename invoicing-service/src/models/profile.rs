//! Per-user business profile: issuer defaults seeded into new invoices,
//! plus the sequential invoice-number counter.

use invoice_engine::Party;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessProfile {
    pub user_id: String,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub from_address: Option<String>,
    pub from_phone: Option<String>,
    pub from_mobile: Option<String>,
    pub from_fax: Option<String>,
    pub from_website: Option<String>,
    pub from_business_number: Option<String>,
    pub from_owner: Option<String>,
    pub invoice_prefix: String,
    pub next_invoice_number: i64,
}

impl BusinessProfile {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            from_name: None,
            from_email: None,
            from_address: None,
            from_phone: None,
            from_mobile: None,
            from_fax: None,
            from_website: None,
            from_business_number: None,
            from_owner: None,
            invoice_prefix: "INV-".to_string(),
            next_invoice_number: 1,
        }
    }

    /// The issuer party block seeded into a new invoice.
    pub fn default_from_party(&self) -> Party {
        Party {
            name: self.from_name.clone(),
            email: self.from_email.clone(),
            address: self.from_address.clone(),
            phone: self.from_phone.clone(),
            mobile: self.from_mobile.clone(),
            fax: self.from_fax.clone(),
            website: self.from_website.clone(),
            business_number: self.from_business_number.clone(),
            owner: self.from_owner.clone(),
        }
    }

    /// Format the next sequential invoice number, zero-padded to four
    /// digits.
    pub fn format_invoice_number(&self) -> String {
        format!("{}{:04}", self.invoice_prefix, self.next_invoice_number)
    }
}
