//! Persistence boundary.
//!
//! The core computation never talks to storage itself; handlers fetch a
//! full record, hand it to the engine, and write a full replacement record
//! back. Store errors propagate unchanged.

use crate::models::{BusinessProfile, Expense, Mileage};
use async_trait::async_trait;
use chrono::NaiveDate;
use invoice_engine::Invoice;
use service_core::error::AppError;
use uuid::Uuid;

/// Inclusive date filter for listings and reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    // Invoices: full-record reads and writes only, no partial updates.
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), AppError>;
    async fn get_invoice(&self, user_id: &str, id: Uuid) -> Result<Option<Invoice>, AppError>;
    async fn get_invoice_by_share_token(&self, token: &str)
        -> Result<Option<Invoice>, AppError>;
    async fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>, AppError>;
    async fn replace_invoice(&self, invoice: &Invoice) -> Result<bool, AppError>;
    async fn delete_invoice(&self, user_id: &str, id: Uuid) -> Result<bool, AppError>;
    async fn set_share_token(
        &self,
        user_id: &str,
        id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, AppError>;

    // Business profile and invoice numbering.
    async fn get_profile(&self, user_id: &str) -> Result<Option<BusinessProfile>, AppError>;
    async fn upsert_profile(&self, profile: &BusinessProfile) -> Result<(), AppError>;
    async fn next_invoice_number(&self, user_id: &str) -> Result<String, AppError>;

    // Expenses and mileage.
    async fn create_expense(&self, expense: &Expense) -> Result<(), AppError>;
    async fn list_expenses(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Expense>, AppError>;
    async fn delete_expense(&self, user_id: &str, id: Uuid) -> Result<bool, AppError>;
    async fn create_mileage(&self, mileage: &Mileage) -> Result<(), AppError>;
    async fn list_mileage(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Mileage>, AppError>;
    async fn delete_mileage(&self, user_id: &str, id: Uuid) -> Result<bool, AppError>;
}
