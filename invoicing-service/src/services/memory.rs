//! In-memory store, used by the integration tests and for running the
//! service without a database.

use crate::models::{BusinessProfile, Expense, Mileage};
use crate::services::store::{DateRange, InvoiceStore};
use async_trait::async_trait;
use invoice_engine::Invoice;
use service_core::error::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    invoices: HashMap<Uuid, Invoice>,
    profiles: HashMap<String, BusinessProfile>,
    expenses: HashMap<Uuid, Expense>,
    mileage: HashMap<Uuid, Mileage>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, user_id: &str, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .invoices
            .get(&id)
            .filter(|invoice| invoice.user_id == user_id)
            .cloned())
    }

    async fn get_invoice_by_share_token(
        &self,
        token: &str,
    ) -> Result<Option<Invoice>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .invoices
            .values()
            .find(|invoice| invoice.share_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>, AppError> {
        let state = self.state.read().await;
        let mut invoices: Vec<Invoice> = state
            .invoices
            .values()
            .filter(|invoice| invoice.user_id == user_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }

    async fn replace_invoice(&self, invoice: &Invoice) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.invoices.get_mut(&invoice.id) {
            Some(existing) if existing.user_id == invoice.user_id => {
                // Share token is managed through set_share_token, not the
                // edit flow.
                let token = existing.share_token.clone();
                *existing = invoice.clone();
                existing.share_token = token;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_invoice(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.invoices.get(&id) {
            Some(invoice) if invoice.user_id == user_id => {
                state.invoices.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_share_token(
        &self,
        user_id: &str,
        id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.invoices.get_mut(&id) {
            Some(invoice) if invoice.user_id == user_id => {
                invoice.share_token = token.map(str::to_string);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<BusinessProfile>, AppError> {
        let state = self.state.read().await;
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &BusinessProfile) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn next_invoice_number(&self, user_id: &str) -> Result<String, AppError> {
        let mut state = self.state.write().await;
        let profile = state
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| BusinessProfile::empty(user_id));
        let number = profile.format_invoice_number();
        profile.next_invoice_number += 1;
        Ok(number)
    }

    async fn create_expense(&self, expense: &Expense) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.expenses.insert(expense.expense_id, expense.clone());
        Ok(())
    }

    async fn list_expenses(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Expense>, AppError> {
        let state = self.state.read().await;
        let mut expenses: Vec<Expense> = state
            .expenses
            .values()
            .filter(|e| e.user_id == user_id && range.contains(e.expense_date))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.expense_date.cmp(&a.expense_date));
        Ok(expenses)
    }

    async fn delete_expense(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.expenses.get(&id) {
            Some(expense) if expense.user_id == user_id => {
                state.expenses.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_mileage(&self, mileage: &Mileage) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.mileage.insert(mileage.mileage_id, mileage.clone());
        Ok(())
    }

    async fn list_mileage(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Mileage>, AppError> {
        let state = self.state.read().await;
        let mut trips: Vec<Mileage> = state
            .mileage
            .values()
            .filter(|m| m.user_id == user_id && range.contains(m.trip_date))
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.trip_date.cmp(&a.trip_date));
        Ok(trips)
    }

    async fn delete_mileage(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.mileage.get(&id) {
            Some(mileage) if mileage.user_id == user_id => {
                state.mileage.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
