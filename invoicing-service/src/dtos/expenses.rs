use crate::models::{Expense, Mileage};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ExpensePayload {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[validate(length(min = 1, max = 128))]
    pub category: String,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    pub amount: Decimal,
}

impl ExpensePayload {
    pub fn parse_date(&self) -> Result<NaiveDate, AppError> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct MileagePayload {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    pub miles: Decimal,
    pub rate_per_mile: Decimal,
}

impl MileagePayload {
    pub fn parse_date(&self) -> Result<NaiveDate, AppError> {
        parse_date(&self.date)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid date '{}': {}", raw, e)))
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub date: String,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.expense_id.to_string(),
            date: expense.expense_date.to_string(),
            category: expense.category,
            description: expense.description,
            amount: expense.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MileageResponse {
    pub id: String,
    pub date: String,
    pub description: Option<String>,
    pub miles: Decimal,
    pub rate_per_mile: Decimal,
    pub deduction: Decimal,
}

impl From<Mileage> for MileageResponse {
    fn from(mileage: Mileage) -> Self {
        Self {
            id: mileage.mileage_id.to_string(),
            date: mileage.trip_date.to_string(),
            description: mileage.description,
            miles: mileage.miles,
            rate_per_mile: mileage.rate_per_mile,
            deduction: mileage.deduction,
        }
    }
}
