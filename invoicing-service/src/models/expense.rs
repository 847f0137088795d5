//! Expense and mileage records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logged business expense.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub expense_id: Uuid,
    pub user_id: String,
    pub expense_date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// A logged trip. `deduction` is derived as `round2(miles * rate_per_mile)`
/// at the moment of persistence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mileage {
    pub mileage_id: Uuid,
    pub user_id: String,
    pub trip_date: NaiveDate,
    pub description: Option<String>,
    pub miles: Decimal,
    pub rate_per_mile: Decimal,
    pub deduction: Decimal,
    pub created_utc: DateTime<Utc>,
}
