use crate::services::DateRange;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// Inclusive period filter, both bounds optional.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReportParams {
    pub fn date_range(&self) -> Result<DateRange, AppError> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                AppError::BadRequest(anyhow::anyhow!("Invalid date '{}': {}", raw, e))
            })
        };
        Ok(DateRange {
            start: self.start.as_deref().map(parse).transpose()?,
            end: self.end.as_deref().map(parse).transpose()?,
        })
    }
}

/// Financial summary for a period: invoicing on one side, deductible
/// spending on the other.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub invoice_count: usize,
    pub invoiced_total: Decimal,
    pub paid_total: Decimal,
    pub outstanding_total: Decimal,
    pub expense_count: usize,
    pub expense_total: Decimal,
    pub trip_count: usize,
    pub mileage_deduction_total: Decimal,
}
