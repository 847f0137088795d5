//! Period reports: an aggregate summary and a CSV export of expenses.

use crate::dtos::{ReportParams, SummaryResponse};
use crate::middleware::UserId;
use crate::startup::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use invoice_engine::{round2, InvoiceStatus};
use rust_decimal::Decimal;
use service_core::error::AppError;

pub async fn summary(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<ReportParams>,
) -> Result<Json<SummaryResponse>, AppError> {
    let range = params.date_range()?;

    // Drafts are working documents; they never count as invoiced.
    let invoices: Vec<_> = state
        .store
        .list_invoices(&user.0)
        .await?
        .into_iter()
        .filter(|i| i.status != InvoiceStatus::Draft && range.contains(i.date))
        .collect();
    let invoiced_total = round2(invoices.iter().map(|i| i.total).sum());
    let paid_total = round2(
        invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Paid)
            .map(|i| i.total)
            .sum(),
    );
    let outstanding_total = round2(
        invoices
            .iter()
            .filter(|i| i.status != InvoiceStatus::Paid)
            .map(|i| i.balance_due)
            .sum(),
    );

    let expenses = state.store.list_expenses(&user.0, range).await?;
    let expense_total = round2(expenses.iter().map(|e| e.amount).sum());

    let trips = state.store.list_mileage(&user.0, range).await?;
    let mileage_deduction_total = round2(trips.iter().map(|t| t.deduction).sum::<Decimal>());

    Ok(Json(SummaryResponse {
        invoice_count: invoices.len(),
        invoiced_total,
        paid_total,
        outstanding_total,
        expense_count: expenses.len(),
        expense_total,
        trip_count: trips.len(),
        mileage_deduction_total,
    }))
}

pub async fn expenses_csv(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<ReportParams>,
) -> Result<Response, AppError> {
    let range = params.date_range()?;
    let expenses = state.store.list_expenses(&user.0, range).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["date", "category", "description", "amount"])
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
    for expense in &expenses {
        writer
            .write_record([
                expense.expense_date.to_string(),
                expense.category.clone(),
                expense.description.clone().unwrap_or_default(),
                expense.amount.to_string(),
            ])
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"expenses.csv\"".to_string(),
        ),
    ];
    Ok((headers, bytes).into_response())
}
