//! Expense and mileage logging. Flat per-user lists; the only derived
//! value is the mileage deduction, computed once at write time.

use crate::dtos::{
    ExpensePayload, ExpenseResponse, MileagePayload, MileageResponse, ReportParams,
};
use crate::middleware::UserId;
use crate::models::{Expense, Mileage};
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use invoice_engine::round2;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub async fn list_expenses(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<ExpenseResponse>>, AppError> {
    let range = params.date_range()?;
    let expenses = state.store.list_expenses(&user.0, range).await?;
    Ok(Json(expenses.into_iter().map(ExpenseResponse::from).collect()))
}

pub async fn create_expense(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    payload.validate()?;
    let expense = Expense {
        expense_id: Uuid::new_v4(),
        user_id: user.0,
        expense_date: payload.parse_date()?,
        category: payload.category.trim().to_string(),
        description: payload.description.filter(|d| !d.trim().is_empty()),
        amount: round2(payload.amount),
        created_utc: Utc::now(),
    };
    state.store.create_expense(&expense).await?;
    tracing::info!(expense_id = %expense.expense_id, "Expense logged");

    Ok((StatusCode::CREATED, Json(expense.into())))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_expense(&user.0, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Expense not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_mileage(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<MileageResponse>>, AppError> {
    let range = params.date_range()?;
    let trips = state.store.list_mileage(&user.0, range).await?;
    Ok(Json(trips.into_iter().map(MileageResponse::from).collect()))
}

pub async fn create_mileage(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<MileagePayload>,
) -> Result<(StatusCode, Json<MileageResponse>), AppError> {
    payload.validate()?;
    let mileage = Mileage {
        mileage_id: Uuid::new_v4(),
        user_id: user.0,
        trip_date: payload.parse_date()?,
        description: payload.description.filter(|d| !d.trim().is_empty()),
        miles: payload.miles,
        rate_per_mile: payload.rate_per_mile,
        deduction: round2(payload.miles * payload.rate_per_mile),
        created_utc: Utc::now(),
    };
    state.store.create_mileage(&mileage).await?;
    tracing::info!(mileage_id = %mileage.mileage_id, "Trip logged");

    Ok((StatusCode::CREATED, Json(mileage.into())))
}

pub async fn delete_mileage(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_mileage(&user.0, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Trip not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
