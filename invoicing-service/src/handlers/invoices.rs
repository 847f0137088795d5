//! Owner-scoped invoice CRUD. Every write recomputes totals through the
//! engine; stored totals are never trusted to match stale line items.

use crate::dtos::{InvoicePayload, InvoiceResponse};
use crate::middleware::UserId;
use crate::startup::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use invoice_engine::{compute_totals, Invoice, InvoiceStatus, LineItemInput, Party, Terms};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub(crate) fn invoice_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Invoice not found"))
}

/// Build the canonical record from a payload. Line-item parsing and all
/// totals go through the calculator; malformed rate/quantity inputs
/// become defaults rather than errors.
fn assemble(
    id: Uuid,
    user_id: String,
    invoice_number: String,
    share_token: Option<String>,
    date: NaiveDate,
    from: Party,
    payload: InvoicePayload,
) -> Invoice {
    let inputs: Vec<LineItemInput> = payload
        .line_items
        .into_iter()
        .map(|row| row.into_input())
        .collect();
    let computed = compute_totals(&inputs);

    Invoice {
        id,
        user_id,
        invoice_number,
        invoice_name: payload.invoice_name.filter(|n| !n.trim().is_empty()),
        date,
        terms: Terms::from_string(payload.terms.as_deref().unwrap_or("none")),
        status: InvoiceStatus::from_string(payload.status.as_deref().unwrap_or("draft")),
        share_token,
        from,
        bill_to: payload.bill_to.map(|p| p.into_party()).unwrap_or_default(),
        line_items: computed.line_items,
        subtotal: computed.subtotal,
        total: computed.total,
        balance_due: computed.balance_due,
        notes: payload.notes.filter(|n| !n.trim().is_empty()),
    }
}

pub async fn list_invoices(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let invoices = state.store.list_invoices(&user.0).await?;
    Ok(Json(invoices.into_iter().map(InvoiceResponse::from).collect()))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    user: UserId,
    Json(mut payload): Json<InvoicePayload>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    payload.validate()?;
    let date = payload.parse_date()?;

    let invoice_number = match payload.invoice_number.take() {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => state.store.next_invoice_number(&user.0).await?,
    };

    // Issuer block falls back to the saved business profile.
    let from = match payload.from.take() {
        Some(party) => party.into_party(),
        None => state
            .store
            .get_profile(&user.0)
            .await?
            .map(|p| p.default_from_party())
            .unwrap_or_default(),
    };

    let invoice = assemble(
        Uuid::new_v4(),
        user.0,
        invoice_number,
        None,
        date,
        from,
        payload,
    );
    state.store.create_invoice(&invoice).await?;
    tracing::info!(invoice_id = %invoice.id, invoice_number = %invoice.invoice_number, "Invoice created");

    Ok((StatusCode::CREATED, Json(invoice.into())))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .store
        .get_invoice(&user.0, id)
        .await?
        .ok_or_else(invoice_not_found)?;
    Ok(Json(invoice.into()))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<InvoicePayload>,
) -> Result<Json<InvoiceResponse>, AppError> {
    payload.validate()?;
    let date = payload.parse_date()?;

    let existing = state
        .store
        .get_invoice(&user.0, id)
        .await?
        .ok_or_else(invoice_not_found)?;

    let invoice_number = match payload.invoice_number.take() {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => existing.invoice_number.clone(),
    };
    let from = match payload.from.take() {
        Some(party) => party.into_party(),
        None => existing.from.clone(),
    };

    // The share token survives edits; only the share endpoints touch it.
    let invoice = assemble(
        id,
        user.0,
        invoice_number,
        existing.share_token.clone(),
        date,
        from,
        payload,
    );
    if !state.store.replace_invoice(&invoice).await? {
        return Err(invoice_not_found());
    }
    tracing::info!(invoice_id = %invoice.id, "Invoice updated");

    Ok(Json(invoice.into()))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_invoice(&user.0, id).await? {
        return Err(invoice_not_found());
    }
    tracing::info!(invoice_id = %id, "Invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}
