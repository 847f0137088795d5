//! Public share links.
//!
//! A share token is an unguessable capability: anyone holding the URL can
//! view (only) that invoice. Lookups that miss return 404, never 403, so
//! the response does not reveal whether a token ever existed.

use crate::dtos::ShareResponse;
use crate::handlers::invoices::invoice_not_found;
use crate::handlers::render::{document_for, InvoicePage};
use crate::middleware::UserId;
use crate::startup::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use service_core::error::AppError;
use uuid::Uuid;

pub async fn create_share(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    let invoice = state
        .store
        .get_invoice(&user.0, id)
        .await?
        .ok_or_else(invoice_not_found)?;

    // Re-sharing reuses the existing token so previously sent links stay
    // valid.
    let token = match invoice.share_token {
        Some(token) => token,
        None => {
            let token = Uuid::new_v4().to_string();
            if !state
                .store
                .set_share_token(&user.0, id, Some(&token))
                .await?
            {
                return Err(invoice_not_found());
            }
            token
        }
    };
    tracing::info!(invoice_id = %id, "Share link issued");

    Ok(Json(ShareResponse {
        share_path: format!("/share/{}", token),
        share_token: token,
    }))
}

pub async fn revoke_share(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.set_share_token(&user.0, id, None).await? {
        return Err(invoice_not_found());
    }
    tracing::info!(invoice_id = %id, "Share link revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// Public, unauthenticated view. The token is the entire credential.
pub async fn view_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<InvoicePage, AppError> {
    let invoice = state
        .store
        .get_invoice_by_share_token(&token)
        .await?
        .ok_or_else(invoice_not_found)?;
    let doc = document_for(&state, &invoice)?;
    Ok(InvoicePage { doc, shared: true })
}
