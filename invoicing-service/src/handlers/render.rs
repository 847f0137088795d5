//! Rendered invoice surfaces: screen HTML, PDF download, outbound email.
//!
//! Each surface builds the same document tree first; a record that fails
//! to build (blank number, no party named) is rejected with 422 on every
//! surface rather than rendered with sections missing.

use crate::dtos::EmailInvoiceRequest;
use crate::handlers::invoices::invoice_not_found;
use crate::middleware::UserId;
use crate::services::InvoiceEmail;
use crate::startup::AppState;
use askama::Template;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use invoice_engine::render::{render_pdf, render_text};
use invoice_engine::{build_document, Invoice, InvoiceDocument};
use serde_json::json;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

/// Screen and public-share invoice page.
#[derive(Template)]
#[template(path = "invoice.html")]
pub struct InvoicePage {
    pub doc: InvoiceDocument,
    /// The public share surface hides owner-only chrome.
    pub shared: bool,
}

/// HTML alternative for the invoice email body.
#[derive(Template)]
#[template(path = "invoice_email.html")]
struct InvoiceEmailBody {
    doc: InvoiceDocument,
}

pub(crate) fn document_for(
    state: &AppState,
    invoice: &Invoice,
) -> Result<InvoiceDocument, AppError> {
    build_document(invoice, &state.money)
        .map_err(|e| AppError::RenderError(anyhow::Error::new(e)))
}

/// The download filename is the invoice number plus `.pdf`, with anything
/// unsafe inside a `filename=` parameter replaced.
fn pdf_filename(invoice_number: &str) -> String {
    let safe: String = invoice_number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.pdf", safe)
}

pub async fn view_invoice(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<InvoicePage, AppError> {
    let invoice = state
        .store
        .get_invoice(&user.0, id)
        .await?
        .ok_or_else(invoice_not_found)?;
    let doc = document_for(&state, &invoice)?;
    Ok(InvoicePage { doc, shared: false })
}

pub async fn download_pdf(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let invoice = state
        .store
        .get_invoice(&user.0, id)
        .await?
        .ok_or_else(invoice_not_found)?;
    let doc = document_for(&state, &invoice)?;
    let bytes = render_pdf(&doc).map_err(|e| AppError::RenderError(anyhow::Error::new(e)))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                pdf_filename(&invoice.invoice_number)
            ),
        ),
    ];
    Ok((headers, bytes).into_response())
}

pub async fn email_invoice(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmailInvoiceRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate()?;

    let invoice = state
        .store
        .get_invoice(&user.0, id)
        .await?
        .ok_or_else(invoice_not_found)?;
    let doc = document_for(&state, &invoice)?;

    let subject = match payload.subject.filter(|s| !s.trim().is_empty()) {
        Some(subject) => subject,
        None => match doc.from.name.as_deref() {
            Some(from_name) => {
                format!("Invoice {} from {}", doc.header.invoice_number, from_name)
            }
            None => format!("Invoice {}", doc.header.invoice_number),
        },
    };

    let text_body = render_text(&doc);
    let html_body = InvoiceEmailBody { doc: doc.clone() }
        .render()
        .map_err(|e| AppError::RenderError(anyhow::Error::new(e)))?;
    let pdf_bytes = render_pdf(&doc).map_err(|e| AppError::RenderError(anyhow::Error::new(e)))?;

    state
        .mailer
        .send(InvoiceEmail {
            to: payload.to.clone(),
            subject,
            text_body,
            html_body,
            pdf_filename: pdf_filename(&invoice.invoice_number),
            pdf_bytes,
        })
        .await?;
    tracing::info!(invoice_id = %id, to = %payload.to, "Invoice emailed");

    Ok(Json(json!({ "sent": true })))
}

#[cfg(test)]
mod tests {
    use super::pdf_filename;

    #[test]
    fn filename_is_the_invoice_number_plus_extension() {
        assert_eq!(pdf_filename("INV-0042"), "INV-0042.pdf");
    }

    #[test]
    fn filename_strips_header_unsafe_characters() {
        assert_eq!(pdf_filename("a/b \"c\""), "a_b__c_.pdf");
    }
}
