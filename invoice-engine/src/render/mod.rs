//! Output renderers that consume an [`InvoiceDocument`](crate::InvoiceDocument).
//!
//! HTML rendering lives with the HTTP service (askama templates); the
//! plaintext and PDF renderers live here because they are pure functions
//! over the document tree.

mod pdf;
mod text;

pub use pdf::{plan_pages, render_pdf, PagePlan, RenderError};
pub use text::render_text;
