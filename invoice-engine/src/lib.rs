//! invoice-engine: the computation and rendering core for invoices.
//!
//! This crate is pure: no I/O, no async, no database types. It takes a
//! canonical [`Invoice`] record, derives its financial totals, builds a
//! renderer-agnostic [`InvoiceDocument`] tree, and feeds that tree to the
//! output renderers (HTML templates live with the HTTP service; plaintext
//! and PDF renderers live here). Every consuming surface renders from the
//! same tree, so totals and label resolution cannot drift between outputs.

mod document;
mod invoice;
mod money;
mod totals;

pub mod render;

pub use document::{
    build_document, DocumentError, HeaderBlock, InvoiceDocument, LabeledField, LineRow,
    PartyBlock, Section, TotalsBlock,
};
pub use invoice::{Invoice, InvoiceStatus, Party, Terms};
pub use money::{parse_quantity, parse_rate, round2, MoneyFormat};
pub use totals::{compute_totals, ComputedTotals, LineItem, LineItemInput};
