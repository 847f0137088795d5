//! Storage-facing models for invoicing-service.

mod expense;
mod invoice;
mod profile;

pub use expense::{Expense, Mileage};
pub use invoice::{InvoiceRow, LineItemRow};
pub use profile::BusinessProfile;
