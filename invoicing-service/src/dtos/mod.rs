pub mod expenses;
pub mod invoices;
pub mod profile;
pub mod reports;

pub use expenses::{ExpensePayload, ExpenseResponse, MileagePayload, MileageResponse};
pub use invoices::{
    EmailInvoiceRequest, InvoicePayload, InvoiceResponse, LineItemPayload, PartyPayload,
    ShareResponse,
};
pub use profile::{ProfilePayload, ProfileResponse};
pub use reports::{ReportParams, SummaryResponse};
