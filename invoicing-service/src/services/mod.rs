mod database;
mod mailer;
mod memory;
mod store;

pub use database::PgStore;
pub use mailer::{InvoiceEmail, Mailer, RecordingMailer, SmtpMailer};
pub use memory::MemoryStore;
pub use store::{DateRange, InvoiceStore};
