pub mod expenses;
pub mod health;
pub mod invoices;
pub mod profile;
pub mod render;
pub mod reports;
pub mod share;

pub use health::health_check;
