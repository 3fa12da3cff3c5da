//! Data models for Haletix

pub mod exchange;
pub mod person;
pub mod sale;
pub mod show;
pub mod waitlist;

// Re-export commonly used types
pub use exchange::{ExportDocument, ImportReport};
pub use person::Person;
pub use sale::{PaymentMethod, Sale, SaleStatus, Seat};
pub use show::Show;
pub use waitlist::{WaitlistEntry, WaitlistStatus};
