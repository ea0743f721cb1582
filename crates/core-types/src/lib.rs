pub mod enums;
pub mod error;
pub mod money;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::InvoiceStatus;
pub use error::CoreError;
pub use money::Money;
pub use structs::{Customer, CustomerField, Invoice, InvoiceChanges, NewInvoice, Revenue, User};
