//! # Dashboard Database Crate
//!
//! This crate is the data-access layer of the invoice dashboard. It owns every
//! SQL statement and hides them behind `DbRepository`.
//!
//! ## Architectural Principles
//!
//! - **Bound parameters only:** every value reaches PostgreSQL as a bound
//!   parameter; no query text is assembled from caller input.
//! - **Explicit pool lifecycle:** `connect` builds the `PgPool` once at process
//!   start, it is passed into `DbRepository`, and `close` shuts it down.
//! - **Fixed error messages:** a failed query is logged with its cause and
//!   surfaced as `DbError::Query(DataOp)`, whose message is fixed per operation.
//!
//! ## Public API
//!
//! - `connect` / `connect_lazy` / `close`: pool lifecycle.
//! - `run_migrations`: applies the embedded schema migrations.
//! - `DbRepository`: one method per dashboard read or invoice mutation.
//! - `DbError`, `DataOp`: the error types returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod query;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{close, connect, connect_lazy, run_migrations};
pub use error::{DataOp, DbError};
pub use query::ITEMS_PER_PAGE;
pub use repository::{
    CardData, CustomersTableRow, DbRepository, InvoiceForm, InvoicesTableRow, LatestInvoice,
    StatusTotals,
};
