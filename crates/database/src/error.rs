use std::fmt;
use thiserror::Error;

/// The data-access operation that failed. Its `Display` is the fixed,
/// client-safe message for that operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOp {
    Revenue,
    LatestInvoices,
    CardData,
    FilteredInvoices,
    InvoicePages,
    InvoiceById,
    Customers,
    CustomerTable,
    CreateInvoice,
    UpdateInvoice,
    DeleteInvoice,
    User,
}

impl DataOp {
    pub fn message(&self) -> &'static str {
        match self {
            DataOp::Revenue => "Failed to fetch revenue data.",
            DataOp::LatestInvoices => "Failed to fetch the latest invoices.",
            DataOp::CardData => "Failed to fetch card data.",
            DataOp::FilteredInvoices => "Failed to fetch invoices.",
            DataOp::InvoicePages => "Failed to fetch total number of invoices.",
            DataOp::InvoiceById => "Failed to fetch invoice.",
            DataOp::Customers => "Failed to fetch all customers.",
            DataOp::CustomerTable => "Failed to fetch customer table.",
            DataOp::CreateInvoice => "Failed to create invoice.",
            DataOp::UpdateInvoice => "Failed to update invoice.",
            DataOp::DeleteInvoice => "Failed to delete invoice.",
            DataOp::User => "Failed to fetch user.",
        }
    }
}

impl fmt::Display for DataOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A query failed. The underlying cause is logged where it happens and
    /// deliberately not carried here.
    #[error("{0}")]
    Query(DataOp),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

impl DbError {
    /// Logs `source` and returns the fixed error for `op`. Used as
    /// `.map_err(DbError::query(DataOp::X))` on every repository query.
    pub fn query(op: DataOp) -> impl FnOnce(sqlx::Error) -> DbError {
        move |source| {
            tracing::error!(error = ?source, operation = ?op, "Database Error.");
            DbError::Query(op)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_show_only_the_fixed_message() {
        let err = DbError::query(DataOp::FilteredInvoices)(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "Failed to fetch invoices.");
    }

    #[test]
    fn card_data_message_is_fixed() {
        assert_eq!(DbError::Query(DataOp::CardData).to_string(), "Failed to fetch card data.");
    }
}
