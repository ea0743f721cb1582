use crate::enums::InvoiceStatus;
use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the `invoices` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: Money,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// A row of the `customers` table. Customers are read-only here.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// The id and name of a customer, for pickers.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CustomerField {
    pub id: Uuid,
    pub name: String,
}

/// A row of the `users` table, used only for credential lookup.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// The bcrypt hash. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Monthly revenue, as seeded into the `revenue` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: i32,
}

/// The validated input for a new invoice. `customer_id` is the submitted
/// identifier as text; the database decides whether it names a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: Money,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// The mutable fields of an existing invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub amount: Money,
    pub status: InvoiceStatus,
}
