use async_trait::async_trait;
use core_types::{InvoiceChanges, NewInvoice, User};
use database::{DbError, DbRepository};
use uuid::Uuid;

/// The invoice writes the actions depend on.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Uuid, DbError>;

    async fn update_invoice(&self, id: Uuid, changes: &InvoiceChanges) -> Result<(), DbError>;

    async fn delete_invoice(&self, id: Uuid) -> Result<(), DbError>;
}

/// Credential lookup by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, email: &str) -> Result<Option<User>, DbError>;
}

#[async_trait]
impl InvoiceStore for DbRepository {
    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Uuid, DbError> {
        DbRepository::create_invoice(self, invoice).await
    }

    async fn update_invoice(&self, id: Uuid, changes: &InvoiceChanges) -> Result<(), DbError> {
        DbRepository::update_invoice(self, id, changes).await
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<(), DbError> {
        DbRepository::delete_invoice(self, id).await
    }
}

#[async_trait]
impl UserStore for DbRepository {
    async fn get_user(&self, email: &str) -> Result<Option<User>, DbError> {
        DbRepository::get_user(self, email).await
    }
}
