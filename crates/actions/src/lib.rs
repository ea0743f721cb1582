//! # Dashboard Actions
//!
//! The mutation entry points of the dashboard. Each invoice action validates
//! the submitted form, performs one write through an `InvoiceStore`, and on
//! success asks the hosting layer's `Navigator` to revalidate the invoice list
//! before redirecting to it. Validation problems come back as data
//! (`ActionState`), never as errors.
//!
//! `authenticate` wraps a `CredentialsProvider` and maps its failures to the two
//! messages the sign-in form shows.

pub mod auth;
pub mod error;
pub mod form;
pub mod invoices;
pub mod navigation;
pub mod store;

pub use auth::{
    authenticate, AuthError, Credentials, CredentialsProvider, PasswordCredentials, SignInError,
};
pub use error::ActionError;
pub use form::{validate_invoice_form, ActionState, FieldErrors, InvoiceFormData, ValidatedInvoice};
pub use invoices::{create_invoice, delete_invoice, update_invoice};
pub use navigation::{ActionOutcome, Navigator, DASHBOARD_PATH, INVOICES_PATH};
pub use store::{InvoiceStore, UserStore};
