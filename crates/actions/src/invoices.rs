use crate::form::{validate_invoice_form, ActionState, InvoiceFormData};
use crate::navigation::{ActionOutcome, Navigator, INVOICES_PATH};
use crate::store::InvoiceStore;
use chrono::Utc;
use core_types::{InvoiceChanges, NewInvoice};
use database::DbError;
use uuid::Uuid;

pub const CREATE_INVALID: &str = "Missing Fields. Failed to Create Invoice.";
pub const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_INVALID: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED: &str = "Database Error: Failed to Delete Invoice.";
pub const INVOICE_NOT_FOUND: &str = "Invoice not found.";

/// Validates the form and inserts a new invoice dated today (UTC).
pub async fn create_invoice(
    store: &dyn InvoiceStore,
    navigator: &dyn Navigator,
    form: &InvoiceFormData,
) -> ActionOutcome {
    let valid = match validate_invoice_form(form) {
        Ok(valid) => valid,
        Err(errors) => return ActionOutcome::Rejected(ActionState::invalid(errors, CREATE_INVALID)),
    };

    let invoice = NewInvoice {
        customer_id: valid.customer_id,
        amount: valid.amount,
        status: valid.status,
        date: Utc::now().date_naive(),
    };

    match store.create_invoice(&invoice).await {
        Ok(_) => ActionOutcome::revalidate_and_redirect(navigator, INVOICES_PATH),
        Err(e) => {
            tracing::warn!(error = %e, "Create invoice action failed.");
            ActionOutcome::Rejected(ActionState::message(CREATE_FAILED))
        }
    }
}

/// Validates the form and writes the new amount and status to invoice `id`.
pub async fn update_invoice(
    store: &dyn InvoiceStore,
    navigator: &dyn Navigator,
    id: Uuid,
    form: &InvoiceFormData,
) -> ActionOutcome {
    let valid = match validate_invoice_form(form) {
        Ok(valid) => valid,
        Err(errors) => return ActionOutcome::Rejected(ActionState::invalid(errors, UPDATE_INVALID)),
    };

    let changes = InvoiceChanges {
        amount: valid.amount,
        status: valid.status,
    };

    match store.update_invoice(id, &changes).await {
        Ok(()) => ActionOutcome::revalidate_and_redirect(navigator, INVOICES_PATH),
        Err(DbError::NotFound) => ActionOutcome::Rejected(ActionState::message(INVOICE_NOT_FOUND)),
        Err(e) => {
            tracing::warn!(error = %e, invoice_id = %id, "Update invoice action failed.");
            ActionOutcome::Rejected(ActionState::message(UPDATE_FAILED))
        }
    }
}

pub async fn delete_invoice(
    store: &dyn InvoiceStore,
    navigator: &dyn Navigator,
    id: Uuid,
) -> ActionOutcome {
    match store.delete_invoice(id).await {
        Ok(()) => ActionOutcome::revalidate_and_redirect(navigator, INVOICES_PATH),
        Err(e) => {
            tracing::warn!(error = %e, invoice_id = %id, "Delete invoice action failed.");
            ActionOutcome::Rejected(ActionState::message(DELETE_FAILED))
        }
    }
}
