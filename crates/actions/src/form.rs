use core_types::{InvoiceStatus, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CUSTOMER_ERROR: &str = "Please select a customer.";
pub const AMOUNT_ERROR: &str = "Please enter an amount greater than $0.";
pub const STATUS_ERROR: &str = "Please select an invoice status.";

/// The invoice form as submitted. Every field is optional text so that a
/// missing or malformed field becomes a field error rather than a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormData {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Validation messages keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customer_id: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amount: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_empty() && self.amount.is_empty() && self.status.is_empty()
    }
}

/// What a rejected action hands back to the form: field errors and/or a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionState {
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    pub message: Option<String>,
}

impl ActionState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: Some(message.into()),
        }
    }

    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors,
            message: Some(message.into()),
        }
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    pub customer_id: String,
    pub amount: Money,
    pub status: InvoiceStatus,
}

/// Checks the invoice form. All three fields are checked so every problem is
/// reported at once.
pub fn validate_invoice_form(form: &InvoiceFormData) -> Result<ValidatedInvoice, FieldErrors> {
    let mut errors = FieldErrors::default();

    let customer_id = non_empty(&form.customer_id).map(str::to_string);
    if customer_id.is_none() {
        errors.customer_id.push(CUSTOMER_ERROR.to_string());
    }

    let amount = non_empty(&form.amount)
        .and_then(|raw| Decimal::from_str(raw).ok())
        .and_then(|dollars| Money::from_dollars(dollars).ok())
        .filter(|money| money.is_positive());
    if amount.is_none() {
        errors.amount.push(AMOUNT_ERROR.to_string());
    }

    let status = non_empty(&form.status).and_then(|raw| raw.parse::<InvoiceStatus>().ok());
    if status.is_none() {
        errors.status.push(STATUS_ERROR.to_string());
    }

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => Ok(ValidatedInvoice {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
