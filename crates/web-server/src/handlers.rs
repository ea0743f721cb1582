use crate::views::VIEW_REVISION_HEADER;
use crate::{error::AppError, AppState};
use actions::{ActionOutcome, Credentials, InvoiceFormData, DASHBOARD_PATH, INVOICES_PATH};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use core_types::{CustomerField, Revenue};
use database::{CardData, CustomersTableRow, InvoiceForm, InvoicesTableRow, LatestInvoice};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct InvoiceSearch {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: i64,
}
fn default_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CustomerSearch {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicesPage {
    pub invoices: Vec<InvoicesTableRow>,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct EditInvoiceView {
    pub invoice: InvoiceForm,
    pub customers: Vec<CustomerField>,
}

/// Turns an action's outcome into a 303 redirect or a 422 carrying the form state.
fn outcome_response(outcome: ActionOutcome) -> Response {
    match outcome {
        ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
        ActionOutcome::Rejected(state) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
        }
    }
}

/// # GET /dashboard/revenue
pub async fn get_revenue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Revenue>>, AppError> {
    let revenue = state.db_repo.fetch_revenue().await?;
    Ok(Json(revenue))
}

/// # GET /dashboard/latest-invoices
pub async fn get_latest_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LatestInvoice>>, AppError> {
    let invoices = state.db_repo.fetch_latest_invoices().await?;
    Ok(Json(invoices))
}

/// # GET /dashboard/cards
pub async fn get_card_data(State(state): State<Arc<AppState>>) -> Result<Json<CardData>, AppError> {
    let cards = state.db_repo.fetch_card_data().await?;
    Ok(Json(cards))
}

/// # GET /dashboard/invoices?query=&page=
/// One page of the invoices table plus the page count, tagged with the
/// list's current view revision.
pub async fn get_invoices(
    State(state): State<Arc<AppState>>,
    Query(search): Query<InvoiceSearch>,
) -> Result<Response, AppError> {
    let (invoices, total_pages) = tokio::try_join!(
        state.db_repo.fetch_filtered_invoices(&search.query, search.page),
        state.db_repo.fetch_invoices_pages(&search.query),
    )?;

    let mut response = Json(InvoicesPage { invoices, total_pages }).into_response();
    response.headers_mut().insert(
        VIEW_REVISION_HEADER,
        HeaderValue::from(state.views.revision(INVOICES_PATH)),
    );
    Ok(response)
}

/// # GET /dashboard/invoices/:id/edit
pub async fn get_edit_invoice(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<EditInvoiceView>, AppError> {
    let (invoice, customers) = tokio::try_join!(
        state.db_repo.fetch_invoice_by_id(id),
        state.db_repo.fetch_customers(),
    )?;
    Ok(Json(EditInvoiceView { invoice, customers }))
}

/// # GET /dashboard/customers?query=
pub async fn get_customers_table(
    State(state): State<Arc<AppState>>,
    Query(search): Query<CustomerSearch>,
) -> Result<Json<Vec<CustomersTableRow>>, AppError> {
    let customers = state.db_repo.fetch_filtered_customers(&search.query).await?;
    Ok(Json(customers))
}

/// # GET /api/customers
pub async fn get_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerField>>, AppError> {
    let customers = state.db_repo.fetch_customers().await?;
    Ok(Json(customers))
}

/// # POST /dashboard/invoices/create
pub async fn post_create_invoice(
    State(state): State<Arc<AppState>>,
    Form(form): Form<InvoiceFormData>,
) -> Response {
    let outcome =
        actions::create_invoice(state.invoices.as_ref(), state.views.as_ref(), &form).await;
    outcome_response(outcome)
}

/// # POST /dashboard/invoices/:id/edit
pub async fn post_update_invoice(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<InvoiceFormData>,
) -> Response {
    let outcome =
        actions::update_invoice(state.invoices.as_ref(), state.views.as_ref(), id, &form).await;
    outcome_response(outcome)
}

/// # POST /dashboard/invoices/:id/delete
pub async fn post_delete_invoice(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let outcome = actions::delete_invoice(state.invoices.as_ref(), state.views.as_ref(), id).await;
    outcome_response(outcome)
}

/// # POST /login
/// Redirects to the dashboard on success; a failed sign-in is a 401 carrying
/// the message for the form.
pub async fn post_login(
    State(state): State<Arc<AppState>>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    match actions::authenticate(state.credentials.as_ref(), &credentials).await? {
        None => Ok(Redirect::to(DASHBOARD_PATH).into_response()),
        Some(message) => {
            let body = Json(json!({ "message": message }));
            Ok((StatusCode::UNAUTHORIZED, body).into_response())
        }
    }
}
