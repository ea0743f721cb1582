use actions::{CredentialsProvider, InvoiceStore, PasswordCredentials};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use database::DbRepository;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod views;

pub use views::ViewCache;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub invoices: Arc<dyn InvoiceStore>,
    pub credentials: Arc<dyn CredentialsProvider>,
    pub views: Arc<ViewCache>,
}

impl AppState {
    /// State where writes and sign-in go straight to the database behind `db_repo`.
    pub fn new(db_repo: DbRepository) -> Self {
        Self {
            invoices: Arc::new(db_repo.clone()),
            credentials: Arc::new(PasswordCredentials::new(db_repo.clone())),
            views: Arc::new(ViewCache::new()),
            db_repo,
        }
    }
}

/// Builds the dashboard router with its middleware.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/customers", get(handlers::get_customers))
        .route("/dashboard/revenue", get(handlers::get_revenue))
        .route("/dashboard/latest-invoices", get(handlers::get_latest_invoices))
        .route("/dashboard/cards", get(handlers::get_card_data))
        .route("/dashboard/invoices", get(handlers::get_invoices))
        .route("/dashboard/invoices/create", post(handlers::post_create_invoice))
        .route(
            "/dashboard/invoices/:id/edit",
            get(handlers::get_edit_invoice).post(handlers::post_update_invoice),
        )
        .route("/dashboard/invoices/:id/delete", post(handlers::post_delete_invoice))
        .route("/dashboard/customers", get(handlers::get_customers_table))
        .route("/login", post(handlers::post_login))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Serves the dashboard on `addr` until `shutdown` resolves.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actions::{AuthError, Credentials, SignInError};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use core_types::{InvoiceChanges, NewInvoice, User};
    use database::DbError;
    use std::sync::Mutex;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingStore {
        created: Mutex<Vec<NewInvoice>>,
    }

    #[async_trait]
    impl InvoiceStore for RecordingStore {
        async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Uuid, DbError> {
            self.created.lock().unwrap().push(invoice.clone());
            Ok(Uuid::new_v4())
        }

        async fn update_invoice(
            &self,
            _id: Uuid,
            _changes: &InvoiceChanges,
        ) -> Result<(), DbError> {
            Err(DbError::NotFound)
        }

        async fn delete_invoice(&self, _id: Uuid) -> Result<(), DbError> {
            Ok(())
        }
    }

    struct OnlyPassword(&'static str);

    #[async_trait]
    impl CredentialsProvider for OnlyPassword {
        async fn sign_in(&self, credentials: &Credentials) -> Result<User, SignInError> {
            if credentials.password != self.0 {
                return Err(AuthError::CredentialsSignin.into());
            }
            Ok(User {
                id: Uuid::new_v4(),
                name: "User".to_string(),
                email: credentials.email.clone(),
                password: String::new(),
            })
        }
    }

    /// State over a pool that never connects. Only routes that stay off the
    /// database are exercised here.
    fn test_state(store: Arc<RecordingStore>) -> Arc<AppState> {
        let settings = configuration::load_settings_with(|_| None).unwrap();
        let db_repo = DbRepository::new(database::connect_lazy(&settings.database));
        Arc::new(AppState {
            db_repo,
            invoices: store,
            credentials: Arc::new(OnlyPassword("123456")),
            views: Arc::new(ViewCache::new()),
        })
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = create_app(test_state(Arc::default()));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn valid_create_redirects_and_marks_invoices_stale() {
        let store = Arc::new(RecordingStore::default());
        let state = test_state(store.clone());
        let app = create_app(state.clone());

        let customer_id = Uuid::new_v4();
        let body = format!("customerId={customer_id}&amount=42.50&status=pending");
        let response = app
            .oneshot(form_post("/dashboard/invoices/create", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard/invoices");
        assert_eq!(state.views.revision("/dashboard/invoices"), 1);

        let created = store.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].customer_id, customer_id.to_string());
        assert_eq!(created[0].amount.cents(), 4250);
    }

    #[tokio::test]
    async fn invalid_create_returns_field_errors() {
        let store = Arc::new(RecordingStore::default());
        let state = test_state(store.clone());
        let app = create_app(state.clone());

        let response = app
            .oneshot(form_post("/dashboard/invoices/create", "amount=0&status=pending"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Missing Fields. Failed to Create Invoice.");
        assert_eq!(body["errors"]["customerId"][0], "Please select a customer.");
        assert_eq!(body["errors"]["amount"][0], "Please enter an amount greater than $0.");
        assert!(body["errors"].get("status").is_none());

        assert!(store.created.lock().unwrap().is_empty());
        assert_eq!(state.views.revision("/dashboard/invoices"), 0);
    }

    #[tokio::test]
    async fn update_of_missing_invoice_is_rejected() {
        let app = create_app(test_state(Arc::default()));
        let uri = format!("/dashboard/invoices/{}/edit", Uuid::new_v4());
        let body = format!("customerId={}&amount=10&status=paid", Uuid::new_v4());

        let response = app.oneshot(form_post(&uri, &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["message"], "Invoice not found.");
    }

    #[tokio::test]
    async fn delete_redirects_to_invoices() {
        let state = test_state(Arc::default());
        let app = create_app(state.clone());
        let uri = format!("/dashboard/invoices/{}/delete", Uuid::new_v4());

        let response = app.oneshot(form_post(&uri, "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.views.revision("/dashboard/invoices"), 1);
    }

    #[tokio::test]
    async fn malformed_invoice_id_is_a_bad_request() {
        let app = create_app(test_state(Arc::default()));
        let response = app
            .oneshot(form_post("/dashboard/invoices/not-a-uuid/delete", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_outcomes() {
        let app = create_app(test_state(Arc::default()));

        let response = app
            .clone()
            .oneshot(form_post("/login", "email=user%40nextmail.com&password=123456"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");

        let response = app
            .oneshot(form_post("/login", "email=user%40nextmail.com&password=wrong1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["message"], "Invalid credentials.");
    }
}
