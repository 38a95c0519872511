//! HTTP API server
//!
//! Routes are organized into modules:
//! - routes::accounts: account CRUD and bulk delete
//! - routes::categories: category CRUD and bulk delete
//! - routes::transactions: transaction CRUD, bulk operations, CSV import
//! - routes::summary: aggregated dashboard snapshot
//!
//! Every 2xx body is `{ "data": ... }`, every failure `{ "error": ... }`.

pub mod auth;
pub mod error;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use finboard_config::Config;
use finboard_store::Store;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
}

/// Success envelope for handler responses
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::{accounts, categories, summary, transactions};

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/api/accounts/:id",
            get(accounts::get)
                .patch(accounts::update)
                .delete(accounts::delete),
        )
        .route("/api/accounts/bulk-delete", post(accounts::bulk_delete))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:id",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route("/api/categories/bulk-delete", post(categories::bulk_delete))
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/api/transactions/:id",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/api/transactions/bulk-create",
            post(transactions::bulk_create),
        )
        .route(
            "/api/transactions/bulk-delete",
            post(transactions::bulk_delete),
        )
        .route("/api/transactions/import", post(transactions::import))
        .route("/api/summary", get(summary::get))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until the process ends.
pub async fn start_server(config: Config, store: Store) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { store, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use finboard_config::SessionToken;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const TOKEN_A: &str = "token-a";
    const TOKEN_B: &str = "token-b";

    async fn test_router() -> Router {
        let store = Store::in_memory().await.unwrap();
        let mut config = Config::default();
        config.server.auth.tokens = vec![
            SessionToken {
                token: TOKEN_A.to_string(),
                user: "user-a".to_string(),
            },
            SessionToken {
                token: TOKEN_B.to_string(),
                user: "user-b".to_string(),
            },
        ];
        create_router(AppState { store, config })
    }

    async fn request(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let router = test_router().await;
        let (status, _) = request(&router, Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_or_unknown_token_rejected() {
        let router = test_router().await;

        let (status, body) = request(&router, Method::GET, "/api/accounts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) =
            request(&router, Method::GET, "/api/accounts", Some("wrong"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_account_round_trip_and_isolation() {
        let router = test_router().await;

        let (status, created) = request(
            &router,
            Method::POST,
            "/api/accounts",
            Some(TOKEN_A),
            Some(json!({"name": "Checking"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["data"]["id"].as_i64().unwrap();

        // The new account appears exactly once for its owner
        let (_, listed) =
            request(&router, Method::GET, "/api/accounts", Some(TOKEN_A), None).await;
        let accounts = listed["data"].as_array().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0]["name"], "Checking");

        // Another user sees nothing, and the id reads as absent
        let (_, foreign) =
            request(&router, Method::GET, "/api/accounts", Some(TOKEN_B), None).await;
        assert!(foreign["data"].as_array().unwrap().is_empty());

        let (status, _) = request(
            &router,
            Method::GET,
            &format!("/api/accounts/{}", id),
            Some(TOKEN_B),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let router = test_router().await;
        let (status, body) = request(
            &router,
            Method::POST,
            "/api/categories",
            Some(TOKEN_A),
            Some(json!({"name": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("name"));
    }

    async fn seed_summary_data(router: &Router) -> i64 {
        let (_, account) = request(
            router,
            Method::POST,
            "/api/accounts",
            Some(TOKEN_A),
            Some(json!({"name": "Checking"})),
        )
        .await;
        let account_id = account["data"]["id"].as_i64().unwrap();

        let (_, category) = request(
            router,
            Method::POST,
            "/api/categories",
            Some(TOKEN_A),
            Some(json!({"name": "Food"})),
        )
        .await;
        let category_id = category["data"]["id"].as_i64().unwrap();

        let (status, _) = request(
            router,
            Method::POST,
            "/api/transactions/bulk-create",
            Some(TOKEN_A),
            Some(json!({"transactions": [
                {"amount": 50000, "date": "2024-01-02", "payee": "Employer", "account_id": account_id},
                {"amount": -12000, "date": "2024-01-02", "payee": "Grocer", "account_id": account_id, "category_id": category_id},
                {"amount": -3000, "date": "2024-01-05", "payee": "Cafe", "account_id": account_id},
                {"amount": 10000, "date": "2024-01-09", "payee": "Refund", "account_id": account_id},
                {"amount": -40000, "date": "2023-12-25", "payee": "Rent", "account_id": account_id}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        account_id
    }

    #[tokio::test]
    async fn test_summary_snapshot() {
        let router = test_router().await;
        seed_summary_data(&router).await;

        let (status, body) = request(
            &router,
            Method::GET,
            "/api/summary?from=2024-01-01&to=2024-01-10",
            Some(TOKEN_A),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let data = &body["data"];
        assert_eq!(data["income"], 60000);
        assert_eq!(data["expenses"], 15000);
        assert_eq!(data["remaining"], 45000);

        // Previous window (2023-12-22..31) held one 40000 expense
        assert_eq!(data["income_change"], 100.0);
        assert_eq!(data["expenses_change"], -62.5);
        assert_eq!(data["remaining_change"], -212.5);

        // Gap-free day series across the full window
        let days = data["days"].as_array().unwrap();
        assert_eq!(days.len(), 10);
        assert_eq!(days[0]["date"], "2024-01-01");
        assert_eq!(days[0]["income"], 0);
        assert_eq!(days[1]["income"], 50000);
        assert_eq!(days[1]["expenses"], 12000);
        assert_eq!(days[9]["date"], "2024-01-10");

        // Categoryless spend lands under the sentinel label
        let categories = data["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["name"], "Food");
        assert_eq!(categories[0]["value"], 12000);
        assert_eq!(categories[1]["name"], "Uncategorized");
        assert_eq!(categories[1]["value"], 3000);
    }

    #[tokio::test]
    async fn test_summary_requires_auth() {
        let router = test_router().await;
        let (status, _) = request(&router, Method::GET, "/api/summary", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_date_rejected() {
        let router = test_router().await;
        let (status, body) = request(
            &router,
            Method::GET,
            "/api/summary?from=yesterday",
            Some(TOKEN_A),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("from"));
    }

    #[tokio::test]
    async fn test_patch_null_clears_nullable_fields() {
        let router = test_router().await;
        let (_, account) = request(
            &router,
            Method::POST,
            "/api/accounts",
            Some(TOKEN_A),
            Some(json!({"name": "Checking"})),
        )
        .await;
        let account_id = account["data"]["id"].as_i64().unwrap();

        let (_, category) = request(
            &router,
            Method::POST,
            "/api/categories",
            Some(TOKEN_A),
            Some(json!({"name": "Food"})),
        )
        .await;
        let category_id = category["data"]["id"].as_i64().unwrap();

        let (_, created) = request(
            &router,
            Method::POST,
            "/api/transactions",
            Some(TOKEN_A),
            Some(json!({
                "amount": -900,
                "date": "2024-01-01",
                "payee": "Grocer",
                "notes": "weekly",
                "account_id": account_id,
                "category_id": category_id
            })),
        )
        .await;
        let id = created["data"]["id"].as_i64().unwrap();

        // A patch without the nullable fields leaves them untouched
        let (status, patched) = request(
            &router,
            Method::PATCH,
            &format!("/api/transactions/{}", id),
            Some(TOKEN_A),
            Some(json!({"amount": -1000})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["data"]["notes"], "weekly");
        assert_eq!(patched["data"]["category_id"], category_id);

        // Explicit nulls clear the note and detach the category
        let (status, cleared) = request(
            &router,
            Method::PATCH,
            &format!("/api/transactions/{}", id),
            Some(TOKEN_A),
            Some(json!({"notes": null, "category_id": null})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cleared["data"]["notes"], Value::Null);
        assert_eq!(cleared["data"]["category_id"], Value::Null);
        assert_eq!(cleared["data"]["payee"], "Grocer");
    }

    #[tokio::test]
    async fn test_csv_import() {
        let router = test_router().await;
        let (_, account) = request(
            &router,
            Method::POST,
            "/api/accounts",
            Some(TOKEN_A),
            Some(json!({"name": "Checking"})),
        )
        .await;
        let account_id = account["data"]["id"].as_i64().unwrap();

        let (status, body) = request(
            &router,
            Method::POST,
            "/api/transactions/import",
            Some(TOKEN_A),
            Some(json!({
                "account_id": account_id,
                "csv": "Date,Amount,Payee\n2024-01-01,25.50,Coffee Shop\n",
                "mapping": {"0": "date", "1": "amount", "2": "payee"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let created = body["data"].as_array().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0]["amount"], 25500);
        assert_eq!(created[0]["date"], "2024-01-01");
        assert_eq!(created[0]["payee"], "Coffee Shop");
    }

    #[tokio::test]
    async fn test_csv_import_is_atomic() {
        let router = test_router().await;
        let (_, account) = request(
            &router,
            Method::POST,
            "/api/accounts",
            Some(TOKEN_A),
            Some(json!({"name": "Checking"})),
        )
        .await;
        let account_id = account["data"]["id"].as_i64().unwrap();

        let (status, body) = request(
            &router,
            Method::POST,
            "/api/transactions/import",
            Some(TOKEN_A),
            Some(json!({
                "account_id": account_id,
                "csv": "Date,Amount,Payee\n2024-01-01,10.00,Ok Shop\n2024-01-02,oops,Bad Shop\n",
                "mapping": {"0": "date", "1": "amount", "2": "payee"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Row 2"));

        // The parsable first row must not have landed either
        let (_, listed) = request(
            &router,
            Method::GET,
            "/api/transactions?from=2024-01-01&to=2024-01-31",
            Some(TOKEN_A),
            None,
        )
        .await;
        assert!(listed["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_incomplete_mapping_rejected() {
        let router = test_router().await;
        let (_, account) = request(
            &router,
            Method::POST,
            "/api/accounts",
            Some(TOKEN_A),
            Some(json!({"name": "Checking"})),
        )
        .await;
        let account_id = account["data"]["id"].as_i64().unwrap();

        let (status, body) = request(
            &router,
            Method::POST,
            "/api/transactions/import",
            Some(TOKEN_A),
            Some(json!({
                "account_id": account_id,
                "csv": "Date,Amount,Payee\n2024-01-01,25.50,Coffee Shop\n",
                "mapping": {"0": "date", "1": "amount"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("payee"));
    }

    #[tokio::test]
    async fn test_transaction_window_filter() {
        let router = test_router().await;
        let account_id = seed_summary_data(&router).await;

        let (_, january) = request(
            &router,
            Method::GET,
            &format!(
                "/api/transactions?from=2024-01-01&to=2024-01-31&accountId={}",
                account_id
            ),
            Some(TOKEN_A),
            None,
        )
        .await;
        assert_eq!(january["data"].as_array().unwrap().len(), 4);

        let (_, december) = request(
            &router,
            Method::GET,
            "/api/transactions?from=2023-12-01&to=2023-12-31",
            Some(TOKEN_A),
            None,
        )
        .await;
        assert_eq!(december["data"].as_array().unwrap().len(), 1);
    }
}
