use axum::{routing::get, Router};
use configuration::Settings;
use database::DbClient;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing;

pub mod error;
pub mod handlers;
pub mod params;
pub mod responses;

/// The shared application state that all handlers can access.
///
/// Only the pool wrapper lives here; no per-request data is ever shared
/// across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
}

/// Builds the application router with every read-only endpoint attached.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id", get(handlers::get_user))
        .route("/users/:user_id/transactions", get(handlers::user_transactions))
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions/summary", get(handlers::transaction_summary))
        .route("/transactions/user/:user_id/stats", get(handlers::user_stats))
        .route("/transactions/daily", get(handlers::daily_summary))
        .route("/transactions/pending", get(handlers::pending_transactions))
        .route("/transactions/unpaid", get(handlers::unpaid_transactions))
        .route("/reports/top-users", get(handlers::top_users))
        .route(
            "/reports/suspicious-transactions",
            get(handlers::suspicious_transactions),
        )
        .with_state(state)
}

/// The main function to configure and run the web server.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let db = DbClient::new(&settings.database);
    let app_state = Arc::new(AppState { db });

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let app = router(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http());

    let host: IpAddr = settings.server.host.parse()?;
    let addr = SocketAddr::new(host, settings.server.port);
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use configuration::DatabaseSettings;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Builds an app over a lazy pool; no query-free request touches the network.
    fn test_app() -> Router {
        let db = DbClient::new(&DatabaseSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "nobody".to_string(),
            password: "unused".to_string(),
            database_name: "none".to_string(),
        });
        router(Arc::new(AppState { db }))
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn out_of_range_user_limit_is_rejected_before_any_query() {
        // Validation runs before the connection checkout, so this returns
        // 400 even though the configured database does not exist.
        assert_eq!(get_status(test_app(), "/users?limit=0").await, StatusCode::BAD_REQUEST);
        assert_eq!(get_status(test_app(), "/users?limit=101").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_skip_is_malformed() {
        assert_eq!(get_status(test_app(), "/users?skip=-1").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_days_window_is_rejected() {
        assert_eq!(
            get_status(test_app(), "/transactions/daily?days=366").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn out_of_range_transaction_limit_is_rejected() {
        assert_eq!(
            get_status(test_app(), "/transactions?limit=501").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(test_app(), "/reports/top-users?limit=101").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn non_boolean_filter_is_malformed() {
        assert_eq!(
            get_status(test_app(), "/transactions?pending=maybe").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn validation_rejection_body_names_the_parameter() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/reports/top-users?limit=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let message = value["error"].as_str().unwrap();
        assert!(message.contains("limit"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        assert_eq!(
            get_status(test_app(), "/transactions/export").await,
            StatusCode::NOT_FOUND
        );
    }
}
