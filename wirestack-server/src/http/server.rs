//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::future::Future;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wirestack_db::Database;

use super::error::ServerError;
use super::routes;
use crate::routers::app_router;
use crate::state::AppState;

/// Path prefix of the procedure endpoint
pub const RPC_ENDPOINT: &str = "/trpc";

/// Browser origins allowed when CORS is not permissive
const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:4000",
    "http://127.0.0.1:4000",
];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:4000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            cors_permissive: false,
        }
    }
}

/// Build the application with all routes and middleware
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(LOCAL_ORIGINS.map(HeaderValue::from_static))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .nest(RPC_ENDPOINT, routes::rpc::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `state` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(state, config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the HTTP server with the application router.
///
/// # Example
///
/// ```ignore
/// let db = Database::connect(&DbConfig::from_env()?)?;
/// run_server(db, ServerConfig::default()).await?;
/// ```
pub async fn run_server(db: Database, config: ServerConfig) -> Result<(), ServerError> {
    let router = app_router()?;
    tracing::info!(procedures = ?router.names(), "procedure router built");
    let state = AppState::new(db, router);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        "Server listening on http://{}{}",
        listener.local_addr()?,
        RPC_ENDPOINT
    );

    serve(listener, state, &config, shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouterBuilder;
    use crate::test_support::{lazy_db, lazy_state};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wirestack_core::ProcedureKind;

    fn app() -> Router {
        build_app(lazy_state(), &ServerConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 4000);
        assert!(!config.cors_permissive);
    }

    #[tokio::test]
    async fn hello_world_single_call() {
        let (status, body) = send(app(), get("/trpc/hello.world")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"result": {"data": "Hello World from the user router!"}})
        );
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }

    #[tokio::test]
    async fn unknown_procedure_is_404_envelope() {
        let (status, body) = send(app(), get("/trpc/hello.nobody")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["data"]["code"], json!("NOT_FOUND"));
        assert_eq!(body["error"]["data"]["path"], json!("hello.nobody"));
    }

    #[tokio::test]
    async fn query_over_post_is_405() {
        let (status, body) = send(app(), post("/trpc/hello.world", Value::Null)).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"]["code"], json!(-32005));
    }

    #[tokio::test]
    async fn malformed_input_is_parse_error() {
        let (status, body) = send(app(), get("/trpc/hello.world?input=%7Bnope")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["data"]["code"], json!("PARSE_ERROR"));
    }

    fn test_app() -> Router {
        let router = RouterBuilder::new()
            .procedure("test.echo", ProcedureKind::Query, |_ctx, input| async move {
                Ok::<_, crate::ProcedureError>(input)
            })
            .procedure("test.store", ProcedureKind::Mutation, |_ctx, input| async move {
                Ok::<_, crate::ProcedureError>(json!({"stored": input}))
            })
            .merge(crate::routers::hello::router())
            .build()
            .unwrap();
        build_app(AppState::new(lazy_db(), router), &ServerConfig::default())
    }

    #[tokio::test]
    async fn batched_queries_answer_in_order() {
        // input={"1":{"n":2}}
        let uri = "/trpc/hello.world,test.echo?batch=1&input=%7B%221%22%3A%7B%22n%22%3A2%7D%7D";
        let (status, body) = send(test_app(), get(uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"result": {"data": "Hello World from the user router!"}},
                {"result": {"data": {"n": 2}}}
            ])
        );
    }

    #[tokio::test]
    async fn batch_with_one_failure_is_multi_status() {
        let (status, body) = send(test_app(), get("/trpc/hello.world,test.gone?batch=1")).await;

        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(body[0]["result"]["data"], json!("Hello World from the user router!"));
        assert_eq!(body[1]["error"]["data"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn batched_mutations_take_body_input() {
        let (status, body) = send(
            test_app(),
            post("/trpc/test.store,test.store?batch=1", json!({"0": "a", "1": "b"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["result"]["data"], json!({"stored": "a"}));
        assert_eq!(body[1]["result"]["data"], json!({"stored": "b"}));
    }

    #[tokio::test]
    async fn batch_input_must_be_object() {
        let (status, body) = send(
            test_app(),
            post("/trpc/test.store?batch=1", json!(["a"])),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["data"]["code"], json!("BAD_REQUEST"));
    }
}
