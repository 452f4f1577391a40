//! HTTP server for the dispatch and health endpoints.
//!
//! ```text
//! 0.0.0.0:7071
//! ├── *  /api/process_data  → Dispatcher → Processor
//! └── *  /api/health        → "Healthy"
//! ```
//!
//! Both routes accept any method. The [`Dispatcher`] is shared through axum
//! state; it holds the frozen registry so handlers never take a lock.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
};
use switchyard_core::{DispatchError, Dispatcher};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::config::HttpServerConfig;
use crate::error::{TransportError, TransportResult};

/// Body returned by the health endpoint.
pub const HEALTHY: &str = "Healthy";

/// Builds the axum [`Router`] exposing `process_data` and `health`.
pub fn build_router(dispatcher: Dispatcher, config: &HttpServerConfig) -> Router {
    Router::new()
        .route(&config.route("process_data"), any(process_data))
        .route(&config.route("health"), any(health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(dispatcher)
}

/// Handler for `process_data`.
async fn process_data(State(dispatcher): State<Dispatcher>, body: Bytes) -> Response {
    let span = info_span!("request", request_id = %Uuid::new_v4(), endpoint = "process_data");

    async move {
        info!(len = body.len(), "Received a request");
        match dispatcher.dispatch(&body).await {
            Ok(output) => (StatusCode::OK, Json(output)).into_response(),
            Err(e) => error_response(&e),
        }
    }
    .instrument(span)
    .await
}

/// Handler for `health`.
async fn health() -> &'static str {
    HEALTHY
}

/// Converts a dispatch failure into a plain-text response.
fn error_response(err: &DispatchError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    debug!(status = %status, "Request rejected");
    (status, err.public_message()).into_response()
}

/// A bound HTTP server, ready to serve.
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl HttpServer {
    /// Binds the listener described by `config`.
    pub async fn bind(config: &HttpServerConfig, dispatcher: Dispatcher) -> TransportResult<Self> {
        let addr = config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        info!(
            addr = %local_addr,
            process_data = %config.route("process_data"),
            health = %config.route("health"),
            "HTTP server listening",
        );

        Ok(Self {
            listener,
            router: build_router(dispatcher, config),
            local_addr,
        })
    }

    /// Returns the address resolved by the OS (includes ephemeral port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until `shutdown` is cancelled, then drains in-flight
    /// requests.
    pub async fn serve(self, shutdown: CancellationToken) -> TransportResult<()> {
        let addr = self.local_addr;
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;
        info!(addr = %addr, "HTTP server shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, header};
    use serde_json::{Value, json};
    use switchyard_core::{Payload, ProcessError, ProcessResult, Processor, ProcessorRegistry};
    use switchyard_processors::DownstreamApp1Processor;
    use tower::ServiceExt;

    struct Failing;

    #[async_trait]
    impl Processor for Failing {
        async fn process(&self, _input: &Payload) -> ProcessResult<Payload> {
            Err(ProcessError::custom("connection string leaked"))
        }
    }

    fn router() -> Router {
        let mut registry = ProcessorRegistry::new();
        registry
            .register("downstream_app_1", DownstreamApp1Processor::new())
            .unwrap();
        registry.register("failing", Failing).unwrap();
        build_router(Dispatcher::new(registry), &HttpServerConfig::default())
    }

    async fn call(method: Method, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_process_data_success() {
        let body = json!({
            "downstream_app": "downstream_app_1",
            "source_id": "S1",
            "items": [
                { "status": "active", "user_id": "u1", "product_name": "Widget", "quantity": 3 },
                { "status": "inactive", "user_id": "u2" }
            ]
        });
        let (status, content_type, text) =
            call(Method::POST, "/api/process_data", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let position = |key: &str| text.find(key).unwrap();
        assert!(position("source_data_key") < position("processed_items"));
        assert!(position("processed_items") < position("summary"));
        assert!(position("userId") < position("processed_timestamp"));

        let output: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(output["source_data_key"], json!("S1"));
        assert_eq!(output["processed_items"].as_array().unwrap().len(), 1);
        assert_eq!(output["processed_items"][0]["userId"], json!("u1"));
        assert!(output["processed_items"][0]["processed_timestamp"].is_number());
        assert_eq!(
            output["summary"],
            json!({ "total_items_received": 2, "total_items_processed": 1 })
        );
    }

    #[tokio::test]
    async fn test_process_data_accepts_any_method() {
        let body = r#"{"downstream_app":"downstream_app_1"}"#;
        for method in [Method::GET, Method::PUT, Method::PATCH] {
            let (status, _, _) = call(method, "/api/process_data", body).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let (status, _, text) = call(Method::POST, "/api/process_data", "not-json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Error 400: Invalid JSON format in the request body.");
    }

    #[tokio::test]
    async fn test_missing_routing_key_is_bad_request() {
        let (status, content_type, text) = call(Method::POST, "/api/process_data", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert!(text.contains("downstream_app"));
    }

    #[tokio::test]
    async fn test_unknown_processor_is_not_found() {
        let (status, _, text) = call(
            Method::POST,
            "/api/process_data",
            r#"{"downstream_app":"downstream_app_9"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(text.starts_with("Error 404: No processor registered for 'downstream_app_9'."));
        assert!(text.contains("downstream_app_1"));
        assert!(text.contains("failing"));
    }

    #[tokio::test]
    async fn test_processor_failure_is_generic_500() {
        let (status, _, text) =
            call(Method::POST, "/api/process_data", r#"{"downstream_app":"failing"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text, "Error 500: An internal server error occurred.");
        assert!(!text.contains("leaked"));
    }

    #[tokio::test]
    async fn test_health_any_method_any_body() {
        for (method, body) in [
            (Method::GET, ""),
            (Method::POST, "not-json"),
            (Method::DELETE, r#"{"downstream_app":"x"}"#),
        ] {
            let (status, _, text) = call(method, "/api/health", body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(text, "Healthy");
        }
    }

    #[tokio::test]
    async fn test_body_limit() {
        let config = HttpServerConfig {
            max_body_bytes: 16,
            ..Default::default()
        };
        let router = build_router(Dispatcher::new(ProcessorRegistry::new()), &config);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/process_data")
            .body(Body::from(vec![b' '; 64]))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_serve_until_cancelled() {
        let config = HttpServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        let server = HttpServer::bind(&config, Dispatcher::new(ProcessorRegistry::new()))
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);

        let token = CancellationToken::new();
        let task = tokio::spawn(server.serve(token.clone()));
        token.cancel();
        task.await.unwrap().unwrap();
    }
}
