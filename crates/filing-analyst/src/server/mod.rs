//! HTTP API
//!
//! - `GET /` (and `HEAD /`): status check
//! - `POST /api/generate-report`: `{ticker, filing_type}` to report
//! - `POST /api/qna`: `{ticker, question}` to `{answer}`
//! - `POST /api/index`: `{ticker, filing_type}` to `{ticker, filingType, chunks}`
//!
//! Errors are returned as `{"detail": message}`.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use crate::orchestrator::ReportOrchestrator;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.orchestrator.config().allowed_origins());

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/generate-report", post(handlers::generate_report))
        .route("/api/qna", post(handlers::answer_question))
        .route("/api/index", post(handlers::index_filing))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Serve the API until Ctrl-C
pub async fn serve(orchestrator: Arc<ReportOrchestrator>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedLlm;
    use crate::api::MockFilingProvider;
    use crate::config::AnalystConfig;
    use crate::index::tests::KeywordEmbedder;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const HTML: &str = "<html><body><p>Item 1A. Risk Factors</p><p>Competition is intense in every market.</p>\
        <p>Item 2. Properties</p><p>Revenue was strong.</p></body></html>";

    fn app(fetches: usize) -> Router {
        let mut provider = MockFilingProvider::new();
        provider
            .expect_fetch_filing_html()
            .times(fetches)
            .returning(|_, _| Ok(HTML.to_string()));

        let config = AnalystConfig::builder()
            .frontend_url("https://filings.example.com")
            .build()
            .unwrap();
        let orchestrator = ReportOrchestrator::new(
            config,
            Arc::new(provider),
            Arc::new(ScriptedLlm::analysts()),
            Arc::new(KeywordEmbedder::default()),
        )
        .unwrap();
        router(AppState::new(Arc::new(orchestrator)))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let response = app(0)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "message": "Welcome to the Agentic AI Platform for SEC Filings"})
        );

        let response = app(0)
            .oneshot(Request::head("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_report() {
        let response = app(1)
            .oneshot(post_json(
                "/api/generate-report",
                &json!({"ticker": "aapl", "filing_type": "10-K"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ticker"], "AAPL");
        assert_eq!(body["filingType"], "10-K");
        assert_eq!(body["riskFactors"][0], "Supply chain concentration.");
        assert_eq!(body["financialKPIs"]["net_income"], "N/A");
    }

    #[tokio::test]
    async fn test_unsupported_filing_type_is_400() {
        let response = app(0)
            .oneshot(post_json(
                "/api/generate-report",
                &json!({"ticker": "AAPL", "filing_type": "S-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"detail": "Filing type 'S-1' is not supported."})
        );
    }

    #[tokio::test]
    async fn test_question_without_report_is_404() {
        let response = app(0)
            .oneshot(post_json("/api/qna", &json!({"ticker": "msft", "question": "Revenue?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["detail"].as_str().unwrap().starts_with("Report for MSFT"));
    }

    #[tokio::test]
    async fn test_report_then_question() {
        let app = app(1);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/generate-report",
                &json!({"ticker": "AAPL", "filingType": "10-Q"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(post_json("/api/qna", &json!({"ticker": "AAPL", "question": "Revenue?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"answer": "Revenue was $391.0 billion."}));
    }

    #[tokio::test]
    async fn test_index_endpoint() {
        let response = app(1)
            .oneshot(post_json("/api/index", &json!({"ticker": "aapl", "filing_type": "8-K"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ticker"], "AAPL");
        assert_eq!(body["filingType"], "8-K");
        assert_eq!(body["chunks"], 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_422() {
        let response = app(0)
            .oneshot(post_json("/api/qna", &json!({"ticker": "AAPL"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origins() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/qna")
            .header(header::ORIGIN, "https://filings.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app(0).oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://filings.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/qna")
            .header(header::ORIGIN, "https://evil.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(0).oneshot(request).await.unwrap();
        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
