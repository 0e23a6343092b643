//! Edge proxy for the Wikipedia summary endpoint.
//!
//! Browsers cannot call the upstream API directly from the deployed site, so
//! this stateless service relays summary lookups and answers with permissive
//! CORS headers. Every failure is turned into a JSON error body.
//!
//! - `GET /api/health` (alias `/api/_health`): `{"ok":true}`
//! - `GET /api/wiki-summary?title=...`: upstream status and JSON body
//! - `GET /api/_debug`: request echo for deployment checks
//! - `OPTIONS *`: 204 preflight

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE, USER_AGENT,
        },
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info};

use crate::app::error::body_preview;
use crate::app::Result;
use crate::config::EdgeConfig;
use crate::fetcher::Fetcher;
use crate::gateway::encode_title;

const ALLOW_METHODS: &str = "GET,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type,Authorization";
const PREFLIGHT_MAX_AGE: &str = "86400";

pub struct EdgeState {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    upstream: String,
}

impl EdgeState {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, upstream: &str) -> Self {
        Self {
            fetcher,
            upstream: upstream.trim_end_matches('/').to_string(),
        }
    }

    fn summary_url(&self, title: &str) -> String {
        format!(
            "{}/page/summary/{}?redirect=true",
            self.upstream,
            encode_title(title)
        )
    }
}

type SharedState = Arc<EdgeState>;

pub async fn serve(config: &EdgeConfig, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<()> {
    let state = Arc::new(EdgeState::new(fetcher, &config.upstream));
    let router = build_router(state);

    info!(addr = %config.listen, upstream = %config.upstream, "Binding edge proxy listener");
    let listener = TcpListener::bind(config.listen).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Edge proxy exited");
    Ok(())
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/_health", get(health))
        .route("/api/wiki-summary", get(wiki_summary))
        .route("/api/_debug", get(debug))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(middleware::from_fn(log_request))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [(ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE)],
        )
            .into_response();
    }
    next.run(request).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let headers = request.headers();
    let ip = headers
        .get("cf-connecting-ip")
        .or_else(|| headers.get("x-forwarded-for"))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string());
    let ua = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    info!(
        path = %request.uri().path(),
        method = %request.method(),
        ip = ip.as_deref().unwrap_or("-"),
        ua = ua.as_deref().unwrap_or("-"),
        "Request"
    );
    next.run(request).await
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "Unknown panic".to_string());
    error!("Edge handler panicked: {}", detail);
    ApiError::internal(detail).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

async fn debug(uri: Uri, headers: HeaderMap) -> Json<Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Json(json!({
        "ok": true,
        "now": chrono::Utc::now().to_rfc3339(),
        "url": uri.to_string(),
        "headers": headers,
    }))
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    title: Option<String>,
}

async fn wiki_summary(
    State(state): State<SharedState>,
    Query(params): Query<SummaryParams>,
) -> Response {
    let Some(title) = params.title.filter(|t| !t.trim().is_empty()) else {
        return ApiError::bad_request("Missing title parameter").into_response();
    };

    let upstream = match state.fetcher.get(&state.summary_url(&title)).await {
        Ok(upstream) => upstream,
        Err(e) => {
            error!("[wiki-summary] Error for title=\"{}\": {}", title, e);
            return ApiError::internal(e.to_string()).into_response();
        }
    };

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);

    if !upstream.is_success() {
        return (
            status,
            Json(json!({
                "error": format!("Wikipedia API returned {}", upstream.status),
                "body": body_preview(&upstream.body),
            })),
        )
            .into_response();
    }

    match serde_json::from_str::<IgnoredAny>(&upstream.body) {
        Ok(_) => (status, upstream.body).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "Failed to parse Wikipedia response as JSON",
                "detail": e.to_string(),
                "body": body_preview(&upstream.body),
            })),
        )
            .into_response(),
    }
}
