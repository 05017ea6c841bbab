use std::net::SocketAddr;
use std::time::Instant;

use anyhow::Result;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::error::Error;
use crate::models::{AskRequest, AskResponse, HealthResponse};

#[derive(Clone)]
struct AppState {
    chat: ChatService,
    table_store_configured: bool,
    generation_backend_configured: bool,
    started: Instant,
}

pub async fn run_server(config: AppConfig, chat: ChatService) -> Result<()> {
    let state = AppState {
        chat,
        table_store_configured: config.has_table_store(),
        generation_backend_configured: config.has_generation_backend(),
        started: Instant::now(),
    };

    let app = Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health))
        .route("/api/ask", post(ask))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
}

async fn banner() -> &'static str {
    "restaurant assistant up"
}

/// Liveness plus collaborator configuration presence; contacts nothing.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started.elapsed().as_secs(),
        table_store_configured: state.table_store_configured,
        generation_backend_configured: state.generation_backend_configured,
    })
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let answer = state.chat.answer(request).await?;
    Ok(Json(answer))
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    category: &'static str,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::TableStore { .. } => StatusCode::BAD_GATEWAY,
            Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            category: err.category(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
            "category": self.category,
        });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_maps_to_stable_statuses() {
        let cases = [
            (Error::validation("missing"), StatusCode::BAD_REQUEST),
            (
                Error::table_store("MENU", "status 500"),
                StatusCode::BAD_GATEWAY,
            ),
            (Error::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                Error::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, expected);
        }
    }

    #[test]
    fn invalid_cors_origins_are_skipped() {
        let layer = cors_layer(&["https://example.com".to_string(), "not a url\n".to_string()]);
        // Building the layer must not panic on malformed entries.
        let _ = layer;
    }
}
