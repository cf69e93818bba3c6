use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use hedgefund_core::agent::error::AgentError;
use hedgefund_core::agent::registry::{AnalystId, AnalystRegistry, UnknownAnalyst};
use hedgefund_core::agent::{AgentState, HedgeFundRun, Orchestrator};
use hedgefund_core::domain::portfolio::Portfolio;
use hedgefund_core::domain::request::{AnalysisRequest, HedgeFundRequest};
use hedgefund_core::time::window::resolve_window;

#[derive(Clone)]
pub struct AppState {
    pub registry: AnalystRegistry,
    pub orchestrator: Option<Arc<dyn Orchestrator>>,
}

impl AppState {
    /// State with no backends wired. Analysis routes answer 503 until a real
    /// backend is configured; health stays up.
    pub fn degraded() -> Self {
        Self {
            registry: AnalystRegistry::new(),
            orchestrator: None,
        }
    }
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/analyze/:analyst", post(analyze_analyst))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<HedgeFundRequest>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(tickers = ?request.tickers, "received analysis request");
    request.validate().map_err(ApiError::bad_request)?;

    let Some(orchestrator) = state.orchestrator.as_ref() else {
        return Err(ApiError::unavailable("analysis backend not configured"));
    };

    // The aggregate route always analyzes the trailing window.
    let (start_date, end_date) = resolve_window(None, None, Utc::now());
    let portfolio = Portfolio::seeded(&request.tickers);

    tracing::info!(
        %start_date,
        %end_date,
        selected_analysts = ?request.selected_analysts,
        model_name = %request.model_name,
        model_provider = %request.model_provider,
        "dispatching to orchestrator"
    );

    let run = HedgeFundRun {
        tickers: request.tickers,
        start_date,
        end_date,
        portfolio,
        show_reasoning: true,
        selected_analysts: request.selected_analysts,
        model_name: request.model_name,
        model_provider: request.model_provider,
    };

    let result = orchestrator.run(run).await.map_err(normalize_aggregate)?;
    tracing::info!("analysis completed successfully");
    Ok(Json(result))
}

async fn analyze_analyst(
    State(state): State<AppState>,
    Path(analyst): Path<String>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<Value>, ApiError> {
    let id: AnalystId = analyst
        .parse()
        .map_err(|e: UnknownAnalyst| ApiError::not_found(e.to_string()))?;
    request.validate().map_err(ApiError::bad_request)?;

    let Some(agent) = state.registry.get(id) else {
        return Err(ApiError::unavailable(format!(
            "analyst '{id}' has no backend configured"
        )));
    };

    let (start_date, end_date) = resolve_window(request.start_date, request.end_date, Utc::now());
    let tickers = vec![request.ticker.clone()];
    let portfolio = Portfolio::seeded(&tickers);
    let seed = AgentState::seeded(tickers, portfolio, start_date, end_date);

    tracing::info!(analyst = %id, ticker = %request.ticker, %start_date, %end_date, "dispatching to analyst");

    let finished = agent.analyze(seed).await.map_err(normalize_analyst)?;
    let verdict = finished.verdict().map_err(normalize_analyst)?.to_string();
    Ok(Json(json!({"result": verdict})))
}

/// One HTTP failure, already mapped to a status and a `detail` body. Every
/// handler error path flows through here, so each request terminates in
/// exactly one response.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: Value,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: Value::String(message.into()),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: Value::String(message.into()),
        }
    }

    fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: Value::String(message.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"detail": self.detail}))).into_response()
    }
}

/// Maps an aggregate-route backend failure to its response: validation-class
/// errors pass the message through as a 400, everything else becomes a 500
/// carrying the error string and full trace.
fn normalize_aggregate(err: AgentError) -> ApiError {
    match err {
        AgentError::Invalid(message) => {
            tracing::error!(error = %message, "validation error");
            ApiError::bad_request(message)
        }
        AgentError::Failed(inner) => {
            sentry_anyhow::capture_anyhow(&inner);
            tracing::error!(error = %inner, "error running analysis");
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: json!({
                    "message": "Error running analysis",
                    "error": format!("{inner:#}"),
                    "traceback": format!("{inner:?}"),
                }),
            }
        }
    }
}

/// Single-analyst routes keep their original flat error shape: the detail is
/// just the error string.
fn normalize_analyst(err: AgentError) -> ApiError {
    match err {
        AgentError::Invalid(message) => {
            tracing::error!(error = %message, "validation error");
            ApiError::bad_request(message)
        }
        AgentError::Failed(inner) => {
            sentry_anyhow::capture_anyhow(&inner);
            tracing::error!(error = %inner, "analyst run failed");
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: Value::String(format!("{inner:#}")),
            }
        }
    }
}
