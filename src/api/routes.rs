use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
    response::{Html, IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::time::Instant;
use tracing::{info, warn};

use crate::AppState;
use crate::analysis::{analyze, AnalysisResult};
use crate::api::models::AnalyzeRequest;
use crate::api::response;
use crate::error::{AppError, Result};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn analyze_handler(
    State(state): State<AppState>,
    body: Option<Json<AnalyzeRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let (url, keyword) = match req.into_required() {
        Ok(fields) => fields,
        Err(err) => {
            warn!("rejected analysis request: {}", err);
            return err.into_response();
        }
    };

    info!(url = %url, keyword = %keyword, "processing analysis request");
    let start_time = Instant::now();

    let result = run_analysis(&state, &url, &keyword).await;

    let elapsed = start_time.elapsed();
    match &result {
        Ok(report) => info!(
            url = %url,
            ?elapsed,
            keyword_count = report.keyword_count,
            "analysis complete"
        ),
        Err(err) => warn!(url = %url, ?elapsed, error = %err, "analysis failed"),
    }

    response::outcome(result)
}

async fn run_analysis(state: &AppState, url: &str, keyword: &str) -> Result<AnalysisResult> {
    let limit = state.config.analyze_timeout;
    // Set an overall timeout for the entire analysis
    tokio::time::timeout(limit, analyze(&state.client, url, keyword))
        .await
        .unwrap_or_else(|_| {
            Err(AppError::FetchError(format!(
                "analysis timed out after {}s",
                limit.as_secs()
            )))
        })
}
