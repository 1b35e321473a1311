//! HTTP front end
//!
//! Endpoints:
//! - GET  /health - Health check
//! - GET  /qa     - Answer `core` (query string), `lang` defaults to `en`
//! - POST /qa     - Same, form-encoded
//!
//! `/qa` always answers 200 with SPARQL JSON; an unanswerable question gets
//! the empty answer.

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    response::Json,
    routing::get,
    Router,
};
use geoqa_types::SparqlResults;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QaParams {
    #[serde(default)]
    pub core: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn qa_get(
    State(orchestrator): State<Arc<Orchestrator>>,
    Query(params): Query<QaParams>,
) -> Json<SparqlResults> {
    answer(&orchestrator, params).await
}

async fn qa_post(
    State(orchestrator): State<Arc<Orchestrator>>,
    Form(params): Form<QaParams>,
) -> Json<SparqlResults> {
    answer(&orchestrator, params).await
}

async fn answer(orchestrator: &Orchestrator, params: QaParams) -> Json<SparqlResults> {
    if params.core.trim().is_empty() {
        return Json(SparqlResults::empty_answer());
    }
    Json(orchestrator.answer_question(&params.core, &params.lang).await)
}

// ============================================================================
// Router
// ============================================================================

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/qa", get(qa_get).post(qa_post))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(orchestrator)
}
