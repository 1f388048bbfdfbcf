use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Status plus dependency availability, so the frontend can explain which
/// features are degraded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let ai_service = if state.llm.is_configured() {
        "available"
    } else {
        "unavailable (no GITHUB_TOKEN)"
    };
    let job_search = if state.jobs.is_configured() {
        "available"
    } else {
        "unavailable (no REED_API_KEY)"
    };

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "ai_service": ai_service,
            "job_search": job_search
        }
    }))
}
