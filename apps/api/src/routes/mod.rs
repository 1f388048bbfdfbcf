pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::cv::handlers::{self as cv_handlers, MAX_UPLOAD_BYTES};
use crate::fit::handlers as fit_handlers;
use crate::jobs::handlers as job_handlers;
use crate::optimizer::handlers as optimizer_handlers;
use crate::reviews::handlers as review_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let frontend_dist = state.config.frontend_dist.clone();

    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route(
            "/api/jobs/search",
            get(job_handlers::handle_search_get).post(job_handlers::handle_search_post),
        )
        .route("/api/jobs/countries", get(job_handlers::handle_countries))
        .route("/api/jobs/:id", get(job_handlers::handle_job_details))
        // CV API
        .route(
            "/api/cv/upload",
            post(cv_handlers::handle_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/api/cv/analyze", post(fit_handlers::handle_analyze))
        .route("/api/cv/generate", post(optimizer_handlers::handle_generate))
        .route(
            "/api/cv/generate/pdf",
            post(optimizer_handlers::handle_generate_pdf),
        )
        .route(
            "/api/cv/generate/cover-letter/pdf",
            post(optimizer_handlers::handle_cover_letter_pdf),
        )
        .route("/api/cv/:id", get(cv_handlers::handle_get_cv))
        // Reviews API
        .route(
            "/api/reviews",
            get(review_handlers::handle_list).post(review_handlers::handle_create),
        )
        .route("/api/reviews/:id", delete(review_handlers::handle_delete));

    // Serve the built frontend when one is present; SPA routes fall back to
    // index.html. Without a bundle the root describes the API instead.
    let router = if frontend_dist.join("index.html").is_file() {
        info!("Serving frontend bundle from {}", frontend_dist.display());
        let spa = ServeDir::new(&frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));
        router.fallback_service(spa)
    } else {
        router.route("/", get(api_root))
    };

    router.with_state(state)
}

/// Root descriptor for API-only mode.
async fn api_root() -> Json<Value> {
    Json(json!({
        "name": "jobdeck",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "mode": "api_only",
        "message": "Frontend build not found. Point FRONTEND_DIST at a built bundle to serve the UI.",
        "endpoints": {
            "jobs": "/api/jobs",
            "cv": "/api/cv",
            "reviews": "/api/reviews",
            "health": "/health"
        }
    }))
}
