pub mod dashboard;
pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Rendered pages
        .route("/dashboard", get(dashboard::handle_dashboard_page))
        .route(
            "/dashboard/jobs/:job_id/ranked",
            get(dashboard::handle_ranked_page),
        )
        // Dashboard actions
        .route("/api/v1/dashboard", get(dashboard::handle_get_view))
        .route("/api/v1/dashboard/refresh", post(dashboard::handle_refresh))
        .route("/api/v1/dashboard/filter", put(dashboard::handle_set_filter))
        .route(
            "/api/v1/dashboard/selection",
            delete(dashboard::handle_clear_selection),
        )
        .route(
            "/api/v1/dashboard/selection/toggle",
            post(dashboard::handle_toggle),
        )
        .route(
            "/api/v1/dashboard/selection/all",
            post(dashboard::handle_select_all),
        )
        .route(
            "/api/v1/dashboard/applications/:id/status",
            post(dashboard::handle_request_status_change),
        )
        .route(
            "/api/v1/dashboard/confirm",
            post(dashboard::handle_confirm).delete(dashboard::handle_cancel),
        )
        .route(
            "/api/v1/dashboard/bulk-status",
            post(dashboard::handle_bulk_status),
        )
        // Read-only ranking view
        .route(
            "/api/v1/jobs/:job_id/ranked-candidates",
            get(dashboard::handle_ranked_candidates),
        )
        .with_state(state)
}
