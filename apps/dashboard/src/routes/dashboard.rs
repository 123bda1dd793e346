use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dashboard::updater::BulkReport;
use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, StatusFilter};
use crate::models::ranking::RankedCandidates;
use crate::state::AppState;
use crate::views::html::{render_dashboard, render_ranked};
use crate::views::DashboardView;

fn parse_status(raw: &str) -> Result<ApplicationStatus, AppError> {
    ApplicationStatus::parse_known(raw)
        .ok_or_else(|| AppError::Validation(format!("unknown application status '{raw}'")))
}

#[derive(Deserialize)]
pub struct FilterRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub id: String,
    pub included: bool,
}

#[derive(Deserialize)]
pub struct SelectAllRequest {
    pub included: bool,
}

#[derive(Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

#[derive(Deserialize, Default)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkStatusRequest {
    pub status: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct BulkStatusResponse {
    pub view: DashboardView,
    pub report: Option<BulkReport>,
}

/// GET /dashboard
pub async fn handle_dashboard_page(State(state): State<AppState>) -> Html<String> {
    Html(render_dashboard(&state.dashboard.view().await))
}

/// GET /api/v1/dashboard
pub async fn handle_get_view(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

/// POST /api/v1/dashboard/refresh
pub async fn handle_refresh(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.refresh().await)
}

/// PUT /api/v1/dashboard/filter
pub async fn handle_set_filter(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let filter = req
        .status
        .parse::<StatusFilter>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(state.dashboard.set_filter(filter).await))
}

/// POST /api/v1/dashboard/selection/toggle
pub async fn handle_toggle(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Json<DashboardView> {
    Json(state.dashboard.toggle(&req.id, req.included).await)
}

/// POST /api/v1/dashboard/selection/all
pub async fn handle_select_all(
    State(state): State<AppState>,
    Json(req): Json<SelectAllRequest>,
) -> Json<DashboardView> {
    Json(state.dashboard.select_all_visible(req.included).await)
}

/// DELETE /api/v1/dashboard/selection
pub async fn handle_clear_selection(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.clear_selection().await)
}

/// POST /api/v1/dashboard/applications/:id/status
/// Opens the confirmation prompt; nothing is sent to the backend yet.
pub async fn handle_request_status_change(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let status = parse_status(&req.status)?;
    Ok(Json(state.dashboard.request_status_change(&id, status).await))
}

/// POST /api/v1/dashboard/confirm
pub async fn handle_confirm(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Json<DashboardView> {
    Json(state.dashboard.confirm_status_change(req.note.as_deref()).await)
}

/// DELETE /api/v1/dashboard/confirm
pub async fn handle_cancel(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.cancel_status_change().await)
}

/// POST /api/v1/dashboard/bulk-status
pub async fn handle_bulk_status(
    State(state): State<AppState>,
    Json(req): Json<BulkStatusRequest>,
) -> Result<Json<BulkStatusResponse>, AppError> {
    let status = parse_status(&req.status)?;
    let (view, report) = state
        .dashboard
        .bulk_commit(status, req.note.as_deref())
        .await;
    Ok(Json(BulkStatusResponse { view, report }))
}

/// GET /api/v1/jobs/:job_id/ranked-candidates
pub async fn handle_ranked_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<RankedCandidates>, AppError> {
    let ranked = state.dashboard.api().ranked_candidates(&job_id).await?;
    Ok(Json(ranked))
}

/// GET /dashboard/jobs/:job_id/ranked
pub async fn handle_ranked_page(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let ranked = state.dashboard.api().ranked_candidates(&job_id).await?;
    Ok(Html(render_ranked(&ranked)))
}
