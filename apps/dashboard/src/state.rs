use std::sync::Arc;

use crate::dashboard::controller::DashboardController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one dashboard screen this process serves.
    pub dashboard: Arc<DashboardController>,
}
