use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::a11y::announcer::Announcer;
use crate::api_client::RecruitmentApi;
use crate::dashboard::filter::visible_records;
use crate::dashboard::notify::{Notification, NotificationLevel};
use crate::dashboard::selection::SelectionSet;
use crate::dashboard::updater::{self, BulkReport, StatusChange};
use crate::models::application::{ApplicationRecord, ApplicationStatus, StatusFilter};
use crate::views::DashboardView;

/// Everything the dashboard screen needs between renders.
#[derive(Debug, Default)]
pub struct ViewState {
    pub records: Vec<ApplicationRecord>,
    pub selection: SelectionSet,
    pub filter: StatusFilter,
    pub pending_change: Option<StatusChange>,
    pub notification: Option<Notification>,
    /// Update or refresh calls currently awaiting the backend.
    pub in_flight: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
    /// Last refresh generation handed out, and the newest one applied.
    pub(crate) issued_generation: u64,
    pub(crate) applied_generation: u64,
}

impl ViewState {
    fn visible_ids(&self) -> Vec<String> {
        visible_records(&self.records, self.filter)
            .into_iter()
            .map(|r| r.id.clone())
            .collect()
    }

    fn is_visible(&self, id: &str) -> bool {
        visible_records(&self.records, self.filter)
            .iter()
            .any(|r| r.id == id)
    }

    /// Drops selected ids whose rows are no longer on screen.
    fn prune_selection(&mut self) {
        let hidden: Vec<String> = self
            .selection
            .iter()
            .filter(|id| !self.is_visible(id))
            .map(str::to_string)
            .collect();
        if !hidden.is_empty() {
            debug!("Dropping {} selected ids that are no longer visible", hidden.len());
            self.selection.select_all(hidden.iter().map(String::as_str), false);
        }
    }
}

/// Owns the dashboard view state and runs every user action against it.
///
/// Each action returns a fresh `DashboardView`; nothing is patched in place.
/// The state lock is never held across a backend call, so the dashboard keeps
/// answering while an update is in flight. Work that talks to the backend
/// runs on its own task: if the caller goes away mid-request, the update,
/// the selection reset and the re-fetch still finish and `busy` still clears.
#[derive(Clone)]
pub struct DashboardController {
    api: Arc<dyn RecruitmentApi>,
    state: Arc<Mutex<ViewState>>,
    announcer: Announcer,
}

impl DashboardController {
    pub fn new(api: Arc<dyn RecruitmentApi>, announcer: Announcer) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ViewState::default())),
            announcer,
        }
    }

    pub fn api(&self) -> &Arc<dyn RecruitmentApi> {
        &self.api
    }

    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.lock().await;
        DashboardView::render(&state, &self.announcer)
    }

    /// Re-fetches every application. On failure the previous records stay.
    pub async fn refresh(&self) -> DashboardView {
        let this = self.clone();
        match self.detached(async move { this.fetch_and_apply().await }).await {
            Some(view) => view,
            None => self.view().await,
        }
    }

    /// Switches the active tab. The selection is dropped so a bulk action
    /// can never reach rows the user can no longer see.
    pub async fn set_filter(&self, filter: StatusFilter) -> DashboardView {
        let mut state = self.state.lock().await;
        state.notification = None;
        state.filter = filter;
        state.selection.clear();
        DashboardView::render(&state, &self.announcer)
    }

    /// Adds or removes one row. Only a visible row can be added; an id that
    /// is unknown or filtered out leaves the selection as it was.
    pub async fn toggle(&self, id: &str, included: bool) -> DashboardView {
        let mut state = self.state.lock().await;
        state.notification = None;
        if !included || state.is_visible(id) {
            state.selection.toggle(id, included);
        } else {
            debug!("Ignoring selection of {id}: not a visible row");
        }
        DashboardView::render(&state, &self.announcer)
    }

    /// Backs the header checkbox: applies to the visible rows only.
    pub async fn select_all_visible(&self, included: bool) -> DashboardView {
        let mut state = self.state.lock().await;
        state.notification = None;
        let visible = state.visible_ids();
        state
            .selection
            .select_all(visible.iter().map(String::as_str), included);
        DashboardView::render(&state, &self.announcer)
    }

    pub async fn clear_selection(&self) -> DashboardView {
        let mut state = self.state.lock().await;
        state.notification = None;
        state.selection.clear();
        DashboardView::render(&state, &self.announcer)
    }

    /// Opens the confirmation prompt for a single status change.
    pub async fn request_status_change(&self, id: &str, status: ApplicationStatus) -> DashboardView {
        let mut state = self.state.lock().await;
        if state.records.iter().any(|r| r.id == id) {
            state.notification = None;
            state.pending_change = Some(StatusChange {
                id: id.to_string(),
                status,
            });
        } else {
            state.notification = Some(Notification::error(format!("Application {id} not found")));
        }
        DashboardView::render(&state, &self.announcer)
    }

    pub async fn cancel_status_change(&self) -> DashboardView {
        let mut state = self.state.lock().await;
        state.notification = None;
        state.pending_change = None;
        DashboardView::render(&state, &self.announcer)
    }

    /// Commits the change awaiting confirmation, if there is one.
    pub async fn confirm_status_change(&self, note: Option<&str>) -> DashboardView {
        let pending = self.state.lock().await.pending_change.take();
        match pending {
            Some(change) => self.commit_status_change(change, note).await,
            None => {
                let mut state = self.state.lock().await;
                state.notification =
                    Some(Notification::warning("No status change is awaiting confirmation"));
                DashboardView::render(&state, &self.announcer)
            }
        }
    }

    /// One update call; on success the whole list is re-fetched, on failure
    /// the current records are left exactly as they were.
    pub async fn commit_status_change(&self, change: StatusChange, note: Option<&str>) -> DashboardView {
        let this = self.clone();
        let note = note.map(str::to_string);
        let work = async move { this.run_status_change(change, note.as_deref()).await };
        match self.detached(work).await {
            Some(view) => view,
            None => self.view().await,
        }
    }

    /// Updates every selected application to `status`.
    ///
    /// With nothing selected this only raises a warning. Otherwise the
    /// selection is cleared and the list re-fetched once every request has
    /// settled, whatever the individual outcomes.
    pub async fn bulk_commit(
        &self,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> (DashboardView, Option<BulkReport>) {
        let this = self.clone();
        let note = note.map(str::to_string);
        let work = async move { this.run_bulk(status, note.as_deref()).await };
        match self.detached(work).await {
            Some(outcome) => outcome,
            None => (self.view().await, None),
        }
    }

    async fn fetch_and_apply(&self) -> DashboardView {
        let generation = {
            let mut state = self.state.lock().await;
            state.in_flight += 1;
            state.issued_generation += 1;
            state.issued_generation
        };
        let fetched = self.api.fetch_applications().await;

        let mut state = self.state.lock().await;
        state.in_flight -= 1;
        if generation < state.applied_generation {
            debug!("Discarding refresh {generation}: refresh {} already applied", state.applied_generation);
            return DashboardView::render(&state, &self.announcer);
        }
        match fetched {
            Ok(records) => {
                info!("Dashboard refreshed with {} applications", records.len());
                state.records = records;
                state.prune_selection();
                state.last_refreshed = Some(Utc::now());
                state.applied_generation = generation;
            }
            Err(e) => {
                warn!("Dashboard refresh failed: {e}");
                let notification =
                    Notification::error(format!("Could not load applications: {}", e.user_message()));
                self.announce(&notification);
                state.notification = Some(notification);
            }
        }
        DashboardView::render(&state, &self.announcer)
    }

    async fn run_status_change(&self, change: StatusChange, note: Option<&str>) -> DashboardView {
        self.state.lock().await.in_flight += 1;
        let result = updater::commit_status_change(self.api.as_ref(), &change, note).await;

        let notification = match &result {
            Ok(()) => Notification::success(format!("Status updated to {}", change.status)),
            Err(e) => Notification::error(e.user_message()),
        };
        self.announce(&notification);
        {
            let mut state = self.state.lock().await;
            state.in_flight -= 1;
            state.notification = Some(notification);
        }

        if result.is_ok() {
            self.refresh_keeping_notification().await
        } else {
            self.view().await
        }
    }

    async fn run_bulk(
        &self,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> (DashboardView, Option<BulkReport>) {
        let ids = {
            let mut state = self.state.lock().await;
            state.in_flight += 1;
            state.prune_selection();
            state.selection.to_vec()
        };

        let report = match updater::bulk_update(self.api.as_ref(), &ids, &status, note).await {
            Ok(report) => report,
            Err(e) => {
                let notification = Notification::warning(e.to_string());
                self.announce(&notification);
                let mut state = self.state.lock().await;
                state.in_flight -= 1;
                state.notification = Some(notification);
                return (DashboardView::render(&state, &self.announcer), None);
            }
        };

        let notification = report.notification();
        self.announce(&notification);
        {
            let mut state = self.state.lock().await;
            state.in_flight -= 1;
            state.selection.clear();
            state.notification = Some(notification);
        }

        (self.refresh_keeping_notification().await, Some(report))
    }

    /// Refresh after an update. A failed re-fetch may replace a success
    /// message, never a warning or error about the update itself.
    async fn refresh_keeping_notification(&self) -> DashboardView {
        let outcome = self.state.lock().await.notification.clone();
        self.fetch_and_apply().await;

        let mut state = self.state.lock().await;
        if let Some(outcome) = outcome.filter(|n| n.level != NotificationLevel::Success) {
            state.notification = Some(outcome);
        }
        DashboardView::render(&state, &self.announcer)
    }

    /// Runs backend work on its own task and waits for it. A panic in the
    /// task is re-raised here; `None` means the runtime cancelled it.
    async fn detached<T, F>(&self, work: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::spawn(work).await {
            Ok(out) => Some(out),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!("Dashboard task did not finish: {e}");
                None
            }
        }
    }

    fn announce(&self, notification: &Notification) {
        self.announcer
            .spawn_announce(notification.message.clone(), notification.politeness());
    }
}
