pub mod html;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::a11y::announcer::{Announcer, Politeness};
use crate::dashboard::controller::ViewState;
use crate::dashboard::filter::{visible_records, StatusCounts};
use crate::dashboard::notify::Notification;
use crate::dashboard::updater::StatusChange;
use crate::models::application::{ApplicationRecord, ApplicationStatus, StatusFilter};

/// One table row as the dashboard shows it.
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_title: String,
    pub company_name: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub match_score: u8,
    pub status: ApplicationStatus,
    /// CSS badge class; unknown statuses get the neutral one.
    pub badge: &'static str,
    pub selected: bool,
}

impl RowView {
    fn from_record(record: &ApplicationRecord, selected: bool) -> Self {
        Self {
            id: record.id.clone(),
            candidate_name: record.candidate_name.clone(),
            candidate_email: record.candidate_email.clone(),
            job_title: record.job_title.clone(),
            company_name: record.company_name.clone(),
            applied_at: record.applied_at,
            match_score: record.display_score(),
            status: record.status.clone(),
            badge: badge_class(&record.status),
            selected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Announcements {
    pub polite: String,
    pub assertive: String,
}

/// A complete render of the dashboard. Built from scratch on every action.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub filter: StatusFilter,
    pub counts: StatusCounts,
    pub rows: Vec<RowView>,
    pub selected_count: usize,
    /// State of the header checkbox for the visible rows.
    pub all_visible_selected: bool,
    pub pending_change: Option<StatusChange>,
    pub notification: Option<Notification>,
    /// An update or refresh is awaiting the backend; action controls are disabled.
    pub busy: bool,
    pub announcements: Announcements,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl DashboardView {
    pub fn render(state: &ViewState, announcer: &Announcer) -> Self {
        let visible = visible_records(&state.records, state.filter);
        let rows: Vec<RowView> = visible
            .iter()
            .map(|r| RowView::from_record(r, state.selection.has(&r.id)))
            .collect();

        Self {
            filter: state.filter,
            counts: StatusCounts::from_records(&state.records),
            all_visible_selected: state
                .selection
                .all_selected(visible.iter().map(|r| r.id.as_str())),
            rows,
            selected_count: state.selection.size(),
            pending_change: state.pending_change.clone(),
            notification: state.notification.clone(),
            busy: state.in_flight > 0,
            announcements: Announcements {
                polite: announcer.region(Politeness::Polite).text(),
                assertive: announcer.region(Politeness::Assertive).text(),
            },
            last_refreshed: state.last_refreshed,
        }
    }

    pub fn row(&self, id: &str) -> Option<&RowView> {
        self.rows.iter().find(|r| r.id == id)
    }
}

pub fn badge_class(status: &ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "badge-pending",
        ApplicationStatus::Shortlisted => "badge-shortlisted",
        ApplicationStatus::Interviewed => "badge-interviewed",
        ApplicationStatus::Hired => "badge-hired",
        ApplicationStatus::Rejected => "badge-rejected",
        ApplicationStatus::Other(_) => "badge-neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    fn state() -> ViewState {
        ViewState {
            records: vec![
                record("a", "pending"),
                record("b", "on_hold"),
                record("c", "pending"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_status_gets_neutral_badge() {
        let view = DashboardView::render(&state(), &Announcer::default());
        assert_eq!(view.row("a").unwrap().badge, "badge-pending");
        assert_eq!(view.row("b").unwrap().badge, "badge-neutral");
        assert_eq!(view.counts.other, 1);
    }

    #[test]
    fn test_header_checkbox_tracks_visible_rows() {
        let mut state = state();
        state.filter = StatusFilter::Pending;
        state.selection.select_all(["a", "c"], true);
        let view = DashboardView::render(&state, &Announcer::default());
        assert!(view.all_visible_selected);

        state.filter = StatusFilter::Hired;
        let view = DashboardView::render(&state, &Announcer::default());
        assert!(view.rows.is_empty());
        assert!(!view.all_visible_selected);
    }

    #[test]
    fn test_busy_reflects_in_flight() {
        let mut state = state();
        assert!(!DashboardView::render(&state, &Announcer::default()).busy);
        state.in_flight = 2;
        assert!(DashboardView::render(&state, &Announcer::default()).busy);
    }
}
