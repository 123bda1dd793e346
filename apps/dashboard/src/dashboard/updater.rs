use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::api_client::{ApiError, RecruitmentApi};
use crate::dashboard::notify::Notification;
use crate::models::application::ApplicationStatus;

/// A status change awaiting confirmation in the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: String,
    pub status: ApplicationStatus,
}

/// Blank notes are not sent.
pub fn normalize_note(note: Option<&str>) -> Option<&str> {
    note.map(str::trim).filter(|n| !n.is_empty())
}

/// Issues exactly one status update for one application.
pub async fn commit_status_change(
    api: &dyn RecruitmentApi,
    change: &StatusChange,
    note: Option<&str>,
) -> Result<(), ApiError> {
    let note = normalize_note(note);
    match api.update_status(&change.id, &change.status, note).await {
        Ok(()) => {
            info!("Application {} moved to {}", change.id, change.status);
            Ok(())
        }
        Err(e) => {
            warn!("Status update for {} failed: {e}", change.id);
            Err(e)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BulkUpdateError {
    #[error("Select at least one application first")]
    EmptySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: String,
    pub message: String,
}

/// Per-application outcome of a bulk update, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    pub status: ApplicationStatus,
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn notification(&self) -> Notification {
        let total = self.total();
        match (self.succeeded.len(), self.failed.first()) {
            (n, None) => Notification::success(format!(
                "Updated {n} application{} to {}",
                plural(n),
                self.status
            )),
            (0, Some(first)) => Notification::error(format!(
                "No applications were updated: {}",
                first.message
            )),
            (n, Some(first)) => Notification::warning(format!(
                "Updated {n} of {total} applications to {}; {} failed ({})",
                self.status,
                self.failed.len(),
                first.message
            )),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Sends one update per id, all at once, and waits for every one of them to
/// settle. A failure never cuts the others short.
pub async fn bulk_update(
    api: &dyn RecruitmentApi,
    ids: &[String],
    status: &ApplicationStatus,
    note: Option<&str>,
) -> Result<BulkReport, BulkUpdateError> {
    if ids.is_empty() {
        return Err(BulkUpdateError::EmptySelection);
    }

    let note = normalize_note(note);
    info!("Bulk update of {} applications to {status}", ids.len());

    let outcomes = join_all(ids.iter().map(|id| async move {
        let result = api.update_status(id, status, note).await;
        (id, result)
    }))
    .await;

    let mut report = BulkReport {
        status: status.clone(),
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for (id, result) in outcomes {
        match result {
            Ok(()) => report.succeeded.push(id.clone()),
            Err(e) => {
                warn!("Bulk update of {id} failed: {e}");
                report.failed.push(BulkFailure {
                    id: id.clone(),
                    message: e.user_message(),
                });
            }
        }
    }

    info!(
        "Bulk update settled: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    Ok(report)
}
