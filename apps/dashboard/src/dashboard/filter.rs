use serde::{Deserialize, Serialize};

use crate::models::application::{ApplicationRecord, ApplicationStatus, StatusFilter};

/// Per-status totals for the filter tabs.
///
/// Always computed from the unfiltered record list so the tabs show stable
/// totals whichever one is active. Records with a status this dashboard
/// does not know land in `other`, which keeps the buckets a partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub shortlisted: usize,
    pub interviewed: usize,
    pub hired: usize,
    pub rejected: usize,
    pub other: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        let mut counts = StatusCounts {
            all: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::Shortlisted => counts.shortlisted += 1,
                ApplicationStatus::Interviewed => counts.interviewed += 1,
                ApplicationStatus::Hired => counts.hired += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
                ApplicationStatus::Other(_) => counts.other += 1,
            }
        }
        counts
    }

    /// Count shown on the tab for `filter`.
    pub fn for_filter(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Pending => self.pending,
            StatusFilter::Shortlisted => self.shortlisted,
            StatusFilter::Interviewed => self.interviewed,
            StatusFilter::Hired => self.hired,
            StatusFilter::Rejected => self.rejected,
        }
    }
}

/// Records visible under `filter`, in their original relative order.
pub fn visible_records(all: &[ApplicationRecord], filter: StatusFilter) -> Vec<&ApplicationRecord> {
    all.iter().filter(|r| filter.matches(&r.status)).collect()
}
