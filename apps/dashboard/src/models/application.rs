use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a single application.
///
/// The backend owns the set of statuses. Values this dashboard does not know
/// are kept verbatim in `Other` and rendered with a neutral badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Interviewed,
    Hired,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    /// Known statuses in the order the dashboard tabs show them.
    pub const KNOWN: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ApplicationStatus::Other(_))
    }

    /// Parses a status a user may set. Unlike decoding, unknown values are refused.
    pub fn parse_known(raw: &str) -> Option<Self> {
        let status = Self::from(raw.to_string());
        status.is_known().then_some(status)
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Other(String::new())
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => ApplicationStatus::Pending,
            "shortlisted" => ApplicationStatus::Shortlisted,
            "interviewed" => ApplicationStatus::Interviewed,
            "hired" => ApplicationStatus::Hired,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single active filter tab on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Shortlisted,
    Interviewed,
    Hired,
    Rejected,
}

impl StatusFilter {
    pub const ALL_TABS: [StatusFilter; 6] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Shortlisted,
        StatusFilter::Interviewed,
        StatusFilter::Hired,
        StatusFilter::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Shortlisted => "shortlisted",
            StatusFilter::Interviewed => "interviewed",
            StatusFilter::Hired => "hired",
            StatusFilter::Rejected => "rejected",
        }
    }

    /// Whether a record with `status` is visible under this filter.
    pub fn matches(&self, status: &ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => *status == ApplicationStatus::Pending,
            StatusFilter::Shortlisted => *status == ApplicationStatus::Shortlisted,
            StatusFilter::Interviewed => *status == ApplicationStatus::Interviewed,
            StatusFilter::Hired => *status == ApplicationStatus::Hired,
            StatusFilter::Rejected => *status == ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status filter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        StatusFilter::ALL_TABS
            .into_iter()
            .find(|f| f.as_str() == tag)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// One candidate's submission against one job posting, as returned by
/// `GET /jobs/company/applications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub status: ApplicationStatus,
}

impl ApplicationRecord {
    /// Match score clamped to 0 – 100 and rounded for display.
    pub fn display_score(&self) -> u8 {
        self.match_score
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationsResponse {
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_record_with_mongo_id() {
        let json = r#"{
            "_id": "64f0c2",
            "candidate_name": "Ada Lovelace",
            "candidate_email": "ada@example.com",
            "job_title": "Backend Engineer",
            "company_name": "Acme",
            "applied_at": "2024-03-01T10:00:00Z",
            "match_score": 87.4,
            "status": "shortlisted"
        }"#;
        let record: ApplicationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "64f0c2");
        assert_eq!(record.status, ApplicationStatus::Shortlisted);
        assert_eq!(record.display_score(), 87);
        assert!(record.applied_at.is_some());
    }

    #[test]
    fn test_unknown_status_is_kept_not_rejected() {
        let record: ApplicationRecord =
            serde_json::from_str(r#"{"id": "a", "status": "on_hold"}"#).unwrap();
        assert_eq!(record.status, ApplicationStatus::Other("on_hold".into()));
        assert!(!record.status.is_known());
        assert_eq!(record.status.to_string(), "on_hold");
    }

    #[test]
    fn test_missing_status_decodes_as_other() {
        let record: ApplicationRecord = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert_eq!(record.status, ApplicationStatus::Other(String::new()));
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        let json = serde_json::to_value(ApplicationStatus::Hired).unwrap();
        assert_eq!(json, serde_json::json!("hired"));
    }

    #[test]
    fn test_parse_known_refuses_unknown() {
        assert_eq!(
            ApplicationStatus::parse_known("Interviewed"),
            Some(ApplicationStatus::Interviewed)
        );
        assert_eq!(ApplicationStatus::parse_known("archived"), None);
    }

    #[test]
    fn test_display_score_clamps() {
        let mut record: ApplicationRecord = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert_eq!(record.display_score(), 0);
        record.match_score = Some(140.0);
        assert_eq!(record.display_score(), 100);
        record.match_score = Some(-3.0);
        assert_eq!(record.display_score(), 0);
    }

    #[test]
    fn test_filter_parse_is_case_insensitive() {
        assert_eq!("Hired".parse::<StatusFilter>(), Ok(StatusFilter::Hired));
        assert_eq!(" all ".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_all_matches_unknown_status() {
        let other = ApplicationStatus::Other("on_hold".into());
        assert!(StatusFilter::All.matches(&other));
        assert!(!StatusFilter::Pending.matches(&other));
    }
}
