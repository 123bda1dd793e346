use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of `GET /company/jobs/{jobId}/ranked-candidates`.
///
/// The backend also echoes the database `_id` next to `application_id`;
/// only the latter identifies the application, so `_id` is ignored. The
/// score breakdown is owned by the external scoring service, so its
/// dimensions are kept as an open map rather than fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(alias = "application_id")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub candidate_name: String,
    #[serde(default, alias = "email")]
    pub candidate_email: String,
    #[serde(default, alias = "ml_score", alias = "score", alias = "overall_score")]
    pub match_score: f64,
    #[serde(default)]
    pub score_breakdown: BTreeMap<String, f64>,
    #[serde(default, alias = "application_status")]
    pub status: Option<String>,
    /// 1-based position assigned by the backend.
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub percentile: Option<f64>,
    #[serde(default)]
    pub is_fresher: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedCandidates {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub total_candidates: Option<usize>,
    #[serde(default)]
    pub experienced_count: Option<usize>,
    #[serde(default)]
    pub fresher_count: Option<usize>,
    #[serde(default, alias = "ranked_candidates")]
    pub candidates: Vec<RankedCandidate>,
}

impl RankedCandidates {
    /// Orders candidates for display. The backend's `rank` wins when every
    /// candidate carries one (freshers are ranked separately there, so score
    /// order would differ); otherwise highest match score first. Ties keep
    /// server order.
    pub fn sort_ranked(&mut self) {
        if !self.candidates.is_empty() && self.candidates.iter().all(|c| c.rank.is_some()) {
            self.candidates.sort_by_key(|c| c.rank);
        } else {
            self.candidates
                .sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        }
    }
}
