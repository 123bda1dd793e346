//! In-memory recruitment backend for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api_client::{ApiError, RecruitmentApi};
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::models::ranking::{RankedCandidate, RankedCandidates};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCall {
    pub id: String,
    pub status: ApplicationStatus,
    pub note: Option<String>,
}

#[derive(Default)]
pub struct FakeApi {
    pub records: Mutex<Vec<ApplicationRecord>>,
    /// id -> server error message (`None` for an unparseable body)
    pub failures: Mutex<HashMap<String, Option<String>>>,
    pub delays: Mutex<HashMap<String, Duration>>,
    pub calls: Mutex<Vec<UpdateCall>>,
    pub completed: Mutex<Vec<String>>,
    pub fetches: AtomicUsize,
    pub fail_fetch: AtomicBool,
    /// Consumed one per fetch, in call order.
    pub fetch_delays: Mutex<VecDeque<Duration>>,
}

pub fn record(id: &str, status: &str) -> ApplicationRecord {
    ApplicationRecord {
        id: id.to_string(),
        candidate_name: format!("Candidate {}", id.to_uppercase()),
        candidate_email: format!("{id}@example.com"),
        job_title: "Backend Engineer".into(),
        company_name: "Acme".into(),
        applied_at: None,
        match_score: Some(60.0),
        status: ApplicationStatus::from(status.to_string()),
    }
}

impl FakeApi {
    pub fn with_records(records: Vec<ApplicationRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn fail(&self, id: &str, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(id.to_string(), message.map(str::to_string));
    }

    pub fn delay(&self, id: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(id.to_string(), delay);
    }

    pub fn delay_fetch(&self, delay: Duration) {
        self.fetch_delays.lock().unwrap().push_back(delay);
    }

    pub fn calls(&self) -> Vec<UpdateCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecruitmentApi for FakeApi {
    async fn fetch_applications(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 503,
                message: Some("Service unavailable".into()),
            });
        }
        // The response reflects the records as they were when the call began.
        let records = self.records.lock().unwrap().clone();
        let delay = self.fetch_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(records)
    }

    async fn update_status(
        &self,
        id: &str,
        status: &ApplicationStatus,
        note: Option<&str>,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(UpdateCall {
            id: id.to_string(),
            status: status.clone(),
            note: note.map(str::to_string),
        });

        let delay = self.delays.lock().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(id.to_string());

        let failure = self.failures.lock().unwrap().get(id).cloned();
        if let Some(message) = failure {
            return Err(ApiError::Api {
                status: 400,
                message,
            });
        }

        if let Some(r) = self.records.lock().unwrap().iter_mut().find(|r| r.id == id) {
            r.status = status.clone();
        }
        Ok(())
    }

    async fn ranked_candidates(&self, job_id: &str) -> Result<RankedCandidates, ApiError> {
        let mut ranked = RankedCandidates {
            job_id: Some(job_id.to_string()),
            job_title: Some("Backend Engineer".into()),
            total_candidates: None,
            experienced_count: None,
            fresher_count: None,
            candidates: self
                .records
                .lock()
                .unwrap()
                .iter()
                .map(|r| RankedCandidate {
                    id: r.id.clone(),
                    candidate_name: r.candidate_name.clone(),
                    candidate_email: r.candidate_email.clone(),
                    match_score: r.match_score.unwrap_or_default(),
                    score_breakdown: Default::default(),
                    status: Some(r.status.to_string()),
                    rank: None,
                    percentile: None,
                    is_fresher: None,
                })
                .collect(),
        };
        ranked.sort_ranked();
        Ok(ranked)
    }
}
