// regline-core/src/domain/outcome.rs

use serde::{Deserialize, Serialize};

/// Recorded result of attempting one source's load or script execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Skipped,
    Succeeded,
    Failed,
}

/// Per-source outcome. Failures are data here, not errors: they never
/// propagate past the executor boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub source_name: String,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ExecutionOutcome {
    pub fn skipped(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            status: OutcomeStatus::Skipped,
            error_detail: None,
        }
    }

    pub fn succeeded(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            status: OutcomeStatus::Succeeded,
            error_detail: None,
        }
    }

    pub fn failed(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            status: OutcomeStatus::Failed,
            error_detail: Some(detail.into()),
        }
    }
}

/// Aggregate report of a full pipeline run. The single source of truth for
/// what succeeded, was skipped, or failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: String,
    pub duration_secs: f64,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<ExecutionOutcome>,
}

impl RunReport {
    pub fn new(started_at: String, duration_secs: f64, outcomes: Vec<ExecutionOutcome>) -> Self {
        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            started_at,
            duration_secs,
            succeeded: count(OutcomeStatus::Succeeded),
            skipped: count(OutcomeStatus::Skipped),
            failed: count(OutcomeStatus::Failed),
            outcomes,
        }
    }

    /// Absence of any `Failed` outcome is the success signal.
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
    }
}
