use super::super::reconcile::MatchKind;
use crate::workflows::vendor::VendorTask;
use serde::Serialize;

/// Display band for a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    Critical,
    Low,
    Midway,
    Good,
    Complete,
}

impl ReadinessBand {
    /// Scores are clamped to [0, 1]; each band includes its upper bound.
    pub fn for_score(score: f64) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        if score <= 0.30 {
            Self::Critical
        } else if score <= 0.40 {
            Self::Low
        } else if score <= 0.60 {
            Self::Midway
        } else if score <= 0.80 {
            Self::Good
        } else {
            Self::Complete
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Low => "Low",
            Self::Midway => "Midway",
            Self::Good => "Good",
            Self::Complete => "Complete",
        }
    }
}

/// Scored readiness record for one internal readiness row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessScoreDetails<'a> {
    pub department: &'a str,
    pub vendor_progress: f64,
    pub vendor_tasks_completed: usize,
    pub vendor_tasks_total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vendor_tasks: Vec<&'a VendorTask>,
    pub device_ratio: f64,
    pub devices_installed: u32,
    pub total_devices_needed: u32,
    pub master_data_score: f64,
    pub pre_training_score: f64,
    pub training_score: f64,
    pub user_readiness_score: f64,
    pub total_score: f64,
    pub next_milestone_date: Option<String>,
    pub est_completion_date: Option<String>,
    pub band: ReadinessBand,
    pub match_kind: MatchKind,
}

impl ReadinessScoreDetails<'_> {
    /// Matched tasks that are past due.
    pub fn overdue_tasks(&self) -> usize {
        self.vendor_tasks
            .iter()
            .filter(|task| task.is_overdue)
            .count()
    }
}

/// Dashboard headline figures across all scored departments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub departments: usize,
    pub average_score: f64,
    pub ready_departments: usize,
    pub overdue_tasks: usize,
    pub overall_vendor_progress: f64,
}
