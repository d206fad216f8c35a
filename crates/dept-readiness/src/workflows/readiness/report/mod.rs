mod summary;
pub mod views;

pub use views::{DashboardSummary, ReadinessBand, ReadinessScoreDetails};

use serde::Serialize;

/// Scored departments, best first, with the dashboard headline figures.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport<'a> {
    pub records: Vec<ReadinessScoreDetails<'a>>,
    pub summary: DashboardSummary,
}

impl<'a> ReadinessReport<'a> {
    /// Sorts descending by total score, keeping row order for ties.
    pub fn new(
        mut records: Vec<ReadinessScoreDetails<'a>>,
        ready_threshold: f64,
        overall_vendor_progress: f64,
    ) -> Self {
        records.sort_by(|left, right| right.total_score.total_cmp(&left.total_score));
        let summary =
            DashboardSummary::from_records(&records, ready_threshold, overall_vendor_progress);
        Self { records, summary }
    }

    pub fn record(&self, department: &str) -> Option<&ReadinessScoreDetails<'a>> {
        self.records
            .iter()
            .find(|record| record.department == department)
    }

    /// Drops the matched task lists, leaving counts and scores.
    pub fn without_tasks(mut self) -> Self {
        for record in &mut self.records {
            record.vendor_tasks.clear();
        }
        self
    }
}
