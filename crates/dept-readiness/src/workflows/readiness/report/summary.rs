use super::views::{DashboardSummary, ReadinessScoreDetails};

impl DashboardSummary {
    /// `ready_threshold` is inclusive.
    pub fn from_records(
        records: &[ReadinessScoreDetails<'_>],
        ready_threshold: f64,
        overall_vendor_progress: f64,
    ) -> Self {
        let departments = records.len();
        let average_score = if departments == 0 {
            0.0
        } else {
            records.iter().map(|record| record.total_score).sum::<f64>() / departments as f64
        };

        Self {
            departments,
            average_score,
            ready_departments: records
                .iter()
                .filter(|record| record.total_score >= ready_threshold)
                .count(),
            overdue_tasks: records
                .iter()
                .map(ReadinessScoreDetails::overdue_tasks)
                .sum(),
            overall_vendor_progress,
        }
    }
}
