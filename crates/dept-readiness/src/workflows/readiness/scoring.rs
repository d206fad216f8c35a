use super::domain::InternalReadinessRow;
use super::reconcile::ReconciledDepartment;
use super::report::{ReadinessBand, ReadinessScoreDetails};
use crate::config::{CompletionRule, ScoringRules};
use crate::workflows::vendor::{format_display_date, VendorTask};
use chrono::NaiveDate;

pub const ALL_COMPLETE_LABEL: &str = "All Complete";

/// Installed over needed devices, capped at 1. Nothing needed counts as done.
pub fn device_ratio(installed: u32, needed: u32) -> f64 {
    if needed == 0 {
        return 1.0;
    }
    (f64::from(installed) / f64::from(needed)).min(1.0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneDates {
    pub next_milestone: Option<String>,
    pub est_completion: Option<String>,
}

/// Weighted readiness scoring for one reconciled department.
pub struct ScoringEngine<'r> {
    completion: &'r CompletionRule,
    weights: ScoringRules,
}

impl<'r> ScoringEngine<'r> {
    pub fn new(completion: &'r CompletionRule, weights: ScoringRules) -> Self {
        Self {
            completion,
            weights,
        }
    }

    pub fn score<'a>(
        &self,
        row: &'a InternalReadinessRow,
        reconciled: ReconciledDepartment<'a>,
    ) -> ReadinessScoreDetails<'a> {
        let device_ratio = device_ratio(row.devices_installed, row.total_devices_needed);
        let master_data_score = self.completion.score(&row.master_data_status);
        let pre_training_score = self.completion.score(&row.pre_training_status);
        let training_score = self.completion.score(&row.training_status);
        let user_readiness_score = self.user_readiness(row);
        let vendor_progress = reconciled.vendor.progress.clamp(0.0, 1.0);

        let core = (device_ratio
            + master_data_score
            + vendor_progress
            + pre_training_score
            + training_score)
            / 5.0;
        let total_score = (self.weights.core_weight * core
            + self.weights.user_readiness_weight * user_readiness_score)
            .clamp(0.0, 1.0);

        let dates = self.milestones(
            &reconciled.tasks,
            reconciled.vendor.completed,
            reconciled.vendor.total,
        );

        ReadinessScoreDetails {
            department: &row.department,
            vendor_progress,
            vendor_tasks_completed: reconciled.vendor.completed,
            vendor_tasks_total: reconciled.vendor.total,
            vendor_tasks: reconciled.tasks,
            device_ratio,
            devices_installed: row.devices_installed,
            total_devices_needed: row.total_devices_needed,
            master_data_score,
            pre_training_score,
            training_score,
            user_readiness_score,
            total_score,
            next_milestone_date: dates.next_milestone,
            est_completion_date: dates.est_completion,
            band: ReadinessBand::for_score(total_score),
            match_kind: reconciled.match_kind,
        }
    }

    /// Mean of the four admin checklist items; a missing column scores as pending.
    pub fn user_readiness(&self, row: &InternalReadinessRow) -> f64 {
        let statuses = row.admin_statuses();
        let done: f64 = statuses
            .iter()
            .map(|status| status.map_or(0.0, |status| self.completion.score(status)))
            .sum();
        done / statuses.len() as f64
    }

    /// Next milestone and estimated completion from the dated tasks.
    ///
    /// Both stay empty unless at least one task carries a parseable date.
    pub fn milestones(
        &self,
        tasks: &[&VendorTask],
        completed: usize,
        total: usize,
    ) -> MilestoneDates {
        let dated: Vec<(NaiveDate, &VendorTask)> = tasks
            .iter()
            .filter_map(|task| task.due_date().map(|date| (date, *task)))
            .collect();

        let Some(latest) = dated.iter().map(|(date, _)| *date).max() else {
            return MilestoneDates::default();
        };

        let next_pending = dated
            .iter()
            .filter(|(_, task)| !self.completion.is_done(&task.status))
            .map(|(date, _)| *date)
            .min();

        let next_milestone = match next_pending {
            Some(date) => Some(format_display_date(date)),
            None if total > 0 && completed == total => Some(ALL_COMPLETE_LABEL.to_string()),
            None => None,
        };

        MilestoneDates {
            next_milestone,
            est_completion: Some(format_display_date(latest)),
        }
    }
}
