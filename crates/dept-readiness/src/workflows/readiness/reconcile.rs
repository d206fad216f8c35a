use super::domain::{InternalReadinessRow, VendorProgress};
use crate::config::ReconciliationRules;
use crate::workflows::vendor::{DepartmentStats, VendorSheet, VendorTask};
use serde::Serialize;

/// How a readiness row was paired with a vendor department bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Contains,
    Abbreviation,
    AlwaysReady,
    Unmatched,
}

impl MatchKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "Exact",
            Self::Contains => "Contains",
            Self::Abbreviation => "Abbreviation",
            Self::AlwaysReady => "Always Ready",
            Self::Unmatched => "Unmatched",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledDepartment<'a> {
    pub vendor: VendorProgress,
    pub tasks: Vec<&'a VendorTask>,
    pub match_kind: MatchKind,
}

/// Pairs internal readiness rows with the vendor sheet's department buckets.
///
/// Each strategy is tried across every bucket before the next one runs, so an
/// exact name always beats a bucket that merely contains it.
pub struct DepartmentReconciler<'a> {
    sheet: &'a VendorSheet,
    rules: &'a ReconciliationRules,
}

impl<'a> DepartmentReconciler<'a> {
    pub fn new(sheet: &'a VendorSheet, rules: &'a ReconciliationRules) -> Self {
        Self { sheet, rules }
    }

    pub fn reconcile(&self, row: &InternalReadinessRow) -> ReconciledDepartment<'a> {
        let department = row.department.as_str();

        if self.rules.always_ready.iter().any(|name| name == department) {
            return ReconciledDepartment {
                vendor: VendorProgress::always_ready(),
                tasks: Vec::new(),
                match_kind: MatchKind::AlwaysReady,
            };
        }

        match self.find_bucket(department) {
            Some((stats, match_kind)) => ReconciledDepartment {
                vendor: VendorProgress {
                    progress: stats.percentage,
                    completed: stats.completed_tasks,
                    total: stats.total_tasks,
                },
                tasks: self.sheet.tasks_for(&stats.department_name),
                match_kind,
            },
            None => ReconciledDepartment {
                vendor: VendorProgress::none(),
                tasks: Vec::new(),
                match_kind: MatchKind::Unmatched,
            },
        }
    }

    fn find_bucket(&self, department: &str) -> Option<(&'a DepartmentStats, MatchKind)> {
        let buckets: &'a [DepartmentStats] = &self.sheet.department_stats;
        let wanted = department.to_lowercase();

        if let Some(stats) = buckets
            .iter()
            .find(|stats| stats.department_name == department)
        {
            return Some((stats, MatchKind::Exact));
        }

        if let Some(stats) = buckets.iter().find(|stats| {
            let key = stats.department_name.to_lowercase();
            key.contains(&wanted) || wanted.contains(&key)
        }) {
            return Some((stats, MatchKind::Contains));
        }

        self.rules
            .abbreviations
            .iter()
            .filter(|rule| rule.alias.eq_ignore_ascii_case(department))
            .find_map(|rule| {
                let fragment = rule.key_fragment.to_lowercase();
                buckets
                    .iter()
                    .find(|stats| stats.department_name.to_lowercase().contains(&fragment))
            })
            .map(|stats| (stats, MatchKind::Abbreviation))
    }
}
