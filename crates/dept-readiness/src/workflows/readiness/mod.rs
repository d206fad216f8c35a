//! Internal readiness sheet: row normalisation, reconciliation against the
//! vendor buckets, and weighted scoring.

pub mod domain;
mod normalizer;
mod reconcile;
pub mod report;
mod scoring;

pub use domain::{InternalReadinessRow, VendorProgress};
pub use normalizer::{ReadinessColumns, ReadinessSheetNormalizer};
pub use reconcile::{DepartmentReconciler, MatchKind, ReconciledDepartment};
pub use report::{DashboardSummary, ReadinessBand, ReadinessReport, ReadinessScoreDetails};
pub use scoring::{device_ratio, MilestoneDates, ScoringEngine, ALL_COMPLETE_LABEL};
