//! Departmental go-live readiness: vendor task sheet and internal readiness
//! sheet in, per-department weighted scores out.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
pub use workflows::{ReadinessPipeline, ReadinessReport};
