pub mod pipeline;
pub mod readiness;
pub mod sheet;
pub mod source;
pub mod vendor;

pub use pipeline::{PipelineRun, ReadinessPipeline};
pub use readiness::{
    DashboardSummary, InternalReadinessRow, MatchKind, ReadinessBand, ReadinessReport,
    ReadinessScoreDetails,
};
pub use source::{
    fetch_sheets, FileSheetSource, InlineSheetSource, SheetKind, SheetSource, SheetTexts,
    SourceError,
};
pub use vendor::{DepartmentStats, VendorSheet, VendorTask};
