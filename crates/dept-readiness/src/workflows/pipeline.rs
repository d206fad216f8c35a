use super::readiness::{
    DepartmentReconciler, InternalReadinessRow, ReadinessReport, ReadinessSheetNormalizer,
    ScoringEngine,
};
use super::source::{fetch_sheets, SheetSource, SourceError};
use super::vendor::{VendorSheet, VendorSheetImporter};
use crate::config::PipelineRules;
use chrono::NaiveDate;
use tracing::info;

/// Parsed state of one pipeline run. Reports borrow from it.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub today: NaiveDate,
    pub vendor: VendorSheet,
    pub readiness_rows: Vec<InternalReadinessRow>,
}

/// Vendor sheet plus readiness sheet in, sorted department scores out.
#[derive(Debug, Clone, Default)]
pub struct ReadinessPipeline {
    rules: PipelineRules,
}

impl ReadinessPipeline {
    pub fn new(rules: PipelineRules) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(PipelineRules::default())
    }

    pub fn ingest(&self, vendor_csv: &str, internal_csv: &str, today: NaiveDate) -> PipelineRun {
        let vendor = VendorSheetImporter::new(&self.rules).import(vendor_csv, today);
        let readiness_rows =
            ReadinessSheetNormalizer::new(&self.rules.readiness_columns, &self.rules.completion)
                .normalize(internal_csv);

        info!(
            vendor_tasks = vendor.tasks.len(),
            vendor_departments = vendor.department_stats.len(),
            readiness_rows = readiness_rows.len(),
            %today,
            "ingested readiness sheets"
        );

        PipelineRun {
            today,
            vendor,
            readiness_rows,
        }
    }

    /// Fetches both sheets from `source` and ingests them.
    pub async fn ingest_from<S: SheetSource>(
        &self,
        source: &S,
        today: NaiveDate,
    ) -> Result<PipelineRun, SourceError> {
        let texts = fetch_sheets(source).await?;
        Ok(self.ingest(&texts.vendor_csv, &texts.internal_csv, today))
    }

    pub fn report<'a>(&'a self, run: &'a PipelineRun) -> ReadinessReport<'a> {
        let reconciler = DepartmentReconciler::new(&run.vendor, &self.rules.reconciliation);
        let engine = ScoringEngine::new(&self.rules.completion, self.rules.scoring);

        let records = run
            .readiness_rows
            .iter()
            .map(|row| engine.score(row, reconciler.reconcile(row)))
            .collect();

        let report = ReadinessReport::new(
            records,
            self.rules.scoring.ready_threshold,
            run.vendor.overall_progress,
        );
        info!(
            departments = report.summary.departments,
            ready = report.summary.ready_departments,
            average_score = report.summary.average_score,
            "scored readiness report"
        );
        report
    }
}
