use chrono::NaiveDate;
use dept_readiness::workflows::{ReadinessPipeline, SheetSource};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Pipeline plus the sheet source used by the configured report route.
pub(crate) struct ReportState<S> {
    pub(crate) pipeline: Arc<ReadinessPipeline>,
    pub(crate) source: S,
}

impl<S: SheetSource> ReportState<S> {
    pub(crate) fn new(pipeline: Arc<ReadinessPipeline>, source: S) -> Self {
        Self { pipeline, source }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date(" 2025-02-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date"))
        );
        let error = parse_date("01/02/2025").expect_err("slash dates rejected");
        assert!(error.contains("YYYY-MM-DD"));
    }
}
