use crate::infra::{deserialize_optional_date, AppState, ReportState};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use dept_readiness::error::AppError;
use dept_readiness::workflows::{
    DashboardSummary, PipelineRun, ReadinessPipeline, ReadinessReport, ReadinessScoreDetails,
    SheetSource,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ReadinessReportRequest {
    pub(crate) vendor_csv: String,
    pub(crate) internal_csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_tasks: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_tasks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReportDataSource {
    Request,
    Configured,
}

#[derive(Debug, Serialize)]
struct ReadinessReportResponse<'a> {
    today: NaiveDate,
    data_source: ReportDataSource,
    vendor_tasks: usize,
    summary: &'a DashboardSummary,
    departments: &'a [ReadinessScoreDetails<'a>],
}

/// Health, readiness probe, metrics and the readiness report endpoints.
pub(crate) fn readiness_router<S>(state: Arc<ReportState<S>>) -> Router
where
    S: SheetSource + 'static,
{
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/readiness/report",
            post(report_handler::<S>).get(configured_report_handler::<S>),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores the two sheets posted in the request body.
pub(crate) async fn report_handler<S>(
    State(state): State<Arc<ReportState<S>>>,
    Json(request): Json<ReadinessReportRequest>,
) -> Result<Response, AppError>
where
    S: SheetSource + 'static,
{
    let ReadinessReportRequest {
        vendor_csv,
        internal_csv,
        today,
        include_tasks,
    } = request;

    if vendor_csv.trim().is_empty() {
        return Err(AppError::BadRequest("vendor_csv must not be empty".to_string()));
    }
    if internal_csv.trim().is_empty() {
        return Err(AppError::BadRequest("internal_csv must not be empty".to_string()));
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let run = state.pipeline.ingest(&vendor_csv, &internal_csv, today);
    Ok(render(
        &state.pipeline,
        &run,
        ReportDataSource::Request,
        include_tasks,
    ))
}

/// Fetches both sheets from the configured source and scores them.
pub(crate) async fn configured_report_handler<S>(
    State(state): State<Arc<ReportState<S>>>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError>
where
    S: SheetSource + 'static,
{
    let ReportQuery {
        today,
        include_tasks,
    } = query;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let run = state.pipeline.ingest_from(&state.source, today).await?;
    Ok(render(
        &state.pipeline,
        &run,
        ReportDataSource::Configured,
        include_tasks,
    ))
}

fn render(
    pipeline: &ReadinessPipeline,
    run: &PipelineRun,
    data_source: ReportDataSource,
    include_tasks: bool,
) -> Response {
    let report: ReadinessReport<'_> = pipeline.report(run);
    let report = if include_tasks {
        report
    } else {
        report.without_tasks()
    };

    Json(ReadinessReportResponse {
        today: run.today,
        data_source,
        vendor_tasks: run.vendor.tasks.len(),
        summary: &report.summary,
        departments: &report.records,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{SAMPLE_INTERNAL_CSV, SAMPLE_VENDOR_CSV};
    use axum::body::Body;
    use axum::http::Request;
    use dept_readiness::workflows::{FileSheetSource, InlineSheetSource};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state<S: SheetSource>(source: S) -> Arc<ReportState<S>> {
        Arc::new(ReportState::new(
            Arc::new(ReadinessPipeline::standard()),
            source,
        ))
    }

    fn sample_request(include_tasks: bool) -> ReadinessReportRequest {
        ReadinessReportRequest {
            vendor_csv: SAMPLE_VENDOR_CSV.to_string(),
            internal_csv: SAMPLE_INTERNAL_CSV.to_string(),
            today: NaiveDate::from_ymd_opt(2025, 2, 1),
            include_tasks,
        }
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn report_handler_scores_posted_sheets() {
        let response = report_handler(
            State(state(InlineSheetSource::default())),
            Json(sample_request(false)),
        )
        .await
        .expect("report builds");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["data_source"], "request");
        assert_eq!(payload["today"], "2025-02-01");
        assert_eq!(payload["vendor_tasks"], 17);
        assert_eq!(payload["summary"]["departments"], 6);

        let departments = payload["departments"].as_array().expect("departments");
        assert_eq!(departments[0]["department"], "Logistics");
        assert_eq!(departments[0]["band"], "complete");
        assert!(departments
            .iter()
            .all(|department| department.get("vendor_tasks").is_none()));
    }

    #[tokio::test]
    async fn report_handler_can_include_tasks() {
        let response = report_handler(
            State(state(InlineSheetSource::default())),
            Json(sample_request(true)),
        )
        .await
        .expect("report builds");

        let payload = read_json_body(response).await;
        let hr = payload["departments"]
            .as_array()
            .expect("departments")
            .iter()
            .find(|department| department["department"] == "HR")
            .cloned()
            .expect("hr scored");
        assert_eq!(hr["vendor_tasks"].as_array().map(Vec::len), Some(4));
        assert_eq!(hr["next_milestone_date"], "15 Feb 2025");
        assert_eq!(hr["match_kind"], "contains");
    }

    #[tokio::test]
    async fn report_handler_rejects_blank_sheets() {
        let mut request = sample_request(false);
        request.internal_csv = "  ".to_string();

        let error = report_handler(State(state(InlineSheetSource::default())), Json(request))
            .await
            .expect_err("blank sheet rejected");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn configured_report_route_reads_the_source() {
        let router = readiness_router(state(InlineSheetSource::new(
            SAMPLE_VENDOR_CSV,
            SAMPLE_INTERNAL_CSV,
        )));

        let response = router
            .oneshot(
                Request::get("/api/v1/readiness/report?today=2025-02-01")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["data_source"], "configured");
        assert_eq!(payload["summary"]["ready_departments"], 3);
        assert_eq!(payload["summary"]["overdue_tasks"], 1);
    }

    #[tokio::test]
    async fn configured_report_route_reports_missing_sources() {
        let router = readiness_router(state(FileSheetSource::default()));

        let response = router
            .oneshot(
                Request::get("/api/v1/readiness/report")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .is_some_and(|message| message.contains("no location configured")));
    }

    #[tokio::test]
    async fn post_route_accepts_json_payloads() {
        let router = readiness_router(state(InlineSheetSource::default()));
        let body = json!({
            "vendor_csv": "Activity,Status\nPayroll run,Done\n",
            "internal_csv": "Department,Master Data\nHR,Completed\n",
            "today": "2025-02-01",
        });

        let response = router
            .oneshot(
                Request::post("/api/v1/readiness/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["departments"][0]["department"], "HR");
        assert_eq!(payload["departments"][0]["vendor_tasks_total"], 1);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
