use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use dept_readiness::config::AppConfig;
use dept_readiness::error::AppError;
use dept_readiness::workflows::{FileSheetSource, PipelineRun, ReadinessPipeline, ReadinessReport};
use std::path::PathBuf;

/// Vendor tracker export used when no live sheet is available.
pub(crate) const SAMPLE_VENDOR_CSV: &str = "\
Vendor Implementation Tracker - Phase 1,,,,
S.No,Activity,Module,Current Status,EDD at Site
1,Chart of accounts mapping,Finance,Done,2025-01-06
2,Bank integration,Finance,Done,2025-01-08
3,Tax setup (VAT),Finance,Done,2025-01-10
4,\"Financial reporting, P&L and balance sheet\",Finance,Done,2025-01-15
5,Supplier master upload,Procurement,Done,2025-01-12
6,Purchase order workflow,Procurement,In Progress,2025-02-10
7,Supplier contracts,Procurement,Pending,2025-02-20
8,Warehouse setup,Logistics,Done,2025-01-05
9,Inventory item import,Logistics,Done,2025-01-09
10,Goods dispatch rules,Logistics,Done,2025-01-14
11,Project codes,Projects,Done,2025-01-07
12,BOQ budget rules,Projects,Pending,2025-01-25
13,Job costing timesheets,Projects,Pending,
14,Employee data migration,HR,Done,2025-01-04
15,Payroll configuration,HR,Done,2025-01-11
16,Leave rules,HR,Done,2025-01-13
17,Employee self service portal,HR,In Progress,2025-02-15
";

/// Internal readiness tracker export matching [`SAMPLE_VENDOR_CSV`].
pub(crate) const SAMPLE_INTERNAL_CSV: &str = "\
Department,Devices Installed,Total Devices,Master Data,Pre-Training,Staff Training,Username List,Permissions,Workflow,Approval Matrix
Finance,15,15,Completed,Completed,In Progress,Done,Done,Done,Pending
Procurement,8/10,,In Progress,Completed,Pending,Done,Pending,Pending,Pending
Logistics,20,20,Completed,Completed,Completed,Done,Done,Done,Done
Projects,2,15,Pending,Pending,Pending,,,,
HR,12,12,Completed,Completed,Completed,Done,Done,In Progress,Done
Estimation,0,0,Completed,Completed,Completed,Done,Done,Done,Done
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include each department's vendor tasks in the output.
    #[arg(long)]
    pub(crate) list_tasks: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Vendor task sheet CSV (defaults to READINESS_VENDOR_CSV)
    #[arg(long)]
    pub(crate) vendor_csv: Option<PathBuf>,
    /// Internal readiness sheet CSV (defaults to READINESS_INTERNAL_CSV)
    #[arg(long)]
    pub(crate) internal_csv: Option<PathBuf>,
    /// Evaluation date for overdue checks (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include each department's vendor tasks in the output
    #[arg(long)]
    pub(crate) list_tasks: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        vendor_csv,
        internal_csv,
        today,
        list_tasks,
        json,
    } = args;

    let config = AppConfig::load()?;
    let source = FileSheetSource::new(
        vendor_csv.or(config.sources.vendor_csv),
        internal_csv.or(config.sources.internal_csv),
    );
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let pipeline = ReadinessPipeline::new(config.rules);
    let run = pipeline.ingest_from(&source, today).await?;
    let report = pipeline.report(&run);

    if json {
        print_json(report, list_tasks);
    } else {
        render_readiness_report(&run, &report, "sheet exports", list_tasks);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, list_tasks } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Department readiness demo");
    let pipeline = ReadinessPipeline::standard();
    let run = pipeline.ingest(SAMPLE_VENDOR_CSV, SAMPLE_INTERNAL_CSV, today);
    let report = pipeline.report(&run);
    render_readiness_report(&run, &report, "built-in sample sheets", list_tasks);
    Ok(())
}

fn print_json(report: ReadinessReport<'_>, list_tasks: bool) {
    let report = if list_tasks {
        report
    } else {
        report.without_tasks()
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Report payload unavailable: {}", err),
    }
}

pub(crate) fn render_readiness_report(
    run: &PipelineRun,
    report: &ReadinessReport<'_>,
    data_source: &str,
    list_tasks: bool,
) {
    let summary = &report.summary;
    println!("Readiness as of {} (data source: {})", run.today, data_source);
    println!(
        "{} vendor tasks | {:.0}% vendor progress | {} overdue",
        run.vendor.tasks.len(),
        summary.overall_vendor_progress * 100.0,
        summary.overdue_tasks
    );
    println!(
        "{} departments | {} ready | average score {:.0}%",
        summary.departments,
        summary.ready_departments,
        summary.average_score * 100.0
    );

    if run.vendor.department_stats.is_empty() {
        println!("\nVendor buckets: none");
    } else {
        println!("\nVendor buckets");
        for stats in &run.vendor.department_stats {
            println!(
                "- {}: {}/{} done ({:.0}%) | {} overdue",
                stats.department_name,
                stats.completed_tasks,
                stats.total_tasks,
                stats.percentage * 100.0,
                stats.overdue_tasks
            );
        }
    }

    if report.records.is_empty() {
        println!("\nDepartment scores: none");
        return;
    }

    println!("\nDepartment scores");
    for record in &report.records {
        println!(
            "- {}: {:.0}% ({}) | match {}",
            record.department,
            record.total_score * 100.0,
            record.band.label(),
            record.match_kind.label()
        );
        println!(
            "  vendor {}/{} ({:.0}%) | devices {}/{} | master data {} | pre-training {} \
             | training {} | users {:.0}%",
            record.vendor_tasks_completed,
            record.vendor_tasks_total,
            record.vendor_progress * 100.0,
            record.devices_installed,
            record.total_devices_needed,
            tick(record.master_data_score),
            tick(record.pre_training_score),
            tick(record.training_score),
            record.user_readiness_score * 100.0
        );
        println!(
            "  next milestone {} | est. completion {}",
            record.next_milestone_date.as_deref().unwrap_or("-"),
            record.est_completion_date.as_deref().unwrap_or("-")
        );

        if list_tasks {
            for task in &record.vendor_tasks {
                let overdue = if task.is_overdue { " (overdue)" } else { "" };
                println!(
                    "    - {} | {} | {} | due {}{}",
                    task.id,
                    task.description,
                    task.status,
                    task.date.as_deref().unwrap_or("-"),
                    overdue
                );
            }
        }
    }
}

fn tick(score: f64) -> &'static str {
    if score >= 1.0 {
        "done"
    } else {
        "open"
    }
}
