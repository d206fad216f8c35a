use super::domain::InternalReadinessRow;
use crate::config::{CompletionRule, ReadinessColumnRules};
use crate::workflows::sheet::{cell, clean_cell, fold_header, parse_grid, RawGrid};
use tracing::debug;

/// Column positions detected from the readiness sheet header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessColumns {
    pub department: Option<usize>,
    pub devices_installed: Option<usize>,
    pub devices_total: Option<usize>,
    pub master_data: Option<usize>,
    pub pre_training: Option<usize>,
    pub training: Option<usize>,
    pub username_list: Option<usize>,
    pub permission: Option<usize>,
    pub workflow: Option<usize>,
    pub approval_matrix: Option<usize>,
}

impl ReadinessColumns {
    pub fn detect(header: &[String], rules: &ReadinessColumnRules) -> Self {
        let headers: Vec<String> = header.iter().map(|cell| fold_header(cell)).collect();
        let pre_training = find_column(&headers, &rules.pre_training, None);

        Self {
            department: find_column(&headers, &rules.department, None),
            devices_installed: find_column(&headers, &rules.devices_installed, None),
            devices_total: find_column(&headers, &rules.devices_total, None),
            master_data: find_column(&headers, &rules.master_data, None),
            pre_training,
            // "Pre-Training" also contains "training"; skip the column already claimed.
            training: find_column(&headers, &rules.training, pre_training),
            username_list: find_column(&headers, &rules.username_list, None),
            permission: find_column(&headers, &rules.permission, None),
            workflow: find_column(&headers, &rules.workflow, None),
            approval_matrix: find_column(&headers, &rules.approval_matrix, None),
        }
    }
}

fn find_column(headers: &[String], terms: &[String], exclude: Option<usize>) -> Option<usize> {
    headers.iter().enumerate().position(|(index, header)| {
        Some(index) != exclude
            && terms
                .iter()
                .any(|term| header.contains(term.to_lowercase().as_str()))
    })
}

/// Reads the internal readiness sheet into one row per named department.
pub struct ReadinessSheetNormalizer<'r> {
    columns: &'r ReadinessColumnRules,
    completion: &'r CompletionRule,
}

impl<'r> ReadinessSheetNormalizer<'r> {
    pub fn new(columns: &'r ReadinessColumnRules, completion: &'r CompletionRule) -> Self {
        Self {
            columns,
            completion,
        }
    }

    pub fn normalize(&self, csv_text: &str) -> Vec<InternalReadinessRow> {
        self.normalize_grid(&parse_grid(csv_text))
    }

    pub fn normalize_grid(&self, grid: &RawGrid) -> Vec<InternalReadinessRow> {
        let Some((header, data_rows)) = grid.split_first() else {
            return Vec::new();
        };
        if data_rows.is_empty() {
            return Vec::new();
        }

        let columns = ReadinessColumns::detect(header, self.columns);
        debug!(?columns, "readiness sheet columns");

        data_rows
            .iter()
            .filter_map(|row| self.row(row, &columns))
            .collect()
    }

    fn row(&self, row: &[String], columns: &ReadinessColumns) -> Option<InternalReadinessRow> {
        let department = columns
            .department
            .map(|index| clean_cell(cell(row, index)))
            .filter(|value| !value.is_empty())?;

        let (devices_installed, total_devices_needed) = self.device_counts(row, columns);

        Some(InternalReadinessRow {
            department,
            devices_installed,
            total_devices_needed,
            master_data_status: self.status(row, columns.master_data),
            pre_training_status: self.status(row, columns.pre_training),
            training_status: self.status(row, columns.training),
            username_list_status: columns.username_list.map(|index| self.status(row, Some(index))),
            permission_status: columns.permission.map(|index| self.status(row, Some(index))),
            workflow_status: columns.workflow.map(|index| self.status(row, Some(index))),
            approval_matrix_status: columns
                .approval_matrix
                .map(|index| self.status(row, Some(index))),
        })
    }

    fn status(&self, row: &[String], column: Option<usize>) -> String {
        column
            .map(|index| clean_cell(cell(row, index)))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.completion.default_status.clone())
    }

    /// Installed and needed device counts, accepting `installed/total` cells.
    fn device_counts(&self, row: &[String], columns: &ReadinessColumns) -> (u32, u32) {
        let installed_cell = columns
            .devices_installed
            .map(|index| clean_cell(cell(row, index)))
            .unwrap_or_default();

        if let Some((installed, total)) = installed_cell.split_once('/') {
            return (parse_leading_int(installed), parse_leading_int(total));
        }

        let installed = parse_leading_int(&installed_cell);
        let total = match columns.devices_total {
            Some(index) => parse_leading_int(&clean_cell(cell(row, index))),
            // Without a total column an install count reads as fully installed.
            None => installed,
        };
        (installed, total)
    }
}

/// Parses the leading run of digits in `value`, e.g. `"12 units"` → 12.
///
/// Empty, negative or non-numeric text counts as zero.
fn parse_leading_int(value: &str) -> u32 {
    let trimmed = value.trim();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> Vec<InternalReadinessRow> {
        let columns = ReadinessColumnRules::default();
        let completion = CompletionRule::default();
        ReadinessSheetNormalizer::new(&columns, &completion).normalize(text)
    }

    #[test]
    fn reads_rows_by_header_names_in_any_order() {
        let rows = normalize(
            "Staff Training,Department,Pre-Training,Master Data,Devices Installed,Total Devices\n\
             Completed,Finance,Scheduled,Completed,8,10\n",
        );

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.department, "Finance");
        assert_eq!(row.devices_installed, 8);
        assert_eq!(row.total_devices_needed, 10);
        assert_eq!(row.master_data_status, "Completed");
        assert_eq!(row.pre_training_status, "Scheduled");
        assert_eq!(row.training_status, "Completed");
        assert!(row.username_list_status.is_none());
        assert!(row.approval_matrix_status.is_none());
    }

    #[test]
    fn training_column_skips_pre_training() {
        let header: Vec<String> = ["Department", "Pre Training", "Training"]
            .into_iter()
            .map(str::to_string)
            .collect();
        let columns = ReadinessColumns::detect(&header, &ReadinessColumnRules::default());
        assert_eq!(columns.pre_training, Some(1));
        assert_eq!(columns.training, Some(2));
    }

    #[test]
    fn compound_device_cell_supplies_both_counts() {
        let rows = normalize("Department,Device Install,Total Devices\nHR,5/12,99\nOps,x/4,\n");
        assert_eq!(
            (rows[0].devices_installed, rows[0].total_devices_needed),
            (5, 12)
        );
        assert_eq!(
            (rows[1].devices_installed, rows[1].total_devices_needed),
            (0, 4)
        );
    }

    #[test]
    fn missing_total_column_treats_installs_as_complete() {
        let rows = normalize("Department,Installed\nHR,7\nFinance,\nOps,none\n");
        assert_eq!(
            (rows[0].devices_installed, rows[0].total_devices_needed),
            (7, 7)
        );
        assert_eq!(
            (rows[1].devices_installed, rows[1].total_devices_needed),
            (0, 0)
        );
        assert_eq!(
            (rows[2].devices_installed, rows[2].total_devices_needed),
            (0, 0)
        );
    }

    #[test]
    fn blank_department_rows_are_dropped_and_statuses_default() {
        let rows = normalize(
            "Department,Master Data,Username List,Permissions,Workflow,Approval Matrix\n\
             ,Completed,,,,\n\
             \" Procurement \",,Done,,In Progress\n",
        );

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.department, "Procurement");
        assert_eq!(row.master_data_status, "Pending");
        assert_eq!(row.pre_training_status, "Pending");
        assert_eq!(row.training_status, "Pending");
        assert_eq!(row.username_list_status.as_deref(), Some("Done"));
        assert_eq!(row.permission_status.as_deref(), Some("Pending"));
        assert_eq!(row.workflow_status.as_deref(), Some("In Progress"));
        assert_eq!(row.approval_matrix_status.as_deref(), Some("Pending"));
    }

    #[test]
    fn duplicate_departments_are_kept() {
        let rows = normalize("Department\nHR\nHR\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn header_only_or_missing_department_column_yields_nothing() {
        assert!(normalize("Department,Installed\n").is_empty());
        assert!(normalize("Team,Installed\nHR,4\n").is_empty());
        assert!(normalize("").is_empty());
    }

    #[test]
    fn leading_integer_parsing_is_lenient() {
        assert_eq!(parse_leading_int("12"), 12);
        assert_eq!(parse_leading_int(" 12 units"), 12);
        assert_eq!(parse_leading_int("7.9"), 7);
        assert_eq!(parse_leading_int("-3"), 0);
        assert_eq!(parse_leading_int("n/a"), 0);
        assert_eq!(parse_leading_int(""), 0);
    }
}
