use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keyword tables, fallback columns and weights shared by every pipeline stage.
///
/// The tables mirror the layout of the upstream spreadsheets, so they are kept
/// as data rather than code and can be overridden from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRules {
    pub departments: Vec<DepartmentRule>,
    pub fallback_department: String,
    pub completion: CompletionRule,
    pub vendor_columns: VendorColumnRules,
    pub readiness_columns: ReadinessColumnRules,
    pub reconciliation: ReconciliationRules,
    pub scoring: ScoringRules,
}

impl Default for PipelineRules {
    fn default() -> Self {
        Self {
            departments: standard_departments(),
            fallback_department: "General".to_string(),
            completion: CompletionRule::default(),
            vendor_columns: VendorColumnRules::default(),
            readiness_columns: ReadinessColumnRules::default(),
            reconciliation: ReconciliationRules::default(),
            scoring: ScoringRules::default(),
        }
    }
}

impl PipelineRules {
    pub fn from_json_str(raw: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Department names in declaration order followed by the catch-all bucket.
    pub fn bucket_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .departments
            .iter()
            .map(|rule| rule.name.as_str())
            .collect();
        if !names.contains(&self.fallback_department.as_str()) {
            names.push(self.fallback_department.as_str());
        }
        names
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl DepartmentRule {
    fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|word| word.to_string()).collect(),
        }
    }
}

fn standard_departments() -> Vec<DepartmentRule> {
    vec![
        DepartmentRule::new(
            "HR & Payroll",
            &[
                "employee", "payroll", "leave", "salary", "wps", "recruit", "candidate",
                "personnel", "hr", "h.r",
            ],
        ),
        DepartmentRule::new(
            "Finance",
            &[
                "finance", "account", "payment", "voucher", "ledger", "asset", "bank", "tax",
                "p&l", "balance", "audit", "vat",
            ],
        ),
        DepartmentRule::new(
            "Procurement",
            &[
                "purchase", "supplier", "lpo", "quotation", "procurement", "vendor", "sourcing",
            ],
        ),
        DepartmentRule::new(
            "Logistics",
            &[
                "stock", "inventory", "material", "store", "warehouse", "item", "goods",
                "logistics", "equipment", "workshop", "vehicle", "service", "maintenance",
                "repair", "machinery", "fleet",
            ],
        ),
        DepartmentRule::new(
            "Projects & Sales",
            &[
                "project", "boq", "job", "costing", "estimate", "tender", "sales", "crm",
                "contract", "customer",
            ],
        ),
        DepartmentRule::new(
            "Setup & Admin",
            &[
                "srs", "database", "master", "installation", "setup", "admin", "user", "role",
                "configuration", "meeting", "kickoff", "go-live",
            ],
        ),
    ]
}

/// Vocabulary of status strings that count as finished work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionRule {
    pub done_statuses: Vec<String>,
    /// Status given to a task or checklist item whose cell is missing.
    pub default_status: String,
}

impl Default for CompletionRule {
    fn default() -> Self {
        Self {
            done_statuses: strings(&["done", "completed", "complete", "finished", "yes"]),
            default_status: "Pending".to_string(),
        }
    }
}

impl CompletionRule {
    pub fn is_done(&self, status: &str) -> bool {
        let status = status.trim().to_lowercase();
        self.done_statuses
            .iter()
            .any(|done| done.eq_ignore_ascii_case(&status))
    }

    /// 1.0 when the status counts as done, otherwise 0.0.
    pub fn score(&self, status: &str) -> f64 {
        if self.is_done(status) {
            1.0
        } else {
            0.0
        }
    }
}

/// Column positions used when the vendor sheet header cannot be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFallbacks {
    pub description: usize,
    pub status: usize,
    pub date: usize,
}

impl Default for ColumnFallbacks {
    fn default() -> Self {
        // Columns B, R and X of the vendor template.
        Self {
            description: 1,
            status: 17,
            date: 23,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorColumnRules {
    pub header_scan_rows: usize,
    pub description_keywords: Vec<String>,
    pub preferred_status_keyword: String,
    pub status_keyword: String,
    pub date_probe_keyword: String,
    pub date_keywords: Vec<String>,
    pub fallbacks: ColumnFallbacks,
}

impl Default for VendorColumnRules {
    fn default() -> Self {
        Self {
            header_scan_rows: 20,
            description_keywords: strings(&["activity", "task name", "description"]),
            preferred_status_keyword: "current status".to_string(),
            status_keyword: "status".to_string(),
            date_probe_keyword: "edd".to_string(),
            date_keywords: strings(&["edd at site", "edd", "target date", "deadline", "date"]),
            fallbacks: ColumnFallbacks::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessColumnRules {
    pub department: Vec<String>,
    pub devices_installed: Vec<String>,
    pub devices_total: Vec<String>,
    pub master_data: Vec<String>,
    pub pre_training: Vec<String>,
    pub training: Vec<String>,
    pub username_list: Vec<String>,
    pub permission: Vec<String>,
    pub workflow: Vec<String>,
    pub approval_matrix: Vec<String>,
}

impl Default for ReadinessColumnRules {
    fn default() -> Self {
        Self {
            department: strings(&["department"]),
            devices_installed: strings(&["device install", "devices installed", "installed"]),
            devices_total: strings(&["total devices", "total needed", "device total"]),
            master_data: strings(&["master data"]),
            pre_training: strings(&["pre-training", "pre training"]),
            training: strings(&["staff", "training"]),
            username_list: strings(&["username", "user list"]),
            permission: strings(&["permission"]),
            workflow: strings(&["workflow"]),
            approval_matrix: strings(&["approval"]),
        }
    }
}

/// Maps a short department alias onto any aggregation key containing `key_fragment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationRule {
    pub alias: String,
    pub key_fragment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationRules {
    pub abbreviations: Vec<AbbreviationRule>,
    /// Departments tracked outside the vendor sheet; always fully progressed.
    pub always_ready: Vec<String>,
}

impl Default for ReconciliationRules {
    fn default() -> Self {
        Self {
            // Alias and fragment coincide, so containment always claims these
            // rows first. Rules files add distinct aliases alongside it.
            abbreviations: vec![AbbreviationRule {
                alias: "hr".to_string(),
                key_fragment: "hr".to_string(),
            }],
            always_ready: strings(&["Estimation"]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub core_weight: f64,
    pub user_readiness_weight: f64,
    pub ready_threshold: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            core_weight: 0.90,
            user_readiness_weight: 0.10,
            ready_threshold: 0.80,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
