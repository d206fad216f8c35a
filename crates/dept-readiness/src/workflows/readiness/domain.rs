use serde::{Deserialize, Serialize};

/// One department's checklist row from the internal readiness sheet.
///
/// `department` is the sheet's own wording and is not normalised to the
/// classifier buckets. The four admin fields are absent in older sheet layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalReadinessRow {
    pub department: String,
    pub devices_installed: u32,
    pub total_devices_needed: u32,
    pub master_data_status: String,
    pub pre_training_status: String,
    pub training_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_list_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_matrix_status: Option<String>,
}

impl InternalReadinessRow {
    /// The four admin checklist statuses in scoring order.
    pub fn admin_statuses(&self) -> [Option<&str>; 4] {
        [
            self.username_list_status.as_deref(),
            self.permission_status.as_deref(),
            self.workflow_status.as_deref(),
            self.approval_matrix_status.as_deref(),
        ]
    }
}

/// Vendor-side progress attached to a readiness row by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VendorProgress {
    pub progress: f64,
    pub completed: usize,
    pub total: usize,
}

impl VendorProgress {
    pub const fn none() -> Self {
        Self {
            progress: 0.0,
            completed: 0,
            total: 0,
        }
    }

    /// Progress for departments tracked outside the vendor sheet.
    pub const fn always_ready() -> Self {
        Self {
            progress: 1.0,
            completed: 0,
            total: 0,
        }
    }
}
