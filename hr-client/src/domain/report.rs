use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_count_opt, lenient_f64_opt};

/// Headline figures for HR, as reported by `/reports/dashboard`.
/// Missing figures stay `None`; nothing is derived client-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(deserialize_with = "lenient_count_opt")]
    pub total_employees: Option<u64>,
    #[serde(deserialize_with = "lenient_count_opt")]
    pub pending_leave_requests: Option<u64>,
    #[serde(deserialize_with = "lenient_count_opt")]
    pub leave_requests_this_month: Option<u64>,
    #[serde(deserialize_with = "lenient_count_opt")]
    pub salaries_paid_this_month: Option<u64>,
    #[serde(deserialize_with = "lenient_f64_opt")]
    pub total_salary_paid: Option<f64>,
}
