use serde::{Deserialize, Serialize};

use crate::domain::{
    Approver, DashboardMetrics, LeaveBalance, LeaveRequest, LeaveType, SalaryComponent, SalarySlip,
    User,
};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEnvelope {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub must_change_password: Option<bool>,
}

#[derive(Deserialize)]
pub struct MeEnvelope {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Deserialize)]
pub struct TypesEnvelope {
    #[serde(default)]
    pub types: Vec<LeaveType>,
}

#[derive(Deserialize)]
pub struct BalancesEnvelope {
    #[serde(default)]
    pub balances: Vec<LeaveBalance>,
}

#[derive(Deserialize)]
pub struct RequestsEnvelope {
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
}

#[derive(Deserialize)]
pub struct SalariesEnvelope {
    #[serde(default)]
    pub salaries: Vec<SalarySlip>,
}

#[derive(Deserialize)]
pub struct SalaryDetailEnvelope {
    #[serde(default)]
    pub salary: Option<SalarySlip>,
    #[serde(default)]
    pub details: Vec<SalaryComponent>,
}

/// Some deployments wrap the metrics in `data`.
#[derive(Deserialize)]
pub struct DashboardEnvelope {
    #[serde(default)]
    pub metrics: Option<DashboardMetrics>,
    #[serde(default)]
    pub data: Option<DashboardData>,
}

#[derive(Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub metrics: Option<DashboardMetrics>,
}

impl DashboardEnvelope {
    pub fn into_metrics(self) -> DashboardMetrics {
        self.metrics
            .or(self.data.and_then(|d| d.metrics))
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
pub struct UsersEnvelope {
    #[serde(default)]
    pub users: Vec<User>,
}

/// `department` is a nullable column, so nulls show up in the list.
#[derive(Deserialize)]
pub struct DepartmentsEnvelope {
    #[serde(default)]
    pub departments: Vec<Option<String>>,
}

/// Body of every mutating call. `request` is kept loose: a shape drift in
/// the echo shouldn't turn a successful write into an error.
#[derive(Deserialize, Default)]
pub struct MutationEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub request: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        let present = |m: &String| !m.trim().is_empty();
        self.message.filter(present).or(self.error.filter(present))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub approved_by: Approver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest<'a> {
    pub rejection_reason: &'a str,
}
