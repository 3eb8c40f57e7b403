//! The seam between workflow logic and whatever answers the HR API.
//!
//! [`crate::HttpBackend`] talks to the real server; [`crate::InMemoryBackend`]
//! keeps everything in process for dev mode and tests.

use async_trait::async_trait;

use crate::composer::LeaveSubmission;
use crate::directory::{NewUser, UserFilter};
use crate::domain::{
    Approver, DashboardMetrics, LeaveBalance, LeaveRequest, LeaveRequestId, LeaveStatus,
    LeaveType, SalarySlip, SalarySlipDetail, User, UserId, YtdEarnings,
};
use crate::error::Result;

/// Which requests to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestFilter {
    pub status: Option<LeaveStatus>,
}

impl RequestFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn pending() -> Self {
        Self {
            status: Some(LeaveStatus::Pending),
        }
    }

    pub fn matches(&self, request: &LeaveRequest) -> bool {
        self.status.map_or(true, |s| s == request.status)
    }
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub must_change_password: bool,
}

/// What a mutating call reports back.
#[derive(Debug, Clone, Default)]
pub struct MutationReceipt {
    pub message: Option<String>,
    /// Resulting status, when the server bothers to say.
    pub status: Option<LeaveStatus>,
    pub request: Option<LeaveRequest>,
}

#[async_trait]
pub trait LeaveBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    /// Who the given token belongs to.
    async fn me(&self, token: &str) -> Result<User>;

    async fn leave_types(&self, token: &str) -> Result<Vec<LeaveType>>;

    async fn leave_balances(&self, token: &str) -> Result<Vec<LeaveBalance>>;

    async fn leave_requests(&self, token: &str, filter: RequestFilter) -> Result<Vec<LeaveRequest>>;

    async fn create_request(
        &self,
        token: &str,
        submission: &LeaveSubmission,
    ) -> Result<MutationReceipt>;

    async fn approve(
        &self,
        token: &str,
        request_id: LeaveRequestId,
        approved_by: Approver,
    ) -> Result<MutationReceipt>;

    async fn reject(
        &self,
        token: &str,
        request_id: LeaveRequestId,
        rejection_reason: &str,
    ) -> Result<MutationReceipt>;

    async fn salary_slips(&self, token: &str, year: i32) -> Result<Vec<SalarySlip>>;

    async fn ytd_earnings(&self, token: &str, year: i32) -> Result<YtdEarnings>;

    async fn salary_pdf(&self, token: &str, salary_id: i64) -> Result<Vec<u8>>;

    /// A single slip with its earning and deduction lines.
    async fn salary_slip(&self, token: &str, salary_id: i64) -> Result<SalarySlipDetail>;

    /// HR only.
    async fn dashboard(&self, token: &str) -> Result<DashboardMetrics>;

    async fn users(&self, token: &str, filter: &UserFilter) -> Result<Vec<User>>;

    async fn departments(&self, token: &str) -> Result<Vec<String>>;

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<MutationReceipt>;

    async fn reset_password(&self, token: &str, user_id: UserId) -> Result<MutationReceipt>;

    /// HR managers only.
    async fn delete_user(&self, token: &str, user_id: UserId) -> Result<MutationReceipt>;
}
