//! In-process stand-in for the HR API.
//!
//! Behaves like the real server where the client can observe it: HR-only
//! transitions, balance deduction on final approval, conflicts on requests
//! that were already decided. Used by `hr-tui dev` and by the tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Date, Month, OffsetDateTime};

use crate::backend::{LeaveBackend, LoginResponse, MutationReceipt, RequestFilter};
use crate::composer::LeaveSubmission;
use crate::directory::{NewUser, UserFilter, CREATE_USER_SUCCESS, DELETE_USER_SUCCESS, RESET_PASSWORD_SUCCESS};
use crate::domain::serde_helpers::format_date;
use crate::domain::{
    Approver, ComponentKind, DashboardMetrics, HalfDayPeriod, LeaveBalance, LeaveRequest,
    LeaveRequestId, LeaveStatus, LeaveType, Role, SalaryComponent, SalarySlip, SalarySlipDetail,
    SalaryStatus, User, UserId, YtdEarnings,
};
use crate::error::{LeaveError, Result, SESSION_EXPIRED};

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    next_user_id: UserId,
    tokens: HashMap<String, UserId>,
    next_token: u64,
    types: Vec<LeaveType>,
    balances: Vec<LeaveBalance>,
    requests: Vec<LeaveRequest>,
    next_request_id: LeaveRequestId,
    salaries: HashMap<i64, Vec<SalarySlip>>,
    calls: HashMap<&'static str, usize>,
}

impl State {
    fn record(&mut self, call: &'static str) {
        *self.calls.entry(call).or_default() += 1;
    }

    fn user_for(&self, token: &str) -> Result<User> {
        self.tokens
            .get(token)
            .and_then(|id| self.users.iter().find(|u| u.id == *id))
            .cloned()
            .ok_or_else(|| LeaveError::Unauthenticated(SESSION_EXPIRED.to_string()))
    }

    fn hr_for(&self, token: &str, verb: &str) -> Result<User> {
        let user = self.user_for(token)?;
        if !user.is_hr() {
            return Err(LeaveError::Forbidden(format!(
                "Only HR can {verb} leave requests"
            )));
        }
        Ok(user)
    }

    fn admin_for(&self, token: &str) -> Result<User> {
        let user = self.user_for(token)?;
        if !user.is_hr() {
            return Err(LeaveError::Forbidden("Access denied".to_string()));
        }
        Ok(user)
    }

    fn hydrate(&self, mut request: LeaveRequest) -> LeaveRequest {
        request.user = request
            .user_id
            .and_then(|id| self.users.iter().find(|u| u.id == id).cloned());
        request.leave_type = self
            .types
            .iter()
            .find(|t| t.id == request.leave_type_id)
            .cloned();
        request
    }

    fn request_mut(&mut self, id: LeaveRequestId) -> Result<&mut LeaveRequest> {
        self.requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LeaveError::Conflict("Leave request not found".to_string()))
    }

    fn balance_mut(&mut self, user_id: i64, leave_type_id: i64, year: i32) -> Option<&mut LeaveBalance> {
        self.balances
            .iter_mut()
            .find(|b| b.user_id == Some(user_id) && b.leave_type_id == leave_type_id && b.year == year)
    }
}

impl InMemoryBackend {
    pub const PASSWORD: &'static str = "password";
    pub const EMPLOYEE_EMAIL: &'static str = "employee@example.com";
    pub const HR_EMAIL: &'static str = "hr@example.com";

    pub fn new() -> Self {
        Self::default()
    }

    /// A small company for the current year: one employee, one HR manager,
    /// three leave types (one retired), some history and payslips.
    pub fn seeded() -> Self {
        Self::seeded_for_year(OffsetDateTime::now_utc().year())
    }

    pub fn seeded_for_year(year: i32) -> Self {
        let employee = seed_user(1, "E-001", Self::EMPLOYEE_EMAIL, "Alex", "Morgan", Role::Employee);
        let hr = seed_user(2, "H-001", Self::HR_EMAIL, "Jordan", "Lee", Role::HrManager);

        let types = vec![
            seed_type(1, "Annual Leave", "Paid yearly leave", 20.0, true),
            seed_type(2, "Sick Leave", "Illness and medical appointments", 10.0, true),
            seed_type(3, "Sabbatical", "Retired policy", 30.0, false),
        ];

        let mut balances = Vec::new();
        let mut balance_id = 1;
        for user in [&employee, &hr] {
            for (leave_type, used) in [(&types[0], 5.0), (&types[1], 1.0)] {
                balances.push(LeaveBalance {
                    id: balance_id,
                    user_id: Some(user.id),
                    leave_type_id: leave_type.id,
                    total_days: leave_type.max_days,
                    used_days: used,
                    remaining_days: leave_type.max_days - used,
                    year,
                    leave_type: Some(leave_type.clone()),
                });
                balance_id += 1;
            }
        }
        balances.push(LeaveBalance {
            id: balance_id,
            user_id: Some(employee.id),
            leave_type_id: types[2].id,
            total_days: 30.0,
            used_days: 0.0,
            remaining_days: 30.0,
            year,
            leave_type: None,
        });

        let date = |month: Month, day: u8| Date::from_calendar_date(year, month, day).ok();
        let mut requests = Vec::new();
        if let (Some(a), Some(b), Some(c), Some(d)) = (
            date(Month::February, 12),
            date(Month::February, 16),
            date(Month::March, 4),
            date(Month::April, 22),
        ) {
            requests.push(seed_request(1, employee.id, 1, a, b, 5.0, "Family trip", LeaveStatus::HrApproved));
            requests.push(seed_request(2, employee.id, 2, c, c, 1.0, "Flu", LeaveStatus::Rejected));
            let mut pending = seed_request(3, employee.id, 2, d, d, 0.5, "Dentist", LeaveStatus::Pending);
            pending.is_half_day = true;
            pending.half_day_period = Some(HalfDayPeriod::Morning);
            requests.push(pending);
        }
        if let Some(rejected) = requests.iter_mut().find(|r| r.status == LeaveStatus::Rejected) {
            rejected.rejection_reason = Some("Please submit a medical certificate".to_string());
        }

        let salaries = HashMap::from([(
            employee.id,
            (1..=3)
                .map(|month| seed_slip(month, year, month))
                .collect::<Vec<_>>(),
        )]);

        let next_request_id = requests.len() as LeaveRequestId + 1;
        Self {
            state: Arc::new(Mutex::new(State {
                users: vec![employee, hr],
                next_user_id: 3,
                types,
                balances,
                requests,
                next_request_id,
                salaries,
                ..State::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// How many times a backend method has been invoked.
    pub fn call_count(&self, call: &str) -> usize {
        self.state().calls.get(call).copied().unwrap_or_default()
    }
}

#[async_trait]
impl LeaveBackend for InMemoryBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let mut state = self.state();
        state.record("login");
        let user = state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .filter(|_| password == Self::PASSWORD)
            .cloned()
            .ok_or_else(|| LeaveError::Unauthenticated("Invalid email or password".to_string()))?;

        state.next_token += 1;
        let token = format!("dev-token-{}-{}", user.id, state.next_token);
        state.tokens.insert(token.clone(), user.id);
        Ok(LoginResponse {
            token,
            must_change_password: user.must_change_password,
            user,
        })
    }

    async fn me(&self, token: &str) -> Result<User> {
        let mut state = self.state();
        state.record("me");
        state.user_for(token)
    }

    async fn leave_types(&self, token: &str) -> Result<Vec<LeaveType>> {
        let mut state = self.state();
        state.record("leave_types");
        state.user_for(token)?;
        Ok(state.types.clone())
    }

    async fn leave_balances(&self, token: &str) -> Result<Vec<LeaveBalance>> {
        let mut state = self.state();
        state.record("leave_balances");
        let user = state.user_for(token)?;
        Ok(state
            .balances
            .iter()
            .filter(|b| b.user_id == Some(user.id))
            .cloned()
            .collect())
    }

    async fn leave_requests(&self, token: &str, filter: RequestFilter) -> Result<Vec<LeaveRequest>> {
        let mut state = self.state();
        state.record("leave_requests");
        let user = state.user_for(token)?;
        let mut requests: Vec<LeaveRequest> = state
            .requests
            .iter()
            .filter(|r| user.is_hr() || r.user_id == Some(user.id))
            .filter(|r| filter.matches(r))
            .cloned()
            .map(|r| state.hydrate(r))
            .collect();
        requests.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(requests)
    }

    async fn create_request(&self, token: &str, submission: &LeaveSubmission) -> Result<MutationReceipt> {
        let mut state = self.state();
        state.record("create_request");
        let user = state.user_for(token)?;

        if !state
            .types
            .iter()
            .any(|t| t.id == submission.leave_type_id && t.is_active)
        {
            return Err(LeaveError::Conflict("Invalid leave type".to_string()));
        }
        let year = submission.start_date.year();
        let remaining = state
            .balance_mut(user.id, submission.leave_type_id, year)
            .map(|b| b.remaining_days);
        if remaining.is_some_and(|r| submission.total_days > r) {
            return Err(LeaveError::Conflict("Insufficient leave balance".to_string()));
        }

        let id = state.next_request_id;
        state.next_request_id += 1;
        let request = LeaveRequest {
            id,
            user_id: Some(user.id),
            leave_type_id: submission.leave_type_id,
            start_date: submission.start_date,
            end_date: submission.end_date,
            total_days: submission.total_days,
            is_half_day: submission.is_half_day,
            half_day_period: submission.half_day_period,
            reason: Some(submission.reason.clone()),
            status: LeaveStatus::Pending,
            team_leader_approval_date: None,
            hr_approval_date: None,
            rejection_reason: None,
            attachment_url: submission
                .attachment
                .as_ref()
                .map(|a| format!("/uploads/{}", a.file_name)),
            created_at: Some(OffsetDateTime::now_utc()),
            user: None,
            leave_type: None,
        };
        state.requests.push(request.clone());

        Ok(MutationReceipt {
            message: Some("Leave request submitted successfully".to_string()),
            status: Some(LeaveStatus::Pending),
            request: Some(state.hydrate(request)),
        })
    }

    async fn approve(&self, token: &str, request_id: LeaveRequestId, approved_by: Approver) -> Result<MutationReceipt> {
        let mut state = self.state();
        state.record("approve");
        state.hr_for(token, "approve")?;

        let request = state.request_mut(request_id)?;
        let next = request
            .status
            .transition(approved_by.transition())
            .map_err(|_| LeaveError::Conflict("Leave request has already been processed".to_string()))?;
        request.status = next;
        let now = Some(OffsetDateTime::now_utc());
        match next {
            LeaveStatus::TeamLeaderApproved => request.team_leader_approval_date = now,
            LeaveStatus::HrApproved => request.hr_approval_date = now,
            _ => {}
        }
        let (user_id, leave_type_id, year, days) = (
            request.user_id,
            request.leave_type_id,
            request.start_date.year(),
            request.total_days,
        );

        if next == LeaveStatus::HrApproved {
            if let Some(balance) = user_id.and_then(|uid| state.balance_mut(uid, leave_type_id, year)) {
                balance.used_days += days;
                balance.remaining_days -= days;
            }
        }

        Ok(MutationReceipt {
            message: Some("Leave request approved successfully".to_string()),
            status: Some(next),
            request: None,
        })
    }

    async fn reject(&self, token: &str, request_id: LeaveRequestId, rejection_reason: &str) -> Result<MutationReceipt> {
        let mut state = self.state();
        state.record("reject");
        state.hr_for(token, "reject")?;
        if rejection_reason.trim().is_empty() {
            return Err(LeaveError::Conflict("Rejection reason is required".to_string()));
        }

        let request = state.request_mut(request_id)?;
        let next = request
            .status
            .transition(crate::domain::LeaveTransition::Reject)
            .map_err(|_| LeaveError::Conflict("Leave request has already been processed".to_string()))?;
        request.status = next;
        request.rejection_reason = Some(rejection_reason.to_string());

        Ok(MutationReceipt {
            message: Some("Leave request rejected".to_string()),
            status: Some(next),
            request: None,
        })
    }

    async fn salary_slips(&self, token: &str, year: i32) -> Result<Vec<SalarySlip>> {
        let mut state = self.state();
        state.record("salary_slips");
        let user = state.user_for(token)?;
        let prefix = format!("{year:04}-");
        Ok(state
            .salaries
            .get(&user.id)
            .map(|slips| {
                slips
                    .iter()
                    .filter(|s| s.month_year.starts_with(&prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn ytd_earnings(&self, token: &str, year: i32) -> Result<YtdEarnings> {
        let slips = self.salary_slips(token, year).await?;
        Ok(YtdEarnings {
            year: Some(year),
            total_earnings: Some(slips.iter().map(|s| s.total_earnings).sum()),
            total_deductions: Some(slips.iter().map(|s| s.total_deductions).sum()),
            total_net: Some(slips.iter().map(|s| s.net_salary).sum()),
            months: Some(slips.len() as u32),
        })
    }

    async fn salary_pdf(&self, token: &str, salary_id: i64) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.record("salary_pdf");
        let user = state.user_for(token)?;
        let slip = state
            .salaries
            .get(&user.id)
            .and_then(|slips| slips.iter().find(|s| s.id == salary_id))
            .ok_or_else(|| LeaveError::Conflict("Salary slip not found".to_string()))?;
        Ok(format!("%PDF-1.4\n% salary slip {} {}\n%%EOF\n", slip.id, slip.month_year).into_bytes())
    }

    async fn salary_slip(&self, token: &str, salary_id: i64) -> Result<SalarySlipDetail> {
        let mut state = self.state();
        state.record("salary_slip");
        let user = state.user_for(token)?;
        let slip = state
            .salaries
            .get(&user.id)
            .and_then(|slips| slips.iter().find(|s| s.id == salary_id))
            .cloned()
            .ok_or_else(|| LeaveError::Conflict("Salary slip not found".to_string()))?;
        Ok(SalarySlipDetail {
            components: slip_components(&slip),
            salary: slip,
        })
    }

    async fn dashboard(&self, token: &str) -> Result<DashboardMetrics> {
        let mut state = self.state();
        state.record("dashboard");
        state.admin_for(token)?;

        let now = OffsetDateTime::now_utc();
        let this_month = format!("{:04}-{:02}", now.year(), now.month() as u8);
        let paid_this_month: Vec<&SalarySlip> = state
            .salaries
            .values()
            .flatten()
            .filter(|s| s.status == SalaryStatus::Paid && s.month_year == this_month)
            .collect();
        Ok(DashboardMetrics {
            total_employees: Some(state.users.len() as u64),
            pending_leave_requests: Some(
                state
                    .requests
                    .iter()
                    .filter(|r| r.status == LeaveStatus::Pending)
                    .count() as u64,
            ),
            leave_requests_this_month: Some(
                state
                    .requests
                    .iter()
                    .filter(|r| {
                        r.created_at
                            .is_some_and(|c| c.year() == now.year() && c.month() == now.month())
                    })
                    .count() as u64,
            ),
            salaries_paid_this_month: Some(paid_this_month.len() as u64),
            total_salary_paid: Some(paid_this_month.iter().map(|s| s.net_salary).sum()),
        })
    }

    async fn users(&self, token: &str, filter: &UserFilter) -> Result<Vec<User>> {
        let mut state = self.state();
        state.record("users");
        state.admin_for(token)?;
        Ok(state
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    async fn departments(&self, token: &str) -> Result<Vec<String>> {
        let mut state = self.state();
        state.record("departments");
        state.admin_for(token)?;
        let mut departments: Vec<String> = state
            .users
            .iter()
            .filter_map(|u| u.department.clone())
            .collect();
        departments.sort();
        departments.dedup();
        Ok(departments)
    }

    async fn create_user(&self, token: &str, new_user: &NewUser) -> Result<MutationReceipt> {
        let mut state = self.state();
        state.record("create_user");
        let actor = state.admin_for(token)?;
        if !actor.role.can_assign(&new_user.role) {
            return Err(LeaveError::Forbidden(
                "You cannot assign that role".to_string(),
            ));
        }
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(LeaveError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let id = state.next_user_id;
        state.next_user_id += 1;
        state.users.push(User {
            id,
            employee_id: Some(format!("E-{id:03}")),
            email: new_user.email.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            role: new_user.role.clone(),
            department: new_user.department.clone(),
            position: new_user.position.clone(),
            hire_date: new_user.hire_date.map(format_date),
            manager_id: new_user.manager_id,
            must_change_password: true,
            created_at: Some(OffsetDateTime::now_utc()),
        });
        Ok(MutationReceipt {
            message: Some(CREATE_USER_SUCCESS.to_string()),
            ..MutationReceipt::default()
        })
    }

    async fn reset_password(&self, token: &str, user_id: UserId) -> Result<MutationReceipt> {
        let mut state = self.state();
        state.record("reset_password");
        state.admin_for(token)?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| LeaveError::Conflict("User not found".to_string()))?;
        user.must_change_password = true;
        Ok(MutationReceipt {
            message: Some(RESET_PASSWORD_SUCCESS.to_string()),
            ..MutationReceipt::default()
        })
    }

    async fn delete_user(&self, token: &str, user_id: UserId) -> Result<MutationReceipt> {
        let mut state = self.state();
        state.record("delete_user");
        let actor = state.user_for(token)?;
        if actor.role != Role::HrManager {
            return Err(LeaveError::Forbidden("Access denied".to_string()));
        }
        if actor.id == user_id {
            return Err(LeaveError::Conflict(
                "You cannot delete your own account".to_string(),
            ));
        }
        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        if state.users.len() == before {
            return Err(LeaveError::Conflict("User not found".to_string()));
        }
        state.tokens.retain(|_, owner| *owner != user_id);
        Ok(MutationReceipt {
            message: Some(DELETE_USER_SUCCESS.to_string()),
            ..MutationReceipt::default()
        })
    }
}

/// Fixed breakdown that adds up to the seeded slip totals.
fn slip_components(slip: &SalarySlip) -> Vec<SalaryComponent> {
    let provident_fund = 336.0;
    let line = |id: i64, name: &str, kind: ComponentKind, amount: f64| SalaryComponent {
        id: Some(slip.id * 10 + id),
        component_id: Some(id),
        amount,
        kind,
        component_name: Some(name.to_string()),
        component_type: None,
    };
    vec![
        line(1, "Basic Salary", ComponentKind::Earning, slip.basic_salary),
        line(2, "Allowances", ComponentKind::Earning, slip.total_earnings - slip.basic_salary),
        line(3, "Provident Fund", ComponentKind::Deduction, provident_fund),
        line(4, "Income Tax", ComponentKind::Deduction, slip.total_deductions - provident_fund),
    ]
}

fn seed_user(id: i64, employee_id: &str, email: &str, first: &str, last: &str, role: Role) -> User {
    User {
        id,
        employee_id: Some(employee_id.to_string()),
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        role,
        department: Some("Operations".to_string()),
        position: None,
        hire_date: None,
        manager_id: None,
        must_change_password: false,
        created_at: None,
    }
}

fn seed_type(id: i64, name: &str, description: &str, max_days: f64, is_active: bool) -> LeaveType {
    LeaveType {
        id,
        name: name.to_string(),
        description: Some(description.to_string()),
        max_days,
        is_active,
    }
}

fn seed_request(
    id: LeaveRequestId,
    user_id: i64,
    leave_type_id: i64,
    start_date: Date,
    end_date: Date,
    total_days: f64,
    reason: &str,
    status: LeaveStatus,
) -> LeaveRequest {
    LeaveRequest {
        id,
        user_id: Some(user_id),
        leave_type_id,
        start_date,
        end_date,
        total_days,
        is_half_day: false,
        half_day_period: None,
        reason: Some(reason.to_string()),
        status,
        team_leader_approval_date: None,
        hr_approval_date: (status == LeaveStatus::HrApproved)
            .then(|| start_date.midnight().assume_utc()),
        rejection_reason: None,
        attachment_url: None,
        created_at: Some(start_date.midnight().assume_utc()),
        user: None,
        leave_type: None,
    }
}

fn seed_slip(id: i64, year: i32, month: i64) -> SalarySlip {
    let basic = 4200.0;
    let earnings = basic + 350.0;
    let deductions = 610.25;
    SalarySlip {
        id,
        month_year: format!("{year:04}-{month:02}"),
        basic_salary: basic,
        total_earnings: earnings,
        total_deductions: deductions,
        net_salary: earnings - deductions,
        status: if month < 3 { SalaryStatus::Paid } else { SalaryStatus::Generated },
        pdf_url: Some(format!("/salary/{id}/pdf")),
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn employees_only_see_their_own_requests() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let hr = backend.login(InMemoryBackend::HR_EMAIL, InMemoryBackend::PASSWORD).await.unwrap();
        let emp = backend
            .login(InMemoryBackend::EMPLOYEE_EMAIL, InMemoryBackend::PASSWORD)
            .await
            .unwrap();

        let hr_view = backend.leave_requests(&hr.token, RequestFilter::all()).await.unwrap();
        let emp_view = backend.leave_requests(&emp.token, RequestFilter::all()).await.unwrap();
        assert_eq!(hr_view.len(), 3);
        assert!(emp_view.iter().all(|r| r.user_id == Some(emp.user.id)));

        let pending = backend.leave_requests(&hr.token, RequestFilter::pending()).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].type_name(), "Sick Leave");
        assert!(pending[0].user.is_some());
    }

    #[tokio::test]
    async fn unknown_token_is_unauthenticated() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let err = backend.leave_types("nope").await.unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn reject_after_final_approval_conflicts() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let hr = backend.login(InMemoryBackend::HR_EMAIL, InMemoryBackend::PASSWORD).await.unwrap();
        let err = backend.reject(&hr.token, 1, "Too late").await.unwrap_err();
        assert!(err.is_state_conflict());
    }

    #[tokio::test]
    async fn salary_slips_are_filtered_by_year() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let emp = backend
            .login(InMemoryBackend::EMPLOYEE_EMAIL, InMemoryBackend::PASSWORD)
            .await
            .unwrap();
        assert_eq!(backend.salary_slips(&emp.token, 2024).await.unwrap().len(), 3);
        assert!(backend.salary_slips(&emp.token, 2023).await.unwrap().is_empty());

        let ytd = backend.ytd_earnings(&emp.token, 2024).await.unwrap();
        assert_eq!(ytd.months, Some(3));

        let pdf = backend.salary_pdf(&emp.token, 1).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn slip_detail_components_add_up() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let emp = backend
            .login(InMemoryBackend::EMPLOYEE_EMAIL, InMemoryBackend::PASSWORD)
            .await
            .unwrap();
        let detail = backend.salary_slip(&emp.token, 2).await.unwrap();
        assert_eq!(detail.salary.month_year, "2024-02");

        let earned: f64 = detail.earnings().map(|c| c.amount).sum();
        let deducted: f64 = detail.deductions().map(|c| c.amount).sum();
        assert!((earned - detail.salary.total_earnings).abs() < 1e-9);
        assert!((deducted - detail.salary.total_deductions).abs() < 1e-9);

        let err = backend.salary_slip(&emp.token, 99).await.unwrap_err();
        assert!(err.is_state_conflict());
    }

    #[tokio::test]
    async fn dashboard_is_hr_only() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let hr = backend.login(InMemoryBackend::HR_EMAIL, InMemoryBackend::PASSWORD).await.unwrap();
        let emp = backend
            .login(InMemoryBackend::EMPLOYEE_EMAIL, InMemoryBackend::PASSWORD)
            .await
            .unwrap();

        let metrics = backend.dashboard(&hr.token).await.unwrap();
        assert_eq!(metrics.total_employees, Some(2));
        assert_eq!(metrics.pending_leave_requests, Some(1));

        let err = backend.dashboard(&emp.token).await.unwrap_err();
        assert!(matches!(err, LeaveError::Forbidden(_)));
    }

    #[tokio::test]
    async fn managers_cannot_delete_themselves() {
        let backend = InMemoryBackend::seeded_for_year(2024);
        let hr = backend.login(InMemoryBackend::HR_EMAIL, InMemoryBackend::PASSWORD).await.unwrap();
        let err = backend.delete_user(&hr.token, hr.user.id).await.unwrap_err();
        assert!(err.is_state_conflict());
        assert_eq!(backend.departments(&hr.token).await.unwrap(), vec!["Operations"]);
    }
}
