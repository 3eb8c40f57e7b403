use hr_client::domain::{DashboardMetrics, LeaveBalance, LeaveRequest, LeaveRequestId};
use hr_client::{LeaveCatalog, LeaveDraft, LeaveSnapshot, RefreshSequencer, RequestScope, Session};
use time::Date;

mod form;
mod navigation;
mod state;
mod users;
pub use state::{
    RejectPrompt, RequestField, RequestForm, SalaryState, StatusMessage, Tab, TextInput,
};
pub use users::{ConfirmKind, UserField, UserForm, UsersState};

pub struct App {
    pub running: bool,
    pub session: Session,
    pub today: Date,
    pub current_tab: Tab,
    pub status_message: Option<StatusMessage>,

    // Last snapshot applied from the server
    pub catalog: LeaveCatalog,
    pub my_requests: Vec<LeaveRequest>,
    pub pending_requests: Vec<LeaveRequest>,
    pub my_requests_selected: usize,
    pub approvals_selected: usize,

    // Request form
    pub draft: LeaveDraft,
    pub form: RequestForm,
    pub focused_field: RequestField,
    pub submitting: bool,

    // Shown over the approvals list while typing a rejection reason
    pub reject_prompt: Option<RejectPrompt>,
    // Approve/reject sent and not yet answered
    pub deciding: Option<LeaveRequestId>,

    pub salary: SalaryState,

    // HR only
    pub dashboard: Option<DashboardMetrics>,
    pub dashboard_loaded: bool,
    pub users: UsersState,

    // Loading indicator
    pub in_flight: usize,
    pub throbber_state: throbber_widgets_tui::ThrobberState,

    pub refresh_seq: RefreshSequencer,
}

impl App {
    pub fn new(session: Session, today: Date) -> Self {
        let mut app = Self {
            running: true,
            session,
            today,
            current_tab: Tab::Balance,
            status_message: None,
            catalog: LeaveCatalog::default(),
            my_requests: Vec::new(),
            pending_requests: Vec::new(),
            my_requests_selected: 0,
            approvals_selected: 0,
            draft: LeaveDraft::new(),
            form: RequestForm::default(),
            focused_field: RequestField::LeaveType,
            submitting: false,
            reject_prompt: None,
            deciding: None,
            salary: SalaryState::new(today.year()),
            dashboard: None,
            dashboard_loaded: false,
            users: UsersState::default(),
            in_flight: 0,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            refresh_seq: RefreshSequencer::new(),
        };
        if app.session.must_change_password() {
            app.set_status("Your password must be changed. Please update it in the web portal.");
        }
        app
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_work(&mut self) {
        self.in_flight += 1;
    }

    pub fn end_work(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn is_hr(&self) -> bool {
        self.session.is_hr()
    }

    pub fn balance_year(&self) -> i32 {
        self.today.year()
    }

    /// Request list that goes with a tab's refresh.
    pub fn scope_for(&self, tab: Tab) -> RequestScope {
        match tab {
            Tab::MyRequests => RequestScope::Mine,
            Tab::Approvals if self.is_hr() => RequestScope::PendingApprovals,
            _ => RequestScope::None,
        }
    }

    /// Balance for the leave type currently picked in the form, for the
    /// year the leave starts in.
    pub fn selected_balance(&self) -> Option<&LeaveBalance> {
        let type_id = self.draft.leave_type_id()?;
        let year = self
            .draft
            .start_date()
            .map(|d| d.year())
            .unwrap_or_else(|| self.balance_year());
        self.catalog.balance_for(type_id, year)
    }

    /// Replace everything the snapshot covers. Nothing is merged.
    pub fn apply_snapshot(&mut self, snapshot: LeaveSnapshot) {
        self.catalog = snapshot.catalog;
        match (snapshot.scope, snapshot.requests) {
            (RequestScope::Mine, Some(requests)) => {
                self.my_requests = requests;
                self.my_requests_selected = clamp_index(self.my_requests_selected, self.my_requests.len());
            }
            (RequestScope::PendingApprovals, Some(requests)) => {
                self.pending_requests = requests;
                self.approvals_selected = clamp_index(self.approvals_selected, self.pending_requests.len());
                let prompt_orphaned = self.reject_prompt.as_ref().is_some_and(|p| {
                    !self.pending_requests.iter().any(|r| r.id == p.request_id)
                });
                if prompt_orphaned {
                    self.reject_prompt = None;
                }
            }
            _ => {}
        }

        // A type that went inactive can't stay picked.
        if let Some(type_id) = self.draft.leave_type_id() {
            if !self.catalog.selectable_types().any(|t| t.id == type_id) {
                self.draft.set_leave_type(None);
            }
        }
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use hr_client::domain::{LeaveStatus, Role, User};
    use time::macros::date;

    pub fn request(id: i64, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id,
            user_id: Some(1),
            leave_type_id: 1,
            start_date: date!(2024 - 06 - 12),
            end_date: date!(2024 - 06 - 13),
            total_days: 2.0,
            is_half_day: false,
            half_day_period: None,
            reason: Some("Wedding".into()),
            status,
            team_leader_approval_date: None,
            hr_approval_date: None,
            rejection_reason: None,
            attachment_url: None,
            created_at: None,
            user: None,
            leave_type: None,
        }
    }

    pub fn user(id: i64, role: Role) -> User {
        User {
            id,
            employee_id: Some(format!("EMP{id:03}")),
            email: format!("user{id}@example.com"),
            first_name: "Test".to_string(),
            last_name: format!("User{id}"),
            role,
            department: None,
            position: None,
            hire_date: None,
            manager_id: None,
            must_change_password: false,
            created_at: None,
        }
    }

    pub fn employee_app() -> App {
        App::new(Session::new("employee-token", user(1, Role::Employee)), date!(2024 - 06 - 10))
    }

    pub fn hr_app() -> App {
        App::new(Session::new("hr-token", user(2, Role::HrManager)), date!(2024 - 06 - 10))
    }
}
