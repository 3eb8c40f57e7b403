use hr_client::domain::{HrAction, LeaveRequest};

use super::*;

impl App {
    /// Tabs this actor may open, in display order.
    pub fn visible_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|t| !t.requires_hr() || self.is_hr())
            .collect()
    }

    /// Switch tabs. Returns `false` when the tab isn't available to this actor.
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if tab.requires_hr() && !self.is_hr() {
            return false;
        }
        self.current_tab = tab;
        self.reject_prompt = None;
        true
    }

    pub fn next_tab(&mut self) -> Tab {
        self.step_tab(1)
    }

    pub fn previous_tab(&mut self) -> Tab {
        self.step_tab(-1)
    }

    fn step_tab(&mut self, delta: isize) -> Tab {
        let tabs = self.visible_tabs();
        let len = tabs.len() as isize;
        let current = tabs
            .iter()
            .position(|t| *t == self.current_tab)
            .unwrap_or(0) as isize;
        let next = tabs[((current + delta).rem_euclid(len)) as usize];
        self.select_tab(next);
        next
    }

    pub fn select_next_row(&mut self) {
        match self.current_tab {
            Tab::MyRequests => step(&mut self.my_requests_selected, self.my_requests.len(), 1),
            Tab::Approvals => step(&mut self.approvals_selected, self.pending_requests.len(), 1),
            Tab::Salary => step(&mut self.salary.selected, self.salary.slips.len(), 1),
            Tab::Users => step(&mut self.users.selected, self.users.users.len(), 1),
            _ => {}
        }
    }

    pub fn select_previous_row(&mut self) {
        match self.current_tab {
            Tab::MyRequests => step(&mut self.my_requests_selected, self.my_requests.len(), -1),
            Tab::Approvals => step(&mut self.approvals_selected, self.pending_requests.len(), -1),
            Tab::Salary => step(&mut self.salary.selected, self.salary.slips.len(), -1),
            Tab::Users => step(&mut self.users.selected, self.users.users.len(), -1),
            _ => {}
        }
    }

    pub fn selected_pending_request(&self) -> Option<&LeaveRequest> {
        self.pending_requests.get(self.approvals_selected)
    }

    /// The approval HR can give the selected request: a plain approve
    /// while pending, the final one after the team leader signed off.
    pub fn selected_approval(&self) -> Option<HrAction> {
        self.selected_pending_request()?
            .status
            .hr_actions()
            .iter()
            .copied()
            .find(|a| *a != HrAction::Reject)
    }

    pub fn open_reject_prompt(&mut self) {
        if let Some(request) = self.selected_pending_request() {
            if request.status.hr_actions().contains(&HrAction::Reject) {
                self.reject_prompt = Some(RejectPrompt {
                    request_id: request.id,
                    input: TextInput::new(),
                    error: None,
                });
            }
        }
    }

    pub fn close_reject_prompt(&mut self) {
        self.reject_prompt = None;
    }
}

fn step(index: &mut usize, len: usize, delta: isize) {
    if len == 0 {
        *index = 0;
        return;
    }
    *index = (*index as isize + delta).clamp(0, len as isize - 1) as usize;
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{employee_app, hr_app};
    use super::*;

    #[test]
    fn employees_do_not_get_approvals_tab() {
        let mut app = employee_app();
        assert!(!app.visible_tabs().contains(&Tab::Approvals));
        assert!(!app.select_tab(Tab::Approvals));
        assert_eq!(app.current_tab, Tab::Balance);

        app.select_tab(Tab::MyRequests);
        assert_eq!(app.next_tab(), Tab::Salary);
    }

    #[test]
    fn hr_tabs_include_approvals() {
        let mut app = hr_app();
        assert_eq!(app.visible_tabs().len(), 7);
        app.select_tab(Tab::MyRequests);
        assert_eq!(app.next_tab(), Tab::Approvals);
        app.select_tab(Tab::Balance);
        assert_eq!(app.previous_tab(), Tab::Users);
    }

    #[test]
    fn employees_do_not_get_admin_tabs() {
        let mut app = employee_app();
        assert!(!app.select_tab(Tab::Overview));
        assert!(!app.select_tab(Tab::Users));
        assert_eq!(app.visible_tabs().len(), 4);
    }

    #[test]
    fn approval_label_tracks_stage() {
        use hr_client::domain::LeaveStatus;

        let mut app = hr_app();
        let mut request = crate::app::test_support::request(1, LeaveStatus::Pending);
        app.pending_requests = vec![request.clone()];
        assert_eq!(app.selected_approval(), Some(HrAction::Approve));

        request.status = LeaveStatus::TeamLeaderApproved;
        app.pending_requests = vec![request.clone()];
        assert_eq!(app.selected_approval().map(HrAction::label), Some("Final Approve"));

        request.status = LeaveStatus::HrApproved;
        app.pending_requests = vec![request];
        assert_eq!(app.selected_approval(), None);
    }

    #[test]
    fn row_selection_stays_in_bounds() {
        let mut app = employee_app();
        app.select_tab(Tab::MyRequests);
        app.select_next_row();
        assert_eq!(app.my_requests_selected, 0);
        app.select_previous_row();
        assert_eq!(app.my_requests_selected, 0);
    }
}
