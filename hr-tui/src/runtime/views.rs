use crate::app::{App, Tab};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod approvals;
mod reject_prompt;
mod request_form;
mod requests;
mod salary;
mod users;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Queue whatever a tab needs to show fresh data.
pub(super) fn refresh_tab(app: &App, action_tx: &ActionTx) {
    match app.current_tab {
        Tab::Salary => enqueue_action(
            action_tx,
            Action::LoadSalary {
                year: app.salary.year,
            },
        ),
        Tab::Overview => enqueue_action(action_tx, Action::LoadDashboard),
        Tab::Users => enqueue_action(
            action_tx,
            Action::LoadUsers {
                filter: app.users.filter.clone(),
            },
        ),
        tab => enqueue_action(
            action_tx,
            Action::Refresh {
                scope: app.scope_for(tab),
            },
        ),
    }
}

fn switch_tab(app: &mut App, tab: Tab, action_tx: &ActionTx) {
    if app.current_tab != tab && app.select_tab(tab) {
        refresh_tab(app, action_tx);
    }
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.reject_prompt.is_some() {
        reject_prompt::handle_reject_prompt_key(key, app, action_tx);
        return;
    }

    // Dialogs and the search box own every key until they close.
    match app.current_tab {
        Tab::Salary if app.salary.detail.is_some() => {
            salary::handle_salary_key(key, app, action_tx);
            return;
        }
        Tab::Users if app.users.captures_keys() => {
            users::handle_users_key(key, app, action_tx);
            return;
        }
        _ => {}
    }

    match key.code {
        KeyCode::Tab => {
            let tab = app.next_tab();
            refresh_tab(app, action_tx);
            tracing::debug!(?tab, "switched tab");
            return;
        }
        KeyCode::BackTab => {
            app.previous_tab();
            refresh_tab(app, action_tx);
            return;
        }
        _ => {}
    }

    // The request form owns character keys while a text field is focused.
    let typing = app.current_tab == Tab::Request && app.focused_field.is_text();
    if !typing {
        if let KeyCode::Char(c) = key.code {
            let jump = match c {
                'q' | 'Q' => {
                    app.quit();
                    return;
                }
                'r' if app.current_tab != Tab::Request => {
                    refresh_tab(app, action_tx);
                    return;
                }
                '1'..='9' => app.visible_tabs().get((c as usize) - ('1' as usize)).copied(),
                _ => None,
            };
            if let Some(tab) = jump {
                switch_tab(app, tab, action_tx);
                return;
            }
        }
    }

    match app.current_tab {
        Tab::Balance => {}
        Tab::Request => request_form::handle_request_form_key(key, app, action_tx),
        Tab::MyRequests => requests::handle_my_requests_key(key, app),
        Tab::Approvals => approvals::handle_approvals_key(key, app, action_tx),
        Tab::Salary => salary::handle_salary_key(key, app, action_tx),
        Tab::Overview => {}
        Tab::Users => users::handle_users_key(key, app, action_tx),
    }
}

#[cfg(test)]
mod tests {
    use super::super::action_queue::channel;
    use super::*;
    use crate::app::test_support::{employee_app, hr_app};
    use hr_client::RequestScope;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tab_switch_queues_refresh_for_new_tab() {
        let mut app = employee_app();
        let (tx, mut rx) = channel();
        handle_key(press(KeyCode::Char('3')), &mut app, &tx);
        assert_eq!(app.current_tab, Tab::MyRequests);
        assert!(matches!(
            rx.try_recv(),
            Ok(Action::Refresh {
                scope: RequestScope::Mine
            })
        ));
    }

    #[test]
    fn employee_number_keys_skip_approvals() {
        let mut app = employee_app();
        let (tx, mut rx) = channel();
        handle_key(press(KeyCode::Char('4')), &mut app, &tx);
        assert_eq!(app.current_tab, Tab::Salary);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadSalary { .. })));
        handle_key(press(KeyCode::Char('5')), &mut app, &tx);
        assert_eq!(app.current_tab, Tab::Salary);
    }

    #[test]
    fn hr_reaches_approvals() {
        let mut app = hr_app();
        let (tx, mut rx) = channel();
        handle_key(press(KeyCode::Char('4')), &mut app, &tx);
        assert_eq!(app.current_tab, Tab::Approvals);
        assert!(matches!(
            rx.try_recv(),
            Ok(Action::Refresh {
                scope: RequestScope::PendingApprovals
            })
        ));
    }

    #[test]
    fn hr_admin_tabs_load_their_data() {
        let mut app = hr_app();
        let (tx, mut rx) = channel();
        handle_key(press(KeyCode::Char('6')), &mut app, &tx);
        assert_eq!(app.current_tab, Tab::Overview);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadDashboard)));

        handle_key(press(KeyCode::Char('7')), &mut app, &tx);
        assert_eq!(app.current_tab, Tab::Users);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadUsers { .. })));
    }

    #[test]
    fn q_is_typed_into_user_search() {
        let mut app = hr_app();
        let (tx, _rx) = channel();
        app.select_tab(Tab::Users);
        handle_key(press(KeyCode::Char('/')), &mut app, &tx);
        handle_key(press(KeyCode::Char('q')), &mut app, &tx);
        assert!(app.running);
        assert_eq!(app.users.search.value, "q");
    }

    #[test]
    fn q_types_into_reason_instead_of_quitting() {
        let mut app = employee_app();
        let (tx, _rx) = channel();
        app.select_tab(Tab::Request);
        app.focused_field = crate::app::RequestField::Reason;
        handle_key(press(KeyCode::Char('q')), &mut app, &tx);
        assert!(app.running);
        assert_eq!(app.draft.reason(), "q");

        app.focused_field = crate::app::RequestField::LeaveType;
        handle_key(press(KeyCode::Char('q')), &mut app, &tx);
        assert!(!app.running);
    }
}
