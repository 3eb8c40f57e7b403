use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};
use hr_client::domain::Approver;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

const DECISION_IN_FLIGHT: &str = "Still waiting on the previous decision";

pub(super) fn handle_approvals_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_row(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_row(),
        KeyCode::Char('a') | KeyCode::Enter => {
            if app.deciding.is_some() {
                app.set_status(DECISION_IN_FLIGHT);
                return;
            }
            let Some(request) = app.selected_pending_request().cloned() else {
                return;
            };
            if app.selected_approval().is_none() {
                app.set_error(format!("Request is already {}", request.status.label()));
                return;
            }
            app.deciding = Some(request.id);
            enqueue_action(
                action_tx,
                Action::Approve {
                    request,
                    approved_by: Approver::Hr,
                },
            );
        }
        KeyCode::Char('x') => {
            if app.deciding.is_some() {
                app.set_status(DECISION_IN_FLIGHT);
                return;
            }
            app.open_reject_prompt();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::action_queue::channel;
    use super::*;
    use crate::app::test_support::{hr_app, request};
    use crossterm::event::KeyModifiers;
    use hr_client::domain::LeaveStatus;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn approve_queues_hr_approval() {
        let mut app = hr_app();
        app.pending_requests = vec![request(7, LeaveStatus::TeamLeaderApproved)];
        let (tx, mut rx) = channel();
        handle_approvals_key(press('a'), &mut app, &tx);
        match rx.try_recv() {
            Ok(Action::Approve {
                request,
                approved_by,
            }) => {
                assert_eq!(request.id, 7);
                assert_eq!(approved_by, Approver::Hr);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.deciding, Some(7));
    }

    #[test]
    fn second_press_waits_for_the_first_decision() {
        let mut app = hr_app();
        app.pending_requests = vec![request(7, LeaveStatus::Pending)];
        let (tx, mut rx) = channel();
        handle_approvals_key(press('a'), &mut app, &tx);
        handle_approvals_key(press('a'), &mut app, &tx);
        handle_approvals_key(press('x'), &mut app, &tx);

        assert!(matches!(rx.try_recv(), Ok(Action::Approve { .. })));
        assert!(rx.try_recv().is_err());
        assert!(app.reject_prompt.is_none());
    }

    #[test]
    fn decided_request_is_not_sent() {
        let mut app = hr_app();
        app.pending_requests = vec![request(7, LeaveStatus::Rejected)];
        let (tx, mut rx) = channel();
        handle_approvals_key(press('a'), &mut app, &tx);
        assert!(rx.try_recv().is_err());
        assert!(app.status_message.as_ref().unwrap().is_error);
        assert_eq!(app.deciding, None);

        handle_approvals_key(press('x'), &mut app, &tx);
        assert!(app.reject_prompt.is_none());
    }

    #[test]
    fn x_opens_reject_prompt() {
        let mut app = hr_app();
        app.pending_requests = vec![request(3, LeaveStatus::Pending)];
        let (tx, _rx) = channel();
        handle_approvals_key(press('x'), &mut app, &tx);
        assert_eq!(app.reject_prompt.as_ref().unwrap().request_id, 3);
    }
}
