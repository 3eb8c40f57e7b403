use crate::app::{App, RequestField};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_request_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        submit(app, action_tx);
        return;
    }

    let field = app.focused_field;
    match key.code {
        KeyCode::Down => app.form_focus_next(),
        KeyCode::Up => app.form_focus_previous(),
        KeyCode::Esc => {
            app.reset_form();
            app.set_status("Form cleared");
        }
        KeyCode::Enter if field == RequestField::Submit => submit(app, action_tx),
        KeyCode::Enter => app.form_focus_next(),
        KeyCode::Left if field == RequestField::LeaveType => app.cycle_leave_type(false),
        KeyCode::Right | KeyCode::Char(' ') if field == RequestField::LeaveType => {
            app.cycle_leave_type(true)
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if field == RequestField::HalfDay => {
            app.toggle_half_day()
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if field == RequestField::HalfDayPeriod =>
        {
            app.toggle_half_day_period()
        }
        KeyCode::Left => app.form_cursor_left(),
        KeyCode::Right => app.form_cursor_right(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form_input_char(c)
        }
        _ => {}
    }
}

/// One submission at a time, and only for a draft that passes every check.
fn submit(app: &mut App, action_tx: &ActionTx) {
    if app.submitting {
        app.set_status("Submitting...");
        return;
    }
    let issues = app.draft.issues(app.selected_balance());
    if let Some(issue) = issues.first() {
        app.set_error(issue.message());
        return;
    }
    app.submitting = true;
    enqueue_action(action_tx, Action::SubmitDraft);
}

#[cfg(test)]
mod tests {
    use super::super::super::action_queue::channel;
    use super::*;
    use crate::app::test_support::employee_app;
    use crate::app::Tab;
    use hr_client::domain::{HalfDayPeriod, LeaveBalance, LeaveType};
    use time::macros::date;

    fn ready_app(remaining: f64) -> App {
        let mut app = employee_app();
        app.select_tab(Tab::Request);
        app.catalog.types = vec![LeaveType {
            id: 1,
            name: "Annual".into(),
            description: None,
            max_days: 20.0,
            is_active: true,
        }];
        app.catalog.balances = vec![LeaveBalance {
            id: 1,
            user_id: Some(1),
            leave_type_id: 1,
            total_days: 20.0,
            used_days: 20.0 - remaining,
            remaining_days: remaining,
            year: app.today.year(),
            leave_type: None,
        }];
        app.draft.set_leave_type(Some(1));
        app.draft.set_start_date(Some(date!(2024 - 07 - 01)));
        app.draft.set_end_date(Some(date!(2024 - 07 - 03)));
        app.draft.set_reason("Holiday");
        app.focused_field = RequestField::Submit;
        app
    }

    fn enter() -> KeyEvent {
        KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
    }

    #[test]
    fn double_enter_submits_once() {
        let mut app = ready_app(10.0);
        let (tx, mut rx) = channel();
        handle_request_form_key(enter(), &mut app, &tx);
        handle_request_form_key(enter(), &mut app, &tx);
        assert!(matches!(rx.try_recv(), Ok(Action::SubmitDraft)));
        assert!(rx.try_recv().is_err());
        assert!(app.submitting);
    }

    #[test]
    fn insufficient_balance_blocks_submit() {
        let mut app = ready_app(2.0);
        let (tx, mut rx) = channel();
        handle_request_form_key(enter(), &mut app, &tx);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            app.status_message.as_ref().unwrap().text,
            "You are requesting 3 days, but only 2 days are available."
        );
    }

    #[test]
    fn half_day_without_period_is_refused() {
        let mut app = ready_app(10.0);
        app.toggle_half_day();
        let (tx, mut rx) = channel();
        handle_request_form_key(enter(), &mut app, &tx);
        assert!(rx.try_recv().is_err());

        app.draft.set_half_day_period(Some(HalfDayPeriod::Morning));
        handle_request_form_key(enter(), &mut app, &tx);
        assert!(matches!(rx.try_recv(), Ok(Action::SubmitDraft)));
    }

    #[test]
    fn space_toggles_half_day() {
        let mut app = ready_app(10.0);
        app.focused_field = RequestField::HalfDay;
        let (tx, _rx) = channel();
        handle_request_form_key(
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
            &mut app,
            &tx,
        );
        assert!(app.draft.is_half_day());
        assert_eq!(app.draft.requested_days(), 0.5);
    }
}
