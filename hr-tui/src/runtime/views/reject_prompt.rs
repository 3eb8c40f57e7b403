use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hr_client::LeaveError;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_reject_prompt_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(prompt) = app.reject_prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            prompt.input.insert(c);
            prompt.error = None;
        }
        KeyCode::Backspace => prompt.input.backspace(),
        KeyCode::Left => prompt.input.move_left(),
        KeyCode::Right => prompt.input.move_right(),
        KeyCode::Enter => {
            if app.deciding.is_some() {
                return;
            }
            let reason = prompt.input.value.trim().to_string();
            if reason.is_empty() {
                prompt.error = Some(LeaveError::EmptyRejectionReason.to_string());
                return;
            }
            let request_id = prompt.request_id;
            let Some(request) = app
                .pending_requests
                .iter()
                .find(|r| r.id == request_id)
                .cloned()
            else {
                app.close_reject_prompt();
                return;
            };
            app.deciding = Some(request_id);
            enqueue_action(action_tx, Action::Reject { request, reason });
        }
        KeyCode::Esc => app.close_reject_prompt(),
        _ => {}
    }
}
