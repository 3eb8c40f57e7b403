use crate::app::{App, ConfirmKind, UserField};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_users_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.users.confirm.is_some() {
        handle_confirm_key(key, app, action_tx);
    } else if app.users.form.is_some() {
        handle_form_key(key, app, action_tx);
    } else if app.users.searching {
        handle_search_key(key, app, action_tx);
    } else {
        handle_list_key(key, app, action_tx);
    }
}

fn reload(app: &App, action_tx: &ActionTx) {
    enqueue_action(
        action_tx,
        Action::LoadUsers {
            filter: app.users.filter.clone(),
        },
    );
}

fn handle_list_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_row(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_row(),
        KeyCode::Char('/') => app.users.searching = true,
        KeyCode::Char('f') => {
            app.cycle_role_filter();
            reload(app, action_tx);
        }
        KeyCode::Char('g') => {
            app.cycle_department_filter();
            reload(app, action_tx);
        }
        KeyCode::Char('n') => app.open_user_form(),
        KeyCode::Char('p') => app.confirm_user_action(ConfirmKind::ResetPassword),
        KeyCode::Char('D') | KeyCode::Delete => app.confirm_user_action(ConfirmKind::Delete),
        _ => {}
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let search = &mut app.users.search;
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => search.insert(c),
        KeyCode::Backspace => search.backspace(),
        KeyCode::Left => search.move_left(),
        KeyCode::Right => search.move_right(),
        KeyCode::Enter => {
            app.users.searching = false;
            app.users.filter.search = app.users.search.value.trim().to_string();
            reload(app, action_tx);
        }
        KeyCode::Esc => {
            app.users.searching = false;
            app.users.search.clear();
            if !app.users.filter.search.is_empty() {
                app.users.filter.search.clear();
                reload(app, action_tx);
            }
        }
        _ => {}
    }
}

fn handle_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let actor = app.session.user().role.clone();
    let saving = app.users.saving;
    let Some(form) = app.users.form.as_mut() else {
        return;
    };
    let field = form.focused;
    match key.code {
        KeyCode::Esc => {
            app.users.form = None;
        }
        KeyCode::Down | KeyCode::Tab => form.focused = field.next(),
        KeyCode::Up | KeyCode::BackTab => form.focused = field.previous(),
        KeyCode::Left if field == UserField::Role => form.cycle_role(&actor, false),
        KeyCode::Right | KeyCode::Char(' ') if field == UserField::Role => {
            form.cycle_role(&actor, true)
        }
        KeyCode::Enter if field != UserField::Submit => form.focused = field.next(),
        KeyCode::Enter => {
            if saving {
                return;
            }
            match form.to_new_user(&actor) {
                Ok(user) => {
                    form.error = None;
                    enqueue_action(action_tx, Action::CreateUser { user });
                }
                Err(message) => form.error = Some(message),
            }
        }
        code => {
            let Some(input) = form.input_mut(field) else {
                return;
            };
            match code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.insert(c)
                }
                KeyCode::Backspace => input.backspace(),
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                _ => return,
            }
            form.error = None;
        }
    }
}

fn handle_confirm_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(confirm) = app.users.confirm.clone() else {
        return;
    };
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            if app.users.saving {
                return;
            }
            let action = match confirm.kind {
                ConfirmKind::ResetPassword => Action::ResetPassword {
                    user_id: confirm.user_id,
                },
                ConfirmKind::Delete => Action::DeleteUser {
                    user_id: confirm.user_id,
                },
            };
            app.users.saving = true;
            enqueue_action(action_tx, action);
        }
        KeyCode::Char('n') | KeyCode::Esc => app.users.confirm = None,
        _ => {}
    }
}
