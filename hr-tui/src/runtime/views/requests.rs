use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

pub(super) fn handle_my_requests_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_row(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_row(),
        _ => {}
    }
}
