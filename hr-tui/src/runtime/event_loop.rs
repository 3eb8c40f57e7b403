use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use super::action_queue::{channel, outcome_channel};
use super::actions::{apply_outcome, run_action};
use super::views::{handle_key, refresh_tab};
use super::Services;

/// Draw, read keys, start queued work, fold finished work back in. Nothing
/// here waits on the network.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    services: &Services,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let (outcome_tx, mut outcome_rx) = outcome_channel();

    refresh_tab(app, &action_tx);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_loading() {
            app.throbber_state.calc_next();
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app, &action_tx);
                }
            }
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, services, &outcome_tx);
        }

        while let Ok(outcome) = outcome_rx.try_recv() {
            apply_outcome(outcome, app, &action_tx);
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
