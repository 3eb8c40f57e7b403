use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_salary_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if let Some(detail) = &app.salary.detail {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.salary.detail = None,
            KeyCode::Char('d') => {
                let salary_id = detail.salary.id;
                enqueue_action(action_tx, Action::DownloadSlip { salary_id });
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_row(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_row(),
        KeyCode::Left | KeyCode::Char('h') => change_year(app, -1, action_tx),
        KeyCode::Right | KeyCode::Char('l') => change_year(app, 1, action_tx),
        KeyCode::Char('d') => {
            if let Some(slip) = app.salary.selected_slip() {
                enqueue_action(action_tx, Action::DownloadSlip { salary_id: slip.id });
            }
        }
        KeyCode::Enter => {
            if let Some(slip) = app.salary.selected_slip() {
                enqueue_action(action_tx, Action::LoadSlipDetail { salary_id: slip.id });
            }
        }
        _ => {}
    }
}

fn change_year(app: &mut App, delta: i32, action_tx: &ActionTx) {
    let year = app.salary.year + delta;
    if year > app.today.year() {
        return;
    }
    app.salary = crate::app::SalaryState::new(year);
    enqueue_action(action_tx, Action::LoadSalary { year });
}

#[cfg(test)]
mod tests {
    use super::super::super::action_queue::channel;
    use super::*;
    use crate::app::test_support::employee_app;
    use crossterm::event::KeyModifiers;
    use hr_client::domain::{SalarySlip, SalarySlipDetail, SalaryStatus};

    #[test]
    fn year_steps_back_but_not_past_today() {
        let mut app = employee_app();
        let (tx, mut rx) = channel();
        let this_year = app.today.year();

        handle_salary_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), &mut app, &tx);
        assert!(rx.try_recv().is_err());

        handle_salary_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(app.salary.year, this_year - 1);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadSalary { year }) if year == this_year - 1));
    }

    #[test]
    fn enter_opens_detail_and_esc_closes_it() {
        let mut app = employee_app();
        let (tx, mut rx) = channel();
        let slip = SalarySlip {
            id: 5,
            month_year: "2024-05".to_string(),
            basic_salary: 4200.0,
            total_earnings: 4550.0,
            total_deductions: 610.25,
            net_salary: 3939.75,
            status: SalaryStatus::Paid,
            pdf_url: None,
            created_at: None,
        };
        app.salary.slips = vec![slip.clone()];

        handle_salary_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut app, &tx);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadSlipDetail { salary_id: 5 })));

        app.salary.detail = Some(SalarySlipDetail {
            salary: slip,
            components: Vec::new(),
        });
        handle_salary_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE), &mut app, &tx);
        assert!(matches!(rx.try_recv(), Ok(Action::DownloadSlip { salary_id: 5 })));
        handle_salary_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &mut app, &tx);
        assert!(app.salary.detail.is_none());
    }
}
