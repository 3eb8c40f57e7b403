use crate::app::{App, Tab};
use hr_client::domain::HrAction;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

mod balance_view;
mod overview_view;
mod reject_dialog;
mod request_form;
mod requests_view;
mod salary_view;
mod slip_dialog;
mod users_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status
            Constraint::Length(1), // Controls
        ])
        .split(frame.area());

    render_header(frame, root[0], app);

    let body = root[1];
    match app.current_tab {
        Tab::Balance => balance_view::render_balance_view(frame, app, body),
        Tab::Request => request_form::render_request_form(frame, app, body),
        Tab::MyRequests => requests_view::render_my_requests(frame, app, body),
        Tab::Approvals => requests_view::render_pending_approvals(frame, app, body),
        Tab::Salary => salary_view::render_salary_view(frame, app, body),
        Tab::Overview => overview_view::render_overview(frame, app, body),
        Tab::Users => users_view::render_users_view(frame, app, body),
    }

    render_status(frame, root[2], app);
    render_controls(frame, root[3], app);

    if app.reject_prompt.is_some() {
        reject_dialog::render_reject_dialog(frame, app);
    }
    match app.current_tab {
        Tab::Salary => slip_dialog::render_slip_dialog(frame, app),
        Tab::Users => {
            if let Some(form) = &app.users.form {
                users_view::render_user_form(frame, app, form);
            }
            users_view::render_user_confirm(frame, app);
        }
        _ => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(34)])
        .split(area);

    let tabs = app.visible_tabs();
    let selected = tabs.iter().position(|t| *t == app.current_tab).unwrap_or(0);
    let titles: Vec<Line> = tabs
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    let widget = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(" HR Leave Desk "))
        .highlight_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(widget, cols[0]);

    let user = app.session.user();
    let who = Paragraph::new(Line::from(vec![
        Span::styled(user.full_name(), Style::default().fg(Color::White)),
        Span::styled(
            format!(" ({})", user.role.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(who, cols[1]);

    if app.is_loading() {
        let throbber_area = Rect {
            x: cols[1].x + 1,
            y: cols[1].y + 1,
            width: 2,
            height: 1,
        };
        let throbber = throbber_widgets_tui::Throbber::default()
            .style(Style::default().fg(Color::Yellow))
            .throbber_style(Style::default().fg(Color::Yellow))
            .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
            .use_type(throbber_widgets_tui::WhichUse::Spin);
        frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let Some(status) = &app.status_message else {
        return;
    };
    let color = if status.is_error {
        Color::Red
    } else {
        Color::Green
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status.text.as_str(), Style::default().fg(color))),
        area,
    );
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let hints = control_hints(app);

    let mut spans = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Switch tab  "),
    ];
    for (key, label) in hints {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(": {label}  ")));
    }
    spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(": Quit"));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// Key hints for the current tab. Approvals follow what the selected
/// request allows.
fn control_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    match app.current_tab {
        Tab::Request => vec![
            ("↑/↓", "Field"),
            ("←/→", "Change"),
            ("Enter", "Next/Submit"),
            ("Ctrl+S", "Submit"),
            ("Esc", "Clear"),
        ],
        Tab::Approvals => {
            let mut hints = vec![("j/k", "Select")];
            if let Some(approval) = app.selected_approval() {
                hints.push(("a", approval.label()));
            }
            let can_reject = app
                .selected_pending_request()
                .is_some_and(|r| r.status.hr_actions().contains(&HrAction::Reject));
            if can_reject {
                hints.push(("x", HrAction::Reject.label()));
            }
            hints.push(("r", "Refresh"));
            hints
        }
        Tab::Salary if app.salary.detail.is_some() => vec![("d", "Download PDF"), ("Esc", "Close")],
        Tab::Salary => vec![
            ("j/k", "Select"),
            ("h/l", "Year"),
            ("Enter", "Details"),
            ("d", "Download PDF"),
            ("r", "Refresh"),
        ],
        Tab::MyRequests => vec![("j/k", "Select"), ("r", "Refresh")],
        Tab::Balance | Tab::Overview => vec![("r", "Refresh")],
        Tab::Users if app.users.searching => vec![("Enter", "Apply"), ("Esc", "Clear search")],
        Tab::Users => {
            let mut hints = vec![
                ("j/k", "Select"),
                ("/", "Search"),
                ("f", "Role"),
                ("g", "Department"),
                ("n", "New"),
                ("p", "Reset password"),
            ];
            if app.can_delete_users() {
                hints.push(("D", "Delete"));
            }
            hints
        }
    }
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1))
}

fn render_empty(frame: &mut Frame, area: Rect, title: String, message: &str) {
    let empty = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(titled_block(title));
    frame.render_widget(empty, area);
}
