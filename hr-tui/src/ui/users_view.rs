use crate::app::{ConfirmKind, TextInput, UserField, UserForm};

use super::utils::centered_rect;
use super::*;

pub fn render_users_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    render_filter_bar(frame, chunks[0], app);

    let title = format!(" Users ({}) ", app.users.users.len());
    if app.users.users.is_empty() {
        let message = if app.users.loaded {
            "No users match the current filters"
        } else {
            "Loading..."
        };
        render_empty(frame, chunks[1], title, message);
        return;
    }

    let rows: Vec<Row> = app
        .users
        .users
        .iter()
        .map(|u| {
            Row::new(vec![
                Cell::from(u.employee_id.clone().unwrap_or_default()),
                Cell::from(u.full_name()),
                Cell::from(u.email.clone()),
                Cell::from(Span::styled(
                    u.role.label().to_string(),
                    Style::default().fg(if u.is_hr() { Color::Cyan } else { Color::White }),
                )),
                Cell::from(u.department.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(u.position.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let header = Row::new(vec!["ID", "Name", "Email", "Role", "Department", "Position"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(10),
            Constraint::Percentage(20),
            Constraint::Percentage(26),
            Constraint::Percentage(14),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .block(titled_block(title));

    let mut state = TableState::default().with_selected(Some(app.users.selected));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::DarkGray);
    let users = &app.users;
    let mut spans = vec![Span::styled("Search ", label)];
    if users.searching {
        let (before, after) = users.search.split_at_cursor();
        spans.push(Span::raw(before.to_string()));
        spans.push(Span::styled("▏", Style::default().fg(Color::Magenta)));
        spans.push(Span::raw(after.to_string()));
    } else if users.filter.search.is_empty() {
        spans.push(Span::styled("(none)", label));
    } else {
        spans.push(Span::raw(users.filter.search.clone()));
    }
    spans.push(Span::styled("  Role ", label));
    spans.push(Span::raw(
        users
            .filter
            .role
            .as_ref()
            .map(|r| r.label().to_string())
            .unwrap_or_else(|| "All".to_string()),
    ));
    spans.push(Span::styled("  Department ", label));
    spans.push(Span::raw(
        users.filter.department.clone().unwrap_or_else(|| "All".to_string()),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(titled_block(" Filters ".to_string())),
        area,
    );
}

pub fn render_user_form(frame: &mut Frame, app: &App, form: &UserForm) {
    let area = centered_rect(64, 16, frame.area());
    frame.render_widget(Clear, area);

    let field_line = |field: UserField, value: Line<'static>| {
        let style = if form.focused == field {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![Span::styled(format!("{:<12}", field.label()), style)];
        spans.extend(value.spans);
        Line::from(spans)
    };
    let text = |field: UserField, input: &TextInput, hint: &'static str| {
        let value = if form.focused == field {
            let (before, after) = input.split_at_cursor();
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled("▏", Style::default().fg(Color::Magenta)),
                Span::raw(after.to_string()),
            ])
        } else if input.value.is_empty() {
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(Span::raw(input.value.clone()))
        };
        field_line(field, value)
    };

    let role = if form.focused == UserField::Role {
        format!("◀ {} ▶", form.role.label())
    } else {
        form.role.label().to_string()
    };
    let mut lines = vec![
        text(UserField::FirstName, &form.first_name, "required"),
        text(UserField::LastName, &form.last_name, "required"),
        text(UserField::Email, &form.email, "required"),
        field_line(UserField::Role, Line::from(Span::raw(role))),
        text(UserField::Department, &form.department, "optional"),
        text(UserField::Position, &form.position, "optional"),
        text(UserField::HireDate, &form.hire_date, "YYYY-MM-DD"),
        Line::from(""),
    ];

    let submit_label = if app.users.saving {
        "[ Creating... ]"
    } else {
        "[ Create User ]"
    };
    let submit_style = if form.focused == UserField::Submit {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    lines.push(Line::from(Span::styled(submit_label, submit_style)));

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(": Field  "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(": Role  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ]));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(Span::styled(" New User ", Style::default().fg(Color::Magenta)))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}

pub fn render_user_confirm(frame: &mut Frame, app: &App) {
    let Some(confirm) = &app.users.confirm else {
        return;
    };
    let area = centered_rect(56, 7, frame.area());
    frame.render_widget(Clear, area);

    let (title, question) = match confirm.kind {
        ConfirmKind::ResetPassword => (
            " Reset Password ",
            format!("Send a password reset to {}?", confirm.name),
        ),
        ConfirmKind::Delete => (" Delete User ", format!("Delete {}? This cannot be undone.", confirm.name)),
    };
    let lines = vec![
        Line::from(Span::styled(question, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::raw(": Confirm  "),
            Span::styled("n/Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": Cancel"),
        ]),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(title, Style::default().fg(Color::Red)))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}
