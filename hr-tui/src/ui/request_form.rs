use crate::app::{RequestField, TextInput};
use hr_client::domain::{serde_helpers::format_days, UNKNOWN_LEAVE_TYPE};
use hr_client::BalanceCheck;

use super::*;

pub fn render_request_form(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body);

    render_fields(frame, chunks[0], app);
    render_summary(frame, chunks[1], app);
}

fn render_fields(frame: &mut Frame, area: Rect, app: &App) {
    let draft = &app.draft;
    let type_name = draft
        .leave_type_id()
        .map(|id| {
            app.catalog
                .leave_type(id)
                .map(|t| t.name.as_str())
                .unwrap_or(UNKNOWN_LEAVE_TYPE)
        })
        .unwrap_or("Select leave type");

    let mut lines = vec![
        choice_line(app, RequestField::LeaveType, "Leave type", type_name),
        choice_line(
            app,
            RequestField::HalfDay,
            "Half day",
            if draft.is_half_day() { "Yes" } else { "No" },
        ),
    ];
    if draft.is_half_day() {
        lines.push(choice_line(
            app,
            RequestField::HalfDayPeriod,
            "Period",
            draft
                .half_day_period()
                .map(|p| p.label())
                .unwrap_or("Choose morning or evening"),
        ));
    }
    lines.push(text_line(app, RequestField::StartDate, "Start date", &app.form.start_input));
    lines.push(text_line(app, RequestField::EndDate, "End date", &app.form.end_input));
    lines.push(text_line(app, RequestField::Reason, "Reason", &app.form.reason_input));
    lines.push(text_line(
        app,
        RequestField::Attachment,
        "Attachment",
        &app.form.attachment_input,
    ));
    lines.push(Line::from(""));

    let submit_label = if app.submitting {
        "[ Submitting... ]"
    } else {
        "[ Submit Request ]"
    };
    let submit_style = if app.focused_field == RequestField::Submit {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else if draft.can_submit(app.selected_balance()) && !app.submitting {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(submit_label, submit_style)));

    let form = Paragraph::new(lines).block(titled_block(" Request Leave ".to_string()));
    frame.render_widget(form, area);
}

fn label_span(app: &App, field: RequestField, label: &str) -> Span<'static> {
    let style = if app.focused_field == field {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{label:<12}"), style)
}

fn choice_line(app: &App, field: RequestField, label: &str, value: &str) -> Line<'static> {
    let focused = app.focused_field == field;
    let value = if focused {
        format!("◀ {value} ▶")
    } else {
        value.to_string()
    };
    Line::from(vec![
        label_span(app, field, label),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn text_line(app: &App, field: RequestField, label: &str, input: &TextInput) -> Line<'static> {
    let locked = field == RequestField::EndDate && app.draft.is_half_day();
    let value_style = if locked {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![label_span(app, field, label)];
    if app.focused_field == field && !locked {
        let (before, after) = input.split_at_cursor();
        spans.push(Span::styled(before.to_string(), value_style));
        spans.push(Span::styled("▏", Style::default().fg(Color::Magenta)));
        spans.push(Span::styled(after.to_string(), value_style));
    } else if input.value.is_empty() {
        let hint = match field {
            RequestField::StartDate | RequestField::EndDate => "YYYY-MM-DD",
            RequestField::Attachment => "optional path (.pdf .doc .docx .jpg .png)",
            _ => "",
        };
        spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(input.value.clone(), value_style));
    }

    if let Some(err) = app.date_input_error(field) {
        spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let draft = &app.draft;
    let balance = app.selected_balance();
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![Line::from(vec![
        Span::styled("Requested: ", label),
        Span::raw(format!("{} days", format_days(draft.requested_days()))),
    ])];

    if let Some(balance) = balance {
        lines.push(Line::from(vec![
            Span::styled("Available: ", label),
            Span::raw(format!("{} days", format_days(balance.remaining_days))),
        ]));
    }
    lines.push(Line::from(""));

    let check = draft.check_balance(balance);
    if let Some(message) = check.message() {
        let color = match check {
            BalanceCheck::Insufficient { .. } => Color::Red,
            _ => Color::Green,
        };
        lines.push(Line::from(Span::styled(message, Style::default().fg(color))));
        lines.push(Line::from(""));
    }

    for issue in draft.issues(balance) {
        if matches!(issue, hr_client::DraftIssue::InsufficientBalance { .. }) {
            continue;
        }
        lines.push(Line::from(Span::styled(
            format!("• {}", issue.message()),
            Style::default().fg(Color::Yellow),
        )));
    }

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled_block(" Summary ".to_string()));
    frame.render_widget(summary, area);
}
