use super::utils::{centered_rect, date_range};
use super::*;

pub fn render_reject_dialog(frame: &mut Frame, app: &App) {
    let Some(prompt) = &app.reject_prompt else {
        return;
    };

    let area = centered_rect(64, 11, frame.area());
    frame.render_widget(Clear, area);

    let subject = app
        .pending_requests
        .iter()
        .find(|r| r.id == prompt.request_id)
        .map(|r| {
            format!(
                "{} · {} · {}",
                r.requester_name().unwrap_or_else(|| "Unknown employee".to_string()),
                r.type_name(),
                date_range(r)
            )
        })
        .unwrap_or_default();

    let (before, after) = prompt.input.split_at_cursor();
    let mut lines = vec![
        Line::from(Span::styled(subject, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled("Reason:", Style::default().fg(Color::Yellow))),
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
            Span::raw(after.to_string()),
        ]),
        Line::from(""),
    ];

    if let Some(err) = &prompt.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Reject  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    " Reject Leave Request ",
                    Style::default().fg(Color::Red),
                ))
                .padding(Padding::horizontal(2)),
        );

    frame.render_widget(paragraph, area);
}
