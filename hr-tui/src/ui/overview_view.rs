use hr_client::domain::format_amount;

use super::*;

pub fn render_overview(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    let user = app.session.user();
    let welcome = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Welcome back, {}", user.first_name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", user.role.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(titled_block(" Dashboard ".to_string()));
    frame.render_widget(welcome, chunks[0]);

    let Some(metrics) = &app.dashboard else {
        let message = if app.dashboard_loaded {
            "No dashboard figures available"
        } else {
            "Loading..."
        };
        render_empty(frame, chunks[1], " Overview ".to_string(), message);
        return;
    };

    let count = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    let stats = [
        ("Total Employees", count(metrics.total_employees), Color::Cyan),
        ("Pending Leaves", count(metrics.pending_leave_requests), Color::Yellow),
        ("Active Leaves", count(metrics.leave_requests_this_month), Color::Magenta),
        ("Processed Payroll", count(metrics.salaries_paid_this_month), Color::Green),
        (
            "Total Salary Paid",
            metrics
                .total_salary_paid
                .map(format_amount)
                .unwrap_or_else(|| "-".to_string()),
            Color::Green,
        ),
    ];

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(chunks[1]);
    for ((label, value, color), area) in stats.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(titled_block(format!(" {label} ")));
        frame.render_widget(card, *area);
    }
}
