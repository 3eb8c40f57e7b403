use hr_client::domain::format_amount;

use super::*;

pub fn render_salary_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    render_ytd(frame, chunks[0], app);

    let title = format!(" Salary Slips {} ", app.salary.year);
    if app.salary.slips.is_empty() {
        let message = if app.salary.loaded {
            "No salary slips for this year"
        } else {
            "Loading..."
        };
        render_empty(frame, chunks[1], title, message);
        return;
    }

    let rows: Vec<Row> = app
        .salary
        .slips
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.month_year.clone()),
                Cell::from(format_amount(s.basic_salary)),
                Cell::from(format_amount(s.total_earnings)),
                Cell::from(format_amount(s.total_deductions)),
                Cell::from(Span::styled(
                    format_amount(s.net_salary),
                    Style::default().fg(Color::Green),
                )),
                Cell::from(s.status.label()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Month", "Basic", "Earnings", "Deductions", "Net", "Status"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(14),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .block(titled_block(title));

    let mut state = TableState::default().with_selected(Some(app.salary.selected));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_ytd(frame: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::DarkGray);
    let line = match &app.salary.ytd {
        Some(ytd) => {
            let amount = |v: Option<f64>| v.map(format_amount).unwrap_or_else(|| "-".to_string());
            Line::from(vec![
                Span::styled("Earnings ", label),
                Span::raw(amount(ytd.total_earnings)),
                Span::styled("  Deductions ", label),
                Span::raw(amount(ytd.total_deductions)),
                Span::styled("  Net ", label),
                Span::styled(amount(ytd.total_net), Style::default().fg(Color::Green)),
            ])
        }
        None => Line::from(Span::styled("Year-to-date summary unavailable", label)),
    };
    let widget = Paragraph::new(line).block(titled_block(format!(" Year to date {} ", app.salary.year)));
    frame.render_widget(widget, area);
}
