use super::utils::days_label;
use super::*;

pub fn render_balance_view(frame: &mut Frame, app: &App, body: Rect) {
    let area = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0)])
        .split(body)[0];

    let title = format!(" Leave Balance {} ", app.balance_year());
    if app.catalog.balances.is_empty() {
        render_empty(frame, area, title, "No leave balances available");
        return;
    }

    let rows: Vec<Row> = app
        .catalog
        .balances
        .iter()
        .map(|b| {
            let remaining_color = if b.remaining_days <= 0.0 {
                Color::Red
            } else {
                Color::Green
            };
            Row::new(vec![
                Cell::from(app.catalog.balance_label(b).to_string()),
                Cell::from(days_label(b.total_days)),
                Cell::from(days_label(b.used_days)),
                Cell::from(Span::styled(
                    days_label(b.remaining_days),
                    Style::default().fg(remaining_color),
                )),
                Cell::from(b.year.to_string()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Leave type", "Total", "Used", "Remaining", "Year"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(titled_block(title));

    frame.render_widget(table, area);
}
