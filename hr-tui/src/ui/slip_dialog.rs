use hr_client::domain::{format_amount, SalaryComponent};

use super::utils::centered_rect;
use super::*;

pub fn render_slip_dialog(frame: &mut Frame, app: &App) {
    let Some(detail) = &app.salary.detail else {
        return;
    };
    let slip = &detail.salary;

    let height = (detail.components.len() as u16 + 12).min(frame.area().height);
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);

    let label = Style::default().fg(Color::DarkGray);
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let component_line = |c: &SalaryComponent| {
        Line::from(vec![
            Span::raw(format!("  {:<30}", c.name())),
            Span::raw(format!("{:>14}", format_amount(c.amount))),
        ])
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Status ", label),
        Span::raw(slip.status.label()),
    ])];
    lines.push(Line::from(Span::styled("Earnings", heading)));
    lines.extend(detail.earnings().map(component_line));
    lines.push(Line::from(Span::styled("Deductions", heading)));
    lines.extend(detail.deductions().map(component_line));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<32}", "Total earnings"), label),
        Span::raw(format!("{:>14}", format_amount(slip.total_earnings))),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<32}", "Total deductions"), label),
        Span::raw(format!("{:>14}", format_amount(slip.total_deductions))),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<32}", "Net salary"), label),
        Span::styled(
            format!("{:>14}", format_amount(slip.net_salary)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(": Download PDF  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Close"),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" Salary Slip {} ", slip.month_year),
                Style::default().fg(Color::Cyan),
            ))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}
