use hr_client::domain::serde_helpers::format_date;
use hr_client::domain::LeaveRequest;

use super::utils::{date_range, days_label, status_color};
use super::*;

pub fn render_my_requests(frame: &mut Frame, app: &App, body: Rect) {
    render_request_table(
        frame,
        body,
        RequestTable {
            title: format!(" My Requests ({}) ", app.my_requests.len()),
            empty_message: "No leave requests yet",
            requests: &app.my_requests,
            selected: app.my_requests_selected,
            show_requester: false,
        },
    );
}

pub fn render_pending_approvals(frame: &mut Frame, app: &App, body: Rect) {
    render_request_table(
        frame,
        body,
        RequestTable {
            title: format!(" Pending Approvals ({}) ", app.pending_requests.len()),
            empty_message: "Nothing waiting for approval",
            requests: &app.pending_requests,
            selected: app.approvals_selected,
            show_requester: true,
        },
    );
}

struct RequestTable<'a> {
    title: String,
    empty_message: &'a str,
    requests: &'a [LeaveRequest],
    selected: usize,
    show_requester: bool,
}

fn render_request_table(frame: &mut Frame, body: Rect, table: RequestTable<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(body);

    if table.requests.is_empty() {
        render_empty(frame, chunks[0], table.title, table.empty_message);
        return;
    }

    let rows: Vec<Row> = table
        .requests
        .iter()
        .map(|r| {
            let mut cells = Vec::with_capacity(5);
            if table.show_requester {
                cells.push(Cell::from(
                    r.requester_name().unwrap_or_else(|| "Unknown".to_string()),
                ));
            }
            cells.push(Cell::from(r.type_name().to_string()));
            cells.push(Cell::from(date_range(r)));
            cells.push(Cell::from(days_label(r.total_days)));
            cells.push(Cell::from(Span::styled(
                r.status.label(),
                Style::default().fg(status_color(r.status)),
            )));
            Row::new(cells)
        })
        .collect();

    let mut headers = Vec::with_capacity(5);
    let mut widths = Vec::with_capacity(5);
    if table.show_requester {
        headers.push("Employee");
        widths.push(Constraint::Percentage(22));
    }
    headers.extend(["Leave type", "Dates", "Days", "Status"]);
    widths.extend([
        Constraint::Percentage(20),
        Constraint::Percentage(30),
        Constraint::Percentage(10),
        Constraint::Percentage(18),
    ]);

    let header =
        Row::new(headers).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let widget = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .block(titled_block(table.title));

    let mut state = TableState::default().with_selected(Some(table.selected));
    frame.render_stateful_widget(widget, chunks[0], &mut state);

    if let Some(request) = table.requests.get(table.selected) {
        render_details(frame, chunks[1], request);
    }
}

fn render_details(frame: &mut Frame, area: Rect, request: &LeaveRequest) {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(vec![
        Span::styled("Reason: ", label),
        Span::raw(request.reason.clone().unwrap_or_default()),
    ])];

    if let Some(reason) = &request.rejection_reason {
        lines.push(Line::from(vec![
            Span::styled("Rejection reason: ", label),
            Span::styled(reason.clone(), Style::default().fg(Color::Red)),
        ]));
    }
    if let Some(at) = request.team_leader_approval_date {
        lines.push(Line::from(vec![
            Span::styled("Team leader approved: ", label),
            Span::raw(format_date(at.date())),
        ]));
    }
    if let Some(at) = request.hr_approval_date {
        lines.push(Line::from(vec![
            Span::styled("HR approved: ", label),
            Span::raw(format_date(at.date())),
        ]));
    }
    if let Some(url) = &request.attachment_url {
        lines.push(Line::from(vec![
            Span::styled("Attachment: ", label),
            Span::raw(url.clone()),
        ]));
    }
    if let Some(at) = request.created_at {
        lines.push(Line::from(vec![
            Span::styled("Submitted: ", label),
            Span::raw(format_date(at.date())),
        ]));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled_block(" Details ".to_string()));
    frame.render_widget(details, area);
}
