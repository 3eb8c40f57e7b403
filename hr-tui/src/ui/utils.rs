use hr_client::domain::{LeaveRequest, LeaveStatus};
use hr_client::domain::serde_helpers::{format_date, format_days};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;

/// Helper function to create a centered rectangle
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((r.width.saturating_sub(width)) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn status_color(status: LeaveStatus) -> Color {
    match status {
        LeaveStatus::Pending => Color::Yellow,
        LeaveStatus::TeamLeaderApproved => Color::Cyan,
        LeaveStatus::HrApproved => Color::Green,
        LeaveStatus::Rejected => Color::Red,
        LeaveStatus::Cancelled => Color::DarkGray,
    }
}

/// `2024-03-01 → 2024-03-04`, or a single date with its half for half-days.
pub fn date_range(request: &LeaveRequest) -> String {
    if request.is_half_day {
        let period = request
            .half_day_period
            .map(|p| format!(" ({})", p.label()))
            .unwrap_or_default();
        format!("{}{}", format_date(request.start_date), period)
    } else if request.start_date == request.end_date {
        format_date(request.start_date)
    } else {
        format!(
            "{} → {}",
            format_date(request.start_date),
            format_date(request.end_date)
        )
    }
}

pub fn days_label(days: f64) -> String {
    if days == 1.0 {
        "1 day".to_string()
    } else {
        format!("{} days", format_days(days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_client::domain::HalfDayPeriod;
    use time::macros::date;

    fn request() -> LeaveRequest {
        LeaveRequest {
            id: 1,
            user_id: None,
            leave_type_id: 1,
            start_date: date!(2024 - 03 - 01),
            end_date: date!(2024 - 03 - 04),
            total_days: 4.0,
            is_half_day: false,
            half_day_period: None,
            reason: None,
            status: LeaveStatus::Pending,
            team_leader_approval_date: None,
            hr_approval_date: None,
            rejection_reason: None,
            attachment_url: None,
            created_at: None,
            user: None,
            leave_type: None,
        }
    }

    #[test]
    fn ranges() {
        let mut r = request();
        assert_eq!(date_range(&r), "2024-03-01 → 2024-03-04");
        r.is_half_day = true;
        r.end_date = r.start_date;
        r.half_day_period = Some(HalfDayPeriod::Morning);
        assert_eq!(date_range(&r), "2024-03-01 (Morning)");
    }

    #[test]
    fn day_labels() {
        assert_eq!(days_label(1.0), "1 day");
        assert_eq!(days_label(0.5), "0.5 days");
        assert_eq!(days_label(3.0), "3 days");
    }
}
