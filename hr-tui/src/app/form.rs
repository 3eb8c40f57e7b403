use hr_client::domain::serde_helpers::parse_date;
use hr_client::domain::HalfDayPeriod;
use std::path::PathBuf;

use super::*;

impl App {
    /// Step through active leave types. Wraps, and starts from the first
    /// type when none is picked.
    pub fn cycle_leave_type(&mut self, forward: bool) {
        let ids: Vec<_> = self.catalog.selectable_types().map(|t| t.id).collect();
        if ids.is_empty() {
            self.set_error("No leave types available");
            return;
        }
        let current = self
            .draft
            .leave_type_id()
            .and_then(|id| ids.iter().position(|i| *i == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.draft.set_leave_type(Some(ids[next]));
    }

    pub fn toggle_half_day(&mut self) {
        let half_day = !self.draft.is_half_day();
        self.draft.set_half_day(half_day);
        if half_day {
            self.form.end_input = self.form.start_input.clone();
        } else {
            self.sync_end_date();
        }
    }

    pub fn toggle_half_day_period(&mut self) {
        if !self.draft.is_half_day() {
            return;
        }
        let next = self
            .draft
            .half_day_period()
            .map(HalfDayPeriod::toggled)
            .unwrap_or(HalfDayPeriod::Morning);
        self.draft.set_half_day_period(Some(next));
    }

    /// Typing into the end date does nothing for a half-day request.
    fn field_is_locked(&self, field: RequestField) -> bool {
        field == RequestField::EndDate && self.draft.is_half_day()
    }

    pub fn form_input_char(&mut self, c: char) {
        let field = self.focused_field;
        if self.field_is_locked(field) {
            return;
        }
        if let Some(input) = self.form.input_mut(field) {
            input.insert(c);
            self.sync_field(field);
        }
    }

    pub fn form_backspace(&mut self) {
        let field = self.focused_field;
        if self.field_is_locked(field) {
            return;
        }
        if let Some(input) = self.form.input_mut(field) {
            input.backspace();
            self.sync_field(field);
        }
    }

    pub fn form_cursor_left(&mut self) {
        if let Some(input) = self.form.input_mut(self.focused_field) {
            input.move_left();
        }
    }

    pub fn form_cursor_right(&mut self) {
        if let Some(input) = self.form.input_mut(self.focused_field) {
            input.move_right();
        }
    }

    fn sync_field(&mut self, field: RequestField) {
        match field {
            RequestField::StartDate => {
                self.draft
                    .set_start_date(parse_date(self.form.start_input.value.trim()).ok());
                if self.draft.is_half_day() {
                    self.form.end_input = self.form.start_input.clone();
                }
            }
            RequestField::EndDate => self.sync_end_date(),
            RequestField::Reason => self.draft.set_reason(self.form.reason_input.value.clone()),
            RequestField::Attachment => {
                let raw = self.form.attachment_input.value.trim();
                self.draft
                    .set_attachment((!raw.is_empty()).then(|| PathBuf::from(raw)));
            }
            _ => {}
        }
    }

    fn sync_end_date(&mut self) {
        self.draft
            .set_end_date(parse_date(self.form.end_input.value.trim()).ok());
    }

    /// Non-empty date text that doesn't parse.
    pub fn date_input_error(&self, field: RequestField) -> Option<&'static str> {
        let (input, parsed) = match field {
            RequestField::StartDate => (&self.form.start_input, self.draft.start_date()),
            RequestField::EndDate => (&self.form.end_input, self.draft.end_date()),
            _ => return None,
        };
        (!input.value.trim().is_empty() && parsed.is_none()).then_some("Use YYYY-MM-DD")
    }

    pub fn reset_form(&mut self) {
        self.draft.clear();
        self.form = RequestForm::default();
        self.focused_field = RequestField::LeaveType;
    }

    pub fn form_focus_next(&mut self) {
        self.focused_field = self.focused_field.next();
        if self.focused_field == RequestField::HalfDayPeriod && !self.draft.is_half_day() {
            self.focused_field = self.focused_field.next();
        }
    }

    pub fn form_focus_previous(&mut self) {
        self.focused_field = self.focused_field.previous();
        if self.focused_field == RequestField::HalfDayPeriod && !self.draft.is_half_day() {
            self.focused_field = self.focused_field.previous();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::employee_app;
    use super::*;
    use hr_client::domain::LeaveType;
    use time::macros::date;

    fn type_input(app: &mut App, field: RequestField, text: &str) {
        app.focused_field = field;
        for c in text.chars() {
            app.form_input_char(c);
        }
    }

    #[test]
    fn typed_dates_land_in_draft() {
        let mut app = employee_app();
        type_input(&mut app, RequestField::StartDate, "2024-07-01");
        type_input(&mut app, RequestField::EndDate, "2024-07-03");
        assert_eq!(app.draft.start_date(), Some(date!(2024 - 07 - 01)));
        assert_eq!(app.draft.requested_days(), 3.0);

        app.form_backspace();
        assert_eq!(app.draft.end_date(), None);
        assert_eq!(app.date_input_error(RequestField::EndDate), Some("Use YYYY-MM-DD"));
    }

    #[test]
    fn half_day_locks_end_date_to_start() {
        let mut app = employee_app();
        type_input(&mut app, RequestField::StartDate, "2024-07-01");
        type_input(&mut app, RequestField::EndDate, "2024-07-05");
        app.toggle_half_day();
        assert_eq!(app.draft.end_date(), Some(date!(2024 - 07 - 01)));
        assert_eq!(app.form.end_input.value, "2024-07-01");

        type_input(&mut app, RequestField::EndDate, "9");
        assert_eq!(app.form.end_input.value, "2024-07-01");
        assert_eq!(app.draft.requested_days(), 0.5);

        app.toggle_half_day_period();
        assert_eq!(app.draft.half_day_period(), Some(HalfDayPeriod::Morning));
        app.toggle_half_day_period();
        assert_eq!(app.draft.half_day_period(), Some(HalfDayPeriod::Evening));

        app.toggle_half_day();
        assert_eq!(app.draft.half_day_period(), None);
    }

    #[test]
    fn cycling_skips_inactive_types() {
        let mut app = employee_app();
        app.catalog.types = vec![
            LeaveType {
                id: 1,
                name: "Annual".into(),
                description: None,
                max_days: 20.0,
                is_active: true,
            },
            LeaveType {
                id: 2,
                name: "Retired".into(),
                description: None,
                max_days: 5.0,
                is_active: false,
            },
            LeaveType {
                id: 3,
                name: "Sick".into(),
                description: None,
                max_days: 10.0,
                is_active: true,
            },
        ];
        app.cycle_leave_type(true);
        assert_eq!(app.draft.leave_type_id(), Some(1));
        app.cycle_leave_type(true);
        assert_eq!(app.draft.leave_type_id(), Some(3));
        app.cycle_leave_type(true);
        assert_eq!(app.draft.leave_type_id(), Some(1));
        app.cycle_leave_type(false);
        assert_eq!(app.draft.leave_type_id(), Some(3));
    }

    #[test]
    fn period_field_skipped_unless_half_day() {
        let mut app = employee_app();
        app.focused_field = RequestField::HalfDay;
        app.form_focus_next();
        assert_eq!(app.focused_field, RequestField::StartDate);

        app.toggle_half_day();
        app.focused_field = RequestField::HalfDay;
        app.form_focus_next();
        assert_eq!(app.focused_field, RequestField::HalfDayPeriod);
    }
}
