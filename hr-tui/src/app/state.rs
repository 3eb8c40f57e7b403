use hr_client::domain::{LeaveRequestId, SalarySlip, SalarySlipDetail, YtdEarnings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Balance,
    Request,
    MyRequests,
    /// Only reachable by HR.
    Approvals,
    Salary,
    Overview,
    Users,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Balance,
        Tab::Request,
        Tab::MyRequests,
        Tab::Approvals,
        Tab::Salary,
        Tab::Overview,
        Tab::Users,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Balance => "Balance",
            Tab::Request => "Request Leave",
            Tab::MyRequests => "My Requests",
            Tab::Approvals => "Pending Approvals",
            Tab::Salary => "Salary Slips",
            Tab::Overview => "Overview",
            Tab::Users => "Users",
        }
    }

    pub fn requires_hr(self) -> bool {
        matches!(self, Tab::Approvals | Tab::Overview | Tab::Users)
    }
}

/// Fields of the leave request form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestField {
    LeaveType,
    HalfDay,
    HalfDayPeriod,
    StartDate,
    EndDate,
    Reason,
    Attachment,
    Submit,
}

impl RequestField {
    const ORDER: [RequestField; 8] = [
        RequestField::LeaveType,
        RequestField::HalfDay,
        RequestField::HalfDayPeriod,
        RequestField::StartDate,
        RequestField::EndDate,
        RequestField::Reason,
        RequestField::Attachment,
        RequestField::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Free-text fields swallow character keys.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            RequestField::StartDate
                | RequestField::EndDate
                | RequestField::Reason
                | RequestField::Attachment
        )
    }
}

/// Raw text behind the form fields. The parsed values live in the draft.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestForm {
    pub start_input: TextInput,
    pub end_input: TextInput,
    pub reason_input: TextInput,
    pub attachment_input: TextInput,
}

impl RequestForm {
    pub fn input_mut(&mut self, field: RequestField) -> Option<&mut TextInput> {
        match field {
            RequestField::StartDate => Some(&mut self.start_input),
            RequestField::EndDate => Some(&mut self.end_input),
            RequestField::Reason => Some(&mut self.reason_input),
            RequestField::Attachment => Some(&mut self.attachment_input),
            _ => None,
        }
    }
}

/// Rejection reason being typed for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectPrompt {
    pub request_id: LeaveRequestId,
    pub input: TextInput,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryState {
    pub year: i32,
    pub slips: Vec<SalarySlip>,
    pub ytd: Option<YtdEarnings>,
    pub selected: usize,
    pub loaded: bool,
    /// Breakdown dialog for one slip, open while `Some`.
    pub detail: Option<SalarySlipDetail>,
}

impl SalaryState {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            slips: Vec::new(),
            ytd: None,
            selected: 0,
            loaded: false,
            detail: None,
        }
    }

    pub fn selected_slip(&self) -> Option<&SalarySlip> {
        self.slips.get(self.selected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        let mut p = pos - 1;
        while p > 0 && !self.value.is_char_boundary(p) {
            p -= 1;
        }
        p
    }

    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p < self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_handles_multibyte() {
        let mut input = TextInput::new();
        for c in "Göteborg".chars() {
            input.insert(c);
        }
        for _ in 0..6 {
            input.move_left();
        }
        input.backspace();
        assert_eq!(input.value, "Gteborg");
        assert_eq!(input.split_at_cursor(), ("G", "teborg"));
    }

    #[test]
    fn field_focus_wraps() {
        assert_eq!(RequestField::Submit.next(), RequestField::LeaveType);
        assert_eq!(RequestField::LeaveType.previous(), RequestField::Submit);
        assert!(RequestField::Reason.is_text());
        assert!(!RequestField::HalfDay.is_text());
    }
}
