//! Building and submitting a new leave request.
//!
//! A [`LeaveDraft`] is the half-filled form. It knows how many days it asks
//! for and what is still wrong with it, but it never touches balances: the
//! server deducts days when a request is approved, and the client only
//! learns about that by refetching.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use time::Date;
use tracing::{info, instrument};

use crate::backend::{LeaveBackend, MutationReceipt};
use crate::domain::serde_helpers::format_days;
use crate::domain::{HalfDayPeriod, LeaveBalance, LeaveTypeId};
use crate::error::{LeaveError, Result};
use crate::session::Session;

pub const ALLOWED_ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

pub const SUBMIT_SUCCESS: &str = "Leave request submitted successfully";
pub const SUBMIT_FAILED: &str = "Failed to submit leave request";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaveDraft {
    leave_type_id: Option<LeaveTypeId>,
    start_date: Option<Date>,
    end_date: Option<Date>,
    reason: String,
    is_half_day: bool,
    half_day_period: Option<HalfDayPeriod>,
    attachment: Option<PathBuf>,
}

impl LeaveDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leave_type_id(&self) -> Option<LeaveTypeId> {
        self.leave_type_id
    }

    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// The end date that will be submitted. A half-day always ends on its
    /// start date.
    pub fn end_date(&self) -> Option<Date> {
        if self.is_half_day {
            self.start_date
        } else {
            self.end_date
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_half_day(&self) -> bool {
        self.is_half_day
    }

    pub fn half_day_period(&self) -> Option<HalfDayPeriod> {
        self.half_day_period
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.attachment.as_deref()
    }

    pub fn set_leave_type(&mut self, id: Option<LeaveTypeId>) {
        self.leave_type_id = id;
    }

    pub fn set_start_date(&mut self, date: Option<Date>) {
        self.start_date = date;
        if self.is_half_day {
            self.end_date = date;
        }
    }

    /// Ignored while in half-day mode.
    pub fn set_end_date(&mut self, date: Option<Date>) {
        if !self.is_half_day {
            self.end_date = date;
        }
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    pub fn set_half_day(&mut self, half_day: bool) {
        self.is_half_day = half_day;
        if half_day {
            self.end_date = self.start_date;
        } else {
            self.half_day_period = None;
        }
    }

    pub fn set_half_day_period(&mut self, period: Option<HalfDayPeriod>) {
        self.half_day_period = period;
    }

    pub fn set_attachment(&mut self, path: Option<PathBuf>) {
        self.attachment = path;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Days this draft asks for: `0.5` for a half-day, otherwise the
    /// inclusive calendar span. An inverted range asks for nothing.
    pub fn requested_days(&self) -> f64 {
        let Some(start) = self.start_date else {
            return 0.0;
        };
        if self.is_half_day {
            return 0.5;
        }
        let Some(end) = self.end_date else {
            return 0.0;
        };
        let span = (end - start).whole_days();
        if span < 0 {
            0.0
        } else {
            (span + 1) as f64
        }
    }

    pub fn check_balance(&self, balance: Option<&LeaveBalance>) -> BalanceCheck {
        let Some(balance) = balance else {
            return BalanceCheck::NoBalance;
        };
        let requested = self.requested_days();
        if requested > balance.remaining_days {
            BalanceCheck::Insufficient {
                requested,
                available: balance.remaining_days,
            }
        } else {
            BalanceCheck::Sufficient {
                available: balance.remaining_days,
                remaining_after: balance.remaining_days - requested,
            }
        }
    }

    /// Everything that keeps this draft from being submitted, in form order.
    pub fn issues(&self, balance: Option<&LeaveBalance>) -> Vec<DraftIssue> {
        let mut issues = Vec::new();

        if self.leave_type_id.is_none() {
            issues.push(DraftIssue::MissingLeaveType);
        }
        if self.start_date.is_none() {
            issues.push(DraftIssue::MissingStartDate);
        }
        if !self.is_half_day {
            match (self.start_date, self.end_date) {
                (_, None) => issues.push(DraftIssue::MissingEndDate),
                (Some(start), Some(end)) if end < start => issues.push(DraftIssue::EndBeforeStart),
                _ => {}
            }
        }
        if self.reason.trim().is_empty() {
            issues.push(DraftIssue::MissingReason);
        }
        if self.is_half_day && self.half_day_period.is_none() {
            issues.push(DraftIssue::MissingHalfDayPeriod);
        }
        if let BalanceCheck::Insufficient {
            requested,
            available,
        } = self.check_balance(balance)
        {
            issues.push(DraftIssue::InsufficientBalance {
                requested,
                available,
            });
        }
        if let Some(path) = &self.attachment {
            if attachment_mime(path).is_none() {
                issues.push(DraftIssue::UnsupportedAttachment {
                    file_name: file_name(path),
                });
            }
        }

        issues
    }

    pub fn can_submit(&self, balance: Option<&LeaveBalance>) -> bool {
        self.issues(balance).is_empty()
    }
}

/// How the draft compares to the server-reported balance for its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceCheck {
    /// No balance record for the selected type; the server decides.
    NoBalance,
    Sufficient { available: f64, remaining_after: f64 },
    Insufficient { requested: f64, available: f64 },
}

impl BalanceCheck {
    pub fn has_insufficient_balance(&self) -> bool {
        matches!(self, BalanceCheck::Insufficient { .. })
    }

    pub fn message(&self) -> Option<String> {
        match self {
            BalanceCheck::NoBalance => None,
            BalanceCheck::Sufficient {
                remaining_after, ..
            } => Some(format!(
                "{} days will remain after this request.",
                format_days(*remaining_after)
            )),
            BalanceCheck::Insufficient {
                requested,
                available,
            } => Some(insufficient_message(*requested, *available)),
        }
    }
}

fn insufficient_message(requested: f64, available: f64) -> String {
    format!(
        "You are requesting {} days, but only {} days are available.",
        format_days(requested),
        format_days(available)
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftIssue {
    MissingLeaveType,
    MissingStartDate,
    MissingEndDate,
    EndBeforeStart,
    MissingReason,
    MissingHalfDayPeriod,
    InsufficientBalance { requested: f64, available: f64 },
    UnsupportedAttachment { file_name: String },
}

impl DraftIssue {
    pub fn message(&self) -> String {
        match self {
            DraftIssue::MissingLeaveType => "Leave type is required".to_string(),
            DraftIssue::MissingStartDate => "Start date is required".to_string(),
            DraftIssue::MissingEndDate => "End date is required".to_string(),
            DraftIssue::EndBeforeStart => "End date cannot be before start date".to_string(),
            DraftIssue::MissingReason => "Reason is required".to_string(),
            DraftIssue::MissingHalfDayPeriod => "Choose morning or evening".to_string(),
            DraftIssue::InsufficientBalance {
                requested,
                available,
            } => insufficient_message(*requested, *available),
            DraftIssue::UnsupportedAttachment { file_name } => format!(
                "{file_name}: attachments must be one of {}",
                ALLOWED_ATTACHMENT_EXTENSIONS.join(", ")
            ),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn attachment_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => return None,
    };
    Some(mime)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// A validated draft, ready to go over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveSubmission {
    pub leave_type_id: LeaveTypeId,
    pub start_date: Date,
    pub end_date: Date,
    pub reason: String,
    pub is_half_day: bool,
    pub half_day_period: Option<HalfDayPeriod>,
    pub total_days: f64,
    pub attachment: Option<AttachmentUpload>,
}

impl LeaveSubmission {
    /// Validate `draft` against `balance` and read the attachment, if any.
    pub async fn prepare(draft: &LeaveDraft, balance: Option<&LeaveBalance>) -> Result<Self> {
        let issues = draft.issues(balance);
        if !issues.is_empty() {
            return Err(LeaveError::Validation(issues));
        }

        let (Some(leave_type_id), Some(start_date), Some(end_date)) =
            (draft.leave_type_id(), draft.start_date(), draft.end_date())
        else {
            return Err(LeaveError::Validation(vec![DraftIssue::MissingStartDate]));
        };

        let attachment = match draft.attachment() {
            Some(path) => {
                let bytes = tokio::fs::read(path).await?;
                Some(AttachmentUpload {
                    file_name: file_name(path),
                    mime: attachment_mime(path).unwrap_or("application/octet-stream"),
                    bytes,
                })
            }
            None => None,
        };

        Ok(Self {
            leave_type_id,
            start_date,
            end_date,
            reason: draft.reason().trim().to_string(),
            is_half_day: draft.is_half_day(),
            half_day_period: draft.half_day_period().filter(|_| draft.is_half_day()),
            total_days: draft.requested_days(),
            attachment,
        })
    }
}

/// Submits drafts. Callers reset their draft and refetch on success.
#[derive(Clone)]
pub struct RequestComposer {
    backend: Arc<dyn LeaveBackend>,
}

impl RequestComposer {
    pub fn new(backend: Arc<dyn LeaveBackend>) -> Self {
        Self { backend }
    }

    #[instrument(skip_all, fields(leave_type = ?draft.leave_type_id(), days = draft.requested_days()))]
    pub async fn submit(
        &self,
        session: &Session,
        draft: &LeaveDraft,
        balance: Option<&LeaveBalance>,
    ) -> Result<MutationReceipt> {
        let submission = LeaveSubmission::prepare(draft, balance).await?;
        let receipt = self
            .backend
            .create_request(session.token(), &submission)
            .await?;
        info!(request_id = ?receipt.request.as_ref().map(|r| r.id), "leave request submitted");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn balance(total: f64, used: f64, remaining: f64) -> LeaveBalance {
        LeaveBalance {
            id: 1,
            user_id: Some(1),
            leave_type_id: 1,
            total_days: total,
            used_days: used,
            remaining_days: remaining,
            year: 2024,
            leave_type: None,
        }
    }

    fn complete_draft() -> LeaveDraft {
        let mut draft = LeaveDraft::new();
        draft.set_leave_type(Some(1));
        draft.set_start_date(Some(date!(2024 - 03 - 01)));
        draft.set_end_date(Some(date!(2024 - 03 - 01)));
        draft.set_reason("Family event");
        draft
    }

    #[test]
    fn half_day_forces_single_date_and_half_a_day() {
        let mut draft = LeaveDraft::new();
        draft.set_end_date(Some(date!(2024 - 03 - 09)));
        draft.set_half_day(true);
        draft.set_start_date(Some(date!(2024 - 03 - 04)));

        assert_eq!(draft.end_date(), Some(date!(2024 - 03 - 04)));
        assert_eq!(draft.requested_days(), 0.5);

        // Ignored while in half-day mode.
        draft.set_end_date(Some(date!(2024 - 03 - 20)));
        assert_eq!(draft.end_date(), Some(date!(2024 - 03 - 04)));
        assert_eq!(draft.requested_days(), 0.5);
    }

    #[test]
    fn full_day_span_is_inclusive() {
        let mut draft = complete_draft();
        assert_eq!(draft.requested_days(), 1.0);

        draft.set_end_date(Some(date!(2024 - 03 - 05)));
        assert_eq!(draft.requested_days(), 5.0);

        draft.set_start_date(Some(date!(2024 - 02 - 28)));
        draft.set_end_date(Some(date!(2024 - 03 - 01)));
        assert_eq!(draft.requested_days(), 3.0, "2024 is a leap year");
    }

    #[test]
    fn inverted_range_requests_nothing_and_blocks_submit() {
        let mut draft = complete_draft();
        draft.set_start_date(Some(date!(2024 - 03 - 05)));
        draft.set_end_date(Some(date!(2024 - 03 - 01)));

        assert_eq!(draft.requested_days(), 0.0);
        assert!(!draft.can_submit(None));
        assert!(draft.issues(None).contains(&DraftIssue::EndBeforeStart));
    }

    #[test]
    fn submit_gate_requires_every_field() {
        assert!(complete_draft().can_submit(None));

        let mut draft = complete_draft();
        draft.set_leave_type(None);
        assert_eq!(draft.issues(None), vec![DraftIssue::MissingLeaveType]);

        let mut draft = complete_draft();
        draft.set_reason("   ");
        assert_eq!(draft.issues(None), vec![DraftIssue::MissingReason]);

        let mut draft = complete_draft();
        draft.set_end_date(None);
        assert_eq!(draft.issues(None), vec![DraftIssue::MissingEndDate]);

        let mut draft = complete_draft();
        draft.set_start_date(None);
        assert_eq!(draft.issues(None), vec![DraftIssue::MissingStartDate]);
    }

    #[test]
    fn half_day_needs_a_period_but_no_end_date() {
        let mut draft = complete_draft();
        draft.set_half_day(true);
        assert_eq!(draft.issues(None), vec![DraftIssue::MissingHalfDayPeriod]);

        draft.set_half_day_period(Some(HalfDayPeriod::Evening));
        assert!(draft.can_submit(None));

        draft.set_half_day(false);
        assert_eq!(draft.half_day_period(), None);
    }

    #[test]
    fn insufficient_balance_blocks_with_warning() {
        let balance = balance(10.0, 8.0, 2.0);
        let mut draft = complete_draft();
        draft.set_end_date(Some(date!(2024 - 03 - 03)));

        let check = draft.check_balance(Some(&balance));
        assert!(check.has_insufficient_balance());
        assert_eq!(
            check.message().unwrap(),
            "You are requesting 3 days, but only 2 days are available."
        );
        assert!(!draft.can_submit(Some(&balance)));
    }

    #[test]
    fn half_day_within_balance_reports_what_remains() {
        let balance = balance(10.0, 8.0, 2.0);
        let mut draft = complete_draft();
        draft.set_half_day(true);
        draft.set_half_day_period(Some(HalfDayPeriod::Morning));

        let check = draft.check_balance(Some(&balance));
        assert!(!check.has_insufficient_balance());
        assert_eq!(
            check,
            BalanceCheck::Sufficient {
                available: 2.0,
                remaining_after: 1.5
            }
        );
        assert_eq!(
            check.message().unwrap(),
            "1.5 days will remain after this request."
        );
        assert!(draft.can_submit(Some(&balance)));
    }

    #[test]
    fn exact_balance_is_enough() {
        let balance = balance(10.0, 8.0, 2.0);
        let mut draft = complete_draft();
        draft.set_end_date(Some(date!(2024 - 03 - 02)));
        assert!(draft.can_submit(Some(&balance)));
        assert_eq!(
            draft.check_balance(Some(&balance)).message().unwrap(),
            "0 days will remain after this request."
        );
    }

    #[test]
    fn attachment_types_are_restricted() {
        let mut draft = complete_draft();
        draft.set_attachment(Some(PathBuf::from("/tmp/note.PDF")));
        assert!(draft.can_submit(None));

        draft.set_attachment(Some(PathBuf::from("/tmp/payload.exe")));
        assert_eq!(
            draft.issues(None),
            vec![DraftIssue::UnsupportedAttachment {
                file_name: "payload.exe".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn prepare_uses_start_date_as_end_for_half_days() {
        let mut draft = complete_draft();
        draft.set_end_date(Some(date!(2024 - 03 - 08)));
        draft.set_half_day(true);
        draft.set_half_day_period(Some(HalfDayPeriod::Evening));

        let submission = LeaveSubmission::prepare(&draft, None).await.unwrap();
        assert_eq!(submission.end_date, date!(2024 - 03 - 01));
        assert_eq!(submission.total_days, 0.5);
        assert_eq!(submission.half_day_period, Some(HalfDayPeriod::Evening));
        assert!(submission.attachment.is_none());
    }

    #[tokio::test]
    async fn prepare_rejects_invalid_drafts_without_io() {
        let draft = LeaveDraft::new();
        let err = LeaveSubmission::prepare(&draft, None).await.unwrap_err();
        match err {
            LeaveError::Validation(issues) => {
                assert_eq!(issues[0], DraftIssue::MissingLeaveType);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
