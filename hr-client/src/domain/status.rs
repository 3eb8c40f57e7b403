use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Where a leave request is in the approval workflow.
///
/// ```text
/// pending ──► team_leader_approved ──► hr_approved
///    │  │             │
///    │  └──► hr_approved
///    ├──► rejected ◄──┘
///    └──► cancelled
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    TeamLeaderApproved,
    HrApproved,
    Rejected,
    Cancelled,
}

/// A state change a request can undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum LeaveTransition {
    TeamLeaderApprove,
    HrApprove,
    Reject,
    Cancel,
}

impl LeaveTransition {
    fn verb(self) -> &'static str {
        match self {
            LeaveTransition::TeamLeaderApprove => "team-leader approve",
            LeaveTransition::HrApprove => "approve",
            LeaveTransition::Reject => "reject",
            LeaveTransition::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {} a request that is {}", .transition.verb(), .from.label())]
pub struct InvalidTransition {
    pub from: LeaveStatus,
    pub transition: LeaveTransition,
}

/// Who an approval is recorded as. Sent as `approvedBy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Approver {
    TeamLeader,
    Hr,
}

impl Approver {
    pub fn transition(self) -> LeaveTransition {
        match self {
            Approver::TeamLeader => LeaveTransition::TeamLeaderApprove,
            Approver::Hr => LeaveTransition::HrApprove,
        }
    }
}

/// Actions offered to an HR actor for a request in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrAction {
    Approve,
    FinalApprove,
    Reject,
}

impl HrAction {
    pub fn label(self) -> &'static str {
        match self {
            HrAction::Approve => "Approve",
            HrAction::FinalApprove => "Final Approve",
            HrAction::Reject => "Reject",
        }
    }
}

impl LeaveStatus {
    pub fn transition(self, transition: LeaveTransition) -> Result<LeaveStatus, InvalidTransition> {
        use LeaveStatus::*;
        use LeaveTransition::*;

        let next = match (self, transition) {
            (Pending, TeamLeaderApprove) => TeamLeaderApproved,
            (Pending | TeamLeaderApproved, HrApprove) => HrApproved,
            (Pending | TeamLeaderApproved, Reject) => Rejected,
            (Pending, Cancel) => Cancelled,
            (from, transition) => return Err(InvalidTransition { from, transition }),
        };
        Ok(next)
    }

    /// Whether `next` is reachable from `self` in a single step.
    pub fn can_become(self, next: LeaveStatus) -> bool {
        use strum::IntoEnumIterator;
        LeaveTransition::iter().any(|t| self.transition(t) == Ok(next))
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LeaveStatus::HrApproved | LeaveStatus::Rejected | LeaveStatus::Cancelled
        )
    }

    /// Still waiting on an approve/reject decision.
    pub fn awaits_decision(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::TeamLeaderApproved)
    }

    pub fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::TeamLeaderApproved => "Team Leader Approved",
            LeaveStatus::HrApproved => "Approved",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Cancelled => "Cancelled",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn hr_actions(self) -> &'static [HrAction] {
        match self {
            LeaveStatus::Pending => &[HrAction::Approve, HrAction::Reject],
            LeaveStatus::TeamLeaderApproved => &[HrAction::FinalApprove, HrAction::Reject],
            _ => &[],
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
