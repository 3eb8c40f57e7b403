use hr_client::directory::{
    CREATE_USER_FAILED, CREATE_USER_SUCCESS, DELETE_USER_FAILED, DELETE_USER_SUCCESS,
    RESET_PASSWORD_FAILED, RESET_PASSWORD_SUCCESS,
};
use hr_client::domain::{
    Approver, DashboardMetrics, LeaveRequest, SalarySlip, SalarySlipDetail, UserId, YtdEarnings,
};
use hr_client::{
    LeaveSnapshot, MutationReceipt, NewUser, RefreshTicket, RequestScope, UserFilter, UserListing,
};
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Something a key press asked for. Anything touching the network is run
/// on a spawned task; the result comes back as an [`Outcome`].
#[derive(Debug, Clone)]
pub(super) enum Action {
    Refresh {
        scope: RequestScope,
    },
    SubmitDraft,
    Approve {
        request: LeaveRequest,
        approved_by: Approver,
    },
    Reject {
        request: LeaveRequest,
        reason: String,
    },
    LoadSalary {
        year: i32,
    },
    DownloadSlip {
        salary_id: i64,
    },
    LoadSlipDetail {
        salary_id: i64,
    },
    LoadDashboard,
    LoadUsers {
        filter: UserFilter,
    },
    CreateUser {
        user: NewUser,
    },
    ResetPassword {
        user_id: UserId,
    },
    DeleteUser {
        user_id: UserId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UserOp {
    Create,
    ResetPassword,
    Delete,
}

impl UserOp {
    /// Success and failure fallbacks.
    pub(super) fn messages(self) -> (&'static str, &'static str) {
        match self {
            UserOp::Create => (CREATE_USER_SUCCESS, CREATE_USER_FAILED),
            UserOp::ResetPassword => (RESET_PASSWORD_SUCCESS, RESET_PASSWORD_FAILED),
            UserOp::Delete => (DELETE_USER_SUCCESS, DELETE_USER_FAILED),
        }
    }

    /// Whether the list changes and needs refetching.
    pub(super) fn changes_listing(self) -> bool {
        self != UserOp::ResetPassword
    }
}

#[derive(Debug)]
pub(super) enum Outcome {
    Refreshed {
        ticket: RefreshTicket,
        result: hr_client::Result<LeaveSnapshot>,
    },
    Submitted(hr_client::Result<MutationReceipt>),
    Decided {
        decision: Decision,
        result: hr_client::Result<MutationReceipt>,
    },
    SalaryLoaded {
        year: i32,
        slips: hr_client::Result<Vec<SalarySlip>>,
        ytd: Option<YtdEarnings>,
    },
    SlipDownloaded(hr_client::Result<PathBuf>),
    SlipDetailLoaded {
        salary_id: i64,
        result: hr_client::Result<SalarySlipDetail>,
    },
    DashboardLoaded(hr_client::Result<Option<DashboardMetrics>>),
    UsersLoaded {
        filter: UserFilter,
        result: hr_client::Result<UserListing>,
    },
    UserAdminDone {
        op: UserOp,
        result: hr_client::Result<MutationReceipt>,
    },
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;
pub(super) type OutcomeTx = UnboundedSender<Outcome>;
pub(super) type OutcomeRx = UnboundedReceiver<Outcome>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}

pub(super) fn outcome_channel() -> (OutcomeTx, OutcomeRx) {
    mpsc::unbounded_channel()
}
