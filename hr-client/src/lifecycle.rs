//! Approve/reject commands for submitted requests.
//!
//! The server owns the workflow. This side refuses transitions it already
//! knows are illegal, sends the rest, and never edits local copies: the
//! caller refetches after every command, whatever the outcome.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::backend::{LeaveBackend, MutationReceipt};
use crate::domain::{Approver, LeaveRequest, LeaveStatus, LeaveTransition};
use crate::error::{LeaveError, Result};
use crate::session::Session;

pub const APPROVE_SUCCESS: &str = "Leave request approved successfully";
pub const APPROVE_FAILED: &str = "Failed to approve leave request";
pub const REJECT_SUCCESS: &str = "Leave request rejected";
pub const REJECT_FAILED: &str = "Failed to reject leave request";

#[derive(Clone)]
pub struct LifecycleController {
    backend: Arc<dyn LeaveBackend>,
}

impl LifecycleController {
    pub fn new(backend: Arc<dyn LeaveBackend>) -> Self {
        Self { backend }
    }

    /// Record an approval. From `pending` the server decides whether this
    /// lands on `team_leader_approved` or `hr_approved`.
    #[instrument(skip(self, session, request), fields(request_id = request.id, status = ?request.status))]
    pub async fn approve(
        &self,
        session: &Session,
        request: &LeaveRequest,
        approved_by: Approver,
    ) -> Result<MutationReceipt> {
        request.status.transition(approved_by.transition())?;

        let receipt = self
            .backend
            .approve(session.token(), request.id, approved_by)
            .await?;
        note_reported_status(request.status, &receipt);
        info!(next = ?receipt.status, "leave request approved");
        Ok(receipt)
    }

    /// Reject with a reason. A blank reason never reaches the server.
    #[instrument(skip(self, session, request, reason), fields(request_id = request.id, status = ?request.status))]
    pub async fn reject(
        &self,
        session: &Session,
        request: &LeaveRequest,
        reason: &str,
    ) -> Result<MutationReceipt> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LeaveError::EmptyRejectionReason);
        }
        request.status.transition(LeaveTransition::Reject)?;

        let receipt = self
            .backend
            .reject(session.token(), request.id, reason)
            .await?;
        note_reported_status(request.status, &receipt);
        info!("leave request rejected");
        Ok(receipt)
    }
}

fn note_reported_status(from: LeaveStatus, receipt: &MutationReceipt) {
    if let Some(next) = receipt.status {
        if !from.can_become(next) {
            warn!(?from, ?next, "server reported a transition outside the known workflow");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RequestFilter;
    use crate::memory::InMemoryBackend;
    use crate::session::{MemoryTokenStore, SessionContext};

    async fn login(backend: &Arc<InMemoryBackend>, email: &str) -> Session {
        SessionContext::new(backend.clone(), Arc::new(MemoryTokenStore::new()))
            .login(email, InMemoryBackend::PASSWORD)
            .await
            .unwrap()
    }

    async fn pending_request(backend: &Arc<InMemoryBackend>, hr: &Session) -> LeaveRequest {
        backend
            .leave_requests(hr.token(), RequestFilter::pending())
            .await
            .unwrap()
            .into_iter()
            .next()
            .expect("seeded pending request")
    }

    #[tokio::test]
    async fn hr_approval_finalizes_pending_request() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let request = pending_request(&backend, &hr).await;

        let controller = LifecycleController::new(backend.clone());
        let receipt = controller.approve(&hr, &request, Approver::Hr).await.unwrap();
        assert_eq!(receipt.status, Some(LeaveStatus::HrApproved));

        let still_pending = backend
            .leave_requests(hr.token(), RequestFilter::pending())
            .await
            .unwrap();
        assert!(still_pending.iter().all(|r| r.id != request.id));
    }

    #[tokio::test]
    async fn terminal_request_is_refused_locally() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let mut request = pending_request(&backend, &hr).await;
        request.status = LeaveStatus::Rejected;

        let controller = LifecycleController::new(backend.clone());
        let err = controller
            .approve(&hr, &request, Approver::Hr)
            .await
            .unwrap_err();
        assert!(err.is_state_conflict());
        assert_eq!(backend.call_count("approve"), 0);
    }

    #[tokio::test]
    async fn stale_local_status_gets_server_conflict() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let request = pending_request(&backend, &hr).await;
        let controller = LifecycleController::new(backend.clone());

        controller
            .reject(&hr, &request, "Project deadline")
            .await
            .unwrap();
        // Local copy still says pending; the server knows better.
        let err = controller
            .approve(&hr, &request, Approver::Hr)
            .await
            .unwrap_err();
        assert!(err.is_state_conflict());
        assert_eq!(backend.call_count("approve"), 1);
    }

    #[tokio::test]
    async fn blank_rejection_reason_sends_nothing() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let request = pending_request(&backend, &hr).await;

        let controller = LifecycleController::new(backend.clone());
        let err = controller.reject(&hr, &request, "  ").await.unwrap_err();
        assert!(matches!(err, LeaveError::EmptyRejectionReason));
        assert_eq!(backend.call_count("reject"), 0);
    }

    #[tokio::test]
    async fn employees_are_forbidden() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let employee = login(&backend, InMemoryBackend::EMPLOYEE_EMAIL).await;
        let request = pending_request(&backend, &hr).await;

        let controller = LifecycleController::new(backend.clone());
        let err = controller
            .approve(&employee, &request, Approver::Hr)
            .await
            .unwrap_err();
        assert!(matches!(err, LeaveError::Forbidden(_)));
    }

    #[tokio::test]
    async fn team_leader_stage_then_final_approval() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let request = pending_request(&backend, &hr).await;
        let controller = LifecycleController::new(backend.clone());

        let receipt = controller
            .approve(&hr, &request, Approver::TeamLeader)
            .await
            .unwrap();
        assert_eq!(receipt.status, Some(LeaveStatus::TeamLeaderApproved));

        let refreshed = backend
            .leave_requests(hr.token(), RequestFilter::all())
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.id == request.id)
            .unwrap();
        assert_eq!(refreshed.status.hr_actions()[0].label(), "Final Approve");

        let receipt = controller
            .approve(&hr, &refreshed, Approver::Hr)
            .await
            .unwrap();
        assert_eq!(receipt.status, Some(LeaveStatus::HrApproved));
    }
}
