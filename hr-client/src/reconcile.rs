//! Re-reading authoritative state after anything changes.
//!
//! Every mutation is followed by a full refetch instead of local balance
//! arithmetic. Refetches can overlap, so each one carries a ticket and only
//! a result newer than the last applied one is allowed to land.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::{LeaveBackend, RequestFilter};
use crate::catalog::{CatalogReader, LeaveCatalog};
use crate::domain::LeaveRequest;
use crate::error::Result;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RefreshSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Claim the right to apply a finished fetch. Returns `false` when a
    /// newer fetch has already been applied.
    pub fn try_apply(&self, ticket: RefreshTicket) -> bool {
        let accepted = self
            .applied
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (ticket.0 > current).then_some(ticket.0)
            })
            .is_ok();
        if !accepted {
            debug!(ticket = ticket.0, "discarding out-of-order refresh");
        }
        accepted
    }
}

/// Which request list accompanies the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    None,
    /// The actor's own requests, every status.
    Mine,
    /// Everything still waiting on an initial decision.
    PendingApprovals,
}

impl RequestScope {
    fn filter(self) -> Option<RequestFilter> {
        match self {
            RequestScope::None => None,
            RequestScope::Mine => Some(RequestFilter::all()),
            RequestScope::PendingApprovals => Some(RequestFilter::pending()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveSnapshot {
    pub catalog: LeaveCatalog,
    pub scope: RequestScope,
    /// `None` when `scope` is [`RequestScope::None`].
    pub requests: Option<Vec<LeaveRequest>>,
}

#[derive(Clone)]
pub struct Reconciler {
    backend: Arc<dyn LeaveBackend>,
    catalog: CatalogReader,
}

impl Reconciler {
    pub fn new(backend: Arc<dyn LeaveBackend>) -> Self {
        Self {
            catalog: CatalogReader::new(backend.clone()),
            backend,
        }
    }

    #[instrument(skip(self, session))]
    pub async fn refresh(&self, session: &Session, scope: RequestScope) -> Result<LeaveSnapshot> {
        let catalog = self.catalog.fetch(session).await?;
        let requests = match scope.filter() {
            Some(filter) => Some(self.backend.leave_requests(session.token(), filter).await?),
            None => None,
        };
        Ok(LeaveSnapshot {
            catalog,
            scope,
            requests,
        })
    }
}
