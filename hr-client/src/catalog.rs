use std::sync::Arc;

use tracing::instrument;

use crate::backend::LeaveBackend;
use crate::domain::{LeaveBalance, LeaveType, LeaveTypeId, UNKNOWN_LEAVE_TYPE};
use crate::error::Result;
use crate::session::Session;

pub const FETCH_FAILED: &str = "Failed to fetch data";

/// Leave types plus the actor's balances, as last fetched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaveCatalog {
    pub types: Vec<LeaveType>,
    pub balances: Vec<LeaveBalance>,
}

impl LeaveCatalog {
    /// Types that can be picked for a new request.
    pub fn selectable_types(&self) -> impl Iterator<Item = &LeaveType> {
        self.types.iter().filter(|t| t.is_active)
    }

    pub fn leave_type(&self, id: LeaveTypeId) -> Option<&LeaveType> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Balance for `leave_type_id`, preferring the record for `year`.
    pub fn balance_for(&self, leave_type_id: LeaveTypeId, year: i32) -> Option<&LeaveBalance> {
        let mut candidates = self
            .balances
            .iter()
            .filter(|b| b.leave_type_id == leave_type_id);
        let first = candidates.next()?;
        if first.year == year {
            return Some(first);
        }
        candidates.find(|b| b.year == year).or(Some(first))
    }

    /// Label for a balance row. Inactive and unknown types still get one.
    pub fn balance_label<'a>(&'a self, balance: &'a LeaveBalance) -> &'a str {
        balance
            .type_name()
            .or_else(|| self.leave_type(balance.leave_type_id).map(|t| t.name.as_str()))
            .unwrap_or(UNKNOWN_LEAVE_TYPE)
    }
}

#[derive(Clone)]
pub struct CatalogReader {
    backend: Arc<dyn LeaveBackend>,
}

impl CatalogReader {
    pub fn new(backend: Arc<dyn LeaveBackend>) -> Self {
        Self { backend }
    }

    /// Fetch types and balances at the same time.
    #[instrument(skip_all)]
    pub async fn fetch(&self, session: &Session) -> Result<LeaveCatalog> {
        let token = session.token();
        let (types, balances) = tokio::try_join!(
            self.backend.leave_types(token),
            self.backend.leave_balances(token)
        )?;
        Ok(LeaveCatalog { types, balances })
    }
}
