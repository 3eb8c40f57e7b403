use std::sync::Arc;

use tracing::instrument;

use crate::backend::LeaveBackend;
use crate::domain::DashboardMetrics;
use crate::error::Result;
use crate::session::Session;

pub const DASHBOARD_FAILED: &str = "Failed to fetch dashboard stats";

#[derive(Clone)]
pub struct DashboardReader {
    backend: Arc<dyn LeaveBackend>,
}

impl DashboardReader {
    pub fn new(backend: Arc<dyn LeaveBackend>) -> Self {
        Self { backend }
    }

    /// Company-wide figures. Employees get `None` without a round trip.
    #[instrument(skip_all)]
    pub async fn load(&self, session: &Session) -> Result<Option<DashboardMetrics>> {
        if !session.is_hr() {
            return Ok(None);
        }
        self.backend.dashboard(session.token()).await.map(Some)
    }
}
