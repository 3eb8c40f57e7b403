mod action_queue;
mod actions;
mod event_loop;
mod views;

use hr_client::{
    DashboardReader, LeaveBackend, LifecycleController, Reconciler, RequestComposer, UserDirectory,
};
use std::path::PathBuf;
use std::sync::Arc;

pub use event_loop::run_app;

/// Workflow handles shared with every spawned task.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn LeaveBackend>,
    pub composer: RequestComposer,
    pub lifecycle: LifecycleController,
    pub reconciler: Reconciler,
    pub dashboard: DashboardReader,
    pub directory: UserDirectory,
    pub download_dir: PathBuf,
}

impl Services {
    pub fn new(backend: Arc<dyn LeaveBackend>, download_dir: PathBuf) -> Self {
        Self {
            composer: RequestComposer::new(backend.clone()),
            lifecycle: LifecycleController::new(backend.clone()),
            reconciler: Reconciler::new(backend.clone()),
            dashboard: DashboardReader::new(backend.clone()),
            directory: UserDirectory::new(backend.clone()),
            backend,
            download_dir,
        }
    }
}
