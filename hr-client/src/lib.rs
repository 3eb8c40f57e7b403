//! Client side of the HR leave workflow: compose requests, move them through
//! approval, and keep balances in line with what the server reports.

mod backend;
pub mod catalog;
pub mod composer;
pub mod dashboard;
pub mod directory;
pub mod domain;
mod error;
mod http;
pub mod lifecycle;
mod memory;
pub mod reconcile;
pub mod session;

pub use backend::*;
pub use error::*;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;

pub use catalog::{CatalogReader, LeaveCatalog};
pub use composer::{BalanceCheck, DraftIssue, LeaveDraft, LeaveSubmission, RequestComposer};
pub use dashboard::DashboardReader;
pub use directory::{NewUser, UserDirectory, UserFilter, UserIssue, UserListing};
pub use lifecycle::LifecycleController;
pub use reconcile::{LeaveSnapshot, Reconciler, RefreshSequencer, RefreshTicket, RequestScope};
pub use session::{MemoryTokenStore, Session, SessionContext, TokenStore};
