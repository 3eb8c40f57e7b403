mod leave;
mod report;
mod salary;
pub mod serde_helpers;
mod status;
mod user;

pub use leave::*;
pub use report::*;
pub use salary::*;
pub use status::*;
pub use user::*;
