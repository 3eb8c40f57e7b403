use crate::app::App;
use crate::runtime::Services;
use anyhow::{bail, Context, Result};
use hr_client::catalog::FETCH_FAILED;
use hr_client::{InMemoryBackend, RequestScope, Session, SessionContext};

/// Restore the stored session, or explain how to get one.
pub async fn restore_session(ctx: &SessionContext) -> Result<Session> {
    match ctx.init().await.context("Failed to verify stored session")? {
        Some(session) => Ok(session),
        None => bail!("Not logged in. Run `hr-tui login` first."),
    }
}

/// Sign in to the in-memory backend as one of its seeded users.
pub async fn dev_session(ctx: &SessionContext, as_hr: bool) -> Result<Session> {
    let email = if as_hr {
        InMemoryBackend::HR_EMAIL
    } else {
        InMemoryBackend::EMPLOYEE_EMAIL
    };
    ctx.login(email, InMemoryBackend::PASSWORD)
        .await
        .context("Failed to sign in to dev backend")
}

/// First catalog load, before the terminal switches to the alternate screen.
pub async fn initialize_app_state(app: &mut App, services: &Services) {
    let ticket = app.refresh_seq.issue();
    match services
        .reconciler
        .refresh(&app.session, RequestScope::None)
        .await
    {
        Ok(snapshot) => {
            if app.refresh_seq.try_apply(ticket) {
                app.apply_snapshot(snapshot);
            }
        }
        Err(e) => eprintln!(
            "Warning: Could not load leave balances: {}",
            e.user_message(FETCH_FAILED)
        ),
    }
}
