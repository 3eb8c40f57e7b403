use crate::app::{App, Tab};
use hr_client::catalog::FETCH_FAILED;
use hr_client::composer::{SUBMIT_FAILED, SUBMIT_SUCCESS};
use hr_client::dashboard::DASHBOARD_FAILED;
use hr_client::directory::USERS_FETCH_FAILED;
use hr_client::lifecycle::{APPROVE_FAILED, APPROVE_SUCCESS, REJECT_FAILED, REJECT_SUCCESS};
use hr_client::{LeaveError, MutationReceipt, RequestScope, SESSION_EXPIRED};
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::action_queue::{Action, ActionTx, Decision, Outcome, OutcomeTx, UserOp};
use super::Services;

pub(super) fn run_action(action: Action, app: &mut App, services: &Services, outcome_tx: &OutcomeTx) {
    match action {
        Action::Refresh { scope } => spawn_refresh(scope, app, services, outcome_tx),
        Action::SubmitDraft => spawn_submit(app, services, outcome_tx),
        Action::Approve {
            request,
            approved_by,
        } => {
            app.begin_work();
            let lifecycle = services.lifecycle.clone();
            let session = app.session.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = lifecycle.approve(&session, &request, approved_by).await;
                let _ = tx.send(Outcome::Decided {
                    decision: Decision::Approve,
                    result,
                });
            });
        }
        Action::Reject { request, reason } => {
            if reason.trim().is_empty() {
                app.deciding = None;
                if let Some(prompt) = app.reject_prompt.as_mut() {
                    prompt.error = Some(LeaveError::EmptyRejectionReason.to_string());
                }
                return;
            }
            app.begin_work();
            let lifecycle = services.lifecycle.clone();
            let session = app.session.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = lifecycle.reject(&session, &request, &reason).await;
                let _ = tx.send(Outcome::Decided {
                    decision: Decision::Reject,
                    result,
                });
            });
        }
        Action::LoadSalary { year } => {
            app.begin_work();
            let backend = services.backend.clone();
            let token = app.session.token().to_string();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let (slips, ytd) = tokio::join!(
                    backend.salary_slips(&token, year),
                    backend.ytd_earnings(&token, year)
                );
                let ytd = ytd
                    .map_err(|e| debug!(error = %e, "ytd earnings unavailable"))
                    .ok();
                let _ = tx.send(Outcome::SalaryLoaded { year, slips, ytd });
            });
        }
        Action::DownloadSlip { salary_id } => {
            app.begin_work();
            let backend = services.backend.clone();
            let token = app.session.token().to_string();
            let dir = services.download_dir.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = download_slip(backend.as_ref(), &token, salary_id, dir).await;
                let _ = tx.send(Outcome::SlipDownloaded(result));
            });
        }
        Action::LoadSlipDetail { salary_id } => {
            app.begin_work();
            let backend = services.backend.clone();
            let token = app.session.token().to_string();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = backend.salary_slip(&token, salary_id).await;
                let _ = tx.send(Outcome::SlipDetailLoaded { salary_id, result });
            });
        }
        Action::LoadDashboard => {
            app.begin_work();
            let dashboard = services.dashboard.clone();
            let session = app.session.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = dashboard.load(&session).await;
                let _ = tx.send(Outcome::DashboardLoaded(result));
            });
        }
        Action::LoadUsers { filter } => {
            app.begin_work();
            let directory = services.directory.clone();
            let session = app.session.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = directory.list(&session, &filter).await;
                let _ = tx.send(Outcome::UsersLoaded { filter, result });
            });
        }
        Action::CreateUser { user } => {
            let directory = services.directory.clone();
            let session = app.session.clone();
            spawn_user_op(UserOp::Create, app, outcome_tx, async move {
                directory.create(&session, &user).await
            });
        }
        Action::ResetPassword { user_id } => {
            let directory = services.directory.clone();
            let session = app.session.clone();
            spawn_user_op(UserOp::ResetPassword, app, outcome_tx, async move {
                directory.reset_password(&session, user_id).await
            });
        }
        Action::DeleteUser { user_id } => {
            let directory = services.directory.clone();
            let session = app.session.clone();
            spawn_user_op(UserOp::Delete, app, outcome_tx, async move {
                directory.delete(&session, user_id).await
            });
        }
    }
}

fn spawn_user_op<F>(op: UserOp, app: &mut App, outcome_tx: &OutcomeTx, call: F)
where
    F: Future<Output = hr_client::Result<MutationReceipt>> + Send + 'static,
{
    app.begin_work();
    app.users.saving = true;
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = call.await;
        let _ = tx.send(Outcome::UserAdminDone { op, result });
    });
}

fn spawn_refresh(scope: RequestScope, app: &mut App, services: &Services, outcome_tx: &OutcomeTx) {
    let ticket = app.refresh_seq.issue();
    app.begin_work();
    let reconciler = services.reconciler.clone();
    let session = app.session.clone();
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = reconciler.refresh(&session, scope).await;
        let _ = tx.send(Outcome::Refreshed { ticket, result });
    });
}

fn spawn_submit(app: &mut App, services: &Services, outcome_tx: &OutcomeTx) {
    app.begin_work();
    app.submitting = true;
    let composer = services.composer.clone();
    let session = app.session.clone();
    let draft = app.draft.clone();
    let balance = app.selected_balance().cloned();
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = composer.submit(&session, &draft, balance.as_ref()).await;
        let _ = tx.send(Outcome::Submitted(result));
    });
}

async fn download_slip(
    backend: &dyn hr_client::LeaveBackend,
    token: &str,
    salary_id: i64,
    dir: PathBuf,
) -> hr_client::Result<PathBuf> {
    let bytes = backend.salary_pdf(token, salary_id).await?;
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(format!("salary-slip-{salary_id}.pdf"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Fold a finished task back into the app. Mutations always queue a refetch,
/// whether they worked or not.
pub(super) fn apply_outcome(outcome: Outcome, app: &mut App, action_tx: &ActionTx) {
    app.end_work();
    match outcome {
        Outcome::Refreshed { ticket, result } => {
            if !app.refresh_seq.try_apply(ticket) {
                return;
            }
            match result {
                Ok(snapshot) => app.apply_snapshot(snapshot),
                Err(e) => report_error(app, &e, FETCH_FAILED),
            }
        }
        Outcome::Submitted(result) => {
            app.submitting = false;
            match result {
                Ok(receipt) => {
                    app.reset_form();
                    app.select_tab(Tab::MyRequests);
                    app.set_status(receipt.message.unwrap_or_else(|| SUBMIT_SUCCESS.to_string()));
                    enqueue(action_tx, Action::Refresh { scope: RequestScope::Mine });
                }
                Err(e) => report_error(app, &e, SUBMIT_FAILED),
            }
        }
        Outcome::Decided { decision, result } => {
            app.deciding = None;
            let (success, failed) = match decision {
                Decision::Approve => (APPROVE_SUCCESS, APPROVE_FAILED),
                Decision::Reject => (REJECT_SUCCESS, REJECT_FAILED),
            };
            match result {
                Ok(_) => {
                    app.close_reject_prompt();
                    app.set_status(success);
                }
                Err(e) => {
                    app.close_reject_prompt();
                    report_error(app, &e, failed);
                }
            }
            enqueue(
                action_tx,
                Action::Refresh {
                    scope: RequestScope::PendingApprovals,
                },
            );
        }
        Outcome::SalaryLoaded { year, slips, ytd } => {
            if year != app.salary.year {
                debug!(year, current = app.salary.year, "discarding salary slips for another year");
                return;
            }
            match slips {
                Ok(slips) => {
                    app.salary.slips = slips;
                    app.salary.ytd = ytd;
                    app.salary.loaded = true;
                    if app.salary.selected >= app.salary.slips.len() {
                        app.salary.selected = app.salary.slips.len().saturating_sub(1);
                    }
                }
                Err(e) => report_error(app, &e, "Failed to fetch salary slips"),
            }
        }
        Outcome::SlipDownloaded(result) => match result {
            Ok(path) => app.set_status(format!("Saved {}", path.display())),
            Err(e) => report_error(app, &e, "Failed to download PDF"),
        },
        Outcome::SlipDetailLoaded { salary_id, result } => {
            if !app.salary.slips.iter().any(|s| s.id == salary_id) {
                debug!(salary_id, "discarding detail for a slip no longer listed");
                return;
            }
            match result {
                Ok(detail) => app.salary.detail = Some(detail),
                Err(e) => report_error(app, &e, "Failed to fetch salary details"),
            }
        }
        Outcome::DashboardLoaded(result) => match result {
            Ok(metrics) => {
                app.dashboard = metrics;
                app.dashboard_loaded = true;
            }
            Err(e) => report_error(app, &e, DASHBOARD_FAILED),
        },
        Outcome::UsersLoaded { filter, result } => {
            if filter != app.users.filter {
                debug!("discarding users for a stale filter");
                return;
            }
            match result {
                Ok(listing) => app.apply_user_listing(listing),
                Err(e) => report_error(app, &e, USERS_FETCH_FAILED),
            }
        }
        Outcome::UserAdminDone { op, result } => {
            app.users.saving = false;
            let (success, failed) = op.messages();
            match result {
                Ok(receipt) => {
                    app.users.form = None;
                    app.users.confirm = None;
                    app.set_status(receipt.message.unwrap_or_else(|| success.to_string()));
                    if op.changes_listing() {
                        enqueue(
                            action_tx,
                            Action::LoadUsers {
                                filter: app.users.filter.clone(),
                            },
                        );
                    }
                }
                Err(e) => {
                    app.users.confirm = None;
                    // A failed create keeps the form open with the reason.
                    let in_form = app.users.form.is_some() && !e.is_unauthenticated();
                    if in_form {
                        warn!(error = %e, "{failed}");
                        let message = e.user_message(failed);
                        if let Some(form) = app.users.form.as_mut() {
                            form.error = Some(message);
                        }
                    } else {
                        report_error(app, &e, failed);
                    }
                }
            }
        }
    }
}

fn report_error(app: &mut App, error: &LeaveError, fallback: &str) {
    warn!(%error, "{fallback}");
    if error.is_unauthenticated() {
        app.set_error(SESSION_EXPIRED);
    } else {
        app.set_error(error.user_message(fallback));
    }
}

fn enqueue(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}
