use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::backend::{LeaveBackend, LoginResponse, MutationReceipt, RequestFilter};
use crate::composer::LeaveSubmission;
use crate::directory::{NewUser, UserFilter};
use crate::domain::serde_helpers::format_date;
use crate::domain::{
    Approver, DashboardMetrics, LeaveBalance, LeaveRequest, LeaveRequestId, LeaveStatus,
    LeaveType, SalarySlip, SalarySlipDetail, User, UserId, YtdEarnings,
};
use crate::error::{LeaveError, Result};

mod dto;

use dto::{
    ApproveRequest, BalancesEnvelope, DashboardEnvelope, DepartmentsEnvelope, ErrorBody,
    LoginEnvelope, LoginRequest, MeEnvelope, MutationEnvelope, RejectRequest, RequestsEnvelope,
    SalariesEnvelope, SalaryDetailEnvelope, TypesEnvelope, UsersEnvelope,
};

/// Talks to the HR REST API over HTTP with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` includes any API prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| LeaveError::Transport(format!("Invalid API URL {base_url}: {e}")))?;

        let client = Client::builder()
            .build()
            .map_err(|e| LeaveError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| LeaveError::Transport(format!("Failed to build URL for path {path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            LeaveError::Transport(format!("Failed to call {call_name}: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; a non-JSON 502 page still yields a status.
        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        debug!(call = call_name, status = status.as_u16(), ?message, "request failed");
        Err(LeaveError::from_status(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, call_name: &str) -> Result<T> {
        let response = self.send(request, call_name).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| LeaveError::Parsing(format!("Failed to parse {call_name} response: {e}")))
    }

    async fn mutate(&self, request: RequestBuilder, call_name: &str) -> Result<MutationReceipt> {
        let response = self.send(request, call_name).await?;
        let body = response.bytes().await?;
        let envelope: MutationEnvelope = if body.is_empty() {
            MutationEnvelope::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| LeaveError::Parsing(format!("Failed to parse {call_name} response: {e}")))?
        };

        Ok(MutationReceipt {
            message: envelope.message,
            status: envelope
                .status
                .as_deref()
                .and_then(|s| LeaveStatus::from_str(s).ok()),
            request: envelope
                .request
                .and_then(|v| serde_json::from_value::<LeaveRequest>(v).ok()),
        })
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.bearer_auth(token)
    }
}

fn submission_form(submission: &LeaveSubmission) -> Result<multipart::Form> {
    let mut form = multipart::Form::new()
        .text("leave_type_id", submission.leave_type_id.to_string())
        .text("start_date", format_date(submission.start_date))
        .text("end_date", format_date(submission.end_date))
        .text("reason", submission.reason.clone())
        .text("is_half_day", submission.is_half_day.to_string());

    if submission.is_half_day {
        if let Some(period) = submission.half_day_period {
            form = form.text("half_day_period", period.as_str());
        }
    }

    if let Some(attachment) = &submission.attachment {
        let part = multipart::Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(attachment.mime)
            .map_err(|e| LeaveError::Transport(format!("Invalid attachment type: {e}")))?;
        form = form.part("attachment", part);
    }

    Ok(form)
}

#[async_trait]
impl LeaveBackend for HttpBackend {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let envelope: LoginEnvelope = self
            .get_json(
                self.client
                    .post(self.endpoint("/auth/login")?)
                    .json(&LoginRequest { email, password }),
                "POST /auth/login",
            )
            .await
            .map_err(|e| match e {
                LeaveError::Unauthenticated(msg) | LeaveError::Conflict(msg) => {
                    LeaveError::Unauthenticated(msg)
                }
                other => other,
            })?;

        let must_change_password =
            envelope.must_change_password.unwrap_or(envelope.user.must_change_password);
        Ok(LoginResponse {
            token: envelope.token,
            user: envelope.user,
            must_change_password,
        })
    }

    #[instrument(skip_all)]
    async fn me(&self, token: &str) -> Result<User> {
        let envelope: MeEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/auth/me")?), token),
                "GET /auth/me",
            )
            .await?;
        envelope
            .user
            .ok_or_else(|| LeaveError::Parsing("No user data received".to_string()))
    }

    #[instrument(skip_all)]
    async fn leave_types(&self, token: &str) -> Result<Vec<LeaveType>> {
        let envelope: TypesEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/leaves/types")?), token),
                "GET /leaves/types",
            )
            .await?;
        Ok(envelope.types)
    }

    #[instrument(skip_all)]
    async fn leave_balances(&self, token: &str) -> Result<Vec<LeaveBalance>> {
        let envelope: BalancesEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/leaves/balance")?), token),
                "GET /leaves/balance",
            )
            .await?;
        Ok(envelope.balances)
    }

    #[instrument(skip(self, token))]
    async fn leave_requests(&self, token: &str, filter: RequestFilter) -> Result<Vec<LeaveRequest>> {
        let mut builder = self.authed(self.client.get(self.endpoint("/leaves")?), token);
        if let Some(status) = filter.status {
            builder = builder.query(&[("status", status.as_str())]);
        }
        let envelope: RequestsEnvelope = self.get_json(builder, "GET /leaves").await?;
        Ok(envelope.requests)
    }

    #[instrument(skip_all, fields(leave_type = submission.leave_type_id))]
    async fn create_request(&self, token: &str, submission: &LeaveSubmission) -> Result<MutationReceipt> {
        let form = submission_form(submission)?;
        self.mutate(
            self.authed(self.client.post(self.endpoint("/leaves")?), token)
                .multipart(form),
            "POST /leaves",
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn approve(&self, token: &str, request_id: LeaveRequestId, approved_by: Approver) -> Result<MutationReceipt> {
        self.mutate(
            self.authed(
                self.client
                    .put(self.endpoint(&format!("/leaves/{request_id}/approve"))?),
                token,
            )
            .json(&ApproveRequest { approved_by }),
            "PUT /leaves/:id/approve",
        )
        .await
    }

    #[instrument(skip(self, token, rejection_reason))]
    async fn reject(&self, token: &str, request_id: LeaveRequestId, rejection_reason: &str) -> Result<MutationReceipt> {
        self.mutate(
            self.authed(
                self.client
                    .put(self.endpoint(&format!("/leaves/{request_id}/reject"))?),
                token,
            )
            .json(&RejectRequest { rejection_reason }),
            "PUT /leaves/:id/reject",
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn salary_slips(&self, token: &str, year: i32) -> Result<Vec<SalarySlip>> {
        let envelope: SalariesEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/salary")?), token)
                    .query(&[("year", year)]),
                "GET /salary",
            )
            .await?;
        Ok(envelope.salaries)
    }

    #[instrument(skip(self, token))]
    async fn ytd_earnings(&self, token: &str, year: i32) -> Result<YtdEarnings> {
        self.get_json(
            self.authed(self.client.get(self.endpoint("/salary/ytd")?), token)
                .query(&[("year", year)]),
            "GET /salary/ytd",
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn salary_pdf(&self, token: &str, salary_id: i64) -> Result<Vec<u8>> {
        let response = self
            .send(
                self.authed(
                    self.client
                        .get(self.endpoint(&format!("/salary/{salary_id}/pdf"))?),
                    token,
                ),
                "GET /salary/:id/pdf",
            )
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    #[instrument(skip(self, token))]
    async fn salary_slip(&self, token: &str, salary_id: i64) -> Result<SalarySlipDetail> {
        let envelope: SalaryDetailEnvelope = self
            .get_json(
                self.authed(
                    self.client
                        .get(self.endpoint(&format!("/salary/{salary_id}"))?),
                    token,
                ),
                "GET /salary/:id",
            )
            .await?;
        let salary = envelope
            .salary
            .ok_or_else(|| LeaveError::Conflict("Salary slip not found".to_string()))?;
        Ok(SalarySlipDetail {
            salary,
            components: envelope.details,
        })
    }

    #[instrument(skip_all)]
    async fn dashboard(&self, token: &str) -> Result<DashboardMetrics> {
        let envelope: DashboardEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/reports/dashboard")?), token),
                "GET /reports/dashboard",
            )
            .await?;
        Ok(envelope.into_metrics())
    }

    #[instrument(skip(self, token))]
    async fn users(&self, token: &str, filter: &UserFilter) -> Result<Vec<User>> {
        let envelope: UsersEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/users")?), token)
                    .query(&filter.query_pairs()),
                "GET /users",
            )
            .await?;
        Ok(envelope.users)
    }

    #[instrument(skip_all)]
    async fn departments(&self, token: &str) -> Result<Vec<String>> {
        let envelope: DepartmentsEnvelope = self
            .get_json(
                self.authed(self.client.get(self.endpoint("/users/departments")?), token),
                "GET /users/departments",
            )
            .await?;
        Ok(envelope
            .departments
            .into_iter()
            .flatten()
            .filter(|d| !d.trim().is_empty())
            .collect())
    }

    #[instrument(skip_all, fields(role = user.role.as_str()))]
    async fn create_user(&self, token: &str, user: &NewUser) -> Result<MutationReceipt> {
        self.mutate(
            self.authed(self.client.post(self.endpoint("/users")?), token)
                .json(user),
            "POST /users",
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn reset_password(&self, token: &str, user_id: UserId) -> Result<MutationReceipt> {
        self.mutate(
            self.authed(
                self.client
                    .post(self.endpoint(&format!("/users/{user_id}/reset-password"))?),
                token,
            ),
            "POST /users/:id/reset-password",
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn delete_user(&self, token: &str, user_id: UserId) -> Result<MutationReceipt> {
        self.mutate(
            self.authed(
                self.client
                    .delete(self.endpoint(&format!("/users/{user_id}"))?),
                token,
            ),
            "DELETE /users/:id",
        )
        .await
    }
}
