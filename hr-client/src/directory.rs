//! HR's view of employee accounts: list, create, reset, delete.

use std::sync::Arc;

use serde::Serialize;
use time::Date;
use tracing::{debug, info, instrument};

use crate::backend::{LeaveBackend, MutationReceipt};
use crate::domain::serde_helpers::{format_date, parse_date};
use crate::domain::{Role, User, UserId};
use crate::error::{LeaveError, Result};
use crate::session::Session;

pub const USERS_FETCH_FAILED: &str = "Failed to fetch users";
pub const CREATE_USER_SUCCESS: &str = "User created successfully";
pub const CREATE_USER_FAILED: &str = "Failed to create user";
pub const RESET_PASSWORD_SUCCESS: &str = "Password reset email sent successfully";
pub const RESET_PASSWORD_FAILED: &str = "Failed to reset password";
pub const DELETE_USER_SUCCESS: &str = "User deleted successfully";
pub const DELETE_USER_FAILED: &str = "Failed to delete user";

/// Narrows the user list. Empty fields mean "any".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    pub search: String,
    pub role: Option<Role>,
    pub department: Option<String>,
}

impl UserFilter {
    /// Query string pairs for `GET /users`; empty values are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search));
        }
        if let Some(role) = &self.role {
            pairs.push(("role", role.as_str()));
        }
        if let Some(department) = self.department.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("department", department));
        }
        pairs
    }

    /// Search covers names, email and employee id, case-insensitively.
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.trim().to_lowercase();
        let searched = needle.is_empty()
            || [
                Some(user.first_name.as_str()),
                Some(user.last_name.as_str()),
                Some(user.email.as_str()),
                user.employee_id.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));

        searched
            && self.role.as_ref().map_or(true, |r| *r == user.role)
            && self
                .department
                .as_deref()
                .map_or(true, |d| user.department.as_deref() == Some(d))
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_hire_date"
    )]
    pub hire_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<UserId>,
}

fn serialize_hire_date<S: serde::Serializer>(
    date: &Option<Date>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&format_date(*date)),
        None => serializer.serialize_none(),
    }
}

impl Default for NewUser {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Employee,
            department: None,
            position: None,
            hire_date: None,
            manager_id: None,
        }
    }
}

impl NewUser {
    /// Parse the free-text hire date the form collects. Blank means none.
    pub fn parse_hire_date(raw: &str) -> std::result::Result<Option<Date>, UserIssue> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_date(raw).map(Some).map_err(|_| UserIssue::InvalidHireDate)
    }

    /// Everything that stops `actor` from creating this account.
    pub fn issues(&self, actor: &Role) -> Vec<UserIssue> {
        let mut issues = Vec::new();
        if self.first_name.trim().is_empty() {
            issues.push(UserIssue::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            issues.push(UserIssue::MissingLastName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            issues.push(UserIssue::MissingEmail);
        } else if !looks_like_email(email) {
            issues.push(UserIssue::InvalidEmail);
        }
        if !actor.can_assign(&self.role) {
            issues.push(UserIssue::RoleNotAllowed(self.role.clone()));
        }
        issues
    }

    fn trimmed(&self) -> Self {
        let tidy = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            role: self.role.clone(),
            department: tidy(&self.department),
            position: tidy(&self.position),
            hire_date: self.hire_date,
            manager_id: self.manager_id,
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserIssue {
    MissingFirstName,
    MissingLastName,
    MissingEmail,
    InvalidEmail,
    InvalidHireDate,
    RoleNotAllowed(Role),
}

impl UserIssue {
    pub fn message(&self) -> String {
        match self {
            UserIssue::MissingFirstName => "First name is required".to_string(),
            UserIssue::MissingLastName => "Last name is required".to_string(),
            UserIssue::MissingEmail => "Email is required".to_string(),
            UserIssue::InvalidEmail => "Enter a valid email address".to_string(),
            UserIssue::InvalidHireDate => "Hire date must be YYYY-MM-DD".to_string(),
            UserIssue::RoleNotAllowed(role) => {
                format!("You cannot create users with the {} role", role.label())
            }
        }
    }
}

/// Users matching a filter, plus every department for the filter picker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserListing {
    pub users: Vec<User>,
    pub departments: Vec<String>,
}

#[derive(Clone)]
pub struct UserDirectory {
    backend: Arc<dyn LeaveBackend>,
}

impl UserDirectory {
    pub fn new(backend: Arc<dyn LeaveBackend>) -> Self {
        Self { backend }
    }

    /// The department list is a nicety: if it fails the users still show.
    #[instrument(skip_all, fields(search = %filter.search))]
    pub async fn list(&self, session: &Session, filter: &UserFilter) -> Result<UserListing> {
        require_hr(session)?;
        let token = session.token();
        let (users, departments) = tokio::join!(
            self.backend.users(token, filter),
            self.backend.departments(token)
        );
        let departments = departments.unwrap_or_else(|e| {
            debug!(error = %e, "department list unavailable");
            Vec::new()
        });
        Ok(UserListing {
            users: users?,
            departments,
        })
    }

    #[instrument(skip_all, fields(role = user.role.as_str()))]
    pub async fn create(&self, session: &Session, user: &NewUser) -> Result<MutationReceipt> {
        require_hr(session)?;
        let user = user.trimmed();
        let issues = user.issues(&session.user().role);
        if !issues.is_empty() {
            return Err(LeaveError::InvalidUser(issues));
        }
        let receipt = self.backend.create_user(session.token(), &user).await?;
        info!("user created");
        Ok(receipt)
    }

    #[instrument(skip(self, session))]
    pub async fn reset_password(&self, session: &Session, user_id: UserId) -> Result<MutationReceipt> {
        require_hr(session)?;
        self.backend.reset_password(session.token(), user_id).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete(&self, session: &Session, user_id: UserId) -> Result<MutationReceipt> {
        if session.user().role != Role::HrManager {
            return Err(LeaveError::Forbidden(
                "Only HR managers can delete users".to_string(),
            ));
        }
        let receipt = self.backend.delete_user(session.token(), user_id).await?;
        info!("user deleted");
        Ok(receipt)
    }
}

fn require_hr(session: &Session) -> Result<()> {
    if session.is_hr() {
        Ok(())
    } else {
        Err(LeaveError::Forbidden("Only HR can manage users".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use crate::session::{MemoryTokenStore, SessionContext};
    use time::macros::date;

    async fn login(backend: &Arc<InMemoryBackend>, email: &str) -> Session {
        SessionContext::new(backend.clone(), Arc::new(MemoryTokenStore::new()))
            .login(email, InMemoryBackend::PASSWORD)
            .await
            .unwrap()
    }

    fn recruit() -> NewUser {
        NewUser {
            email: " sam@example.com ".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Rivera".to_string(),
            department: Some("  ".to_string()),
            hire_date: Some(date!(2024 - 06 - 03)),
            ..NewUser::default()
        }
    }

    #[test]
    fn filter_matches_names_and_employee_ids() {
        let user = User {
            id: 7,
            employee_id: Some("E-042".to_string()),
            email: "kim@example.com".to_string(),
            first_name: "Kim".to_string(),
            last_name: "Novak".to_string(),
            role: Role::Employee,
            department: Some("Finance".to_string()),
            position: None,
            hire_date: None,
            manager_id: None,
            must_change_password: false,
            created_at: None,
        };
        let mut filter = UserFilter {
            search: "e-04".to_string(),
            ..UserFilter::default()
        };
        assert!(filter.matches(&user));

        filter.department = Some("Operations".to_string());
        assert!(!filter.matches(&user));

        filter.department = None;
        filter.role = Some(Role::HrExecutive);
        assert!(!filter.matches(&user));
    }

    #[test]
    fn query_leaves_out_blank_fields() {
        let filter = UserFilter {
            search: "  ".to_string(),
            role: Some(Role::HrManager),
            department: Some(String::new()),
        };
        assert_eq!(filter.query_pairs(), vec![("role", "hr_manager")]);
    }

    #[test]
    fn new_user_needs_names_and_a_plausible_email() {
        let draft = NewUser {
            email: "not-an-email".to_string(),
            ..NewUser::default()
        };
        let issues = draft.issues(&Role::HrManager);
        assert_eq!(
            issues,
            vec![
                UserIssue::MissingFirstName,
                UserIssue::MissingLastName,
                UserIssue::InvalidEmail
            ]
        );
        assert!(recruit().trimmed().issues(&Role::HrExecutive).is_empty());
    }

    #[test]
    fn executives_cannot_create_managers() {
        let draft = NewUser {
            role: Role::HrManager,
            ..recruit()
        };
        assert_eq!(
            draft.issues(&Role::HrExecutive),
            vec![UserIssue::RoleNotAllowed(Role::HrManager)]
        );
    }

    #[test]
    fn hire_date_is_optional_but_must_parse() {
        assert_eq!(NewUser::parse_hire_date(" "), Ok(None));
        assert_eq!(
            NewUser::parse_hire_date("2024-06-03"),
            Ok(Some(date!(2024 - 06 - 03)))
        );
        assert_eq!(
            NewUser::parse_hire_date("03/06/2024"),
            Err(UserIssue::InvalidHireDate)
        );
    }

    #[test]
    fn serialized_body_skips_missing_fields() {
        let body = serde_json::to_value(recruit().trimmed()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "email": "sam@example.com",
                "first_name": "Sam",
                "last_name": "Rivera",
                "role": "employee",
                "hire_date": "2024-06-03"
            })
        );
    }

    #[tokio::test]
    async fn employees_cannot_list_users() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let employee = login(&backend, InMemoryBackend::EMPLOYEE_EMAIL).await;
        let err = UserDirectory::new(backend.clone())
            .list(&employee, &UserFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LeaveError::Forbidden(_)));
        assert_eq!(backend.call_count("users"), 0);
    }

    #[tokio::test]
    async fn created_user_shows_up_in_listing() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let directory = UserDirectory::new(backend.clone());

        let receipt = directory.create(&hr, &recruit()).await.unwrap();
        assert_eq!(receipt.message.as_deref(), Some(CREATE_USER_SUCCESS));

        let listing = directory
            .list(
                &hr,
                &UserFilter {
                    search: "rivera".to_string(),
                    ..UserFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(listing.users.len(), 1);
        assert_eq!(listing.users[0].email, "sam@example.com");
        assert!(listing.users[0].must_change_password);
        assert!(listing.departments.contains(&"Operations".to_string()));
    }

    #[tokio::test]
    async fn invalid_user_never_reaches_the_server() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let err = UserDirectory::new(backend.clone())
            .create(&hr, &NewUser::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "First name is required");
        assert_eq!(backend.call_count("create_user"), 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let draft = NewUser {
            email: InMemoryBackend::EMPLOYEE_EMAIL.to_string(),
            ..recruit()
        };
        let err = UserDirectory::new(backend)
            .create(&hr, &draft)
            .await
            .unwrap_err();
        assert!(err.is_state_conflict());
    }

    #[tokio::test]
    async fn deleting_a_user_revokes_their_session() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let employee = login(&backend, InMemoryBackend::EMPLOYEE_EMAIL).await;

        let receipt = UserDirectory::new(backend.clone())
            .delete(&hr, employee.user().id)
            .await
            .unwrap();
        assert_eq!(receipt.message.as_deref(), Some(DELETE_USER_SUCCESS));
        assert!(backend.me(employee.token()).await.unwrap_err().is_unauthenticated());
    }

    #[tokio::test]
    async fn reset_flags_password_change() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let hr = login(&backend, InMemoryBackend::HR_EMAIL).await;
        let employee = login(&backend, InMemoryBackend::EMPLOYEE_EMAIL).await;

        UserDirectory::new(backend.clone())
            .reset_password(&hr, employee.user().id)
            .await
            .unwrap();
        assert!(backend.me(employee.token()).await.unwrap().must_change_password);
    }
}
