use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use super::serde_helpers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    HrManager,
    HrExecutive,
    Employee,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::HrManager => "hr_manager",
            Role::HrExecutive => "hr_executive",
            Role::Employee => "employee",
            Role::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::HrManager => "HR Manager",
            Role::HrExecutive => "HR Executive",
            Role::Employee => "Employee",
            Role::Other(raw) => raw,
        }
    }

    pub fn is_hr(&self) -> bool {
        matches!(self, Role::HrManager | Role::HrExecutive)
    }

    /// Roles an actor with this role may hand out to a new account.
    /// Only HR managers can create other HR managers.
    pub fn assignable_roles(&self) -> &'static [Role] {
        const MANAGER: &[Role] = &[Role::Employee, Role::HrExecutive, Role::HrManager];
        const EXECUTIVE: &[Role] = &[Role::Employee, Role::HrExecutive];
        const NONE: &[Role] = &[];
        match self {
            Role::HrManager => MANAGER,
            Role::HrExecutive => EXECUTIVE,
            _ => NONE,
        }
    }

    pub fn can_assign(&self, role: &Role) -> bool {
        self.assignable_roles().contains(role)
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        match raw {
            "hr_manager" => Role::HrManager,
            "hr_executive" => Role::HrExecutive,
            "employee" => Role::Employee,
            other => Role::Other(other.to_string()),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from(raw.as_str()))
    }
}

pub type UserId = i64;

/// An employee account as returned by `/auth/me` and embedded in requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default)]
    pub manager_id: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_bool")]
    pub must_change_password: bool,
    #[serde(default, with = "serde_helpers::timestamp_opt")]
    pub created_at: Option<OffsetDateTime>,
}

fn default_role() -> Role {
    Role::Employee
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_hr(&self) -> bool {
        self.role.is_hr()
    }
}
