use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::serde_helpers::{self, lenient_bool, lenient_f64};
use super::{LeaveStatus, User};

pub type LeaveTypeId = i64;
pub type LeaveRequestId = i64;

/// Label shown for balances whose leave type the catalog doesn't know.
pub const UNKNOWN_LEAVE_TYPE: &str = "Unknown leave type";

/// A configured category of leave (annual, sick, ...). Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_days: f64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: bool,
}

/// Per-user, per-type, per-year allotment. `remaining_days` is whatever the
/// server says it is; it is never recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub leave_type_id: LeaveTypeId,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_days: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub used_days: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub remaining_days: f64,
    pub year: i32,
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
}

impl LeaveBalance {
    /// Name of the embedded leave type, if the server sent one.
    pub fn type_name(&self) -> Option<&str> {
        self.leave_type.as_ref().map(|t| t.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfDayPeriod {
    Morning,
    Evening,
}

impl HalfDayPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            HalfDayPeriod::Morning => "morning",
            HalfDayPeriod::Evening => "evening",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HalfDayPeriod::Morning => "Morning",
            HalfDayPeriod::Evening => "Evening",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            HalfDayPeriod::Morning => HalfDayPeriod::Evening,
            HalfDayPeriod::Evening => HalfDayPeriod::Morning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub leave_type_id: LeaveTypeId,
    #[serde(with = "serde_helpers::date")]
    pub start_date: Date,
    #[serde(with = "serde_helpers::date")]
    pub end_date: Date,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_days: f64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_half_day: bool,
    #[serde(default)]
    pub half_day_period: Option<HalfDayPeriod>,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    #[serde(default, with = "serde_helpers::timestamp_opt")]
    pub team_leader_approval_date: Option<OffsetDateTime>,
    #[serde(default, with = "serde_helpers::timestamp_opt")]
    pub hr_approval_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default, with = "serde_helpers::timestamp_opt")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
}

impl LeaveRequest {
    pub fn type_name(&self) -> &str {
        self.leave_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or(UNKNOWN_LEAVE_TYPE)
    }

    pub fn requester_name(&self) -> Option<String> {
        self.user.as_ref().map(User::full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn deserializes_request_with_embedded_user_and_type() {
        let raw = r#"{
            "id": 7,
            "user_id": 3,
            "leave_type_id": 1,
            "start_date": "2024-03-01T00:00:00.000Z",
            "end_date": "2024-03-01",
            "total_days": "0.5",
            "is_half_day": 1,
            "half_day_period": "morning",
            "reason": "Dentist",
            "status": "team_leader_approved",
            "team_leader_approval_date": "2024-02-28T09:30:00Z",
            "created_at": "2024-02-27T12:00:00Z",
            "user": {
                "id": 3,
                "employee_id": "E-003",
                "email": "sam@example.com",
                "first_name": "Sam",
                "last_name": "Rivera",
                "role": "employee"
            },
            "leave_type": {
                "id": 1,
                "name": "Annual",
                "description": "Paid annual leave",
                "max_days": 20,
                "is_active": true
            }
        }"#;

        let request: LeaveRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.start_date, date!(2024 - 03 - 01));
        assert_eq!(request.total_days, 0.5);
        assert!(request.is_half_day);
        assert_eq!(request.half_day_period, Some(HalfDayPeriod::Morning));
        assert_eq!(request.status, LeaveStatus::TeamLeaderApproved);
        assert!(request.team_leader_approval_date.is_some());
        assert!(request.hr_approval_date.is_none());
        assert_eq!(request.type_name(), "Annual");
        assert_eq!(request.requester_name().as_deref(), Some("Sam Rivera"));
    }

    #[test]
    fn missing_leave_type_falls_back_to_label() {
        let raw = r#"{
            "id": 1, "leave_type_id": 99, "start_date": "2024-01-02",
            "end_date": "2024-01-03", "total_days": 2, "status": "pending"
        }"#;
        let request: LeaveRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.type_name(), UNKNOWN_LEAVE_TYPE);
        assert!(!request.is_half_day);
    }
}
