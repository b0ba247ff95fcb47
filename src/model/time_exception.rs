use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionType {
    MissedPunch,
    LateArrival,
    EarlyDeparture,
    Other,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionStatus {
    Open,
    Pending,
    Escalated,
    Resolved,
}

impl ExceptionStatus {
    /// ESCALATED is only entered by the escalation sweeps.
    pub fn can_transition_to(self, next: ExceptionStatus) -> bool {
        use ExceptionStatus::*;
        matches!(
            (self, next),
            (Open, Pending) | (Open, Resolved) | (Pending, Escalated) | (Pending, Resolved) | (Escalated, Resolved)
        )
    }

    pub fn is_resolved(self) -> bool {
        self == ExceptionStatus::Resolved
    }
}

/// A flagged anomaly requiring assignee action. Always references exactly one
/// AttendanceRecord; the record's exception-id set is append-only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeException {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    pub exception_type: ExceptionType,
    #[schema(example = 42)]
    pub record_id: u64,
    /// Who must act on the exception.
    #[schema(example = 1001)]
    pub assignee_id: u64,
    pub status: ExceptionStatus,
    #[schema(example = "first punch of the day is OUT", nullable = true)]
    pub reason: Option<String>,
    #[schema(example = "2026-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2026-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::ExceptionStatus::*;

    #[test]
    fn lifecycle_transitions() {
        assert!(Open.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Escalated));
        assert!(Pending.can_transition_to(Resolved));
        assert!(Escalated.can_transition_to(Resolved));
        assert!(!Open.can_transition_to(Escalated));
        assert!(!Resolved.can_transition_to(Open));
        assert!(!Escalated.can_transition_to(Pending));
    }
}
