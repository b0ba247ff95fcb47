use chrono::{DateTime, NaiveDate, Utc};
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
pub enum AssignmentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Binds an employee to a shift (and optionally a schedule rule) for a date
/// range. Only an APPROVED assignment whose range covers a date is
/// authoritative for punch-policy resolution on that date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftAssignment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = 1, nullable = true)]
    pub schedule_rule_id: Option<u64>,
    #[schema(example = 10, nullable = true)]
    pub department_id: Option<u64>,
    #[schema(example = 3, nullable = true)]
    pub position_id: Option<u64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    /// None = open-ended.
    #[schema(example = "2026-06-30", format = "date", value_type = Option<String>, nullable = true)]
    pub end_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl ShiftAssignment {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }
}

/// An assignment joined with its shift — the answer to "what shift is this
/// employee on today."
#[derive(Debug, Clone)]
pub struct ResolvedShift {
    pub assignment: ShiftAssignment,
    pub shift: crate::model::shift::Shift,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn assignment(start: &str, end: Option<&str>) -> ShiftAssignment {
        ShiftAssignment {
            id: 1,
            employee_id: 1,
            shift_id: 1,
            schedule_rule_id: None,
            department_id: None,
            position_id: None,
            start_date: start.parse().unwrap(),
            end_date: end.map(|e| e.parse().unwrap()),
            status: AssignmentStatus::Approved,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bounded_range_covers_inclusive_ends() {
        let a = assignment("2026-01-01", Some("2026-01-31"));
        assert!(a.covers("2026-01-01".parse().unwrap()));
        assert!(a.covers("2026-01-31".parse().unwrap()));
        assert!(!a.covers("2026-02-01".parse().unwrap()));
    }

    #[test]
    fn open_ended_range_has_no_upper_bound() {
        let a = assignment("2026-01-01", None);
        assert!(a.covers("2030-12-31".parse().unwrap()));
        assert!(!a.covers("2025-12-31".parse().unwrap()));
    }
}
