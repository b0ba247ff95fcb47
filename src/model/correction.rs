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
pub enum CorrectionStatus {
    Submitted,
    InReview,
    Approved,
    Rejected,
    Escalated,
}

impl CorrectionStatus {
    /// Transition table. ESCALATED is only ever entered by the payroll-cutoff
    /// sweep; the user-facing update path additionally refuses it.
    pub fn can_transition_to(self, next: CorrectionStatus) -> bool {
        use CorrectionStatus::*;
        matches!(
            (self, next),
            (Submitted, InReview) | (Submitted, Escalated) | (InReview, Approved) | (InReview, Rejected) | (InReview, Escalated)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CorrectionStatus::Approved | CorrectionStatus::Rejected | CorrectionStatus::Escalated
        )
    }
}

/// Employee-initiated dispute over an AttendanceRecord. While one of these is
/// open (SUBMITTED / IN_REVIEW) the record is held back from payroll.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceCorrectionRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 42)]
    pub record_id: u64,
    #[schema(example = "Forgot to clock out, left at 17:30")]
    pub reason: String,
    pub status: CorrectionStatus,
    #[schema(example = "2026-01-05T18:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2026-01-05T18:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::CorrectionStatus::*;

    #[test]
    fn legal_transitions() {
        assert!(Submitted.can_transition_to(InReview));
        assert!(Submitted.can_transition_to(Escalated));
        assert!(InReview.can_transition_to(Approved));
        assert!(InReview.can_transition_to(Rejected));
        assert!(InReview.can_transition_to(Escalated));
    }

    #[test]
    fn illegal_transitions() {
        assert!(!Submitted.can_transition_to(Approved));
        assert!(!Submitted.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Escalated.can_transition_to(InReview));
        assert!(!Rejected.can_transition_to(Submitted));
    }
}
