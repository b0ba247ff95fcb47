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
pub enum NotificationType {
    MissedPunch,
    ExceptionEscalated,
    CorrectionSubmitted,
    CorrectionDecision,
    CorrectionEscalated,
    ManualCorrection,
}

/// Append-only audit trail entry. Delivery is the dispatcher's concern; this
/// core only records the event. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationLog {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub recipient_id: u64,
    pub notification_type: NotificationType,
    #[schema(example = "Missed punch detected for 2026-01-05")]
    pub message: String,
    #[schema(example = "2026-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Event payload handed to the notification sink.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: u64,
    pub notification_type: NotificationType,
    pub message: String,
}
