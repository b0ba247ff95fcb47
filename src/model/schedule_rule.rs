use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Recurrence/rest-day metadata optionally attached to a shift assignment.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "5-2 rotation",
    "recurrence": "WEEKLY",
    "rest_days": "SAT,SUN",
    "active": true
}))]
pub struct ScheduleRule {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "5-2 rotation")]
    pub name: String,
    /// Free-form recurrence expression, e.g. "WEEKLY" or "4ON-2OFF".
    #[schema(example = "WEEKLY")]
    pub recurrence: String,
    /// Comma-separated rest-day names, e.g. "SAT,SUN".
    #[schema(example = "SAT,SUN")]
    pub rest_days: String,
    pub active: bool,
}
