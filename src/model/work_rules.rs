use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overtime configuration consumed by reporting. Looked up by the overtime
/// report; no coupling to AttendanceRecord beyond that.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Standard 1.5x",
    "multiplier": 1.5,
    "daily_threshold_minutes": 30,
    "active": true
}))]
pub struct OvertimeRule {
    pub id: u64,
    pub name: String,
    /// Weight applied to overtime minutes when producing payroll input.
    pub multiplier: f64,
    /// Extra minutes beyond the shift window before overtime starts counting.
    pub daily_threshold_minutes: Option<i64>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({ "id": 1, "name": "Default grace", "grace_minutes": 10, "active": true }))]
pub struct LatenessRule {
    pub id: u64,
    pub name: String,
    /// Minutes past shift start before the first IN counts as late.
    pub grace_minutes: i64,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({ "id": 1, "name": "New Year", "date": "2026-01-01" }))]
pub struct Holiday {
    pub id: u64,
    pub name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
}
