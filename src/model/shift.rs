use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// How raw punches are retained within a day.
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
pub enum PunchPolicy {
    /// Keep every punch.
    All,
    /// Collapse to the first IN and the last OUT of the day.
    FirstLast,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({ "id": 1, "name": "General", "active": true }))]
pub struct ShiftType {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "General")]
    pub name: String,
    #[schema(example = true)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "shift_type_id": 1,
    "start_time": "09:00",
    "end_time": "17:00",
    "punch_policy": "FIRST_LAST",
    "active": true
}))]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub shift_type_id: u64,
    /// Wall-clock "HH:MM", employer's local timezone.
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
    pub punch_policy: PunchPolicy,
    pub active: bool,
}

impl Shift {
    /// Expected worked minutes for the window. A window whose end is not
    /// after its start is taken to cross midnight.
    pub fn window_minutes(&self) -> Result<i64> {
        let start = parse_hhmm(&self.start_time)?;
        let end = parse_hhmm(&self.end_time)?;
        let mut minutes = (end - start).num_minutes();
        if minutes <= 0 {
            minutes += 24 * 60;
        }
        Ok(minutes)
    }
}

/// Parse a "HH:MM" 24-hour wall-clock string.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| Error::invalid(format!("invalid HH:MM time: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(start: &str, end: &str) -> Shift {
        Shift {
            id: 1,
            shift_type_id: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
            punch_policy: PunchPolicy::FirstLast,
            active: true,
        }
    }

    #[test]
    fn day_window() {
        assert_eq!(shift("09:00", "17:00").window_minutes().unwrap(), 480);
    }

    #[test]
    fn overnight_window_wraps_midnight() {
        assert_eq!(shift("22:00", "06:00").window_minutes().unwrap(), 480);
    }

    #[test]
    fn bad_time_is_rejected() {
        assert!(parse_hhmm("25:61").is_err());
        assert!(parse_hhmm("9am").is_err());
    }

    #[test]
    fn policy_round_trips_through_strings() {
        assert_eq!(PunchPolicy::FirstLast.to_string(), "FIRST_LAST");
        assert_eq!("ALL".parse::<PunchPolicy>().unwrap(), PunchPolicy::All);
    }
}
