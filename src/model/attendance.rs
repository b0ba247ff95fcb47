use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::shift::PunchPolicy;

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
pub enum PunchType {
    In,
    Out,
}

/// A single clock event. Never persisted standalone — always a member of an
/// AttendanceRecord's punch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Punch {
    pub punch_type: PunchType,
    #[schema(example = "2026-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub at: DateTime<Utc>,
}

/// Daily aggregate of an employee's punches plus derived work-time and
/// missed-punch status. One logical record per employee per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub record_date: NaiveDate,
    /// Time-ordered punch sequence.
    pub punches: Vec<Punch>,
    #[schema(example = 480)]
    pub work_minutes: i64,
    pub has_missed_punch: bool,
    /// Ids of TimeExceptions linked to this record; append-only.
    pub exception_ids: Vec<u64>,
    /// True when the record is not under active dispute and safe for payroll.
    pub finalised_for_payroll: bool,
    #[schema(example = "2026-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2026-01-05T17:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Re-derive the computed fields from the punch sequence. Also restores
    /// the time ordering the sequence is stored in.
    pub fn recompute(&mut self) {
        self.punches.sort_by_key(|p| p.at);
        self.work_minutes = calculate_work_minutes(&self.punches);
        self.has_missed_punch = has_missed_punch(&self.punches);
    }
}

/// Total worked minutes for a day's punches.
///
/// The sequence is sorted internally, so the result does not depend on input
/// order. A trailing IN and an OUT with no preceding IN contribute zero;
/// each matched pair contributes its span floored to whole minutes.
pub fn calculate_work_minutes(punches: &[Punch]) -> i64 {
    let mut sorted = punches.to_vec();
    sorted.sort_by_key(|p| p.at);

    let mut total = 0i64;
    let mut pending_in: Option<DateTime<Utc>> = None;
    for punch in sorted {
        match punch.punch_type {
            // A later unmatched IN supersedes an earlier one.
            PunchType::In => pending_in = Some(punch.at),
            PunchType::Out => {
                if let Some(started) = pending_in.take() {
                    total += (punch.at - started).num_minutes();
                }
            }
        }
    }
    total
}

/// A day has a missed punch when the sorted sequence is empty, starts with
/// OUT, ends with IN, or has two adjacent punches of the same type.
pub fn has_missed_punch(punches: &[Punch]) -> bool {
    let mut sorted = punches.to_vec();
    sorted.sort_by_key(|p| p.at);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return true;
    };
    if first.punch_type == PunchType::Out || last.punch_type == PunchType::In {
        return true;
    }
    sorted
        .windows(2)
        .any(|pair| pair[0].punch_type == pair[1].punch_type)
}

/// Apply a shift's punch policy to an incoming punch.
///
/// Under `FIRST_LAST` at most one IN and one OUT survive per day: the IN is
/// pinned at the first clock-in, the OUT follows the latest clock-out. Under
/// `ALL` the punch is simply appended. The returned sequence is time-ordered.
pub fn apply_punch_policy(existing: Vec<Punch>, incoming: Punch, policy: PunchPolicy) -> Vec<Punch> {
    let mut result = match policy {
        PunchPolicy::All => {
            let mut all = existing;
            all.push(incoming);
            all
        }
        PunchPolicy::FirstLast => match incoming.punch_type {
            PunchType::In => {
                let earliest_in = existing
                    .iter()
                    .filter(|p| p.punch_type == PunchType::In)
                    .min_by_key(|p| p.at)
                    .copied();
                let mut kept: Vec<Punch> = existing
                    .into_iter()
                    .filter(|p| p.punch_type == PunchType::Out)
                    .collect();
                kept.push(earliest_in.unwrap_or(incoming));
                kept
            }
            PunchType::Out => {
                let mut kept: Vec<Punch> = existing
                    .into_iter()
                    .filter(|p| p.punch_type == PunchType::In)
                    .collect();
                kept.push(incoming);
                kept
            }
        },
    };
    result.sort_by_key(|p| p.at);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, hour, min, 0).unwrap()
    }

    fn punch(punch_type: PunchType, hour: u32, min: u32) -> Punch {
        Punch {
            punch_type,
            at: at(hour, min),
        }
    }

    fn permutations(punches: &[Punch]) -> Vec<Vec<Punch>> {
        if punches.len() <= 1 {
            return vec![punches.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..punches.len() {
            let mut rest = punches.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn full_day_pair_is_480_minutes() {
        let punches = vec![punch(PunchType::In, 9, 0), punch(PunchType::Out, 17, 0)];
        assert_eq!(calculate_work_minutes(&punches), 480);
        assert!(!has_missed_punch(&punches));
    }

    #[test]
    fn work_minutes_is_order_independent() {
        let punches = vec![
            punch(PunchType::In, 9, 0),
            punch(PunchType::Out, 12, 0),
            punch(PunchType::In, 13, 0),
            punch(PunchType::Out, 18, 0),
        ];
        let expected = calculate_work_minutes(&punches);
        assert_eq!(expected, 480);
        for permutation in permutations(&punches) {
            assert_eq!(calculate_work_minutes(&permutation), expected);
        }
    }

    #[test]
    fn unmatched_punches_contribute_zero() {
        // OUT with no pending IN, then a matched pair, then a trailing IN.
        let punches = vec![
            punch(PunchType::Out, 8, 0),
            punch(PunchType::In, 9, 0),
            punch(PunchType::Out, 12, 30),
            punch(PunchType::In, 13, 0),
        ];
        assert_eq!(calculate_work_minutes(&punches), 210);
    }

    #[test]
    fn later_unmatched_in_supersedes_earlier() {
        let punches = vec![
            punch(PunchType::In, 9, 0),
            punch(PunchType::In, 10, 0),
            punch(PunchType::Out, 11, 0),
        ];
        assert_eq!(calculate_work_minutes(&punches), 60);
    }

    #[test]
    fn empty_day_is_missed() {
        assert!(has_missed_punch(&[]));
    }

    #[test]
    fn out_first_is_missed() {
        assert!(has_missed_punch(&[punch(PunchType::Out, 9, 0)]));
    }

    #[test]
    fn adjacent_same_type_is_missed() {
        let punches = vec![punch(PunchType::In, 9, 0), punch(PunchType::In, 12, 0)];
        assert!(has_missed_punch(&punches));
    }

    #[test]
    fn first_last_collapses_to_first_in_and_latest_out() {
        let mut punches = Vec::new();
        for incoming in [
            punch(PunchType::In, 9, 0),
            punch(PunchType::Out, 12, 0),
            punch(PunchType::In, 13, 0),
            punch(PunchType::Out, 18, 0),
        ] {
            punches = apply_punch_policy(punches, incoming, PunchPolicy::FirstLast);
        }
        assert_eq!(
            punches,
            vec![punch(PunchType::In, 9, 0), punch(PunchType::Out, 18, 0)]
        );
    }

    #[test]
    fn all_policy_appends() {
        let punches = apply_punch_policy(
            vec![punch(PunchType::In, 9, 0)],
            punch(PunchType::In, 10, 0),
            PunchPolicy::All,
        );
        assert_eq!(punches.len(), 2);
    }

    #[test]
    fn recompute_sorts_and_rederives() {
        let mut record = AttendanceRecord {
            id: 1,
            employee_id: 1,
            record_date: at(0, 0).date_naive(),
            punches: vec![punch(PunchType::Out, 17, 0), punch(PunchType::In, 9, 0)],
            work_minutes: 0,
            has_missed_punch: true,
            exception_ids: vec![],
            finalised_for_payroll: true,
            created_at: at(9, 0),
            updated_at: at(9, 0),
        };
        record.recompute();
        assert_eq!(record.work_minutes, 480);
        assert!(!record.has_missed_punch);
        assert_eq!(record.punches[0].punch_type, PunchType::In);
    }
}
