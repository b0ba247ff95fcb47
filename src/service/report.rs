use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Result;
use crate::model::attendance::{AttendanceRecord, PunchType};
use crate::model::shift::parse_hhmm;
use crate::model::time_exception::TimeException;
use crate::model::work_rules::LatenessRule;
use crate::service::assignment::AssignmentService;
use crate::store::{AttendanceFilter, AttendanceStore, ExceptionFilter, ExceptionStore, WorkRuleStore};

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceReportRow {
    #[schema(example = 42)]
    pub record_id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub record_date: NaiveDate,
    #[schema(example = 480)]
    pub work_minutes: i64,
    pub has_missed_punch: bool,
    pub finalised_for_payroll: bool,
    #[schema(example = 2)]
    pub punch_count: usize,
    /// First IN later than shift start plus the active grace period.
    pub late: bool,
    pub holiday: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceReport {
    #[schema(example = 20)]
    pub total_records: usize,
    #[schema(example = 9600)]
    pub total_work_minutes: i64,
    pub records: Vec<AttendanceReportRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OvertimeEntry {
    #[schema(example = 42)]
    pub record_id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub record_date: NaiveDate,
    #[schema(example = 600)]
    pub actual_minutes: i64,
    #[schema(example = 480)]
    pub expected_minutes: i64,
    #[schema(example = 120)]
    pub overtime_minutes: i64,
    /// Overtime weighted by the active overtime rule's multiplier.
    #[schema(example = 180)]
    pub weighted_minutes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OvertimeReport {
    /// Matching records with a governing shift, including zero-overtime ones.
    #[schema(example = 20)]
    pub total_records: usize,
    #[schema(example = 120)]
    pub total_overtime_minutes: i64,
    /// Only records with overtime; zero-overtime records are omitted.
    pub entries: Vec<OvertimeEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExceptionReport {
    #[schema(example = 7)]
    pub total: usize,
    #[schema(value_type = Object, example = json!({ "MISSED_PUNCH": 5, "LATE_ARRIVAL": 2 }))]
    pub by_type: HashMap<String, u64>,
    #[schema(value_type = Object, example = json!({ "OPEN": 4, "ESCALATED": 3 }))]
    pub by_status: HashMap<String, u64>,
    pub exceptions: Vec<TimeException>,
}

/// Read-only aggregation over attendance records, resolved shift windows and
/// the exception log. Produces payroll inputs; never computes pay.
pub struct ReportService {
    attendance: Arc<dyn AttendanceStore>,
    exceptions: Arc<dyn ExceptionStore>,
    work_rules: Arc<dyn WorkRuleStore>,
    assignments: Arc<AssignmentService>,
}

impl ReportService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        exceptions: Arc<dyn ExceptionStore>,
        work_rules: Arc<dyn WorkRuleStore>,
        assignments: Arc<AssignmentService>,
    ) -> Self {
        Self {
            attendance,
            exceptions,
            work_rules,
            assignments,
        }
    }

    async fn is_late(&self, record: &AttendanceRecord, rule: &LatenessRule) -> Result<bool> {
        let Some(first_in) = record
            .punches
            .iter()
            .find(|p| p.punch_type == PunchType::In)
        else {
            return Ok(false);
        };
        let Some(resolved) = self
            .assignments
            .resolve(record.employee_id, record.record_date)
            .await?
        else {
            return Ok(false);
        };
        let start = parse_hhmm(&resolved.shift.start_time)?;
        let (limit, wrapped) = start.overflowing_add_signed(Duration::minutes(rule.grace_minutes));
        Ok(wrapped == 0 && first_in.at.time() > limit)
    }

    pub async fn attendance_report(&self, filter: &AttendanceFilter) -> Result<AttendanceReport> {
        let records = self.attendance.list_records(filter).await?;
        let lateness_rule = self.work_rules.first_active_lateness_rule().await?;

        let mut rows = Vec::with_capacity(records.len());
        let mut total_work_minutes = 0;
        for record in &records {
            total_work_minutes += record.work_minutes;
            let holiday = self.work_rules.holiday_on(record.record_date).await?;
            let late = match (&lateness_rule, holiday) {
                (Some(rule), false) => self.is_late(record, rule).await?,
                _ => false,
            };
            rows.push(AttendanceReportRow {
                record_id: record.id,
                employee_id: record.employee_id,
                record_date: record.record_date,
                work_minutes: record.work_minutes,
                has_missed_punch: record.has_missed_punch,
                finalised_for_payroll: record.finalised_for_payroll,
                punch_count: record.punches.len(),
                late,
                holiday,
            });
        }

        Ok(AttendanceReport {
            total_records: rows.len(),
            total_work_minutes,
            records: rows,
        })
    }

    /// Overtime against the shift window governing each record's date.
    /// Holidays count as an expected window of zero; a configured daily
    /// threshold widens the window before overtime starts.
    pub async fn overtime_report(&self, filter: &AttendanceFilter) -> Result<OvertimeReport> {
        let records = self.attendance.list_records(filter).await?;
        let overtime_rule = self.work_rules.first_active_overtime_rule().await?;

        let mut total_records = 0;
        let mut total_overtime_minutes = 0;
        let mut entries = Vec::new();

        for record in records {
            let Some(resolved) = self
                .assignments
                .resolve(record.employee_id, record.record_date)
                .await?
            else {
                continue;
            };
            total_records += 1;

            let mut expected = if self.work_rules.holiday_on(record.record_date).await? {
                0
            } else {
                resolved.shift.window_minutes()?
            };
            if let Some(rule) = &overtime_rule {
                expected += rule.daily_threshold_minutes.unwrap_or(0);
            }

            let overtime = (record.work_minutes - expected).max(0);
            if overtime == 0 {
                continue;
            }
            total_overtime_minutes += overtime;

            let weighted = match &overtime_rule {
                Some(rule) => (overtime as f64 * rule.multiplier).round() as i64,
                None => overtime,
            };
            entries.push(OvertimeEntry {
                record_id: record.id,
                employee_id: record.employee_id,
                record_date: record.record_date,
                actual_minutes: record.work_minutes,
                expected_minutes: expected,
                overtime_minutes: overtime,
                weighted_minutes: weighted,
            });
        }

        Ok(OvertimeReport {
            total_records,
            total_overtime_minutes,
            entries,
        })
    }

    pub async fn exception_report(&self, filter: &ExceptionFilter) -> Result<ExceptionReport> {
        let exceptions = self.exceptions.list_exceptions(filter).await?;

        let mut by_type: HashMap<String, u64> = HashMap::new();
        let mut by_status: HashMap<String, u64> = HashMap::new();
        for exception in &exceptions {
            *by_type.entry(exception.exception_type.to_string()).or_insert(0) += 1;
            *by_status.entry(exception.status.to_string()).or_insert(0) += 1;
        }

        Ok(ExceptionReport {
            total: exceptions.len(),
            by_type,
            by_status,
            exceptions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::Punch;
    use crate::model::shift::PunchPolicy;
    use crate::service::test_support::TestEnv;
    use crate::store::{NewHoliday, NewOvertimeRule};
    use chrono::{TimeZone, Utc};

    fn punch_at(punch_type: PunchType, day: u32, hour: u32, min: u32) -> Punch {
        Punch {
            punch_type,
            at: Utc.with_ymd_and_hms(2026, 1, day, hour, min, 0).unwrap(),
        }
    }

    #[actix_web::test]
    async fn overtime_omits_zero_rows_but_counts_them() {
        let env = TestEnv::new();
        let shift_id = env.seed_shift("09:00", "17:00", PunchPolicy::All).await;
        env.seed_approved_assignment(3401, shift_id, "2026-01-01").await;
        env.seed_approved_assignment(3402, shift_id, "2026-01-01").await;

        // 3401 worked ten hours, 3402 exactly the window.
        env.seed_record(
            3401,
            "2026-01-05".parse().unwrap(),
            vec![
                punch_at(PunchType::In, 5, 9, 0),
                punch_at(PunchType::Out, 5, 19, 0),
            ],
        )
        .await;
        env.seed_record(
            3402,
            "2026-01-05".parse().unwrap(),
            vec![
                punch_at(PunchType::In, 5, 9, 0),
                punch_at(PunchType::Out, 5, 17, 0),
            ],
        )
        .await;

        let report = env
            .reports
            .overtime_report(&AttendanceFilter {
                employee_id: None,
                from: Some("2026-01-05".parse().unwrap()),
                to: Some("2026-01-05".parse().unwrap()),
            })
            .await
            .unwrap();

        assert_eq!(report.total_records, 2);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].employee_id, 3401);
        assert_eq!(report.entries[0].overtime_minutes, 120);
        assert_eq!(report.total_overtime_minutes, 120);
    }

    #[actix_web::test]
    async fn overtime_applies_multiplier_and_holiday_window() {
        let env = TestEnv::new();
        let shift_id = env.seed_shift("09:00", "17:00", PunchPolicy::All).await;
        env.seed_approved_assignment(3403, shift_id, "2026-01-01").await;
        env.work_rules
            .create_overtime_rule(NewOvertimeRule {
                name: "1.5x".into(),
                multiplier: 1.5,
                daily_threshold_minutes: None,
            })
            .await
            .unwrap();
        env.work_rules
            .create_holiday(NewHoliday {
                name: "New Year".into(),
                date: "2026-01-06".parse().unwrap(),
            })
            .await
            .unwrap();

        // Four hours on a holiday: every minute is overtime.
        env.seed_record(
            3403,
            "2026-01-06".parse().unwrap(),
            vec![
                punch_at(PunchType::In, 6, 9, 0),
                punch_at(PunchType::Out, 6, 13, 0),
            ],
        )
        .await;

        let report = env
            .reports
            .overtime_report(&AttendanceFilter {
                employee_id: Some(3403),
                from: None,
                to: None,
            })
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].expected_minutes, 0);
        assert_eq!(report.entries[0].overtime_minutes, 240);
        assert_eq!(report.entries[0].weighted_minutes, 360);
    }

    #[actix_web::test]
    async fn attendance_report_sums_and_filters() {
        let env = TestEnv::new();
        env.seed_record(
            3404,
            "2026-01-05".parse().unwrap(),
            vec![
                punch_at(PunchType::In, 5, 9, 0),
                punch_at(PunchType::Out, 5, 17, 0),
            ],
        )
        .await;
        env.seed_record(
            3404,
            "2026-01-06".parse().unwrap(),
            vec![
                punch_at(PunchType::In, 6, 9, 0),
                punch_at(PunchType::Out, 6, 13, 0),
            ],
        )
        .await;

        let report = env
            .reports
            .attendance_report(&AttendanceFilter {
                employee_id: Some(3404),
                from: None,
                to: None,
            })
            .await
            .unwrap();
        assert_eq!(report.total_records, 2);
        assert_eq!(report.total_work_minutes, 480 + 240);

        let filtered = env
            .reports
            .attendance_report(&AttendanceFilter {
                employee_id: Some(3404),
                from: Some("2026-01-06".parse().unwrap()),
                to: None,
            })
            .await
            .unwrap();
        assert_eq!(filtered.total_records, 1);
        assert_eq!(filtered.total_work_minutes, 240);
    }

    #[actix_web::test]
    async fn exception_report_groups_by_type_and_status() {
        let env = TestEnv::new();
        let record = env
            .seed_record(
                3405,
                "2026-01-05".parse().unwrap(),
                vec![punch_at(PunchType::Out, 5, 9, 0)],
            )
            .await;
        env.exceptions
            .create(crate::service::exception::NewExceptionRequest {
                record_id: record.id,
                exception_type: crate::model::time_exception::ExceptionType::MissedPunch,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();
        env.exceptions
            .create(crate::service::exception::NewExceptionRequest {
                record_id: record.id,
                exception_type: crate::model::time_exception::ExceptionType::LateArrival,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();

        let report = env
            .reports
            .exception_report(&ExceptionFilter {
                employee_id: Some(3405),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.by_type.get("MISSED_PUNCH"), Some(&1));
        assert_eq!(report.by_type.get("LATE_ARRIVAL"), Some(&1));
        assert_eq!(report.by_status.get("OPEN"), Some(&2));
    }
}
