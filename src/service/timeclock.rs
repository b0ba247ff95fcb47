use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::attendance::{AttendanceRecord, Punch, PunchType, apply_punch_policy};
use crate::model::notification::NotificationType;
use crate::model::shift::PunchPolicy;
use crate::service::assignment::AssignmentService;
use crate::service::exception::{ExceptionService, immediate_anomaly};
use crate::service::notify::Notifier;
use crate::store::{AttendanceFilter, AttendanceStore};
use crate::utils::clock::Clock;

type DayKey = (u64, NaiveDate);

/// Ingests clock events and recomputes the day's attendance metrics.
///
/// Two clock events for the same employee can race on the same record; all
/// read-modify-write of a day's record is serialized on a per-(employee, day)
/// async mutex.
pub struct TimeClockService {
    attendance: Arc<dyn AttendanceStore>,
    assignments: Arc<AssignmentService>,
    exceptions: Arc<ExceptionService>,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
    day_locks: Mutex<HashMap<DayKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl TimeClockService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        assignments: Arc<AssignmentService>,
        exceptions: Arc<ExceptionService>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            attendance,
            assignments,
            exceptions,
            notifier,
            clock,
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    fn day_lock(&self, employee_id: u64, date: NaiveDate) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.day_locks.lock().unwrap();
        if locks.len() > 4096 {
            // Drop entries nobody is holding; in-flight guards keep theirs alive.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        locks
            .entry((employee_id, date))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Record a clock event: locate-or-create today's record, apply the
    /// resolved shift's punch policy, recompute the derived fields and
    /// persist. Raises a missed-punch exception for immediate anomalies.
    pub async fn punch(&self, employee_id: u64, punch_type: PunchType) -> Result<AttendanceRecord> {
        let now = self.clock.now();
        let today = now.date_naive();
        let lock = self.day_lock(employee_id, today);
        let _guard = lock.lock().await;

        // No resolvable shift means keep every punch.
        let policy = self
            .assignments
            .resolve(employee_id, today)
            .await?
            .map(|resolved| resolved.shift.punch_policy)
            .unwrap_or(PunchPolicy::All);

        let mut record = match self
            .attendance
            .find_by_employee_and_date(employee_id, today)
            .await?
        {
            Some(record) => record,
            None => {
                self.attendance
                    .insert_record(AttendanceRecord {
                        id: 0,
                        employee_id,
                        record_date: today,
                        punches: Vec::new(),
                        work_minutes: 0,
                        has_missed_punch: true,
                        exception_ids: Vec::new(),
                        finalised_for_payroll: true,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?
            }
        };

        let incoming = Punch {
            punch_type,
            at: now,
        };
        record.punches = apply_punch_policy(std::mem::take(&mut record.punches), incoming, policy);
        record.recompute();
        record.updated_at = now;
        if !self.attendance.update_record(&record).await? {
            return Err(Error::NotFound("attendance record", record.id));
        }

        if let Some(reason) = immediate_anomaly(&record.punches) {
            if let Some(exception) = self.exceptions.raise_missed_punch(&record, reason).await? {
                record.exception_ids.push(exception.id);
            }
        }

        tracing::debug!(
            employee_id,
            %punch_type,
            work_minutes = record.work_minutes,
            "punch processed"
        );
        Ok(record)
    }

    /// Privileged wholesale punch replacement. Bypasses the correction
    /// workflow and leaves `finalised_for_payroll` untouched; the supplied
    /// reason goes into the audit trail.
    pub async fn overwrite_punches(
        &self,
        record_id: u64,
        punches: Vec<Punch>,
        reason: Option<String>,
    ) -> Result<AttendanceRecord> {
        let existing = self
            .attendance
            .get_record(record_id)
            .await?
            .ok_or(Error::NotFound("attendance record", record_id))?;
        let lock = self.day_lock(existing.employee_id, existing.record_date);
        let _guard = lock.lock().await;

        // Re-read under the lock; a punch may have landed in between.
        let mut record = self
            .attendance
            .get_record(record_id)
            .await?
            .ok_or(Error::NotFound("attendance record", record_id))?;
        record.punches = punches;
        record.recompute();
        record.updated_at = self.clock.now();
        self.attendance.update_record(&record).await?;

        self.notifier
            .dispatch(
                record.employee_id,
                NotificationType::ManualCorrection,
                format!(
                    "Punches for {} replaced: {}",
                    record.record_date,
                    reason.unwrap_or_else(|| "no reason provided".to_string())
                ),
            )
            .await?;

        Ok(record)
    }

    pub async fn get_record(&self, id: u64) -> Result<AttendanceRecord> {
        self.attendance
            .get_record(id)
            .await?
            .ok_or(Error::NotFound("attendance record", id))
    }

    pub async fn list_records(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        self.attendance.list_records(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time_exception::ExceptionType;
    use crate::service::test_support::TestEnv;
    use chrono::{TimeZone, Utc};

    #[actix_web::test]
    async fn in_then_out_totals_the_span() {
        let env = TestEnv::new();
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap());
        env.timeclock.punch(3001, PunchType::In).await.unwrap();

        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 17, 0, 0).unwrap());
        let record = env.timeclock.punch(3001, PunchType::Out).await.unwrap();

        assert_eq!(record.work_minutes, 480);
        assert!(!record.has_missed_punch);
        assert!(record.finalised_for_payroll);
        assert_eq!(record.punches.len(), 2);
    }

    #[actix_web::test]
    async fn first_last_policy_keeps_first_in_and_latest_out() {
        let env = TestEnv::new();
        let shift_id = env.seed_shift("09:00", "17:00", PunchPolicy::FirstLast).await;
        env.seed_approved_assignment(3002, shift_id, "2026-01-01").await;

        for (hour, punch_type) in [
            (9, PunchType::In),
            (12, PunchType::Out),
            (13, PunchType::In),
            (18, PunchType::Out),
        ] {
            env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, hour, 0, 0).unwrap());
            env.timeclock.punch(3002, punch_type).await.unwrap();
        }

        let record = env
            .memory
            .find_by_employee_and_date(3002, "2026-01-05".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.punches.len(), 2);
        assert_eq!(record.punches[0].punch_type, PunchType::In);
        assert_eq!(record.punches[0].at.time().to_string(), "09:00:00");
        assert_eq!(record.punches[1].punch_type, PunchType::Out);
        assert_eq!(record.punches[1].at.time().to_string(), "18:00:00");
        assert_eq!(record.work_minutes, 540);
    }

    #[actix_web::test]
    async fn out_first_raises_one_missed_punch_exception() {
        let env = TestEnv::new();
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap());
        let record = env.timeclock.punch(3003, PunchType::Out).await.unwrap();
        assert!(record.has_missed_punch);
        assert_eq!(record.exception_ids.len(), 1);

        // A second anomalous punch must not raise a duplicate.
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap());
        let record = env.timeclock.punch(3003, PunchType::Out).await.unwrap();
        assert_eq!(record.exception_ids.len(), 1);

        let exception = env.exceptions.get(record.exception_ids[0]).await.unwrap();
        assert_eq!(exception.exception_type, ExceptionType::MissedPunch);
        assert_eq!(exception.record_id, record.id);
    }

    #[actix_web::test]
    async fn one_record_per_employee_per_day() {
        let env = TestEnv::new();
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap());
        let monday = env.timeclock.punch(3004, PunchType::In).await.unwrap();
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 6, 9, 0, 0).unwrap());
        let tuesday = env.timeclock.punch(3004, PunchType::In).await.unwrap();

        assert_ne!(monday.id, tuesday.id);
        assert_eq!(monday.record_date.succ_opt().unwrap(), tuesday.record_date);
    }

    #[actix_web::test]
    async fn overwrite_replaces_punches_and_audits() {
        let env = TestEnv::new();
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 11, 0, 0).unwrap());
        let record = env.timeclock.punch(3005, PunchType::In).await.unwrap();

        let replacement = vec![
            Punch {
                punch_type: PunchType::In,
                at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            },
            Punch {
                punch_type: PunchType::Out,
                at: Utc.with_ymd_and_hms(2026, 1, 5, 17, 0, 0).unwrap(),
            },
        ];
        let corrected = env
            .timeclock
            .overwrite_punches(record.id, replacement, None)
            .await
            .unwrap();

        assert_eq!(corrected.work_minutes, 480);
        assert!(!corrected.has_missed_punch);
        assert!(corrected.finalised_for_payroll);

        let notifications = env.memory.notifications_snapshot().await;
        let audit = notifications
            .iter()
            .find(|n| n.notification_type == NotificationType::ManualCorrection)
            .unwrap();
        assert!(audit.message.contains("no reason provided"));
    }
}
