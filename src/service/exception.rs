use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::attendance::{AttendanceRecord, Punch, PunchType};
use crate::model::notification::NotificationType;
use crate::model::time_exception::{ExceptionStatus, ExceptionType, TimeException};
use crate::service::notify::Notifier;
use crate::store::{AttendanceStore, ExceptionFilter, ExceptionStore};
use crate::utils::clock::Clock;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewExceptionRequest {
    #[schema(example = 42)]
    pub record_id: u64,
    pub exception_type: ExceptionType,
    /// Defaults to the record's employee when omitted.
    #[schema(example = 1001, nullable = true)]
    pub assignee_id: Option<u64>,
    #[schema(example = "badge reader offline", nullable = true)]
    pub reason: Option<String>,
}

/// Detects and tracks time exceptions and promotes stale ones. Also owns the
/// stale-exception escalation sweep.
pub struct ExceptionService {
    exceptions: Arc<dyn ExceptionStore>,
    attendance: Arc<dyn AttendanceStore>,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
    escalation_hours: i64,
    batch_limit: usize,
}

/// An anomaly worth flagging the moment it happens, as opposed to a trailing
/// IN which just means the day is still in progress.
pub(crate) fn immediate_anomaly(punches: &[Punch]) -> Option<String> {
    let mut sorted = punches.to_vec();
    sorted.sort_by_key(|p| p.at);

    if sorted.first()?.punch_type == PunchType::Out {
        return Some("first punch of the day is OUT".to_string());
    }
    sorted.windows(2).find_map(|pair| {
        (pair[0].punch_type == pair[1].punch_type)
            .then(|| format!("two consecutive {} punches", pair[0].punch_type))
    })
}

impl ExceptionService {
    pub fn new(
        exceptions: Arc<dyn ExceptionStore>,
        attendance: Arc<dyn AttendanceStore>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
        escalation_hours: i64,
        batch_limit: usize,
    ) -> Self {
        Self {
            exceptions,
            attendance,
            notifier,
            clock,
            escalation_hours,
            batch_limit,
        }
    }

    /// Create an exception against an existing record and link it into the
    /// record's exception-id set. NotFound when the record id dangles; in
    /// that case nothing is created.
    pub async fn create(&self, request: NewExceptionRequest) -> Result<TimeException> {
        let mut record = self
            .attendance
            .get_record(request.record_id)
            .await?
            .ok_or(Error::NotFound("attendance record", request.record_id))?;

        let now = self.clock.now();
        let exception = self
            .exceptions
            .insert_exception(TimeException {
                id: 0,
                employee_id: record.employee_id,
                exception_type: request.exception_type,
                record_id: record.id,
                assignee_id: request.assignee_id.unwrap_or(record.employee_id),
                status: ExceptionStatus::Open,
                reason: request.reason,
                created_at: now,
                updated_at: now,
            })
            .await?;

        record.exception_ids.push(exception.id);
        record.updated_at = now;
        self.attendance.update_record(&record).await?;

        Ok(exception)
    }

    pub async fn get(&self, id: u64) -> Result<TimeException> {
        self.exceptions
            .get_exception(id)
            .await?
            .ok_or(Error::NotFound("time exception", id))
    }

    pub async fn list(&self, filter: &ExceptionFilter) -> Result<Vec<TimeException>> {
        self.exceptions.list_exceptions(filter).await
    }

    /// User-facing status update. ESCALATED is sweep-only; moving an
    /// exception to PENDING triggers an immediate sweep pass as a side
    /// effect of this call.
    pub async fn update_status(
        &self,
        id: u64,
        status: ExceptionStatus,
        reason: Option<String>,
    ) -> Result<TimeException> {
        if status == ExceptionStatus::Escalated {
            return Err(Error::invalid(
                "ESCALATED is entered by the escalation sweep, not by direct update",
            ));
        }
        let mut exception = self.get(id).await?;
        if !exception.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                entity: "time exception",
                from: exception.status.to_string(),
                to: status.to_string(),
            });
        }

        exception.status = status;
        if reason.is_some() {
            exception.reason = reason;
        }
        exception.updated_at = self.clock.now();
        self.exceptions.update_exception(&exception).await?;

        if status == ExceptionStatus::Pending {
            self.escalate_stale(None).await?;
        }
        Ok(exception)
    }

    /// Escalate every PENDING exception whose last update is older than the
    /// window (default from config). Idempotent: escalated items no longer
    /// match the selection.
    pub async fn escalate_stale(&self, window_hours: Option<i64>) -> Result<usize> {
        let window = window_hours.unwrap_or(self.escalation_hours);
        let now = self.clock.now();
        let threshold = now - Duration::hours(window);

        let stale = self
            .exceptions
            .pending_updated_before(threshold, self.batch_limit)
            .await?;
        let count = stale.len();

        for mut exception in stale {
            exception.status = ExceptionStatus::Escalated;
            exception.updated_at = now;
            self.exceptions.update_exception(&exception).await?;
            self.notifier
                .dispatch(
                    exception.assignee_id,
                    NotificationType::ExceptionEscalated,
                    format!(
                        "{} exception #{} has been pending for over {} hours",
                        exception.exception_type, exception.id, window
                    ),
                )
                .await?;
        }

        if count > 0 {
            tracing::info!(count, window_hours = window, "escalated stale exceptions");
        }
        Ok(count)
    }

    /// Raise a MISSED_PUNCH exception for the record unless an unresolved one
    /// is already linked. Returns the new exception, if any.
    pub async fn raise_missed_punch(
        &self,
        record: &AttendanceRecord,
        reason: String,
    ) -> Result<Option<TimeException>> {
        if self.has_unresolved_missed_punch(record).await? {
            return Ok(None);
        }
        let exception = self
            .create(NewExceptionRequest {
                record_id: record.id,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: None,
                reason: Some(reason),
            })
            .await?;
        self.notifier
            .dispatch(
                record.employee_id,
                NotificationType::MissedPunch,
                format!("Missed punch detected for {}", record.record_date),
            )
            .await?;
        Ok(Some(exception))
    }

    async fn has_unresolved_missed_punch(&self, record: &AttendanceRecord) -> Result<bool> {
        for exception_id in &record.exception_ids {
            if let Some(exception) = self.exceptions.get_exception(*exception_id).await? {
                if exception.exception_type == ExceptionType::MissedPunch
                    && !exception.status.is_resolved()
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// End-of-day scan: raise exceptions for every record on `date` still
    /// flagged with a missed punch. Safe to re-run thanks to the dedup rule.
    pub async fn detect_missed_punches(&self, date: NaiveDate) -> Result<usize> {
        let records = self
            .attendance
            .list_records(&crate::store::AttendanceFilter {
                employee_id: None,
                from: Some(date),
                to: Some(date),
            })
            .await?;

        let mut raised = 0;
        for record in records {
            if !record.has_missed_punch {
                continue;
            }
            if self
                .raise_missed_punch(&record, "incomplete punch sequence at end of day".to_string())
                .await?
                .is_some()
            {
                raised += 1;
            }
        }
        Ok(raised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::TestEnv;
    use chrono::{Duration, TimeZone, Utc};

    fn out_punch(day: u32, hour: u32) -> Punch {
        Punch {
            punch_type: PunchType::Out,
            at: Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap(),
        }
    }

    fn in_punch(day: u32, hour: u32) -> Punch {
        Punch {
            punch_type: PunchType::In,
            at: Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap(),
        }
    }

    #[actix_web::test]
    async fn create_against_missing_record_creates_nothing() {
        let env = TestEnv::new();
        let err = env
            .exceptions
            .create(NewExceptionRequest {
                record_id: 12345,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound("attendance record", 12345)));
        assert!(env
            .exceptions
            .list(&crate::store::ExceptionFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn create_links_exception_into_the_record() {
        let env = TestEnv::new();
        let record = env
            .seed_record(3101, "2026-01-05".parse().unwrap(), vec![out_punch(5, 9)])
            .await;

        let exception = env
            .exceptions
            .create(NewExceptionRequest {
                record_id: record.id,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: Some(77),
                reason: Some("badge reader offline".into()),
            })
            .await
            .unwrap();

        assert_eq!(exception.status, ExceptionStatus::Open);
        assert_eq!(exception.assignee_id, 77);
        let record = env.timeclock.get_record(record.id).await.unwrap();
        assert_eq!(record.exception_ids, vec![exception.id]);
    }

    #[actix_web::test]
    async fn stale_pending_exceptions_escalate_idempotently() {
        let env = TestEnv::new();
        let record = env
            .seed_record(3102, "2026-01-05".parse().unwrap(), vec![out_punch(5, 9)])
            .await;
        let exception = env
            .exceptions
            .create(NewExceptionRequest {
                record_id: record.id,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();
        env.exceptions
            .update_status(exception.id, ExceptionStatus::Pending, None)
            .await
            .unwrap();

        // Not stale yet.
        assert_eq!(env.exceptions.escalate_stale(None).await.unwrap(), 0);

        let later = env.clock.now() + Duration::hours(49);
        env.set_time(later);
        assert_eq!(env.exceptions.escalate_stale(None).await.unwrap(), 1);
        assert_eq!(
            env.exceptions.get(exception.id).await.unwrap().status,
            ExceptionStatus::Escalated
        );

        // Second run with the same window: nothing left to escalate.
        assert_eq!(env.exceptions.escalate_stale(None).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn moving_to_pending_sweeps_other_stale_items() {
        let env = TestEnv::new();
        let record = env
            .seed_record(3103, "2026-01-05".parse().unwrap(), vec![out_punch(5, 9)])
            .await;
        let stale = env
            .exceptions
            .create(NewExceptionRequest {
                record_id: record.id,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();
        env.exceptions
            .update_status(stale.id, ExceptionStatus::Pending, None)
            .await
            .unwrap();

        let later = env.clock.now() + Duration::hours(49);
        env.set_time(later);
        let fresh = env
            .exceptions
            .create(NewExceptionRequest {
                record_id: record.id,
                exception_type: ExceptionType::Other,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();
        // The single update call doubles as a sweep pass.
        env.exceptions
            .update_status(fresh.id, ExceptionStatus::Pending, None)
            .await
            .unwrap();

        assert_eq!(
            env.exceptions.get(stale.id).await.unwrap().status,
            ExceptionStatus::Escalated
        );
        assert_eq!(
            env.exceptions.get(fresh.id).await.unwrap().status,
            ExceptionStatus::Pending
        );
    }

    #[actix_web::test]
    async fn escalated_is_refused_on_the_user_path() {
        let env = TestEnv::new();
        let record = env
            .seed_record(3104, "2026-01-05".parse().unwrap(), vec![out_punch(5, 9)])
            .await;
        let exception = env
            .exceptions
            .create(NewExceptionRequest {
                record_id: record.id,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();
        let err = env
            .exceptions
            .update_status(exception.id, ExceptionStatus::Escalated, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StructuralInvalid(_)));
    }

    #[actix_web::test]
    async fn end_of_day_scan_flags_incomplete_days_once() {
        let env = TestEnv::new();
        // Trailing IN: an in-progress day raises nothing at punch time.
        env.set_time(Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap());
        let record = env.timeclock.punch(3105, PunchType::In).await.unwrap();
        assert!(record.exception_ids.is_empty());

        let date = "2026-01-05".parse().unwrap();
        assert_eq!(env.exceptions.detect_missed_punches(date).await.unwrap(), 1);
        // Dedup holds on re-run.
        assert_eq!(env.exceptions.detect_missed_punches(date).await.unwrap(), 0);

        let record = env.timeclock.get_record(record.id).await.unwrap();
        assert_eq!(record.exception_ids.len(), 1);

        // A complete day is never flagged.
        let complete = env
            .seed_record(
                3106,
                "2026-01-05".parse().unwrap(),
                vec![in_punch(5, 9), out_punch(5, 17)],
            )
            .await;
        assert_eq!(env.exceptions.detect_missed_punches(date).await.unwrap(), 0);
        assert!(env
            .timeclock
            .get_record(complete.id)
            .await
            .unwrap()
            .exception_ids
            .is_empty());
    }
}
