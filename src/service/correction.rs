use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::correction::{AttendanceCorrectionRequest, CorrectionStatus};
use crate::model::notification::NotificationType;
use crate::model::time_exception::ExceptionStatus;
use crate::service::notify::Notifier;
use crate::store::{AttendanceStore, CorrectionFilter, CorrectionStore, ExceptionStore};
use crate::utils::clock::Clock;

/// Outcome of a payroll-cutoff escalation run.
#[derive(Debug, Serialize, ToSchema)]
pub struct CutoffSweepOutcome {
    #[schema(example = 2)]
    pub corrections_escalated: usize,
    #[schema(example = 5)]
    pub exceptions_escalated: usize,
}

/// The employee-initiated dispute workflow over attendance records, with its
/// payroll-lock side effects and the payroll-cutoff escalation sweep.
pub struct CorrectionService {
    corrections: Arc<dyn CorrectionStore>,
    attendance: Arc<dyn AttendanceStore>,
    exceptions: Arc<dyn ExceptionStore>,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
    batch_limit: usize,
}

impl CorrectionService {
    pub fn new(
        corrections: Arc<dyn CorrectionStore>,
        attendance: Arc<dyn AttendanceStore>,
        exceptions: Arc<dyn ExceptionStore>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
        batch_limit: usize,
    ) -> Self {
        Self {
            corrections,
            attendance,
            exceptions,
            notifier,
            clock,
            batch_limit,
        }
    }

    /// Open a dispute. The referenced record must exist; opening it pulls the
    /// record back from payroll until the request is decided.
    pub async fn create(&self, record_id: u64, reason: String) -> Result<AttendanceCorrectionRequest> {
        let mut record = self
            .attendance
            .get_record(record_id)
            .await?
            .ok_or(Error::NotFound("attendance record", record_id))?;

        let now = self.clock.now();
        record.finalised_for_payroll = false;
        record.updated_at = now;
        self.attendance.update_record(&record).await?;

        let correction = self
            .corrections
            .insert_correction(AttendanceCorrectionRequest {
                id: 0,
                employee_id: record.employee_id,
                record_id,
                reason,
                status: CorrectionStatus::Submitted,
                created_at: now,
                updated_at: now,
            })
            .await?;

        self.notifier
            .dispatch(
                record.employee_id,
                NotificationType::CorrectionSubmitted,
                format!(
                    "Correction request #{} submitted for {}",
                    correction.id, record.record_date
                ),
            )
            .await?;

        Ok(correction)
    }

    pub async fn get(&self, id: u64) -> Result<AttendanceCorrectionRequest> {
        self.corrections
            .get_correction(id)
            .await?
            .ok_or(Error::NotFound("correction request", id))
    }

    pub async fn list(&self, filter: &CorrectionFilter) -> Result<Vec<AttendanceCorrectionRequest>> {
        self.corrections.list_corrections(filter).await
    }

    /// Reviewer-driven status change, checked against the transition table.
    /// APPROVED re-finalises the record for payroll; REJECTED leaves it held
    /// until someone corrects the punches and approves a new request.
    pub async fn update_status(
        &self,
        id: u64,
        status: CorrectionStatus,
    ) -> Result<AttendanceCorrectionRequest> {
        if status == CorrectionStatus::Escalated {
            return Err(Error::invalid(
                "ESCALATED is entered by the payroll-cutoff sweep, not by direct update",
            ));
        }
        let mut correction = self.get(id).await?;
        if !correction.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                entity: "correction request",
                from: correction.status.to_string(),
                to: status.to_string(),
            });
        }

        let now = self.clock.now();
        correction.status = status;
        correction.updated_at = now;
        self.corrections.update_correction(&correction).await?;

        if status == CorrectionStatus::Approved {
            let mut record = self
                .attendance
                .get_record(correction.record_id)
                .await?
                .ok_or(Error::NotFound("attendance record", correction.record_id))?;
            record.finalised_for_payroll = true;
            record.updated_at = now;
            self.attendance.update_record(&record).await?;
        }

        if correction.status.is_terminal() {
            self.notifier
                .dispatch(
                    correction.employee_id,
                    NotificationType::CorrectionDecision,
                    format!("Correction request #{} was {}", correction.id, correction.status),
                )
                .await?;
        }

        Ok(correction)
    }

    /// Payroll-cutoff escalation: every correction still SUBMITTED from
    /// before the cutoff is escalated with a notification to its requester,
    /// and PENDING exceptions from before the cutoff are escalated in bulk.
    /// Idempotent — escalated items no longer match either selection.
    pub async fn escalate_before(&self, cutoff: DateTime<Utc>) -> Result<CutoffSweepOutcome> {
        let now = self.clock.now();

        let stale = self
            .corrections
            .submitted_before(cutoff, self.batch_limit)
            .await?;
        let corrections_escalated = stale.len();
        for mut correction in stale {
            correction.status = CorrectionStatus::Escalated;
            correction.updated_at = now;
            self.corrections.update_correction(&correction).await?;
            self.notifier
                .dispatch(
                    correction.employee_id,
                    NotificationType::CorrectionEscalated,
                    format!(
                        "Correction request #{} missed the payroll cutoff and was escalated",
                        correction.id
                    ),
                )
                .await?;
        }

        let pending = self
            .exceptions
            .pending_created_before(cutoff, self.batch_limit)
            .await?;
        let exceptions_escalated = pending.len();
        for mut exception in pending {
            exception.status = ExceptionStatus::Escalated;
            exception.updated_at = now;
            self.exceptions.update_exception(&exception).await?;
        }

        tracing::info!(
            corrections_escalated,
            exceptions_escalated,
            %cutoff,
            "payroll-cutoff sweep finished"
        );
        Ok(CutoffSweepOutcome {
            corrections_escalated,
            exceptions_escalated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::{Punch, PunchType};
    use crate::model::time_exception::ExceptionType;
    use crate::service::exception::NewExceptionRequest;
    use crate::service::test_support::TestEnv;
    use chrono::{TimeZone, Utc};

    async fn seed_full_day(env: &TestEnv, employee_id: u64) -> u64 {
        env.seed_record(
            employee_id,
            "2026-01-05".parse().unwrap(),
            vec![
                Punch {
                    punch_type: PunchType::In,
                    at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
                },
                Punch {
                    punch_type: PunchType::Out,
                    at: Utc.with_ymd_and_hms(2026, 1, 5, 17, 0, 0).unwrap(),
                },
            ],
        )
        .await
        .id
    }

    #[actix_web::test]
    async fn create_requires_existing_record() {
        let env = TestEnv::new();
        let err = env
            .corrections
            .create(9999, "wrong hours".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound("attendance record", 9999)));
    }

    #[actix_web::test]
    async fn open_request_holds_record_back_from_payroll() {
        let env = TestEnv::new();
        let record_id = seed_full_day(&env, 3201).await;

        let correction = env
            .corrections
            .create(record_id, "left at 17:30".into())
            .await
            .unwrap();
        assert_eq!(correction.status, CorrectionStatus::Submitted);
        let record = env.timeclock.get_record(record_id).await.unwrap();
        assert!(!record.finalised_for_payroll);

        // Approval re-finalises the record.
        env.corrections
            .update_status(correction.id, CorrectionStatus::InReview)
            .await
            .unwrap();
        env.corrections
            .update_status(correction.id, CorrectionStatus::Approved)
            .await
            .unwrap();
        let record = env.timeclock.get_record(record_id).await.unwrap();
        assert!(record.finalised_for_payroll);
    }

    #[actix_web::test]
    async fn rejection_leaves_record_unfinalised() {
        let env = TestEnv::new();
        let record_id = seed_full_day(&env, 3202).await;
        let correction = env.corrections.create(record_id, "dispute".into()).await.unwrap();

        env.corrections
            .update_status(correction.id, CorrectionStatus::InReview)
            .await
            .unwrap();
        env.corrections
            .update_status(correction.id, CorrectionStatus::Rejected)
            .await
            .unwrap();

        let record = env.timeclock.get_record(record_id).await.unwrap();
        assert!(!record.finalised_for_payroll);
    }

    #[actix_web::test]
    async fn transition_table_is_enforced() {
        let env = TestEnv::new();
        let record_id = seed_full_day(&env, 3203).await;
        let correction = env.corrections.create(record_id, "dispute".into()).await.unwrap();

        // Straight to APPROVED skips review.
        let err = env
            .corrections
            .update_status(correction.id, CorrectionStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));

        // ESCALATED is reserved for the sweep.
        let err = env
            .corrections
            .update_status(correction.id, CorrectionStatus::Escalated)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StructuralInvalid(_)));
    }

    #[actix_web::test]
    async fn cutoff_sweep_escalates_once() {
        let env = TestEnv::new();
        let record_id = seed_full_day(&env, 3204).await;
        env.corrections.create(record_id, "first".into()).await.unwrap();

        // A pending exception from before the cutoff gets bulk-escalated too.
        let exception = env
            .exceptions
            .create(NewExceptionRequest {
                record_id,
                exception_type: ExceptionType::MissedPunch,
                assignee_id: None,
                reason: None,
            })
            .await
            .unwrap();
        env.exceptions
            .update_status(
                exception.id,
                crate::model::time_exception::ExceptionStatus::Pending,
                None,
            )
            .await
            .unwrap();

        let cutoff = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        env.set_time(cutoff);

        let first = env.corrections.escalate_before(cutoff).await.unwrap();
        assert_eq!(first.corrections_escalated, 1);
        assert_eq!(first.exceptions_escalated, 1);

        // Re-running with the same cutoff is a no-op.
        let second = env.corrections.escalate_before(cutoff).await.unwrap();
        assert_eq!(second.corrections_escalated, 0);
        assert_eq!(second.exceptions_escalated, 0);

        let notifications = env.memory.notifications_snapshot().await;
        let escalation_notices = notifications
            .iter()
            .filter(|n| n.notification_type == NotificationType::CorrectionEscalated)
            .count();
        assert_eq!(escalation_notices, 1);
    }
}
