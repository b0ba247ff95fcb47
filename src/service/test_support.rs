//! Shared fixtures for the service tests: one in-memory store, a fixed
//! clock, and the full service graph wired the same way `AppState::build`
//! wires it in production.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::model::assignment::AssignmentStatus;
use crate::model::attendance::{AttendanceRecord, Punch};
use crate::model::shift::PunchPolicy;
use crate::service::assignment::AssignmentService;
use crate::service::catalog::CatalogService;
use crate::service::correction::CorrectionService;
use crate::service::exception::ExceptionService;
use crate::service::notify::Notifier;
use crate::service::report::ReportService;
use crate::service::timeclock::TimeClockService;
use crate::service::work_rules::WorkRuleService;
use crate::store::memory::MemoryStore;
use crate::store::{AttendanceStore, NewAssignment, NewShift, Stores};
use crate::utils::clock::{Clock, FixedClock};

pub const TEST_ESCALATION_HOURS: i64 = 48;

pub struct TestEnv {
    pub memory: Arc<MemoryStore>,
    pub stores: Stores,
    pub clock: Arc<FixedClock>,
    pub catalog: Arc<CatalogService>,
    pub assignments: Arc<AssignmentService>,
    pub timeclock: Arc<TimeClockService>,
    pub corrections: Arc<CorrectionService>,
    pub exceptions: Arc<ExceptionService>,
    pub reports: Arc<ReportService>,
    pub work_rules: Arc<WorkRuleService>,
}

impl TestEnv {
    pub fn new() -> Self {
        let memory = Arc::new(MemoryStore::new());
        let stores = Stores {
            catalog: memory.clone(),
            assignments: memory.clone(),
            attendance: memory.clone(),
            corrections: memory.clone(),
            exceptions: memory.clone(),
            work_rules: memory.clone(),
            notifications: memory.clone(),
        };
        let clock = Arc::new(FixedClock::at(
            Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap(),
        ));

        let notifier = Arc::new(Notifier::new(stores.notifications.clone(), clock.clone()));
        let catalog = Arc::new(CatalogService::new(stores.catalog.clone()));
        let assignments = Arc::new(AssignmentService::new(
            stores.assignments.clone(),
            stores.catalog.clone(),
            clock.clone(),
        ));
        let exceptions = Arc::new(ExceptionService::new(
            stores.exceptions.clone(),
            stores.attendance.clone(),
            notifier.clone(),
            clock.clone(),
            TEST_ESCALATION_HOURS,
            500,
        ));
        let timeclock = Arc::new(TimeClockService::new(
            stores.attendance.clone(),
            assignments.clone(),
            exceptions.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        let corrections = Arc::new(CorrectionService::new(
            stores.corrections.clone(),
            stores.attendance.clone(),
            stores.exceptions.clone(),
            notifier.clone(),
            clock.clone(),
            500,
        ));
        let reports = Arc::new(ReportService::new(
            stores.attendance.clone(),
            stores.exceptions.clone(),
            stores.work_rules.clone(),
            assignments.clone(),
        ));
        let work_rules = Arc::new(WorkRuleService::new(stores.work_rules.clone()));

        Self {
            memory,
            stores,
            clock,
            catalog,
            assignments,
            timeclock,
            corrections,
            exceptions,
            reports,
            work_rules,
        }
    }

    pub fn set_time(&self, now: DateTime<Utc>) {
        self.clock.set(now);
    }

    pub async fn seed_shift(&self, start: &str, end: &str, policy: PunchPolicy) -> u64 {
        let shift_type = self
            .catalog
            .create_shift_type("General".to_string())
            .await
            .unwrap();
        self.catalog
            .create_shift(NewShift {
                shift_type_id: shift_type.id,
                start_time: start.to_string(),
                end_time: end.to_string(),
                punch_policy: policy,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn seed_approved_assignment(
        &self,
        employee_id: u64,
        shift_id: u64,
        start_date: &str,
    ) -> u64 {
        let assignment = self
            .assignments
            .create(NewAssignment {
                employee_id,
                shift_id,
                schedule_rule_id: None,
                department_id: None,
                position_id: None,
                start_date: start_date.parse().unwrap(),
                end_date: None,
            })
            .await
            .unwrap();
        self.assignments
            .set_status(assignment.id, AssignmentStatus::Approved)
            .await
            .unwrap();
        assignment.id
    }

    /// Insert a record directly, bypassing the punch processor.
    pub async fn seed_record(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punches: Vec<Punch>,
    ) -> AttendanceRecord {
        let now = self.clock.now();
        let mut record = AttendanceRecord {
            id: 0,
            employee_id,
            record_date: date,
            punches,
            work_minutes: 0,
            has_missed_punch: false,
            exception_ids: Vec::new(),
            finalised_for_payroll: true,
            created_at: now,
            updated_at: now,
        };
        record.recompute();
        self.stores.attendance.insert_record(record).await.unwrap()
    }
}
