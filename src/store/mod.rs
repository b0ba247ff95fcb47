//! Store interfaces for every persisted aggregate, passed explicitly into
//! the services and wired once at startup. Two implementations: MySQL for
//! production and an in-memory store for tests / demo mode.

pub mod memory;
pub mod mysql;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::Result;
use crate::model::assignment::{AssignmentStatus, ShiftAssignment};
use crate::model::attendance::AttendanceRecord;
use crate::model::correction::{AttendanceCorrectionRequest, CorrectionStatus};
use crate::model::notification::{NewNotification, NotificationLog};
use crate::model::schedule_rule::ScheduleRule;
use crate::model::shift::{PunchPolicy, Shift, ShiftType};
use crate::model::time_exception::{ExceptionStatus, ExceptionType, TimeException};
use crate::model::work_rules::{Holiday, LatenessRule, OvertimeRule};

// -------------------------
// Typed create/update requests (no loose partial updates)
// -------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewShift {
    #[schema(example = 1)]
    pub shift_type_id: u64,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
    pub punch_policy: PunchPolicy,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShiftUpdate {
    pub shift_type_id: Option<u64>,
    #[schema(example = "10:00")]
    pub start_time: Option<String>,
    #[schema(example = "18:00")]
    pub end_time: Option<String>,
    pub punch_policy: Option<PunchPolicy>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShiftTypeUpdate {
    #[schema(example = "Night")]
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewScheduleRule {
    #[schema(example = "5-2 rotation")]
    pub name: String,
    #[schema(example = "WEEKLY")]
    pub recurrence: String,
    #[schema(example = "SAT,SUN")]
    pub rest_days: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleRuleUpdate {
    pub name: Option<String>,
    pub recurrence: Option<String>,
    pub rest_days: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAssignment {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = 1, nullable = true)]
    pub schedule_rule_id: Option<u64>,
    #[schema(example = 10, nullable = true)]
    pub department_id: Option<u64>,
    #[schema(example = 3, nullable = true)]
    pub position_id: Option<u64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-06-30", format = "date", value_type = Option<String>, nullable = true)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewOvertimeRule {
    #[schema(example = "Standard 1.5x")]
    pub name: String,
    #[schema(example = 1.5)]
    pub multiplier: f64,
    #[schema(example = 30, nullable = true)]
    pub daily_threshold_minutes: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OvertimeRuleUpdate {
    pub name: Option<String>,
    pub multiplier: Option<f64>,
    pub daily_threshold_minutes: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewLatenessRule {
    #[schema(example = "Default grace")]
    pub name: String,
    #[schema(example = 10)]
    pub grace_minutes: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LatenessRuleUpdate {
    pub name: Option<String>,
    pub grace_minutes: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewHoliday {
    #[schema(example = "New Year")]
    pub name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
}

// -------------------------
// List filters
// -------------------------

#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Filter by employee ID
    #[param(example = 1001)]
    pub employee_id: Option<u64>,
    /// Inclusive lower bound on the record date
    #[param(value_type = Option<String>, example = "2026-01-01")]
    #[schema(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the record date
    #[param(value_type = Option<String>, example = "2026-01-31")]
    #[schema(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct CorrectionFilter {
    #[param(example = 1001)]
    pub employee_id: Option<u64>,
    #[param(example = "SUBMITTED")]
    pub status: Option<CorrectionStatus>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ExceptionFilter {
    #[param(example = 1001)]
    pub employee_id: Option<u64>,
    #[param(example = "MISSED_PUNCH")]
    pub exception_type: Option<ExceptionType>,
    #[param(example = "OPEN")]
    pub status: Option<ExceptionStatus>,
    /// Inclusive lower bound on the creation date
    #[param(value_type = Option<String>, example = "2026-01-01")]
    #[schema(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date
    #[param(value_type = Option<String>, example = "2026-01-31")]
    #[schema(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
}

// -------------------------
// Store traits
// -------------------------

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_shift_type(&self, name: String) -> Result<ShiftType>;
    async fn get_shift_type(&self, id: u64) -> Result<Option<ShiftType>>;
    async fn list_shift_types(&self) -> Result<Vec<ShiftType>>;
    async fn update_shift_type(&self, id: u64, update: ShiftTypeUpdate)
    -> Result<Option<ShiftType>>;

    async fn insert_shift(&self, new: NewShift) -> Result<Shift>;
    async fn get_shift(&self, id: u64) -> Result<Option<Shift>>;
    async fn list_shifts(&self) -> Result<Vec<Shift>>;
    async fn update_shift(&self, id: u64, update: ShiftUpdate) -> Result<Option<Shift>>;

    async fn insert_schedule_rule(&self, new: NewScheduleRule) -> Result<ScheduleRule>;
    async fn get_schedule_rule(&self, id: u64) -> Result<Option<ScheduleRule>>;
    async fn list_schedule_rules(&self) -> Result<Vec<ScheduleRule>>;
    async fn update_schedule_rule(
        &self,
        id: u64,
        update: ScheduleRuleUpdate,
    ) -> Result<Option<ScheduleRule>>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Insert with the id assigned by the store.
    async fn insert_assignment(&self, assignment: ShiftAssignment) -> Result<ShiftAssignment>;
    async fn get_assignment(&self, id: u64) -> Result<Option<ShiftAssignment>>;
    async fn list_assignments(&self, employee_id: Option<u64>) -> Result<Vec<ShiftAssignment>>;
    async fn set_assignment_status(
        &self,
        id: u64,
        status: AssignmentStatus,
    ) -> Result<Option<ShiftAssignment>>;
    /// All APPROVED assignments for one employee, lowest id first.
    async fn approved_for_employee(&self, employee_id: u64) -> Result<Vec<ShiftAssignment>>;
    /// All APPROVED assignments whose range covers the date.
    async fn approved_on(&self, date: NaiveDate) -> Result<Vec<ShiftAssignment>>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn insert_record(&self, record: AttendanceRecord) -> Result<AttendanceRecord>;
    async fn get_record(&self, id: u64) -> Result<Option<AttendanceRecord>>;
    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>>;
    /// Whole-record write-back keyed by id. Returns false when the id is gone.
    async fn update_record(&self, record: &AttendanceRecord) -> Result<bool>;
    async fn list_records(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>>;
}

#[async_trait]
pub trait CorrectionStore: Send + Sync {
    async fn insert_correction(
        &self,
        correction: AttendanceCorrectionRequest,
    ) -> Result<AttendanceCorrectionRequest>;
    async fn get_correction(&self, id: u64) -> Result<Option<AttendanceCorrectionRequest>>;
    async fn update_correction(&self, correction: &AttendanceCorrectionRequest) -> Result<bool>;
    async fn list_corrections(
        &self,
        filter: &CorrectionFilter,
    ) -> Result<Vec<AttendanceCorrectionRequest>>;
    /// SUBMITTED requests created strictly before the cutoff, oldest first.
    async fn submitted_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AttendanceCorrectionRequest>>;
}

#[async_trait]
pub trait ExceptionStore: Send + Sync {
    async fn insert_exception(&self, exception: TimeException) -> Result<TimeException>;
    async fn get_exception(&self, id: u64) -> Result<Option<TimeException>>;
    async fn update_exception(&self, exception: &TimeException) -> Result<bool>;
    async fn list_exceptions(&self, filter: &ExceptionFilter) -> Result<Vec<TimeException>>;
    /// PENDING exceptions last updated strictly before the threshold.
    async fn pending_updated_before(
        &self,
        threshold: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TimeException>>;
    /// PENDING exceptions created strictly before the cutoff.
    async fn pending_created_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TimeException>>;
}

#[async_trait]
pub trait WorkRuleStore: Send + Sync {
    async fn insert_overtime_rule(&self, new: NewOvertimeRule) -> Result<OvertimeRule>;
    async fn list_overtime_rules(&self) -> Result<Vec<OvertimeRule>>;
    async fn update_overtime_rule(
        &self,
        id: u64,
        update: OvertimeRuleUpdate,
    ) -> Result<Option<OvertimeRule>>;
    /// Lowest-id active rule, if any.
    async fn first_active_overtime_rule(&self) -> Result<Option<OvertimeRule>>;

    async fn insert_lateness_rule(&self, new: NewLatenessRule) -> Result<LatenessRule>;
    async fn list_lateness_rules(&self) -> Result<Vec<LatenessRule>>;
    async fn update_lateness_rule(
        &self,
        id: u64,
        update: LatenessRuleUpdate,
    ) -> Result<Option<LatenessRule>>;
    async fn first_active_lateness_rule(&self) -> Result<Option<LatenessRule>>;

    async fn insert_holiday(&self, new: NewHoliday) -> Result<Holiday>;
    async fn list_holidays(&self) -> Result<Vec<Holiday>>;
    async fn delete_holiday(&self, id: u64) -> Result<bool>;
    async fn holiday_on(&self, date: NaiveDate) -> Result<bool>;
}

/// The append-only audit/event sink. No read or update path is needed by the
/// core; the in-memory implementation exposes a snapshot for tests.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn append(&self, event: NewNotification, at: DateTime<Utc>) -> Result<NotificationLog>;
}

/// Store handles wired once at process startup and shared by the services.
#[derive(Clone)]
pub struct Stores {
    pub catalog: Arc<dyn CatalogStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub corrections: Arc<dyn CorrectionStore>,
    pub exceptions: Arc<dyn ExceptionStore>,
    pub work_rules: Arc<dyn WorkRuleStore>,
    pub notifications: Arc<dyn NotificationSink>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            catalog: store.clone(),
            assignments: store.clone(),
            attendance: store.clone(),
            corrections: store.clone(),
            exceptions: store.clone(),
            work_rules: store.clone(),
            notifications: store,
        }
    }

    pub fn mysql(pool: sqlx::MySqlPool) -> Self {
        let store = Arc::new(mysql::MySqlStore::new(pool));
        Self {
            catalog: store.clone(),
            assignments: store.clone(),
            attendance: store.clone(),
            corrections: store.clone(),
            exceptions: store.clone(),
            work_rules: store.clone(),
            notifications: store,
        }
    }
}
