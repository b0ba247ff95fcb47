//! In-memory store used by the test suite and as the fallback backend when
//! no DATABASE_URL is configured. One struct implements every store trait;
//! `Stores::memory()` hands out clones of a single shared instance.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{
    AssignmentStore, AttendanceFilter, AttendanceStore, CatalogStore, CorrectionFilter,
    CorrectionStore, ExceptionFilter, ExceptionStore, LatenessRuleUpdate, NewHoliday,
    NewLatenessRule, NewOvertimeRule, NewScheduleRule, NewShift, NotificationSink,
    OvertimeRuleUpdate, ScheduleRuleUpdate, ShiftTypeUpdate, ShiftUpdate, WorkRuleStore,
};
use crate::error::Result;
use crate::model::assignment::{AssignmentStatus, ShiftAssignment};
use crate::model::attendance::AttendanceRecord;
use crate::model::correction::{AttendanceCorrectionRequest, CorrectionStatus};
use crate::model::notification::{NewNotification, NotificationLog};
use crate::model::schedule_rule::ScheduleRule;
use crate::model::shift::{Shift, ShiftType};
use crate::model::time_exception::{ExceptionStatus, TimeException};
use crate::model::work_rules::{Holiday, LatenessRule, OvertimeRule};

#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicU64,
    shift_types: RwLock<BTreeMap<u64, ShiftType>>,
    shifts: RwLock<BTreeMap<u64, Shift>>,
    schedule_rules: RwLock<BTreeMap<u64, ScheduleRule>>,
    assignments: RwLock<BTreeMap<u64, ShiftAssignment>>,
    records: RwLock<BTreeMap<u64, AttendanceRecord>>,
    corrections: RwLock<BTreeMap<u64, AttendanceCorrectionRequest>>,
    exceptions: RwLock<BTreeMap<u64, TimeException>>,
    overtime_rules: RwLock<BTreeMap<u64, OvertimeRule>>,
    lateness_rules: RwLock<BTreeMap<u64, LatenessRule>>,
    holidays: RwLock<BTreeMap<u64, Holiday>>,
    notifications: RwLock<Vec<NotificationLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Test helper: everything appended to the notification log so far.
    pub async fn notifications_snapshot(&self) -> Vec<NotificationLog> {
        self.notifications.read().await.clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_shift_type(&self, name: String) -> Result<ShiftType> {
        let shift_type = ShiftType {
            id: self.next_id(),
            name,
            active: true,
        };
        self.shift_types
            .write()
            .await
            .insert(shift_type.id, shift_type.clone());
        Ok(shift_type)
    }

    async fn get_shift_type(&self, id: u64) -> Result<Option<ShiftType>> {
        Ok(self.shift_types.read().await.get(&id).cloned())
    }

    async fn list_shift_types(&self) -> Result<Vec<ShiftType>> {
        Ok(self.shift_types.read().await.values().cloned().collect())
    }

    async fn update_shift_type(
        &self,
        id: u64,
        update: ShiftTypeUpdate,
    ) -> Result<Option<ShiftType>> {
        let mut map = self.shift_types.write().await;
        Ok(map.get_mut(&id).map(|shift_type| {
            if let Some(name) = update.name {
                shift_type.name = name;
            }
            if let Some(active) = update.active {
                shift_type.active = active;
            }
            shift_type.clone()
        }))
    }

    async fn insert_shift(&self, new: NewShift) -> Result<Shift> {
        let shift = Shift {
            id: self.next_id(),
            shift_type_id: new.shift_type_id,
            start_time: new.start_time,
            end_time: new.end_time,
            punch_policy: new.punch_policy,
            active: true,
        };
        self.shifts.write().await.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn get_shift(&self, id: u64) -> Result<Option<Shift>> {
        Ok(self.shifts.read().await.get(&id).cloned())
    }

    async fn list_shifts(&self) -> Result<Vec<Shift>> {
        Ok(self.shifts.read().await.values().cloned().collect())
    }

    async fn update_shift(&self, id: u64, update: ShiftUpdate) -> Result<Option<Shift>> {
        let mut map = self.shifts.write().await;
        Ok(map.get_mut(&id).map(|shift| {
            if let Some(shift_type_id) = update.shift_type_id {
                shift.shift_type_id = shift_type_id;
            }
            if let Some(start_time) = update.start_time {
                shift.start_time = start_time;
            }
            if let Some(end_time) = update.end_time {
                shift.end_time = end_time;
            }
            if let Some(punch_policy) = update.punch_policy {
                shift.punch_policy = punch_policy;
            }
            if let Some(active) = update.active {
                shift.active = active;
            }
            shift.clone()
        }))
    }

    async fn insert_schedule_rule(&self, new: NewScheduleRule) -> Result<ScheduleRule> {
        let rule = ScheduleRule {
            id: self.next_id(),
            name: new.name,
            recurrence: new.recurrence,
            rest_days: new.rest_days,
            active: true,
        };
        self.schedule_rules
            .write()
            .await
            .insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn get_schedule_rule(&self, id: u64) -> Result<Option<ScheduleRule>> {
        Ok(self.schedule_rules.read().await.get(&id).cloned())
    }

    async fn list_schedule_rules(&self) -> Result<Vec<ScheduleRule>> {
        Ok(self.schedule_rules.read().await.values().cloned().collect())
    }

    async fn update_schedule_rule(
        &self,
        id: u64,
        update: ScheduleRuleUpdate,
    ) -> Result<Option<ScheduleRule>> {
        let mut map = self.schedule_rules.write().await;
        Ok(map.get_mut(&id).map(|rule| {
            if let Some(name) = update.name {
                rule.name = name;
            }
            if let Some(recurrence) = update.recurrence {
                rule.recurrence = recurrence;
            }
            if let Some(rest_days) = update.rest_days {
                rule.rest_days = rest_days;
            }
            if let Some(active) = update.active {
                rule.active = active;
            }
            rule.clone()
        }))
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn insert_assignment(&self, mut assignment: ShiftAssignment) -> Result<ShiftAssignment> {
        assignment.id = self.next_id();
        self.assignments
            .write()
            .await
            .insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment(&self, id: u64) -> Result<Option<ShiftAssignment>> {
        Ok(self.assignments.read().await.get(&id).cloned())
    }

    async fn list_assignments(&self, employee_id: Option<u64>) -> Result<Vec<ShiftAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| employee_id.map_or(true, |id| a.employee_id == id))
            .cloned()
            .collect())
    }

    async fn set_assignment_status(
        &self,
        id: u64,
        status: AssignmentStatus,
    ) -> Result<Option<ShiftAssignment>> {
        let mut map = self.assignments.write().await;
        Ok(map.get_mut(&id).map(|assignment| {
            assignment.status = status;
            assignment.clone()
        }))
    }

    async fn approved_for_employee(&self, employee_id: u64) -> Result<Vec<ShiftAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.employee_id == employee_id && a.status == AssignmentStatus::Approved)
            .cloned()
            .collect())
    }

    async fn approved_on(&self, date: NaiveDate) -> Result<Vec<ShiftAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.status == AssignmentStatus::Approved && a.covers(date))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_record(&self, mut record: AttendanceRecord) -> Result<AttendanceRecord> {
        record.id = self.next_id();
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_record(&self, id: u64) -> Result<Option<AttendanceRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.employee_id == employee_id && r.record_date == date)
            .cloned())
    }

    async fn update_record(&self, record: &AttendanceRecord) -> Result<bool> {
        let mut map = self.records.write().await;
        Ok(map
            .get_mut(&record.id)
            .map(|slot| *slot = record.clone())
            .is_some())
    }

    async fn list_records(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.employee_id.map_or(true, |id| r.employee_id == id))
            .filter(|r| filter.from.map_or(true, |from| r.record_date >= from))
            .filter(|r| filter.to.map_or(true, |to| r.record_date <= to))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CorrectionStore for MemoryStore {
    async fn insert_correction(
        &self,
        mut correction: AttendanceCorrectionRequest,
    ) -> Result<AttendanceCorrectionRequest> {
        correction.id = self.next_id();
        self.corrections
            .write()
            .await
            .insert(correction.id, correction.clone());
        Ok(correction)
    }

    async fn get_correction(&self, id: u64) -> Result<Option<AttendanceCorrectionRequest>> {
        Ok(self.corrections.read().await.get(&id).cloned())
    }

    async fn update_correction(&self, correction: &AttendanceCorrectionRequest) -> Result<bool> {
        let mut map = self.corrections.write().await;
        Ok(map
            .get_mut(&correction.id)
            .map(|slot| *slot = correction.clone())
            .is_some())
    }

    async fn list_corrections(
        &self,
        filter: &CorrectionFilter,
    ) -> Result<Vec<AttendanceCorrectionRequest>> {
        Ok(self
            .corrections
            .read()
            .await
            .values()
            .filter(|c| filter.employee_id.map_or(true, |id| c.employee_id == id))
            .filter(|c| filter.status.map_or(true, |status| c.status == status))
            .cloned()
            .collect())
    }

    async fn submitted_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AttendanceCorrectionRequest>> {
        Ok(self
            .corrections
            .read()
            .await
            .values()
            .filter(|c| c.status == CorrectionStatus::Submitted && c.created_at < cutoff)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExceptionStore for MemoryStore {
    async fn insert_exception(&self, mut exception: TimeException) -> Result<TimeException> {
        exception.id = self.next_id();
        self.exceptions
            .write()
            .await
            .insert(exception.id, exception.clone());
        Ok(exception)
    }

    async fn get_exception(&self, id: u64) -> Result<Option<TimeException>> {
        Ok(self.exceptions.read().await.get(&id).cloned())
    }

    async fn update_exception(&self, exception: &TimeException) -> Result<bool> {
        let mut map = self.exceptions.write().await;
        Ok(map
            .get_mut(&exception.id)
            .map(|slot| *slot = exception.clone())
            .is_some())
    }

    async fn list_exceptions(&self, filter: &ExceptionFilter) -> Result<Vec<TimeException>> {
        Ok(self
            .exceptions
            .read()
            .await
            .values()
            .filter(|e| filter.employee_id.map_or(true, |id| e.employee_id == id))
            .filter(|e| {
                filter
                    .exception_type
                    .map_or(true, |t| e.exception_type == t)
            })
            .filter(|e| filter.status.map_or(true, |status| e.status == status))
            .filter(|e| {
                filter
                    .from
                    .map_or(true, |from| e.created_at.date_naive() >= from)
            })
            .filter(|e| filter.to.map_or(true, |to| e.created_at.date_naive() <= to))
            .cloned()
            .collect())
    }

    async fn pending_updated_before(
        &self,
        threshold: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TimeException>> {
        Ok(self
            .exceptions
            .read()
            .await
            .values()
            .filter(|e| e.status == ExceptionStatus::Pending && e.updated_at < threshold)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn pending_created_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TimeException>> {
        Ok(self
            .exceptions
            .read()
            .await
            .values()
            .filter(|e| e.status == ExceptionStatus::Pending && e.created_at < cutoff)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkRuleStore for MemoryStore {
    async fn insert_overtime_rule(&self, new: NewOvertimeRule) -> Result<OvertimeRule> {
        let rule = OvertimeRule {
            id: self.next_id(),
            name: new.name,
            multiplier: new.multiplier,
            daily_threshold_minutes: new.daily_threshold_minutes,
            active: true,
        };
        self.overtime_rules
            .write()
            .await
            .insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn list_overtime_rules(&self) -> Result<Vec<OvertimeRule>> {
        Ok(self.overtime_rules.read().await.values().cloned().collect())
    }

    async fn update_overtime_rule(
        &self,
        id: u64,
        update: OvertimeRuleUpdate,
    ) -> Result<Option<OvertimeRule>> {
        let mut map = self.overtime_rules.write().await;
        Ok(map.get_mut(&id).map(|rule| {
            if let Some(name) = update.name {
                rule.name = name;
            }
            if let Some(multiplier) = update.multiplier {
                rule.multiplier = multiplier;
            }
            if let Some(threshold) = update.daily_threshold_minutes {
                rule.daily_threshold_minutes = Some(threshold);
            }
            if let Some(active) = update.active {
                rule.active = active;
            }
            rule.clone()
        }))
    }

    async fn first_active_overtime_rule(&self) -> Result<Option<OvertimeRule>> {
        Ok(self
            .overtime_rules
            .read()
            .await
            .values()
            .find(|r| r.active)
            .cloned())
    }

    async fn insert_lateness_rule(&self, new: NewLatenessRule) -> Result<LatenessRule> {
        let rule = LatenessRule {
            id: self.next_id(),
            name: new.name,
            grace_minutes: new.grace_minutes,
            active: true,
        };
        self.lateness_rules
            .write()
            .await
            .insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn list_lateness_rules(&self) -> Result<Vec<LatenessRule>> {
        Ok(self.lateness_rules.read().await.values().cloned().collect())
    }

    async fn update_lateness_rule(
        &self,
        id: u64,
        update: LatenessRuleUpdate,
    ) -> Result<Option<LatenessRule>> {
        let mut map = self.lateness_rules.write().await;
        Ok(map.get_mut(&id).map(|rule| {
            if let Some(name) = update.name {
                rule.name = name;
            }
            if let Some(grace) = update.grace_minutes {
                rule.grace_minutes = grace;
            }
            if let Some(active) = update.active {
                rule.active = active;
            }
            rule.clone()
        }))
    }

    async fn first_active_lateness_rule(&self) -> Result<Option<LatenessRule>> {
        Ok(self
            .lateness_rules
            .read()
            .await
            .values()
            .find(|r| r.active)
            .cloned())
    }

    async fn insert_holiday(&self, new: NewHoliday) -> Result<Holiday> {
        let holiday = Holiday {
            id: self.next_id(),
            name: new.name,
            date: new.date,
        };
        self.holidays
            .write()
            .await
            .insert(holiday.id, holiday.clone());
        Ok(holiday)
    }

    async fn list_holidays(&self) -> Result<Vec<Holiday>> {
        Ok(self.holidays.read().await.values().cloned().collect())
    }

    async fn delete_holiday(&self, id: u64) -> Result<bool> {
        Ok(self.holidays.write().await.remove(&id).is_some())
    }

    async fn holiday_on(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.holidays.read().await.values().any(|h| h.date == date))
    }
}

#[async_trait]
impl NotificationSink for MemoryStore {
    async fn append(&self, event: NewNotification, at: DateTime<Utc>) -> Result<NotificationLog> {
        let mut log = self.notifications.write().await;
        let entry = NotificationLog {
            id: log.len() as u64 + 1,
            recipient_id: event.recipient_id,
            notification_type: event.notification_type,
            message: event.message,
            created_at: at,
        };
        log.push(entry.clone());
        Ok(entry)
    }
}
