//! MySQL implementation of the store traits. Statuses and policies are
//! persisted as their wire strings; punch sequences and exception-id sets are
//! JSON documents inside the row. All timestamps are stored as UTC DATETIME.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, MySqlPool};

use super::{
    AssignmentStore, AttendanceFilter, AttendanceStore, CatalogStore, CorrectionFilter,
    CorrectionStore, ExceptionFilter, ExceptionStore, LatenessRuleUpdate, NewHoliday,
    NewLatenessRule, NewOvertimeRule, NewScheduleRule, NewShift, NotificationSink,
    OvertimeRuleUpdate, ScheduleRuleUpdate, ShiftTypeUpdate, ShiftUpdate, WorkRuleStore,
};
use crate::error::{Error, Result};
use crate::model::assignment::{AssignmentStatus, ShiftAssignment};
use crate::model::attendance::{AttendanceRecord, Punch};
use crate::model::correction::AttendanceCorrectionRequest;
use crate::model::notification::{NewNotification, NotificationLog};
use crate::model::schedule_rule::ScheduleRule;
use crate::model::shift::{Shift, ShiftType};
use crate::model::time_exception::TimeException;
use crate::model::work_rules::{Holiday, LatenessRule, OvertimeRule};

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

fn parse_status<T: std::str::FromStr>(value: &str, what: &'static str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Corrupt(format!("unknown {what}: {value}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(value: &str, what: &'static str) -> Result<T> {
    serde_json::from_str(value).map_err(|e| Error::Corrupt(format!("{what}: {e}")))
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Corrupt(e.to_string()))
}

// Helper enum for typed SQLx binding in dynamically built WHERE clauses.
enum QueryValue {
    U64(u64),
    Date(NaiveDate),
}

fn bind_all<'q>(
    mut query: sqlx::query::QueryAs<'q, sqlx::MySql, AttendanceRow, sqlx::mysql::MySqlArguments>,
    args: &'q [QueryValue],
) -> sqlx::query::QueryAs<'q, sqlx::MySql, AttendanceRow, sqlx::mysql::MySqlArguments> {
    for arg in args {
        query = match arg {
            QueryValue::U64(v) => query.bind(*v),
            QueryValue::Date(d) => query.bind(*d),
        };
    }
    query
}

// -------------------------
// Row types
// -------------------------

#[derive(FromRow)]
struct ShiftRow {
    id: u64,
    shift_type_id: u64,
    start_time: String,
    end_time: String,
    punch_policy: String,
    active: bool,
}

impl ShiftRow {
    fn into_shift(self) -> Result<Shift> {
        Ok(Shift {
            id: self.id,
            shift_type_id: self.shift_type_id,
            start_time: self.start_time,
            end_time: self.end_time,
            punch_policy: parse_status(&self.punch_policy, "punch policy")?,
            active: self.active,
        })
    }
}

#[derive(FromRow)]
struct AssignmentRow {
    id: u64,
    employee_id: u64,
    shift_id: u64,
    schedule_rule_id: Option<u64>,
    department_id: Option<u64>,
    position_id: Option<u64>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: String,
    created_at: NaiveDateTime,
}

impl AssignmentRow {
    fn into_assignment(self) -> Result<ShiftAssignment> {
        Ok(ShiftAssignment {
            id: self.id,
            employee_id: self.employee_id,
            shift_id: self.shift_id,
            schedule_rule_id: self.schedule_rule_id,
            department_id: self.department_id,
            position_id: self.position_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status: parse_status(&self.status, "assignment status")?,
            created_at: to_utc(self.created_at),
        })
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    record_date: NaiveDate,
    punches: String,
    work_minutes: i64,
    has_missed_punch: bool,
    exception_ids: String,
    finalised_for_payroll: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl AttendanceRow {
    fn into_record(self) -> Result<AttendanceRecord> {
        Ok(AttendanceRecord {
            id: self.id,
            employee_id: self.employee_id,
            record_date: self.record_date,
            punches: decode_json::<Vec<Punch>>(&self.punches, "punch sequence")?,
            work_minutes: self.work_minutes,
            has_missed_punch: self.has_missed_punch,
            exception_ids: decode_json::<Vec<u64>>(&self.exception_ids, "exception id set")?,
            finalised_for_payroll: self.finalised_for_payroll,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

#[derive(FromRow)]
struct CorrectionRow {
    id: u64,
    employee_id: u64,
    record_id: u64,
    reason: String,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl CorrectionRow {
    fn into_correction(self) -> Result<AttendanceCorrectionRequest> {
        Ok(AttendanceCorrectionRequest {
            id: self.id,
            employee_id: self.employee_id,
            record_id: self.record_id,
            reason: self.reason,
            status: parse_status(&self.status, "correction status")?,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

#[derive(FromRow)]
struct ExceptionRow {
    id: u64,
    employee_id: u64,
    exception_type: String,
    record_id: u64,
    assignee_id: u64,
    status: String,
    reason: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl ExceptionRow {
    fn into_exception(self) -> Result<TimeException> {
        Ok(TimeException {
            id: self.id,
            employee_id: self.employee_id,
            exception_type: parse_status(&self.exception_type, "exception type")?,
            record_id: self.record_id,
            assignee_id: self.assignee_id,
            status: parse_status(&self.status, "exception status")?,
            reason: self.reason,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

// -------------------------
// Catalog
// -------------------------

#[async_trait]
impl CatalogStore for MySqlStore {
    async fn insert_shift_type(&self, name: String) -> Result<ShiftType> {
        let result = sqlx::query("INSERT INTO shift_types (name, active) VALUES (?, TRUE)")
            .bind(&name)
            .execute(&self.pool)
            .await?;
        Ok(ShiftType {
            id: result.last_insert_id(),
            name,
            active: true,
        })
    }

    async fn get_shift_type(&self, id: u64) -> Result<Option<ShiftType>> {
        let row = sqlx::query_as::<_, ShiftType>(
            "SELECT id, name, active FROM shift_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_shift_types(&self) -> Result<Vec<ShiftType>> {
        Ok(
            sqlx::query_as::<_, ShiftType>("SELECT id, name, active FROM shift_types ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update_shift_type(
        &self,
        id: u64,
        update: ShiftTypeUpdate,
    ) -> Result<Option<ShiftType>> {
        let Some(mut current) = self.get_shift_type(id).await? else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            current.name = name;
        }
        if let Some(active) = update.active {
            current.active = active;
        }
        sqlx::query("UPDATE shift_types SET name = ?, active = ? WHERE id = ?")
            .bind(&current.name)
            .bind(current.active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(Some(current))
    }

    async fn insert_shift(&self, new: NewShift) -> Result<Shift> {
        let result = sqlx::query(
            r#"
            INSERT INTO shifts (shift_type_id, start_time, end_time, punch_policy, active)
            VALUES (?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(new.shift_type_id)
        .bind(&new.start_time)
        .bind(&new.end_time)
        .bind(new.punch_policy.to_string())
        .execute(&self.pool)
        .await?;
        Ok(Shift {
            id: result.last_insert_id(),
            shift_type_id: new.shift_type_id,
            start_time: new.start_time,
            end_time: new.end_time,
            punch_policy: new.punch_policy,
            active: true,
        })
    }

    async fn get_shift(&self, id: u64) -> Result<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(
            r#"
            SELECT id, shift_type_id, start_time, end_time, punch_policy, active
            FROM shifts WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ShiftRow::into_shift).transpose()
    }

    async fn list_shifts(&self) -> Result<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(
            r#"
            SELECT id, shift_type_id, start_time, end_time, punch_policy, active
            FROM shifts ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ShiftRow::into_shift).collect()
    }

    async fn update_shift(&self, id: u64, update: ShiftUpdate) -> Result<Option<Shift>> {
        let Some(mut current) = self.get_shift(id).await? else {
            return Ok(None);
        };
        if let Some(shift_type_id) = update.shift_type_id {
            current.shift_type_id = shift_type_id;
        }
        if let Some(start_time) = update.start_time {
            current.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            current.end_time = end_time;
        }
        if let Some(punch_policy) = update.punch_policy {
            current.punch_policy = punch_policy;
        }
        if let Some(active) = update.active {
            current.active = active;
        }
        sqlx::query(
            r#"
            UPDATE shifts
            SET shift_type_id = ?, start_time = ?, end_time = ?, punch_policy = ?, active = ?
            WHERE id = ?
            "#,
        )
        .bind(current.shift_type_id)
        .bind(&current.start_time)
        .bind(&current.end_time)
        .bind(current.punch_policy.to_string())
        .bind(current.active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(Some(current))
    }

    async fn insert_schedule_rule(&self, new: NewScheduleRule) -> Result<ScheduleRule> {
        let result = sqlx::query(
            r#"
            INSERT INTO schedule_rules (name, recurrence, rest_days, active)
            VALUES (?, ?, ?, TRUE)
            "#,
        )
        .bind(&new.name)
        .bind(&new.recurrence)
        .bind(&new.rest_days)
        .execute(&self.pool)
        .await?;
        Ok(ScheduleRule {
            id: result.last_insert_id(),
            name: new.name,
            recurrence: new.recurrence,
            rest_days: new.rest_days,
            active: true,
        })
    }

    async fn get_schedule_rule(&self, id: u64) -> Result<Option<ScheduleRule>> {
        Ok(sqlx::query_as::<_, ScheduleRule>(
            "SELECT id, name, recurrence, rest_days, active FROM schedule_rules WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_schedule_rules(&self) -> Result<Vec<ScheduleRule>> {
        Ok(sqlx::query_as::<_, ScheduleRule>(
            "SELECT id, name, recurrence, rest_days, active FROM schedule_rules ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_schedule_rule(
        &self,
        id: u64,
        update: ScheduleRuleUpdate,
    ) -> Result<Option<ScheduleRule>> {
        let Some(mut current) = self.get_schedule_rule(id).await? else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            current.name = name;
        }
        if let Some(recurrence) = update.recurrence {
            current.recurrence = recurrence;
        }
        if let Some(rest_days) = update.rest_days {
            current.rest_days = rest_days;
        }
        if let Some(active) = update.active {
            current.active = active;
        }
        sqlx::query(
            "UPDATE schedule_rules SET name = ?, recurrence = ?, rest_days = ?, active = ? WHERE id = ?",
        )
        .bind(&current.name)
        .bind(&current.recurrence)
        .bind(&current.rest_days)
        .bind(current.active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(Some(current))
    }
}

// -------------------------
// Assignments
// -------------------------

const ASSIGNMENT_COLUMNS: &str = r#"
    id, employee_id, shift_id, schedule_rule_id, department_id, position_id,
    start_date, end_date, status, created_at
"#;

#[async_trait]
impl AssignmentStore for MySqlStore {
    async fn insert_assignment(&self, mut assignment: ShiftAssignment) -> Result<ShiftAssignment> {
        let result = sqlx::query(
            r#"
            INSERT INTO shift_assignments
                (employee_id, shift_id, schedule_rule_id, department_id, position_id,
                 start_date, end_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(assignment.employee_id)
        .bind(assignment.shift_id)
        .bind(assignment.schedule_rule_id)
        .bind(assignment.department_id)
        .bind(assignment.position_id)
        .bind(assignment.start_date)
        .bind(assignment.end_date)
        .bind(assignment.status.to_string())
        .bind(assignment.created_at.naive_utc())
        .execute(&self.pool)
        .await?;
        assignment.id = result.last_insert_id();
        Ok(assignment)
    }

    async fn get_assignment(&self, id: u64) -> Result<Option<ShiftAssignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM shift_assignments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AssignmentRow::into_assignment).transpose()
    }

    async fn list_assignments(&self, employee_id: Option<u64>) -> Result<Vec<ShiftAssignment>> {
        let rows = match employee_id {
            Some(id) => {
                sqlx::query_as::<_, AssignmentRow>(&format!(
                    "SELECT {ASSIGNMENT_COLUMNS} FROM shift_assignments WHERE employee_id = ? ORDER BY id"
                ))
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AssignmentRow>(&format!(
                    "SELECT {ASSIGNMENT_COLUMNS} FROM shift_assignments ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter()
            .map(AssignmentRow::into_assignment)
            .collect()
    }

    async fn set_assignment_status(
        &self,
        id: u64,
        status: AssignmentStatus,
    ) -> Result<Option<ShiftAssignment>> {
        let result = sqlx::query("UPDATE shift_assignments SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_assignment(id).await
    }

    async fn approved_for_employee(&self, employee_id: u64) -> Result<Vec<ShiftAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS} FROM shift_assignments
            WHERE employee_id = ? AND status = 'APPROVED'
            ORDER BY id
            "#
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(AssignmentRow::into_assignment)
            .collect()
    }

    async fn approved_on(&self, date: NaiveDate) -> Result<Vec<ShiftAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS} FROM shift_assignments
            WHERE status = 'APPROVED'
            AND start_date <= ?
            AND (end_date IS NULL OR end_date >= ?)
            ORDER BY id
            "#
        ))
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(AssignmentRow::into_assignment)
            .collect()
    }
}

// -------------------------
// Attendance
// -------------------------

const ATTENDANCE_COLUMNS: &str = r#"
    id, employee_id, record_date, punches, work_minutes, has_missed_punch,
    exception_ids, finalised_for_payroll, created_at, updated_at
"#;

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn insert_record(&self, mut record: AttendanceRecord) -> Result<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records
                (employee_id, record_date, punches, work_minutes, has_missed_punch,
                 exception_ids, finalised_for_payroll, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.record_date)
        .bind(encode_json(&record.punches)?)
        .bind(record.work_minutes)
        .bind(record.has_missed_punch)
        .bind(encode_json(&record.exception_ids)?)
        .bind(record.finalised_for_payroll)
        .bind(record.created_at.naive_utc())
        .bind(record.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;
        record.id = result.last_insert_id();
        Ok(record)
    }

    async fn get_record(&self, id: u64) -> Result<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AttendanceRow::into_record).transpose()
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records WHERE employee_id = ? AND record_date = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AttendanceRow::into_record).transpose()
    }

    async fn update_record(&self, record: &AttendanceRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_records
            SET punches = ?, work_minutes = ?, has_missed_punch = ?,
                exception_ids = ?, finalised_for_payroll = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(encode_json(&record.punches)?)
        .bind(record.work_minutes)
        .bind(record.has_missed_punch)
        .bind(encode_json(&record.exception_ids)?)
        .bind(record.finalised_for_payroll)
        .bind(record.updated_at.naive_utc())
        .bind(record.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_records(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<QueryValue> = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            where_sql.push_str(" AND employee_id = ?");
            args.push(QueryValue::U64(employee_id));
        }
        if let Some(from) = filter.from {
            where_sql.push_str(" AND record_date >= ?");
            args.push(QueryValue::Date(from));
        }
        if let Some(to) = filter.to {
            where_sql.push_str(" AND record_date <= ?");
            args.push(QueryValue::Date(to));
        }

        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records{where_sql} ORDER BY record_date, employee_id"
        );
        let rows = bind_all(sqlx::query_as::<_, AttendanceRow>(&sql), &args)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(AttendanceRow::into_record).collect()
    }
}

// -------------------------
// Corrections
// -------------------------

const CORRECTION_COLUMNS: &str =
    "id, employee_id, record_id, reason, status, created_at, updated_at";

#[async_trait]
impl CorrectionStore for MySqlStore {
    async fn insert_correction(
        &self,
        mut correction: AttendanceCorrectionRequest,
    ) -> Result<AttendanceCorrectionRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_corrections
                (employee_id, record_id, reason, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(correction.employee_id)
        .bind(correction.record_id)
        .bind(&correction.reason)
        .bind(correction.status.to_string())
        .bind(correction.created_at.naive_utc())
        .bind(correction.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;
        correction.id = result.last_insert_id();
        Ok(correction)
    }

    async fn get_correction(&self, id: u64) -> Result<Option<AttendanceCorrectionRequest>> {
        let row = sqlx::query_as::<_, CorrectionRow>(&format!(
            "SELECT {CORRECTION_COLUMNS} FROM attendance_corrections WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(CorrectionRow::into_correction).transpose()
    }

    async fn update_correction(&self, correction: &AttendanceCorrectionRequest) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE attendance_corrections SET reason = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&correction.reason)
        .bind(correction.status.to_string())
        .bind(correction.updated_at.naive_utc())
        .bind(correction.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_corrections(
        &self,
        filter: &CorrectionFilter,
    ) -> Result<Vec<AttendanceCorrectionRequest>> {
        let mut sql = format!("SELECT {CORRECTION_COLUMNS} FROM attendance_corrections WHERE 1=1");
        if filter.employee_id.is_some() {
            sql.push_str(" AND employee_id = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, CorrectionRow>(&sql);
        if let Some(employee_id) = filter.employee_id {
            query = query.bind(employee_id);
        }
        if let Some(status) = filter.status {
            query = query.bind(status.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(CorrectionRow::into_correction)
            .collect()
    }

    async fn submitted_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AttendanceCorrectionRequest>> {
        let rows = sqlx::query_as::<_, CorrectionRow>(&format!(
            r#"
            SELECT {CORRECTION_COLUMNS} FROM attendance_corrections
            WHERE status = 'SUBMITTED' AND created_at < ?
            ORDER BY created_at
            LIMIT ?
            "#
        ))
        .bind(cutoff.naive_utc())
        .bind(limit as u64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(CorrectionRow::into_correction)
            .collect()
    }
}

// -------------------------
// Exceptions
// -------------------------

const EXCEPTION_COLUMNS: &str = r#"
    id, employee_id, exception_type, record_id, assignee_id, status, reason,
    created_at, updated_at
"#;

#[async_trait]
impl ExceptionStore for MySqlStore {
    async fn insert_exception(&self, mut exception: TimeException) -> Result<TimeException> {
        let result = sqlx::query(
            r#"
            INSERT INTO time_exceptions
                (employee_id, exception_type, record_id, assignee_id, status, reason,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(exception.employee_id)
        .bind(exception.exception_type.to_string())
        .bind(exception.record_id)
        .bind(exception.assignee_id)
        .bind(exception.status.to_string())
        .bind(&exception.reason)
        .bind(exception.created_at.naive_utc())
        .bind(exception.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;
        exception.id = result.last_insert_id();
        Ok(exception)
    }

    async fn get_exception(&self, id: u64) -> Result<Option<TimeException>> {
        let row = sqlx::query_as::<_, ExceptionRow>(&format!(
            "SELECT {EXCEPTION_COLUMNS} FROM time_exceptions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ExceptionRow::into_exception).transpose()
    }

    async fn update_exception(&self, exception: &TimeException) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE time_exceptions SET status = ?, reason = ?, updated_at = ? WHERE id = ?",
        )
        .bind(exception.status.to_string())
        .bind(&exception.reason)
        .bind(exception.updated_at.naive_utc())
        .bind(exception.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_exceptions(&self, filter: &ExceptionFilter) -> Result<Vec<TimeException>> {
        let mut sql = format!("SELECT {EXCEPTION_COLUMNS} FROM time_exceptions WHERE 1=1");
        if filter.employee_id.is_some() {
            sql.push_str(" AND employee_id = ?");
        }
        if filter.exception_type.is_some() {
            sql.push_str(" AND exception_type = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.from.is_some() {
            sql.push_str(" AND DATE(created_at) >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND DATE(created_at) <= ?");
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, ExceptionRow>(&sql);
        if let Some(employee_id) = filter.employee_id {
            query = query.bind(employee_id);
        }
        if let Some(exception_type) = filter.exception_type {
            query = query.bind(exception_type.to_string());
        }
        if let Some(status) = filter.status {
            query = query.bind(status.to_string());
        }
        if let Some(from) = filter.from {
            query = query.bind(from);
        }
        if let Some(to) = filter.to {
            query = query.bind(to);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(ExceptionRow::into_exception).collect()
    }

    async fn pending_updated_before(
        &self,
        threshold: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TimeException>> {
        let rows = sqlx::query_as::<_, ExceptionRow>(&format!(
            r#"
            SELECT {EXCEPTION_COLUMNS} FROM time_exceptions
            WHERE status = 'PENDING' AND updated_at < ?
            ORDER BY updated_at
            LIMIT ?
            "#
        ))
        .bind(threshold.naive_utc())
        .bind(limit as u64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ExceptionRow::into_exception).collect()
    }

    async fn pending_created_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<TimeException>> {
        let rows = sqlx::query_as::<_, ExceptionRow>(&format!(
            r#"
            SELECT {EXCEPTION_COLUMNS} FROM time_exceptions
            WHERE status = 'PENDING' AND created_at < ?
            ORDER BY created_at
            LIMIT ?
            "#
        ))
        .bind(cutoff.naive_utc())
        .bind(limit as u64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ExceptionRow::into_exception).collect()
    }
}

// -------------------------
// Work rules
// -------------------------

#[async_trait]
impl WorkRuleStore for MySqlStore {
    async fn insert_overtime_rule(&self, new: NewOvertimeRule) -> Result<OvertimeRule> {
        let result = sqlx::query(
            r#"
            INSERT INTO overtime_rules (name, multiplier, daily_threshold_minutes, active)
            VALUES (?, ?, ?, TRUE)
            "#,
        )
        .bind(&new.name)
        .bind(new.multiplier)
        .bind(new.daily_threshold_minutes)
        .execute(&self.pool)
        .await?;
        Ok(OvertimeRule {
            id: result.last_insert_id(),
            name: new.name,
            multiplier: new.multiplier,
            daily_threshold_minutes: new.daily_threshold_minutes,
            active: true,
        })
    }

    async fn list_overtime_rules(&self) -> Result<Vec<OvertimeRule>> {
        Ok(sqlx::query_as::<_, OvertimeRule>(
            "SELECT id, name, multiplier, daily_threshold_minutes, active FROM overtime_rules ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_overtime_rule(
        &self,
        id: u64,
        update: OvertimeRuleUpdate,
    ) -> Result<Option<OvertimeRule>> {
        let Some(mut current) = sqlx::query_as::<_, OvertimeRule>(
            "SELECT id, name, multiplier, daily_threshold_minutes, active FROM overtime_rules WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            current.name = name;
        }
        if let Some(multiplier) = update.multiplier {
            current.multiplier = multiplier;
        }
        if let Some(threshold) = update.daily_threshold_minutes {
            current.daily_threshold_minutes = Some(threshold);
        }
        if let Some(active) = update.active {
            current.active = active;
        }
        sqlx::query(
            "UPDATE overtime_rules SET name = ?, multiplier = ?, daily_threshold_minutes = ?, active = ? WHERE id = ?",
        )
        .bind(&current.name)
        .bind(current.multiplier)
        .bind(current.daily_threshold_minutes)
        .bind(current.active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(Some(current))
    }

    async fn first_active_overtime_rule(&self) -> Result<Option<OvertimeRule>> {
        Ok(sqlx::query_as::<_, OvertimeRule>(
            r#"
            SELECT id, name, multiplier, daily_threshold_minutes, active
            FROM overtime_rules WHERE active = TRUE ORDER BY id LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_lateness_rule(&self, new: NewLatenessRule) -> Result<LatenessRule> {
        let result = sqlx::query(
            "INSERT INTO lateness_rules (name, grace_minutes, active) VALUES (?, ?, TRUE)",
        )
        .bind(&new.name)
        .bind(new.grace_minutes)
        .execute(&self.pool)
        .await?;
        Ok(LatenessRule {
            id: result.last_insert_id(),
            name: new.name,
            grace_minutes: new.grace_minutes,
            active: true,
        })
    }

    async fn list_lateness_rules(&self) -> Result<Vec<LatenessRule>> {
        Ok(sqlx::query_as::<_, LatenessRule>(
            "SELECT id, name, grace_minutes, active FROM lateness_rules ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_lateness_rule(
        &self,
        id: u64,
        update: LatenessRuleUpdate,
    ) -> Result<Option<LatenessRule>> {
        let Some(mut current) = sqlx::query_as::<_, LatenessRule>(
            "SELECT id, name, grace_minutes, active FROM lateness_rules WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            current.name = name;
        }
        if let Some(grace) = update.grace_minutes {
            current.grace_minutes = grace;
        }
        if let Some(active) = update.active {
            current.active = active;
        }
        sqlx::query("UPDATE lateness_rules SET name = ?, grace_minutes = ?, active = ? WHERE id = ?")
            .bind(&current.name)
            .bind(current.grace_minutes)
            .bind(current.active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(Some(current))
    }

    async fn first_active_lateness_rule(&self) -> Result<Option<LatenessRule>> {
        Ok(sqlx::query_as::<_, LatenessRule>(
            r#"
            SELECT id, name, grace_minutes, active
            FROM lateness_rules WHERE active = TRUE ORDER BY id LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_holiday(&self, new: NewHoliday) -> Result<Holiday> {
        let result = sqlx::query("INSERT INTO holidays (name, date) VALUES (?, ?)")
            .bind(&new.name)
            .bind(new.date)
            .execute(&self.pool)
            .await?;
        Ok(Holiday {
            id: result.last_insert_id(),
            name: new.name,
            date: new.date,
        })
    }

    async fn list_holidays(&self) -> Result<Vec<Holiday>> {
        Ok(
            sqlx::query_as::<_, Holiday>("SELECT id, name, date FROM holidays ORDER BY date")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn delete_holiday(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn holiday_on(&self, date: NaiveDate) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM holidays WHERE date = ?")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

// -------------------------
// Notification log (append-only)
// -------------------------

#[async_trait]
impl NotificationSink for MySqlStore {
    async fn append(&self, event: NewNotification, at: DateTime<Utc>) -> Result<NotificationLog> {
        let result = sqlx::query(
            r#"
            INSERT INTO notification_log (recipient_id, notification_type, message, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(event.recipient_id)
        .bind(event.notification_type.to_string())
        .bind(&event.message)
        .bind(at.naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(NotificationLog {
            id: result.last_insert_id(),
            recipient_id: event.recipient_id,
            notification_type: event.notification_type,
            message: event.message,
            created_at: at,
        })
    }
}
