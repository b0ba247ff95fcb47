use crate::api::assignment::AssignmentStatusUpdate;
use crate::api::attendance::{OverwritePunches, PunchRequest};
use crate::api::correction::{CorrectionStatusUpdate, CreateCorrection};
use crate::api::exception::{
    ExceptionStatusUpdate, MissedPunchScan, PayrollCutoffSweep, StaleExceptionSweep,
};
use crate::api::shift::CreateShiftType;
use crate::model::assignment::{AssignmentStatus, ShiftAssignment};
use crate::model::attendance::{AttendanceRecord, Punch, PunchType};
use crate::model::correction::{AttendanceCorrectionRequest, CorrectionStatus};
use crate::model::schedule_rule::ScheduleRule;
use crate::model::shift::{PunchPolicy, Shift, ShiftType};
use crate::model::time_exception::{ExceptionStatus, ExceptionType, TimeException};
use crate::model::work_rules::{Holiday, LatenessRule, OvertimeRule};
use crate::service::assignment::BulkAssignmentRequest;
use crate::service::correction::CutoffSweepOutcome;
use crate::service::exception::NewExceptionRequest;
use crate::service::report::{
    AttendanceReport, AttendanceReportRow, ExceptionReport, OvertimeEntry, OvertimeReport,
};
use crate::store::{
    AttendanceFilter, CorrectionFilter, ExceptionFilter, LatenessRuleUpdate, NewAssignment,
    NewHoliday, NewLatenessRule, NewOvertimeRule, NewScheduleRule, NewShift, OvertimeRuleUpdate,
    ScheduleRuleUpdate, ShiftTypeUpdate, ShiftUpdate,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Time & Attendance Management API",
        version = "1.0.0",
        description = r#"
## Time & Attendance Management Service (TAMS)

The time & attendance core of an HR platform: shift scheduling, punch
reconciliation, exception handling and payroll-gating correction workflows.

### 🔹 Key Features
- **Shift Catalog**
  - Shift types, shifts with punch policies (ALL / FIRST_LAST), schedule rules
- **Shift Assignment**
  - Per-employee assignments with approval, date ranges and bulk creation
- **Attendance**
  - Clock-in/clock-out reconciliation into daily work-time totals with
    missed-punch detection
- **Corrections & Exceptions**
  - Employee dispute workflow gating payroll finalisation; time exceptions
    with SLA-bounded escalation sweeps
- **Reports**
  - Attendance, overtime (payroll input) and exception summaries

### 📦 Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::shift::create_shift_type,
        crate::api::shift::list_shift_types,
        crate::api::shift::get_shift_type,
        crate::api::shift::update_shift_type,
        crate::api::shift::create_shift,
        crate::api::shift::list_shifts,
        crate::api::shift::get_shift,
        crate::api::shift::update_shift,

        crate::api::schedule_rule::create_schedule_rule,
        crate::api::schedule_rule::list_schedule_rules,
        crate::api::schedule_rule::get_schedule_rule,
        crate::api::schedule_rule::update_schedule_rule,

        crate::api::assignment::create_assignment,
        crate::api::assignment::bulk_create_assignments,
        crate::api::assignment::list_assignments,
        crate::api::assignment::get_assignment,
        crate::api::assignment::set_assignment_status,

        crate::api::attendance::punch,
        crate::api::attendance::list_records,
        crate::api::attendance::get_record,
        crate::api::attendance::overwrite_punches,

        crate::api::correction::create_correction,
        crate::api::correction::list_corrections,
        crate::api::correction::get_correction,
        crate::api::correction::update_correction_status,

        crate::api::exception::create_exception,
        crate::api::exception::list_exceptions,
        crate::api::exception::get_exception,
        crate::api::exception::update_exception_status,
        crate::api::exception::sweep_stale_exceptions,
        crate::api::exception::sweep_payroll_cutoff,
        crate::api::exception::scan_missed_punches,

        crate::api::report::attendance_report,
        crate::api::report::overtime_report,
        crate::api::report::exception_report,

        crate::api::work_rules::create_overtime_rule,
        crate::api::work_rules::list_overtime_rules,
        crate::api::work_rules::update_overtime_rule,
        crate::api::work_rules::create_lateness_rule,
        crate::api::work_rules::list_lateness_rules,
        crate::api::work_rules::update_lateness_rule,
        crate::api::work_rules::create_holiday,
        crate::api::work_rules::list_holidays,
        crate::api::work_rules::delete_holiday
    ),
    components(
        schemas(
            ShiftType,
            Shift,
            PunchPolicy,
            ScheduleRule,
            ShiftAssignment,
            AssignmentStatus,
            Punch,
            PunchType,
            AttendanceRecord,
            AttendanceCorrectionRequest,
            CorrectionStatus,
            TimeException,
            ExceptionType,
            ExceptionStatus,
            OvertimeRule,
            LatenessRule,
            Holiday,
            CreateShiftType,
            NewShift,
            ShiftUpdate,
            ShiftTypeUpdate,
            NewScheduleRule,
            ScheduleRuleUpdate,
            NewAssignment,
            BulkAssignmentRequest,
            AssignmentStatusUpdate,
            PunchRequest,
            OverwritePunches,
            CreateCorrection,
            CorrectionStatusUpdate,
            NewExceptionRequest,
            ExceptionStatusUpdate,
            StaleExceptionSweep,
            PayrollCutoffSweep,
            MissedPunchScan,
            NewOvertimeRule,
            OvertimeRuleUpdate,
            NewLatenessRule,
            LatenessRuleUpdate,
            NewHoliday,
            AttendanceFilter,
            CorrectionFilter,
            ExceptionFilter,
            AttendanceReport,
            AttendanceReportRow,
            OvertimeReport,
            OvertimeEntry,
            ExceptionReport,
            CutoffSweepOutcome
        )
    ),
    tags(
        (name = "Shift Catalog", description = "Shift type, shift and schedule rule administration"),
        (name = "Shift Assignment", description = "Employee-to-shift binding and resolution"),
        (name = "Attendance", description = "Punch processing and daily records"),
        (name = "Corrections", description = "Attendance dispute workflow"),
        (name = "Exceptions", description = "Time exception lifecycle"),
        (name = "Sweeps", description = "Scheduled escalation and detection sweeps"),
        (name = "Reports", description = "Attendance, overtime and exception reporting"),
        (name = "Work Rules", description = "Overtime, lateness and holiday configuration"),
    )
)]
pub struct ApiDoc;
