use actix_web::{HttpResponse, web};

use crate::error::Error;
use crate::service::AppState;
use crate::service::report::{AttendanceReport, ExceptionReport, OvertimeReport};
use crate::store::{AttendanceFilter, ExceptionFilter};

/// Attendance report
#[utoipa::path(
    get,
    path = "/api/v1/reports/attendance",
    params(AttendanceFilter),
    responses((status = 200, description = "Aggregated attendance", body = AttendanceReport)),
    tag = "Reports"
)]
pub async fn attendance_report(
    state: web::Data<AppState>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.reports.attendance_report(&query).await?))
}

/// Overtime report
///
/// Payroll input: actual minutes against the resolved shift window per
/// record. Zero-overtime records are counted but not listed.
#[utoipa::path(
    get,
    path = "/api/v1/reports/overtime",
    params(AttendanceFilter),
    responses((status = 200, description = "Overtime entries", body = OvertimeReport)),
    tag = "Reports"
)]
pub async fn overtime_report(
    state: web::Data<AppState>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.reports.overtime_report(&query).await?))
}

/// Exception report
#[utoipa::path(
    get,
    path = "/api/v1/reports/exceptions",
    params(ExceptionFilter),
    responses((status = 200, description = "Exceptions grouped by type and status", body = ExceptionReport)),
    tag = "Reports"
)]
pub async fn exception_report(
    state: web::Data<AppState>,
    query: web::Query<ExceptionFilter>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.reports.exception_report(&query).await?))
}
