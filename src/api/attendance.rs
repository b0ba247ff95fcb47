use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::Error;
use crate::model::attendance::{AttendanceRecord, Punch, PunchType};
use crate::service::AppState;
use crate::store::AttendanceFilter;

#[derive(Deserialize, ToSchema)]
pub struct PunchRequest {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "IN")]
    pub punch_type: PunchType,
}

#[derive(Deserialize, ToSchema)]
pub struct OverwritePunches {
    pub punches: Vec<Punch>,
    #[schema(example = "badge reader swapped, times re-entered from paper log", nullable = true)]
    pub reason: Option<String>,
}

/// Clock in / clock out
///
/// Applies the punch policy of the shift the employee is on today; with no
/// resolvable shift every punch is kept.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/punch",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Recomputed day record", body = AttendanceRecord),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn punch(
    state: web::Data<AppState>,
    payload: web::Json<PunchRequest>,
) -> Result<HttpResponse, Error> {
    let record = state
        .timeclock
        .punch(payload.employee_id, payload.punch_type)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses((status = 200, description = "Matching records", body = [AttendanceRecord])),
    tag = "Attendance"
)]
pub async fn list_records(
    state: web::Data<AppState>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.timeclock.list_records(&query).await?))
}

/// Get an attendance record
#[utoipa::path(
    get,
    path = "/api/v1/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance record ID")),
    responses(
        (status = 200, body = AttendanceRecord),
        (status = 404, description = "Record not found")
    ),
    tag = "Attendance"
)]
pub async fn get_record(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.timeclock.get_record(path.into_inner()).await?))
}

/// Replace a record's punches (privileged)
///
/// Wholesale overwrite bypassing the correction workflow. Leaves the
/// payroll-finalisation flag untouched and writes one audit event with the
/// supplied reason.
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}/punches",
    request_body = OverwritePunches,
    params(("id" = u64, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Recomputed record", body = AttendanceRecord),
        (status = 404, description = "Record not found")
    ),
    tag = "Attendance"
)]
pub async fn overwrite_punches(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<OverwritePunches>,
) -> Result<HttpResponse, Error> {
    let OverwritePunches { punches, reason } = payload.into_inner();
    let record = state
        .timeclock
        .overwrite_punches(path.into_inner(), punches, reason)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}
