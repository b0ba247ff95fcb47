use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::Error;
use crate::model::time_exception::{ExceptionStatus, TimeException};
use crate::service::AppState;
use crate::service::correction::CutoffSweepOutcome;
use crate::service::exception::NewExceptionRequest;
use crate::store::ExceptionFilter;

#[derive(Deserialize, ToSchema)]
pub struct ExceptionStatusUpdate {
    #[schema(example = "PENDING")]
    pub status: ExceptionStatus,
    #[schema(example = "waiting on supervisor confirmation", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct StaleExceptionSweep {
    /// Overrides the configured deadline window (default 48 hours).
    #[schema(example = 48, nullable = true)]
    pub window_hours: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
pub struct PayrollCutoffSweep {
    #[schema(example = "2026-01-31T00:00:00Z", format = "date-time", value_type = String)]
    pub cutoff: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema)]
pub struct MissedPunchScan {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
}

/// Raise a time exception
#[utoipa::path(
    post,
    path = "/api/v1/exceptions",
    request_body = NewExceptionRequest,
    responses(
        (status = 201, description = "Exception raised and linked", body = TimeException),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Exceptions"
)]
pub async fn create_exception(
    state: web::Data<AppState>,
    payload: web::Json<NewExceptionRequest>,
) -> Result<HttpResponse, Error> {
    let exception = state.exceptions.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(exception))
}

/// List time exceptions
#[utoipa::path(
    get,
    path = "/api/v1/exceptions",
    params(ExceptionFilter),
    responses((status = 200, description = "Matching exceptions", body = [TimeException])),
    tag = "Exceptions"
)]
pub async fn list_exceptions(
    state: web::Data<AppState>,
    query: web::Query<ExceptionFilter>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.exceptions.list(&query).await?))
}

/// Get a time exception
#[utoipa::path(
    get,
    path = "/api/v1/exceptions/{id}",
    params(("id" = u64, Path, description = "Exception ID")),
    responses(
        (status = 200, body = TimeException),
        (status = 404, description = "Exception not found")
    ),
    tag = "Exceptions"
)]
pub async fn get_exception(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.exceptions.get(path.into_inner()).await?))
}

/// Update an exception's status
///
/// Moving an exception to PENDING triggers an immediate stale-exception
/// sweep pass. ESCALATED is reserved for the sweeps.
#[utoipa::path(
    put,
    path = "/api/v1/exceptions/{id}/status",
    request_body = ExceptionStatusUpdate,
    params(("id" = u64, Path, description = "Exception ID")),
    responses(
        (status = 200, body = TimeException),
        (status = 404, description = "Exception not found"),
        (status = 409, description = "Illegal transition")
    ),
    tag = "Exceptions"
)]
pub async fn update_exception_status(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<ExceptionStatusUpdate>,
) -> Result<HttpResponse, Error> {
    let ExceptionStatusUpdate { status, reason } = payload.into_inner();
    let exception = state
        .exceptions
        .update_status(path.into_inner(), status, reason)
        .await?;
    Ok(HttpResponse::Ok().json(exception))
}

/// Escalate stale pending exceptions
///
/// Idempotent; re-running never re-escalates already escalated items.
#[utoipa::path(
    post,
    path = "/api/v1/sweeps/exceptions",
    request_body = StaleExceptionSweep,
    responses(
        (status = 200, description = "Number escalated", body = Object, example = json!({ "escalated": 3 }))
    ),
    tag = "Sweeps"
)]
pub async fn sweep_stale_exceptions(
    state: web::Data<AppState>,
    payload: web::Json<StaleExceptionSweep>,
) -> Result<HttpResponse, Error> {
    let escalated = state.exceptions.escalate_stale(payload.window_hours).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "escalated": escalated })))
}

/// Run the payroll-cutoff escalation
///
/// Escalates SUBMITTED corrections and PENDING exceptions from before the
/// cutoff. Idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/sweeps/payroll-cutoff",
    request_body = PayrollCutoffSweep,
    responses((status = 200, description = "Sweep outcome", body = CutoffSweepOutcome)),
    tag = "Sweeps"
)]
pub async fn sweep_payroll_cutoff(
    state: web::Data<AppState>,
    payload: web::Json<PayrollCutoffSweep>,
) -> Result<HttpResponse, Error> {
    let outcome = state.corrections.escalate_before(payload.cutoff).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Scan a day for missed punches
///
/// Raises a MISSED_PUNCH exception for every record on the date still
/// flagged incomplete. Safe to re-run.
#[utoipa::path(
    post,
    path = "/api/v1/sweeps/missed-punches",
    request_body = MissedPunchScan,
    responses(
        (status = 200, description = "Number raised", body = Object, example = json!({ "raised": 2 }))
    ),
    tag = "Sweeps"
)]
pub async fn scan_missed_punches(
    state: web::Data<AppState>,
    payload: web::Json<MissedPunchScan>,
) -> Result<HttpResponse, Error> {
    let raised = state.exceptions.detect_missed_punches(payload.date).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "raised": raised })))
}
