use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::Error;
use crate::model::correction::{AttendanceCorrectionRequest, CorrectionStatus};
use crate::service::AppState;
use crate::store::CorrectionFilter;

#[derive(Deserialize, ToSchema)]
pub struct CreateCorrection {
    #[schema(example = 42)]
    pub record_id: u64,
    #[schema(example = "Forgot to clock out, left at 17:30")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CorrectionStatusUpdate {
    #[schema(example = "IN_REVIEW")]
    pub status: CorrectionStatus,
}

/// Open a correction request
///
/// Pulls the referenced record back from payroll until the request is
/// decided.
#[utoipa::path(
    post,
    path = "/api/v1/corrections",
    request_body = CreateCorrection,
    responses(
        (status = 201, description = "Request submitted", body = AttendanceCorrectionRequest),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "message": "attendance record 42 not found"
        }))
    ),
    tag = "Corrections"
)]
pub async fn create_correction(
    state: web::Data<AppState>,
    payload: web::Json<CreateCorrection>,
) -> Result<HttpResponse, Error> {
    let CreateCorrection { record_id, reason } = payload.into_inner();
    let correction = state.corrections.create(record_id, reason).await?;
    Ok(HttpResponse::Created().json(correction))
}

/// List correction requests
#[utoipa::path(
    get,
    path = "/api/v1/corrections",
    params(CorrectionFilter),
    responses((status = 200, description = "Matching requests", body = [AttendanceCorrectionRequest])),
    tag = "Corrections"
)]
pub async fn list_corrections(
    state: web::Data<AppState>,
    query: web::Query<CorrectionFilter>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.corrections.list(&query).await?))
}

/// Get a correction request
#[utoipa::path(
    get,
    path = "/api/v1/corrections/{id}",
    params(("id" = u64, Path, description = "Correction request ID")),
    responses(
        (status = 200, body = AttendanceCorrectionRequest),
        (status = 404, description = "Correction request not found")
    ),
    tag = "Corrections"
)]
pub async fn get_correction(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.corrections.get(path.into_inner()).await?))
}

/// Move a correction request through review
///
/// Transitions are checked against the workflow table; APPROVED re-finalises
/// the linked record for payroll. ESCALATED is reserved for the
/// payroll-cutoff sweep.
#[utoipa::path(
    put,
    path = "/api/v1/corrections/{id}/status",
    request_body = CorrectionStatusUpdate,
    params(("id" = u64, Path, description = "Correction request ID")),
    responses(
        (status = 200, body = AttendanceCorrectionRequest),
        (status = 404, description = "Correction request not found"),
        (status = 409, description = "Illegal transition", body = Object, example = json!({
            "message": "illegal correction request transition: SUBMITTED -> APPROVED"
        }))
    ),
    tag = "Corrections"
)]
pub async fn update_correction_status(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<CorrectionStatusUpdate>,
) -> Result<HttpResponse, Error> {
    let correction = state
        .corrections
        .update_status(path.into_inner(), payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(correction))
}
