use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::Error;
use crate::model::assignment::{AssignmentStatus, ShiftAssignment};
use crate::service::AppState;
use crate::service::assignment::BulkAssignmentRequest;
use crate::store::NewAssignment;

#[derive(Deserialize, IntoParams)]
pub struct AssignmentQuery {
    /// Filter by employee ID
    #[param(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignmentStatusUpdate {
    #[schema(example = "APPROVED")]
    pub status: AssignmentStatus,
}

/// Assign an employee to a shift
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = NewAssignment,
    responses(
        (status = 201, description = "Assignment created in PENDING", body = ShiftAssignment),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Shift or schedule rule not found")
    ),
    tag = "Shift Assignment"
)]
pub async fn create_assignment(
    state: web::Data<AppState>,
    payload: web::Json<NewAssignment>,
) -> Result<HttpResponse, Error> {
    let assignment = state.assignments.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(assignment))
}

/// Bulk-assign a shift
///
/// Either an explicit employee list, or a department/position criterion.
/// The latter needs the employee directory and fails fast until it is wired.
#[utoipa::path(
    post,
    path = "/api/v1/assignments/bulk",
    request_body = BulkAssignmentRequest,
    responses(
        (status = 201, description = "Assignments created", body = [ShiftAssignment]),
        (status = 400, description = "Directory-based targeting not available", body = Object, example = json!({
            "message": "department/position bulk assignment requires the employee directory, which is not wired to this service"
        })),
        (status = 404, description = "Shift or schedule rule not found")
    ),
    tag = "Shift Assignment"
)]
pub async fn bulk_create_assignments(
    state: web::Data<AppState>,
    payload: web::Json<BulkAssignmentRequest>,
) -> Result<HttpResponse, Error> {
    let created = state.assignments.bulk_create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// List assignments
#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    params(AssignmentQuery),
    responses((status = 200, description = "Assignments", body = [ShiftAssignment])),
    tag = "Shift Assignment"
)]
pub async fn list_assignments(
    state: web::Data<AppState>,
    query: web::Query<AssignmentQuery>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.assignments.list(query.employee_id).await?))
}

/// Get an assignment
#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}",
    params(("id" = u64, Path, description = "Assignment ID")),
    responses(
        (status = 200, body = ShiftAssignment),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Shift Assignment"
)]
pub async fn get_assignment(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.assignments.get(path.into_inner()).await?))
}

/// Approve or reject an assignment
#[utoipa::path(
    put,
    path = "/api/v1/assignments/{id}/status",
    request_body = AssignmentStatusUpdate,
    params(("id" = u64, Path, description = "Assignment ID")),
    responses(
        (status = 200, body = ShiftAssignment),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Shift Assignment"
)]
pub async fn set_assignment_status(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<AssignmentStatusUpdate>,
) -> Result<HttpResponse, Error> {
    let assignment = state
        .assignments
        .set_status(path.into_inner(), payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(assignment))
}
