use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::Error;
use crate::model::shift::{Shift, ShiftType};
use crate::service::AppState;
use crate::store::{NewShift, ShiftTypeUpdate, ShiftUpdate};

#[derive(Deserialize, ToSchema)]
pub struct CreateShiftType {
    #[schema(example = "General")]
    pub name: String,
}

/* =========================
Shift types
========================= */

/// Create a shift type
#[utoipa::path(
    post,
    path = "/api/v1/shift-types",
    request_body = CreateShiftType,
    responses(
        (status = 201, description = "Shift type created", body = ShiftType),
        (status = 400, description = "Invalid name")
    ),
    tag = "Shift Catalog"
)]
pub async fn create_shift_type(
    state: web::Data<AppState>,
    payload: web::Json<CreateShiftType>,
) -> Result<HttpResponse, Error> {
    let shift_type = state
        .catalog
        .create_shift_type(payload.into_inner().name)
        .await?;
    Ok(HttpResponse::Created().json(shift_type))
}

/// List shift types
#[utoipa::path(
    get,
    path = "/api/v1/shift-types",
    responses((status = 200, description = "All shift types", body = [ShiftType])),
    tag = "Shift Catalog"
)]
pub async fn list_shift_types(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.catalog.list_shift_types().await?))
}

/// Get a shift type
#[utoipa::path(
    get,
    path = "/api/v1/shift-types/{id}",
    params(("id" = u64, Path, description = "Shift type ID")),
    responses(
        (status = 200, body = ShiftType),
        (status = 404, description = "Shift type not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn get_shift_type(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.catalog.get_shift_type(path.into_inner()).await?))
}

/// Rename or toggle a shift type
#[utoipa::path(
    put,
    path = "/api/v1/shift-types/{id}",
    request_body = ShiftTypeUpdate,
    params(("id" = u64, Path, description = "Shift type ID")),
    responses(
        (status = 200, body = ShiftType),
        (status = 404, description = "Shift type not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn update_shift_type(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<ShiftTypeUpdate>,
) -> Result<HttpResponse, Error> {
    let shift_type = state
        .catalog
        .update_shift_type(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(shift_type))
}

/* =========================
Shifts
========================= */

/// Create a shift
#[utoipa::path(
    post,
    path = "/api/v1/shifts",
    request_body = NewShift,
    responses(
        (status = 201, description = "Shift created", body = Shift),
        (status = 400, description = "Malformed HH:MM time"),
        (status = 404, description = "Shift type not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn create_shift(
    state: web::Data<AppState>,
    payload: web::Json<NewShift>,
) -> Result<HttpResponse, Error> {
    let shift = state.catalog.create_shift(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(shift))
}

/// List shifts
#[utoipa::path(
    get,
    path = "/api/v1/shifts",
    responses((status = 200, description = "All shifts", body = [Shift])),
    tag = "Shift Catalog"
)]
pub async fn list_shifts(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.catalog.list_shifts().await?))
}

/// Get a shift
#[utoipa::path(
    get,
    path = "/api/v1/shifts/{id}",
    params(("id" = u64, Path, description = "Shift ID")),
    responses(
        (status = 200, body = Shift),
        (status = 404, description = "Shift not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn get_shift(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.catalog.get_shift(path.into_inner()).await?))
}

/// Update a shift
#[utoipa::path(
    put,
    path = "/api/v1/shifts/{id}",
    request_body = ShiftUpdate,
    params(("id" = u64, Path, description = "Shift ID")),
    responses(
        (status = 200, body = Shift),
        (status = 400, description = "Malformed HH:MM time"),
        (status = 404, description = "Shift not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn update_shift(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<ShiftUpdate>,
) -> Result<HttpResponse, Error> {
    let shift = state
        .catalog
        .update_shift(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(shift))
}
