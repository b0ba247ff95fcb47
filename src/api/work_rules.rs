use actix_web::{HttpResponse, web};

use crate::error::Error;
use crate::model::work_rules::{Holiday, LatenessRule, OvertimeRule};
use crate::service::AppState;
use crate::store::{
    LatenessRuleUpdate, NewHoliday, NewLatenessRule, NewOvertimeRule, OvertimeRuleUpdate,
};

/// Create an overtime rule
#[utoipa::path(
    post,
    path = "/api/v1/overtime-rules",
    request_body = NewOvertimeRule,
    responses(
        (status = 201, body = OvertimeRule),
        (status = 400, description = "Invalid multiplier")
    ),
    tag = "Work Rules"
)]
pub async fn create_overtime_rule(
    state: web::Data<AppState>,
    payload: web::Json<NewOvertimeRule>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Created().json(state.work_rules.create_overtime_rule(payload.into_inner()).await?))
}

/// List overtime rules
#[utoipa::path(
    get,
    path = "/api/v1/overtime-rules",
    responses((status = 200, body = [OvertimeRule])),
    tag = "Work Rules"
)]
pub async fn list_overtime_rules(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.work_rules.list_overtime_rules().await?))
}

/// Update an overtime rule
#[utoipa::path(
    put,
    path = "/api/v1/overtime-rules/{id}",
    request_body = OvertimeRuleUpdate,
    params(("id" = u64, Path, description = "Overtime rule ID")),
    responses(
        (status = 200, body = OvertimeRule),
        (status = 404, description = "Overtime rule not found")
    ),
    tag = "Work Rules"
)]
pub async fn update_overtime_rule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<OvertimeRuleUpdate>,
) -> Result<HttpResponse, Error> {
    let rule = state
        .work_rules
        .update_overtime_rule(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(rule))
}

/// Create a lateness rule
#[utoipa::path(
    post,
    path = "/api/v1/lateness-rules",
    request_body = NewLatenessRule,
    responses(
        (status = 201, body = LatenessRule),
        (status = 400, description = "Invalid grace period")
    ),
    tag = "Work Rules"
)]
pub async fn create_lateness_rule(
    state: web::Data<AppState>,
    payload: web::Json<NewLatenessRule>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Created().json(state.work_rules.create_lateness_rule(payload.into_inner()).await?))
}

/// List lateness rules
#[utoipa::path(
    get,
    path = "/api/v1/lateness-rules",
    responses((status = 200, body = [LatenessRule])),
    tag = "Work Rules"
)]
pub async fn list_lateness_rules(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.work_rules.list_lateness_rules().await?))
}

/// Update a lateness rule
#[utoipa::path(
    put,
    path = "/api/v1/lateness-rules/{id}",
    request_body = LatenessRuleUpdate,
    params(("id" = u64, Path, description = "Lateness rule ID")),
    responses(
        (status = 200, body = LatenessRule),
        (status = 404, description = "Lateness rule not found")
    ),
    tag = "Work Rules"
)]
pub async fn update_lateness_rule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<LatenessRuleUpdate>,
) -> Result<HttpResponse, Error> {
    let rule = state
        .work_rules
        .update_lateness_rule(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(rule))
}

/// Create a holiday
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = NewHoliday,
    responses((status = 201, body = Holiday)),
    tag = "Work Rules"
)]
pub async fn create_holiday(
    state: web::Data<AppState>,
    payload: web::Json<NewHoliday>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Created().json(state.work_rules.create_holiday(payload.into_inner()).await?))
}

/// List holidays
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    responses((status = 200, body = [Holiday])),
    tag = "Work Rules"
)]
pub async fn list_holidays(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.work_rules.list_holidays().await?))
}

/// Delete a holiday
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{id}",
    params(("id" = u64, Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found")
    ),
    tag = "Work Rules"
)]
pub async fn delete_holiday(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    state.work_rules.delete_holiday(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday deleted"
    })))
}
