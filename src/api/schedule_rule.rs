use actix_web::{HttpResponse, web};

use crate::error::Error;
use crate::model::schedule_rule::ScheduleRule;
use crate::service::AppState;
use crate::store::{NewScheduleRule, ScheduleRuleUpdate};

/// Create a schedule rule
#[utoipa::path(
    post,
    path = "/api/v1/schedule-rules",
    request_body = NewScheduleRule,
    responses(
        (status = 201, description = "Schedule rule created", body = ScheduleRule),
        (status = 400, description = "Invalid rule")
    ),
    tag = "Shift Catalog"
)]
pub async fn create_schedule_rule(
    state: web::Data<AppState>,
    payload: web::Json<NewScheduleRule>,
) -> Result<HttpResponse, Error> {
    let rule = state
        .catalog
        .create_schedule_rule(payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(rule))
}

/// List schedule rules
#[utoipa::path(
    get,
    path = "/api/v1/schedule-rules",
    responses((status = 200, description = "All schedule rules", body = [ScheduleRule])),
    tag = "Shift Catalog"
)]
pub async fn list_schedule_rules(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.catalog.list_schedule_rules().await?))
}

/// Get a schedule rule
#[utoipa::path(
    get,
    path = "/api/v1/schedule-rules/{id}",
    params(("id" = u64, Path, description = "Schedule rule ID")),
    responses(
        (status = 200, body = ScheduleRule),
        (status = 404, description = "Schedule rule not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn get_schedule_rule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(state.catalog.get_schedule_rule(path.into_inner()).await?))
}

/// Update a schedule rule
#[utoipa::path(
    put,
    path = "/api/v1/schedule-rules/{id}",
    request_body = ScheduleRuleUpdate,
    params(("id" = u64, Path, description = "Schedule rule ID")),
    responses(
        (status = 200, body = ScheduleRule),
        (status = 404, description = "Schedule rule not found")
    ),
    tag = "Shift Catalog"
)]
pub async fn update_schedule_rule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<ScheduleRuleUpdate>,
) -> Result<HttpResponse, Error> {
    let rule = state
        .catalog
        .update_schedule_rule(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(rule))
}
