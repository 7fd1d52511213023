//! # Service Catalog Routes
//!
//! Track sessions, car rentals and other sellable services. Reads are
//! open to any authenticated staff; mutations need manage-prices.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, Service};
use trackside_db::ServiceInput;

use crate::auth::{require, CurrentStaff};
use crate::error::ApiResult;
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route(
            "/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
}

/// `GET /api/services`
async fn list_services(
    State(state): State<AppState>,
    _staff: CurrentStaff,
) -> ApiResult<Json<Vec<Service>>> {
    let services = state.db.services().list().await?;
    Ok(Json(services))
}

/// `GET /api/services/{id}`
async fn get_service(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Service>> {
    let service = state.db.services().get(id).await?;
    Ok(Json(service))
}

/// `POST /api/services`
async fn create_service(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<ServiceInput>,
) -> ApiResult<(StatusCode, Json<Service>)> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;
    validation::validate_price(input.base_price)?;

    let service = state.db.services().create(&input).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "service",
            service.id,
            serde_json::to_value(&service).ok(),
            format!("Created service: {}", service.name),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(service)))
}

/// `PUT /api/services/{id}`
async fn update_service(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<ServiceInput>,
) -> ApiResult<Json<Service>> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;
    validation::validate_price(input.base_price)?;

    let old = state.db.services().get(id).await?;
    let service = state.db.services().update(id, &input).await?;

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "service",
            service.id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&service).ok(),
            format!("Updated service: {}", service.name),
        ),
    )
    .await;

    Ok(Json(service))
}

/// `DELETE /api/services/{id}`
///
/// Historical sale lines keep their price snapshots; deleting the
/// catalog row never blocks on past sales.
async fn delete_service(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManagePrices)?;

    let old = state.db.services().get(id).await?;
    state.db.services().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "service",
            id,
            serde_json::to_value(&old).ok(),
            format!("Deleted service: {}", old.name),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
