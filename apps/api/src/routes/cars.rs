//! # Car Fleet Routes
//!
//! Rental cars, optionally filtered by home track. Import costing
//! fields ride along on the input; only the name is mandatory.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, Car};
use trackside_db::CarInput;

use crate::auth::{require, CurrentStaff};
use crate::error::ApiResult;
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/{id}", get(get_car).put(update_car).delete(delete_car))
}

#[derive(Debug, Deserialize)]
struct CarListQuery {
    track_id: Option<Uuid>,
}

/// `GET /api/cars?track_id=`
async fn list_cars(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(query): Query<CarListQuery>,
) -> ApiResult<Json<Vec<Car>>> {
    let cars = state.db.cars().list(query.track_id).await?;
    Ok(Json(cars))
}

/// `GET /api/cars/{id}`
async fn get_car(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Car>> {
    let car = state.db.cars().get(id).await?;
    Ok(Json(car))
}

/// `POST /api/cars`
async fn create_car(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<CarInput>,
) -> ApiResult<(StatusCode, Json<Car>)> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;

    let car = state.db.cars().create(&input).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "car",
            car.id,
            serde_json::to_value(&car).ok(),
            format!("Created car: {}", car.name),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(car)))
}

/// `PUT /api/cars/{id}`
async fn update_car(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<CarInput>,
) -> ApiResult<Json<Car>> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;

    let old = state.db.cars().get(id).await?;
    let car = state.db.cars().update(id, &input).await?;

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "car",
            car.id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&car).ok(),
            format!("Updated car: {}", car.name),
        ),
    )
    .await;

    Ok(Json(car))
}

/// `DELETE /api/cars/{id}`
async fn delete_car(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManagePrices)?;

    let old = state.db.cars().get(id).await?;
    state.db.cars().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "car",
            id,
            serde_json::to_value(&old).ok(),
            format!("Deleted car: {}", old.name),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
