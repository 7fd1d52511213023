//! # Package Catalog Routes
//!
//! Bundles of track time plus configured café items. The repository
//! writes the package row and its item configuration in one
//! transaction; these handlers just gate, validate and audit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, PackageDetail};
use trackside_db::PackageInput;

use crate::auth::{require, CurrentStaff};
use crate::error::ApiResult;
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_packages).post(create_package))
        .route(
            "/{id}",
            get(get_package).put(update_package).delete(delete_package),
        )
}

/// `GET /api/packages`: every package with its configured items.
async fn list_packages(
    State(state): State<AppState>,
    _staff: CurrentStaff,
) -> ApiResult<Json<Vec<PackageDetail>>> {
    let packages = state.db.packages().list().await?;
    Ok(Json(packages))
}

/// `GET /api/packages/{id}`
async fn get_package(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PackageDetail>> {
    let package = state.db.packages().get_detail(id).await?;
    Ok(Json(package))
}

/// `POST /api/packages`
async fn create_package(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<PackageInput>,
) -> ApiResult<(StatusCode, Json<PackageDetail>)> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;
    validation::validate_price(input.base_price)?;

    let package = state.db.packages().create(&input).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "package",
            package.package.id,
            serde_json::to_value(&package).ok(),
            format!("Created package: {}", package.package.name),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(package)))
}

/// `PUT /api/packages/{id}`: replaces the configured item set.
async fn update_package(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<PackageInput>,
) -> ApiResult<Json<PackageDetail>> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;
    validation::validate_price(input.base_price)?;

    let old = state.db.packages().get_detail(id).await?;
    let package = state.db.packages().update(id, &input).await?;

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "package",
            package.package.id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&package).ok(),
            format!("Updated package: {}", package.package.name),
        ),
    )
    .await;

    Ok(Json(package))
}

/// `DELETE /api/packages/{id}`
async fn delete_package(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManagePrices)?;

    let old = state.db.packages().get_detail(id).await?;
    state.db.packages().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "package",
            id,
            serde_json::to_value(&old).ok(),
            format!("Deleted package: {}", old.package.name),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
