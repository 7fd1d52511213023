//! # Menu Catalog Routes
//!
//! Café items. Same access shape as the service catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, MenuItem};
use trackside_db::MenuItemInput;

use crate::auth::{require, CurrentStaff};
use crate::error::ApiResult;
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu_items).post(create_menu_item))
        .route(
            "/{id}",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
}

fn validate_input(input: &mut MenuItemInput) -> ApiResult<()> {
    input.name = validation::validate_name(&input.name, "name")?;
    input.category = validation::validate_name(&input.category, "category")?;
    validation::validate_price(input.price)?;
    validation::validate_tax_rate(input.tax_rate)?;
    Ok(())
}

/// `GET /api/menu`
async fn list_menu_items(
    State(state): State<AppState>,
    _staff: CurrentStaff,
) -> ApiResult<Json<Vec<MenuItem>>> {
    let items = state.db.menu_items().list().await?;
    Ok(Json(items))
}

/// `GET /api/menu/{id}`
async fn get_menu_item(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MenuItem>> {
    let item = state.db.menu_items().get(id).await?;
    Ok(Json(item))
}

/// `POST /api/menu`
async fn create_menu_item(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<MenuItemInput>,
) -> ApiResult<(StatusCode, Json<MenuItem>)> {
    require(&ctx, Capability::ManagePrices)?;
    validate_input(&mut input)?;

    let item = state.db.menu_items().create(&input).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "menu_item",
            item.id,
            serde_json::to_value(&item).ok(),
            format!("Created menu item: {}", item.name),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/menu/{id}`
async fn update_menu_item(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<MenuItemInput>,
) -> ApiResult<Json<MenuItem>> {
    require(&ctx, Capability::ManagePrices)?;
    validate_input(&mut input)?;

    let old = state.db.menu_items().get(id).await?;
    let item = state.db.menu_items().update(id, &input).await?;

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "menu_item",
            item.id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&item).ok(),
            format!("Updated menu item: {}", item.name),
        ),
    )
    .await;

    Ok(Json(item))
}

/// `DELETE /api/menu/{id}`
async fn delete_menu_item(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManagePrices)?;

    let old = state.db.menu_items().get(id).await?;
    state.db.menu_items().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "menu_item",
            id,
            serde_json::to_value(&old).ok(),
            format!("Deleted menu item: {}", old.name),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
