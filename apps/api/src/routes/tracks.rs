//! # Track Catalog Routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, Track};
use trackside_db::TrackInput;

use crate::auth::{require, CurrentStaff};
use crate::error::ApiResult;
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tracks).post(create_track))
        .route(
            "/{id}",
            get(get_track).put(update_track).delete(delete_track),
        )
}

/// `GET /api/tracks`
async fn list_tracks(
    State(state): State<AppState>,
    _staff: CurrentStaff,
) -> ApiResult<Json<Vec<Track>>> {
    let tracks = state.db.tracks().list().await?;
    Ok(Json(tracks))
}

/// `GET /api/tracks/{id}`
async fn get_track(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Track>> {
    let track = state.db.tracks().get(id).await?;
    Ok(Json(track))
}

/// `POST /api/tracks`
async fn create_track(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<TrackInput>,
) -> ApiResult<(StatusCode, Json<Track>)> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;

    let track = state.db.tracks().create(&input).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "track",
            track.id,
            serde_json::to_value(&track).ok(),
            format!("Created track: {}", track.name),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(track)))
}

/// `PUT /api/tracks/{id}`
async fn update_track(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<TrackInput>,
) -> ApiResult<Json<Track>> {
    require(&ctx, Capability::ManagePrices)?;

    input.name = validation::validate_name(&input.name, "name")?;

    let old = state.db.tracks().get(id).await?;
    let track = state.db.tracks().update(id, &input).await?;

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "track",
            track.id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&track).ok(),
            format!("Updated track: {}", track.name),
        ),
    )
    .await;

    Ok(Json(track))
}

/// `DELETE /api/tracks/{id}`
async fn delete_track(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManagePrices)?;

    let old = state.db.tracks().get(id).await?;
    state.db.tracks().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "track",
            id,
            serde_json::to_value(&old).ok(),
            format!("Deleted track: {}", old.name),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
