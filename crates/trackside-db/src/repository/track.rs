//! # Track Repository
//!
//! CRUD for the physical RC tracks. Cars and packages reference tracks
//! with `ON DELETE SET NULL`; sale lines carry no foreign key at all, so
//! deleting a track never touches history.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::Track;

use crate::error::{DbError, DbResult};
use crate::repository::default_true;

/// Fields accepted when creating or updating a track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Repository for track catalog operations.
#[derive(Debug, Clone)]
pub struct TrackRepository {
    pool: PgPool,
}

impl TrackRepository {
    /// Creates a new TrackRepository.
    pub fn new(pool: PgPool) -> Self {
        TrackRepository { pool }
    }

    /// Lists all tracks alphabetically.
    pub async fn list(&self) -> DbResult<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM tracks
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tracks)
    }

    /// Gets a track by ID.
    pub async fn get(&self, id: Uuid) -> DbResult<Track> {
        let track = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM tracks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        track.ok_or_else(|| DbError::not_found("Track", id))
    }

    /// Creates a track.
    pub async fn create(&self, input: &TrackInput) -> DbResult<Track> {
        let id = Uuid::new_v4();
        debug!(track_id = %id, name = %input.name, "Creating track");

        let track = sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (id, name, description, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(track)
    }

    /// Updates a track. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &TrackInput) -> DbResult<Track> {
        debug!(track_id = %id, "Updating track");

        let track = sqlx::query_as::<_, Track>(
            r#"
            UPDATE tracks
            SET name = $1, description = $2, is_active = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        track.ok_or_else(|| DbError::not_found("Track", id))
    }

    /// Deletes a track.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(track_id = %id, "Deleting track");

        let result = sqlx::query("DELETE FROM tracks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Track", id));
        }
        Ok(())
    }
}
