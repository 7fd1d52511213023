//! # Service Repository
//!
//! CRUD for the sellable service catalog (track sessions, car rentals).
//! Sale lines snapshot the price at checkout, so edits and deletions
//! here never rewrite history.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{Money, Service, ServiceKind};

use crate::error::{DbError, DbResult};
use crate::repository::default_true;

/// Fields accepted when creating or updating a service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub kind: ServiceKind,
    pub description: Option<String>,
    pub base_price: Money,
    pub duration_minutes: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Repository for service catalog operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: PgPool) -> Self {
        ServiceRepository { pool }
    }

    /// Lists all services, newest first.
    pub async fn list(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, kind, description, base_price, duration_minutes,
                   is_active, created_at, updated_at
            FROM services
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Gets a service by ID.
    pub async fn get(&self, id: Uuid) -> DbResult<Service> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, kind, description, base_price, duration_minutes,
                   is_active, created_at, updated_at
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        service.ok_or_else(|| DbError::not_found("Service", id))
    }

    /// Creates a service.
    pub async fn create(&self, input: &ServiceInput) -> DbResult<Service> {
        let id = Uuid::new_v4();
        debug!(service_id = %id, name = %input.name, "Creating service");

        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (id, name, kind, description, base_price, duration_minutes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, kind, description, base_price, duration_minutes,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.kind)
        .bind(&input.description)
        .bind(input.base_price)
        .bind(input.duration_minutes)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    /// Updates a service. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &ServiceInput) -> DbResult<Service> {
        debug!(service_id = %id, "Updating service");

        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET name = $1, kind = $2, description = $3, base_price = $4,
                duration_minutes = $5, is_active = $6, updated_at = now()
            WHERE id = $7
            RETURNING id, name, kind, description, base_price, duration_minutes,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.kind)
        .bind(&input.description)
        .bind(input.base_price)
        .bind(input.duration_minutes)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        service.ok_or_else(|| DbError::not_found("Service", id))
    }

    /// Deletes a service. Historical sale lines keep their snapshots.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(service_id = %id, "Deleting service");

        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }
        Ok(())
    }
}
