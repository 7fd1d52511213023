//! # Car Repository
//!
//! CRUD for the RC car fleet. The import columns are owner bookkeeping
//! entered as-is; nothing here derives one figure from another.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{Car, Money};

use crate::error::{DbError, DbResult};
use crate::repository::default_true;

/// Column list shared by every car query.
const CAR_COLUMNS: &str = r#"
    id, name, model, track_id,
    china_rate_usd, indian_conversion, shipping_cost, total_cost,
    our_rate, rate_difference, hourly_charge,
    max_minutes, play_minutes, available_units, total_units,
    is_active, created_at, updated_at
"#;

/// Fields accepted when creating or updating a car.
#[derive(Debug, Clone, Deserialize)]
pub struct CarInput {
    pub name: String,
    pub model: Option<String>,
    pub track_id: Option<Uuid>,
    pub china_rate_usd: Option<Money>,
    pub indian_conversion: Option<f64>,
    pub shipping_cost: Option<Money>,
    pub total_cost: Option<Money>,
    pub our_rate: Option<Money>,
    pub rate_difference: Option<Money>,
    pub hourly_charge: Option<Money>,
    pub max_minutes: Option<i32>,
    pub play_minutes: Option<i32>,
    #[serde(default)]
    pub available_units: i32,
    #[serde(default)]
    pub total_units: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Repository for car catalog operations.
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    /// Creates a new CarRepository.
    pub fn new(pool: PgPool) -> Self {
        CarRepository { pool }
    }

    /// Lists cars, optionally restricted to one track.
    pub async fn list(&self, track_id: Option<Uuid>) -> DbResult<Vec<Car>> {
        let sql = format!(
            r#"
            SELECT {CAR_COLUMNS}
            FROM cars
            WHERE ($1::uuid IS NULL OR track_id = $1)
            ORDER BY track_id, name
            "#
        );

        let cars = sqlx::query_as::<_, Car>(&sql)
            .bind(track_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    /// Gets a car by ID.
    pub async fn get(&self, id: Uuid) -> DbResult<Car> {
        let sql = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1");

        let car = sqlx::query_as::<_, Car>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        car.ok_or_else(|| DbError::not_found("Car", id))
    }

    /// Creates a car.
    pub async fn create(&self, input: &CarInput) -> DbResult<Car> {
        let id = Uuid::new_v4();
        debug!(car_id = %id, name = %input.name, "Creating car");

        let sql = format!(
            r#"
            INSERT INTO cars (
                id, name, model, track_id,
                china_rate_usd, indian_conversion, shipping_cost, total_cost,
                our_rate, rate_difference, hourly_charge,
                max_minutes, play_minutes, available_units, total_units,
                is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {CAR_COLUMNS}
            "#
        );

        let car = sqlx::query_as::<_, Car>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.model)
            .bind(input.track_id)
            .bind(input.china_rate_usd)
            .bind(input.indian_conversion)
            .bind(input.shipping_cost)
            .bind(input.total_cost)
            .bind(input.our_rate)
            .bind(input.rate_difference)
            .bind(input.hourly_charge)
            .bind(input.max_minutes)
            .bind(input.play_minutes)
            .bind(input.available_units)
            .bind(input.total_units)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await?;

        Ok(car)
    }

    /// Updates a car. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &CarInput) -> DbResult<Car> {
        debug!(car_id = %id, "Updating car");

        let sql = format!(
            r#"
            UPDATE cars
            SET name = $1, model = $2, track_id = $3,
                china_rate_usd = $4, indian_conversion = $5, shipping_cost = $6,
                total_cost = $7, our_rate = $8, rate_difference = $9,
                hourly_charge = $10, max_minutes = $11, play_minutes = $12,
                available_units = $13, total_units = $14, is_active = $15,
                updated_at = now()
            WHERE id = $16
            RETURNING {CAR_COLUMNS}
            "#
        );

        let car = sqlx::query_as::<_, Car>(&sql)
            .bind(&input.name)
            .bind(&input.model)
            .bind(input.track_id)
            .bind(input.china_rate_usd)
            .bind(input.indian_conversion)
            .bind(input.shipping_cost)
            .bind(input.total_cost)
            .bind(input.our_rate)
            .bind(input.rate_difference)
            .bind(input.hourly_charge)
            .bind(input.max_minutes)
            .bind(input.play_minutes)
            .bind(input.available_units)
            .bind(input.total_units)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        car.ok_or_else(|| DbError::not_found("Car", id))
    }

    /// Deletes a car.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(car_id = %id, "Deleting car");

        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }
        Ok(())
    }
}
