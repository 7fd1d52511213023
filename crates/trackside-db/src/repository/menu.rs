//! # Menu Item Repository
//!
//! CRUD for the café menu. `tax_rate` is basis points and is applied
//! only when an item is sold directly, never on package expansions.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{MenuItem, Money, TaxRate};

use crate::error::{DbError, DbResult};
use crate::repository::default_true;

/// Fields accepted when creating or updating a menu item.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    pub category: String,
    pub price: Money,
    #[serde(default)]
    pub tax_rate: TaxRate,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Repository for menu catalog operations.
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: PgPool,
}

impl MenuItemRepository {
    /// Creates a new MenuItemRepository.
    pub fn new(pool: PgPool) -> Self {
        MenuItemRepository { pool }
    }

    /// Lists all menu items grouped by category.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, category, price, tax_rate, description,
                   is_active, created_at, updated_at
            FROM menu_items
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a menu item by ID.
    pub async fn get(&self, id: Uuid) -> DbResult<MenuItem> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, category, price, tax_rate, description,
                   is_active, created_at, updated_at
            FROM menu_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("Menu item", id))
    }

    /// Creates a menu item.
    pub async fn create(&self, input: &MenuItemInput) -> DbResult<MenuItem> {
        let id = Uuid::new_v4();
        debug!(menu_item_id = %id, name = %input.name, "Creating menu item");

        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_items (id, name, category, price, tax_rate, description, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, category, price, tax_rate, description,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.tax_rate)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Updates a menu item. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &MenuItemInput) -> DbResult<MenuItem> {
        debug!(menu_item_id = %id, "Updating menu item");

        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items
            SET name = $1, category = $2, price = $3, tax_rate = $4,
                description = $5, is_active = $6, updated_at = now()
            WHERE id = $7
            RETURNING id, name, category, price, tax_rate, description,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.tax_rate)
        .bind(&input.description)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("Menu item", id))
    }

    /// Deletes a menu item. Package configurations referencing it are
    /// removed by cascade; historical sale lines keep their snapshots.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(menu_item_id = %id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }
        Ok(())
    }
}
