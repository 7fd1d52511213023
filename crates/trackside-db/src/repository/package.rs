//! # Package Repository
//!
//! CRUD for bundles: one base price covering track/car time plus a set
//! of configured menu items. The package row and its configuration rows
//! are always written in one transaction; update replaces the
//! configuration set wholesale.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{Money, Package, PackageDetail, PackageMenuItem};

use crate::error::{DbError, DbResult};
use crate::repository::{default_quantity, default_true};

/// Column list shared by every package query.
const PACKAGE_COLUMNS: &str = r#"
    id, name, description, base_price, track_id, car_id,
    duration_minutes, is_active, created_at, updated_at
"#;

/// One configured menu item in a package input.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageItemInput {
    pub menu_item_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Fields accepted when creating or updating a package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageInput {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Money,
    pub track_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub menu_items: Vec<PackageItemInput>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Configured-item row fetched across several packages at once.
#[derive(sqlx::FromRow)]
struct PackageItemRow {
    package_id: Uuid,
    menu_item_id: Uuid,
    quantity: i32,
    name: Option<String>,
    price: Option<Money>,
    category: Option<String>,
}

impl From<PackageItemRow> for PackageMenuItem {
    fn from(row: PackageItemRow) -> Self {
        PackageMenuItem {
            menu_item_id: row.menu_item_id,
            quantity: row.quantity,
            name: row.name,
            price: row.price,
            category: row.category,
        }
    }
}

/// Repository for package catalog operations.
#[derive(Debug, Clone)]
pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    /// Creates a new PackageRepository.
    pub fn new(pool: PgPool) -> Self {
        PackageRepository { pool }
    }

    /// Lists all packages with their configured menu items, newest first.
    pub async fn list(&self) -> DbResult<Vec<PackageDetail>> {
        let sql = format!("SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY created_at DESC");
        let packages = sqlx::query_as::<_, Package>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = packages.iter().map(|p| p.id).collect();
        let mut items = self.items_for(&ids).await?;

        Ok(packages
            .into_iter()
            .map(|package| {
                let menu_items = items.remove(&package.id).unwrap_or_default();
                PackageDetail {
                    package,
                    menu_items,
                }
            })
            .collect())
    }

    /// Gets a package with its configured menu items.
    pub async fn get_detail(&self, id: Uuid) -> DbResult<PackageDetail> {
        let sql = format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1");
        let package = sqlx::query_as::<_, Package>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Package", id))?;

        let mut items = self.items_for(&[id]).await?;
        Ok(PackageDetail {
            package,
            menu_items: items.remove(&id).unwrap_or_default(),
        })
    }

    /// Creates a package and its menu-item configuration in one transaction.
    pub async fn create(&self, input: &PackageInput) -> DbResult<PackageDetail> {
        let id = Uuid::new_v4();
        debug!(package_id = %id, name = %input.name, "Creating package");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO packages (id, name, description, base_price, track_id, car_id,
                                  duration_minutes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.base_price)
        .bind(input.track_id)
        .bind(input.car_id)
        .bind(input.duration_minutes)
        .bind(input.is_active)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, id, &input.menu_items).await?;

        tx.commit().await?;

        self.get_detail(id).await
    }

    /// Updates a package, replacing its configuration set, in one
    /// transaction. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &PackageInput) -> DbResult<PackageDetail> {
        debug!(package_id = %id, "Updating package");

        let mut tx = self.pool.begin().await?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE packages
            SET name = $1, description = $2, base_price = $3, track_id = $4,
                car_id = $5, duration_minutes = $6, is_active = $7, updated_at = now()
            WHERE id = $8
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.base_price)
        .bind(input.track_id)
        .bind(input.car_id)
        .bind(input.duration_minutes)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(DbError::not_found("Package", id));
        }

        sqlx::query("DELETE FROM package_menu_items WHERE package_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_items(&mut tx, id, &input.menu_items).await?;

        tx.commit().await?;

        self.get_detail(id).await
    }

    /// Deletes a package. Configuration rows go with it by cascade;
    /// historical sale lines keep their snapshots.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(package_id = %id, "Deleting package");

        let result = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Package", id));
        }
        Ok(())
    }

    /// Fetches configured items for a set of packages, grouped by package.
    async fn items_for(&self, ids: &[Uuid]) -> DbResult<HashMap<Uuid, Vec<PackageMenuItem>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PackageItemRow>(
            r#"
            SELECT pmi.package_id, pmi.menu_item_id, pmi.quantity,
                   mi.name, mi.price, mi.category
            FROM package_menu_items pmi
            LEFT JOIN menu_items mi ON pmi.menu_item_id = mi.id
            WHERE pmi.package_id = ANY($1)
            ORDER BY mi.category, mi.name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<PackageMenuItem>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.package_id)
                .or_default()
                .push(row.into());
        }
        Ok(grouped)
    }
}

/// Inserts package configuration rows inside the caller's transaction.
async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    package_id: Uuid,
    items: &[PackageItemInput],
) -> DbResult<()> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO package_menu_items (package_id, menu_item_id, quantity)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(package_id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
