//! # Sale Repository
//!
//! The transactional sale writer plus sale history reads.
//!
//! ## Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Sale = One Transaction                          │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── Load catalog snapshot (services, packages+items, menu items)     │
//! │    │        referenced by the request, via `= ANY($ids)`                │
//! │    │                                                                    │
//! │    ├── price_sale() in trackside-core (pure, integer money)             │
//! │    │        missing catalog id → error → ROLLBACK, nothing written      │
//! │    │                                                                    │
//! │    ├── Generate sale number  SALE-YYYYMMDD-NNNN                         │
//! │    │                                                                    │
//! │    ├── INSERT sales header                                              │
//! │    ├── INSERT sale_services lines                                       │
//! │    ├── INSERT sale_packages lines                                       │
//! │    └── INSERT sale_menu_items lines (direct + package expansions)       │
//! │    │                                                                    │
//! │  COMMIT                                                                 │
//! │    │                                                                    │
//! │    └── sale_number UNIQUE conflict? → retry the WHOLE transaction       │
//! │        with a fresh number, up to SALE_NUMBER_ATTEMPTS times            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Audit and notification events are queued by the caller after commit;
//! this repository never touches the outbox.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use trackside_core::{
    price_sale, CatalogSnapshot, MenuItemSnapshot, Money, PackageItemSnapshot, PackageSnapshot,
    PaymentMethod, PricedSale, Sale, SaleDetail, SaleMenuLineDetail, SalePackageLineDetail,
    SaleRequest, SaleServiceLineDetail, SaleSummary, ServiceSnapshot, TaxRate,
};

use crate::error::{DbError, DbResult};
use crate::repository::day_range;

/// How many times a sale-number collision is retried before giving up.
const SALE_NUMBER_ATTEMPTS: u32 = 5;

/// The unique constraint backing sale-number generation.
const SALE_NUMBER_CONSTRAINT: &str = "sales_sale_number_key";

/// Transactions slower than this are logged, not aborted.
const SLOW_TRANSACTION_WARN: Duration = Duration::from_secs(5);

/// Sale history list cap.
const LIST_LIMIT: i64 = 100;

/// Filters for the sale history list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleListFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
}

/// Header row joined with customer contact and staff name.
#[derive(sqlx::FromRow)]
struct SaleHeaderRow {
    #[sqlx(flatten)]
    sale: Sale,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_email: Option<String>,
    staff_name: Option<String>,
}

/// Repository for sale operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: PgPool) -> Self {
        SaleRepository { pool }
    }

    /// Creates a sale: catalog snapshot, pricing, header, and every line
    /// inside one transaction.
    ///
    /// ## Arguments
    /// * `req` - The validated sale request
    /// * `payment_method` - Already extracted by `validate_sale_request`
    /// * `staff_id` - The authenticated seller
    ///
    /// ## Errors
    /// * `DbError::Core` - A referenced catalog ID does not exist; the
    ///   transaction is rolled back and no rows survive
    /// * `DbError::UniqueViolation` - Sale-number collisions persisted
    ///   through every retry attempt
    pub async fn create(
        &self,
        req: &SaleRequest,
        payment_method: PaymentMethod,
        staff_id: Uuid,
    ) -> DbResult<SaleDetail> {
        let started = Instant::now();

        let mut attempt: u32 = 1;
        let sale_id = loop {
            match self.try_create(req, payment_method, staff_id, attempt).await {
                Ok(id) => break id,
                Err(err)
                    if attempt < SALE_NUMBER_ATTEMPTS
                        && err.is_unique_violation(SALE_NUMBER_CONSTRAINT) =>
                {
                    warn!(attempt, "Sale number collision; retrying sale transaction");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        };

        let elapsed = started.elapsed();
        if elapsed > SLOW_TRANSACTION_WARN {
            warn!(
                sale_id = %sale_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow sale transaction"
            );
        }

        self.get_detail(sale_id).await
    }

    /// One attempt at the sale transaction. Any error drops the
    /// transaction handle, which rolls everything back.
    async fn try_create(
        &self,
        req: &SaleRequest,
        payment_method: PaymentMethod,
        staff_id: Uuid,
        attempt: u32,
    ) -> DbResult<Uuid> {
        let mut tx = self.pool.begin().await?;

        let catalog = load_catalog(&mut tx, req).await?;
        let priced = price_sale(req, &catalog)?;

        let sale_number = next_sale_number(&mut tx, attempt).await?;
        let sale_id = Uuid::new_v4();

        debug!(
            sale_id = %sale_id,
            sale_number = %sale_number,
            final_amount = %priced.final_amount,
            "Inserting sale"
        );

        sqlx::query(
            r#"
            INSERT INTO sales (id, sale_number, customer_id, staff_id,
                               total_amount, discount_amount, tax_amount, final_amount,
                               payment_method, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(sale_id)
        .bind(&sale_number)
        .bind(req.customer_id)
        .bind(staff_id)
        .bind(priced.total_amount)
        .bind(priced.discount_amount)
        .bind(priced.tax_amount)
        .bind(priced.final_amount)
        .bind(payment_method)
        .bind(&req.notes)
        .execute(&mut *tx)
        .await?;

        insert_lines(&mut tx, sale_id, &priced).await?;

        tx.commit().await?;
        Ok(sale_id)
    }

    /// Lists recent sales with customer/staff names joined, newest first.
    pub async fn list(&self, filter: &SaleListFilter) -> DbResult<Vec<SaleSummary>> {
        let (from, to) = day_range(filter.start_date, filter.end_date);

        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id, s.sale_number, s.customer_id, s.staff_id,
                   s.total_amount, s.discount_amount, s.tax_amount, s.final_amount,
                   s.payment_method, s.notes, s.created_at,
                   c.name AS customer_name, c.phone AS customer_phone,
                   st.full_name AS staff_name
            FROM sales s
            LEFT JOIN customers c ON s.customer_id = c.id
            LEFT JOIN staff st ON s.staff_id = st.id
            WHERE ($1::timestamptz IS NULL OR s.created_at >= $1)
              AND ($2::timestamptz IS NULL OR s.created_at < $2)
              AND ($3::uuid IS NULL OR s.customer_id = $3)
              AND ($4::uuid IS NULL OR s.staff_id = $4)
            ORDER BY s.created_at DESC
            LIMIT $5
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(filter.customer_id)
        .bind(filter.staff_id)
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets the full sale detail: header, customer contact, and all
    /// three line sets with display names joined.
    pub async fn get_detail(&self, id: Uuid) -> DbResult<SaleDetail> {
        let header = sqlx::query_as::<_, SaleHeaderRow>(
            r#"
            SELECT s.id, s.sale_number, s.customer_id, s.staff_id,
                   s.total_amount, s.discount_amount, s.tax_amount, s.final_amount,
                   s.payment_method, s.notes, s.created_at,
                   c.name AS customer_name, c.phone AS customer_phone,
                   c.email AS customer_email,
                   st.full_name AS staff_name
            FROM sales s
            LEFT JOIN customers c ON s.customer_id = c.id
            LEFT JOIN staff st ON s.staff_id = st.id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))?;

        let services = sqlx::query_as::<_, SaleServiceLineDetail>(
            r#"
            SELECT sl.id, sl.sale_id, sl.service_id, sl.track_id, sl.car_id,
                   sl.quantity, sl.unit_price, sl.discount_amount, sl.total_price,
                   sl.duration_minutes, sl.notes, sl.created_at,
                   sv.name AS service_name, t.name AS track_name,
                   c.name AS car_name, c.model AS car_model
            FROM sale_services sl
            LEFT JOIN services sv ON sl.service_id = sv.id
            LEFT JOIN tracks t ON sl.track_id = t.id
            LEFT JOIN cars c ON sl.car_id = c.id
            WHERE sl.sale_id = $1
            ORDER BY sl.created_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let packages = sqlx::query_as::<_, SalePackageLineDetail>(
            r#"
            SELECT sl.id, sl.sale_id, sl.package_id, sl.track_id, sl.car_id,
                   sl.quantity, sl.unit_price, sl.discount_amount, sl.total_price,
                   sl.created_at,
                   p.name AS package_name, t.name AS track_name, c.name AS car_name
            FROM sale_packages sl
            LEFT JOIN packages p ON sl.package_id = p.id
            LEFT JOIN tracks t ON sl.track_id = t.id
            LEFT JOIN cars c ON sl.car_id = c.id
            WHERE sl.sale_id = $1
            ORDER BY sl.created_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let menu_items = sqlx::query_as::<_, SaleMenuLineDetail>(
            r#"
            SELECT sl.id, sl.sale_id, sl.menu_item_id, sl.quantity, sl.unit_price,
                   sl.discount_amount, sl.tax_rate, sl.tax_amount, sl.total_price,
                   sl.source_package_id, sl.created_at,
                   mi.name AS item_name, mi.category
            FROM sale_menu_items sl
            LEFT JOIN menu_items mi ON sl.menu_item_id = mi.id
            WHERE sl.sale_id = $1
            ORDER BY sl.created_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(SaleDetail {
            sale: header.sale,
            customer_name: header.customer_name,
            customer_phone: header.customer_phone,
            customer_email: header.customer_email,
            staff_name: header.staff_name,
            services,
            packages,
            menu_items,
        })
    }
}

/// Loads price snapshots for every catalog ID the request references.
/// Missing IDs simply stay out of the snapshot; `price_sale` turns them
/// into the error that aborts the transaction.
async fn load_catalog(
    tx: &mut Transaction<'_, Postgres>,
    req: &SaleRequest,
) -> DbResult<CatalogSnapshot> {
    let mut catalog = CatalogSnapshot::default();

    let service_ids: Vec<Uuid> = req.services.iter().map(|l| l.service_id).collect();
    if !service_ids.is_empty() {
        let rows = sqlx::query_as::<_, (Uuid, Money)>(
            "SELECT id, base_price FROM services WHERE id = ANY($1)",
        )
        .bind(&service_ids)
        .fetch_all(&mut **tx)
        .await?;

        for (id, base_price) in rows {
            catalog.services.insert(id, ServiceSnapshot { base_price });
        }
    }

    let menu_ids: Vec<Uuid> = req.menu_items.iter().map(|l| l.menu_item_id).collect();
    if !menu_ids.is_empty() {
        let rows = sqlx::query_as::<_, (Uuid, Money, TaxRate)>(
            "SELECT id, price, tax_rate FROM menu_items WHERE id = ANY($1)",
        )
        .bind(&menu_ids)
        .fetch_all(&mut **tx)
        .await?;

        for (id, price, tax_rate) in rows {
            catalog
                .menu_items
                .insert(id, MenuItemSnapshot { price, tax_rate });
        }
    }

    let package_ids: Vec<Uuid> = req.packages.iter().map(|l| l.package_id).collect();
    if !package_ids.is_empty() {
        let rows = sqlx::query_as::<_, (Uuid, Money)>(
            "SELECT id, base_price FROM packages WHERE id = ANY($1)",
        )
        .bind(&package_ids)
        .fetch_all(&mut **tx)
        .await?;

        for (id, base_price) in rows {
            catalog.packages.insert(
                id,
                PackageSnapshot {
                    base_price,
                    items: Vec::new(),
                },
            );
        }

        // Configured items join their package snapshot for expansion.
        let item_rows = sqlx::query_as::<_, (Uuid, Uuid, i32, Money, TaxRate)>(
            r#"
            SELECT pmi.package_id, pmi.menu_item_id, pmi.quantity, mi.price, mi.tax_rate
            FROM package_menu_items pmi
            JOIN menu_items mi ON pmi.menu_item_id = mi.id
            WHERE pmi.package_id = ANY($1)
            "#,
        )
        .bind(&package_ids)
        .fetch_all(&mut **tx)
        .await?;

        for (package_id, menu_item_id, quantity, unit_price, tax_rate) in item_rows {
            if let Some(snapshot) = catalog.packages.get_mut(&package_id) {
                snapshot.items.push(PackageItemSnapshot {
                    menu_item_id,
                    quantity,
                    unit_price,
                    tax_rate,
                });
            }
        }
    }

    Ok(catalog)
}

/// Inserts every priced line for the sale inside the transaction.
async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    sale_id: Uuid,
    priced: &PricedSale,
) -> DbResult<()> {
    for line in &priced.service_lines {
        sqlx::query(
            r#"
            INSERT INTO sale_services (id, sale_id, service_id, track_id, car_id,
                                       quantity, unit_price, discount_amount, total_price,
                                       duration_minutes, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale_id)
        .bind(line.service_id)
        .bind(line.track_id)
        .bind(line.car_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.discount_amount)
        .bind(line.total_price)
        .bind(line.duration_minutes)
        .bind(&line.notes)
        .execute(&mut **tx)
        .await?;
    }

    for line in &priced.package_lines {
        sqlx::query(
            r#"
            INSERT INTO sale_packages (id, sale_id, package_id, track_id, car_id,
                                       quantity, unit_price, discount_amount, total_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale_id)
        .bind(line.package_id)
        .bind(line.track_id)
        .bind(line.car_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.discount_amount)
        .bind(line.total_price)
        .execute(&mut **tx)
        .await?;
    }

    for line in &priced.menu_lines {
        sqlx::query(
            r#"
            INSERT INTO sale_menu_items (id, sale_id, menu_item_id, quantity, unit_price,
                                         discount_amount, tax_rate, tax_amount, total_price,
                                         source_package_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale_id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.discount_amount)
        .bind(line.tax_rate)
        .bind(line.tax_amount)
        .bind(line.total_price)
        .bind(line.source_package_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Generates the next sale number for today inside the transaction.
///
/// The sequence is today's sale count plus the attempt number, so a
/// collision (two checkouts counting the same total) lands on a fresh
/// number on retry. The UNIQUE constraint remains the actual guarantee.
async fn next_sale_number(tx: &mut Transaction<'_, Postgres>, attempt: u32) -> DbResult<String> {
    let today = Utc::now().date_naive();
    let midnight = crate::repository::day_start(today);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE created_at >= $1")
        .bind(midnight)
        .fetch_one(&mut **tx)
        .await?;

    Ok(format_sale_number(today, count + attempt as i64))
}

/// `SALE-YYYYMMDD-NNNN`, zero-padded to four digits.
fn format_sale_number(date: NaiveDate, seq: i64) -> String {
    format!("SALE-{}-{:04}", date.format("%Y%m%d"), seq)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sale_number() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_sale_number(date, 1), "SALE-20250307-0001");
        assert_eq!(format_sale_number(date, 42), "SALE-20250307-0042");
        // The format survives a day busier than the padding width
        assert_eq!(format_sale_number(date, 12345), "SALE-20250307-12345");
    }

    #[test]
    fn test_list_filter_deserializes_from_query() {
        let filter: SaleListFilter =
            serde_json::from_str(r#"{"start_date": "2025-03-01", "end_date": "2025-03-31"}"#)
                .unwrap();
        assert_eq!(
            filter.start_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert!(filter.customer_id.is_none());
    }
}
