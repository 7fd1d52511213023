//! # Customer Repository
//!
//! Customer records with search and visit history. Phone numbers are
//! unique; the violation surfaces as `DbError::UniqueViolation` and the
//! API maps it to a 400.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{Customer, CustomerDetail, CustomerVisit};

use crate::error::{DbError, DbResult};

/// How many past sales the detail view shows.
const VISIT_HISTORY_LIMIT: i64 = 10;

/// Fields accepted when creating or updating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: PgPool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists customers, newest first. With a search term, matches
    /// name/phone/email as a case-insensitive substring.
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, email, address, notes, created_at, updated_at
            FROM customers
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR phone ILIKE '%' || $1 || '%'
                   OR email ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer with their recent visit history.
    pub async fn get_detail(&self, id: Uuid) -> DbResult<CustomerDetail> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, email, address, notes, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", id))?;

        let visit_history = sqlx::query_as::<_, CustomerVisit>(
            r#"
            SELECT id, sale_number, final_amount, created_at
            FROM sales
            WHERE customer_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(id)
        .bind(VISIT_HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(CustomerDetail {
            customer,
            visit_history,
        })
    }

    /// Creates a customer.
    pub async fn create(&self, input: &CustomerInput) -> DbResult<Customer> {
        let id = Uuid::new_v4();
        debug!(customer_id = %id, "Creating customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, name, phone, email, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, phone, email, address, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Updates a customer. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &CustomerInput) -> DbResult<Customer> {
        debug!(customer_id = %id, "Updating customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $1, phone = $2, email = $3, address = $4, notes = $5,
                updated_at = now()
            WHERE id = $6
            RETURNING id, name, phone, email, address, notes, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        customer.ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Deletes a customer. Their sales survive with `customer_id` nulled.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(customer_id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }
        Ok(())
    }
}
