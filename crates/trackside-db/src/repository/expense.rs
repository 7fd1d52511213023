//! # Expense Repository
//!
//! Operating expenses, keyed by calendar date rather than timestamp.
//! The `date` column is a plain DATE so range filters compare dates
//! directly; `created_at` only breaks ties within a day.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{Expense, ExpenseDetail, Money, PaymentMethod};

use crate::error::{DbError, DbResult};

/// Filters for the expense list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Fields accepted when creating or updating an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub amount: Money,
    pub payment_method: Option<PaymentMethod>,
    pub receipt_number: Option<String>,
}

/// Repository for expense operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: PgPool) -> Self {
        ExpenseRepository { pool }
    }

    /// Lists expenses with the creator's name joined, newest date first.
    /// Date bounds are inclusive on both ends.
    pub async fn list(&self, filter: &ExpenseFilter) -> DbResult<Vec<ExpenseDetail>> {
        let expenses = sqlx::query_as::<_, ExpenseDetail>(
            r#"
            SELECT e.id, e.date, e.category, e.description, e.amount,
                   e.payment_method, e.receipt_number, e.created_by, e.created_at,
                   st.full_name AS created_by_name
            FROM expenses e
            LEFT JOIN staff st ON e.created_by = st.id
            WHERE ($1::date IS NULL OR e.date >= $1)
              AND ($2::date IS NULL OR e.date <= $2)
              AND ($3::text IS NULL OR e.category = $3)
            ORDER BY e.date DESC, e.created_at DESC
            "#,
        )
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(&filter.category)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Gets one expense with the creator's name joined.
    pub async fn get_detail(&self, id: Uuid) -> DbResult<ExpenseDetail> {
        let expense = sqlx::query_as::<_, ExpenseDetail>(
            r#"
            SELECT e.id, e.date, e.category, e.description, e.amount,
                   e.payment_method, e.receipt_number, e.created_by, e.created_at,
                   st.full_name AS created_by_name
            FROM expenses e
            LEFT JOIN staff st ON e.created_by = st.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        expense.ok_or_else(|| DbError::not_found("Expense", id))
    }

    /// Creates an expense recorded against the acting staff member.
    pub async fn create(&self, input: &ExpenseInput, created_by: Uuid) -> DbResult<ExpenseDetail> {
        let id = Uuid::new_v4();
        debug!(expense_id = %id, category = %input.category, amount = %input.amount, "Creating expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, date, category, description, amount,
                                  payment_method, receipt_number, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(input.date)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.amount)
        .bind(input.payment_method)
        .bind(&input.receipt_number)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        self.get_detail(id).await
    }

    /// Updates an expense. Returns `NotFound` when the ID does not exist.
    pub async fn update(&self, id: Uuid, input: &ExpenseInput) -> DbResult<ExpenseDetail> {
        debug!(expense_id = %id, "Updating expense");

        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET date = $1, category = $2, description = $3, amount = $4,
                payment_method = $5, receipt_number = $6
            WHERE id = $7
            "#,
        )
        .bind(input.date)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.amount)
        .bind(input.payment_method)
        .bind(&input.receipt_number)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        self.get_detail(id).await
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(expense_id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }
        Ok(())
    }
}
