//! # Expense Routes
//!
//! Viewing and editing are separate capabilities: a manager can be
//! granted read-only access to the ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, ExpenseDetail};
use trackside_db::{ExpenseFilter, ExpenseInput};

use crate::auth::{require, CurrentStaff};
use crate::error::ApiResult;
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/{id}", axum::routing::put(update_expense).delete(delete_expense))
}

fn validate_input(input: &mut ExpenseInput) -> ApiResult<()> {
    input.category = validation::validate_name(&input.category, "category")?;
    validation::validate_amount(input.amount)?;
    Ok(())
}

/// `GET /api/expenses?start_date&end_date&category`
async fn list_expenses(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<Vec<ExpenseDetail>>> {
    require(&ctx, Capability::ViewExpenses)?;

    let expenses = state.db.expenses().list(&filter).await?;
    Ok(Json(expenses))
}

/// `POST /api/expenses`
async fn create_expense(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<ExpenseInput>,
) -> ApiResult<(StatusCode, Json<ExpenseDetail>)> {
    require(&ctx, Capability::EditExpenses)?;
    validate_input(&mut input)?;

    let expense = state.db.expenses().create(&input, ctx.staff_id).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "expense",
            expense.expense.id,
            serde_json::to_value(&expense).ok(),
            format!(
                "Created expense: {} {}",
                expense.expense.category, expense.expense.amount
            ),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// `PUT /api/expenses/{id}`
async fn update_expense(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<ExpenseInput>,
) -> ApiResult<Json<ExpenseDetail>> {
    require(&ctx, Capability::EditExpenses)?;
    validate_input(&mut input)?;

    let old = state.db.expenses().get_detail(id).await?;
    let expense = state.db.expenses().update(id, &input).await?;

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "expense",
            expense.expense.id,
            serde_json::to_value(&old.expense).ok(),
            serde_json::to_value(&expense.expense).ok(),
            format!("Updated expense: {}", expense.expense.category),
        ),
    )
    .await;

    Ok(Json(expense))
}

/// `DELETE /api/expenses/{id}`
async fn delete_expense(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::EditExpenses)?;

    let old = state.db.expenses().get_detail(id).await?;
    state.db.expenses().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "expense",
            id,
            serde_json::to_value(&old.expense).ok(),
            format!(
                "Deleted expense: {} {}",
                old.expense.category, old.expense.amount
            ),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
