//! # Customer Routes
//!
//! Reads need only authentication so the till can look customers up;
//! mutations need the manage-customers capability.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{AuditEvent, Capability, Customer, CustomerDetail};
use trackside_db::CustomerInput;

use crate::auth::{require, CurrentStaff};
use crate::error::{ApiError, ApiResult};
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

#[derive(Debug, Deserialize)]
struct CustomerListQuery {
    search: Option<String>,
}

/// `GET /api/customers?search=`: substring match on name, phone, email.
async fn list_customers(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<Json<Vec<Customer>>> {
    let search = match query.search.as_deref() {
        Some(raw) => Some(validation::validate_search_query(raw)?),
        None => None,
    };

    let customers = state.db.customers().list(search.as_deref()).await?;
    Ok(Json(customers))
}

/// `GET /api/customers/{id}`: record plus visit history.
async fn get_customer(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CustomerDetail>> {
    let customer = state.db.customers().get_detail(id).await?;
    Ok(Json(customer))
}

/// `POST /api/customers`
async fn create_customer(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<CustomerInput>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    require(&ctx, Capability::ManageCustomers)?;

    input.name = validation::validate_name(&input.name, "name")?;
    input.phone = validation::validate_phone(&input.phone)?;

    let customer = match state.db.customers().create(&input).await {
        Ok(customer) => customer,
        Err(e) if e.is_unique_violation("customers_phone_key") => {
            return Err(ApiError::validation("Phone number already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "customer",
            customer.id,
            serde_json::to_value(&customer).ok(),
            format!("Created customer: {}", customer.name),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// `PUT /api/customers/{id}`
async fn update_customer(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(mut input): Json<CustomerInput>,
) -> ApiResult<Json<Customer>> {
    require(&ctx, Capability::ManageCustomers)?;

    input.name = validation::validate_name(&input.name, "name")?;
    input.phone = validation::validate_phone(&input.phone)?;

    let old = state.db.customers().get_detail(id).await?;

    let customer = match state.db.customers().update(id, &input).await {
        Ok(customer) => customer,
        Err(e) if e.is_unique_violation("customers_phone_key") => {
            return Err(ApiError::validation("Phone number already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "customer",
            customer.id,
            serde_json::to_value(&old.customer).ok(),
            serde_json::to_value(&customer).ok(),
            format!("Updated customer: {}", customer.name),
        ),
    )
    .await;

    Ok(Json(customer))
}

/// `DELETE /api/customers/{id}`
///
/// Historical sales keep their snapshot data; only the customer record
/// goes away.
async fn delete_customer(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManageCustomers)?;

    let old = state.db.customers().get_detail(id).await?;
    state.db.customers().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "customer",
            id,
            serde_json::to_value(&old.customer).ok(),
            format!("Deleted customer: {}", old.customer.name),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
