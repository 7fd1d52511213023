//! # Sale Routes
//!
//! Checkout plus sale history. The checkout handler is the busiest path
//! in the system: validate, price and write in one transaction, then
//! queue the audit and notification events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use trackside_core::pricing::SaleRequest;
use trackside_core::validation::validate_sale_request;
use trackside_core::{AuditEvent, Capability, NotificationEvent, SaleDetail, SaleSummary};
use trackside_db::SaleListFilter;

use crate::auth::{require, CurrentStaff};
use crate::error::{ApiError, ApiResult};
use crate::events::{queue_audit, queue_notification};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/{id}", get(get_sale))
}

/// `POST /api/sales`, the checkout path.
///
/// Validation runs before anything touches the database. Pricing and all
/// row writes happen inside one transaction in the repository; any
/// failure in there (a missing catalog id included) rolls back and
/// surfaces as a 500 carrying the raw error message.
async fn create_sale(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(req): Json<SaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleDetail>)> {
    require(&ctx, Capability::MakeSale)?;

    let payment_method = validate_sale_request(&req)?;

    let sale = state
        .db
        .sales()
        .create(&req, payment_method, ctx.staff_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(
        sale_number = %sale.sale.sale_number,
        final_amount = %sale.sale.final_amount,
        "Sale completed"
    );

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "sale",
            sale.sale.id,
            serde_json::to_value(&sale.sale).ok(),
            format!("Sale {} completed", sale.sale.sale_number),
        ),
    )
    .await;

    queue_notification(
        &state.db,
        NotificationEvent {
            subject: format!("New Sale: {}", sale.sale.sale_number),
            body: format!(
                "Sale {} recorded by {}. Total: {}",
                sale.sale.sale_number, ctx.full_name, sale.sale.final_amount
            ),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(sale)))
}

/// `GET /api/sales`: sale history, newest first, capped at 100 rows.
async fn list_sales(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(filter): Query<SaleListFilter>,
) -> ApiResult<Json<Vec<SaleSummary>>> {
    let sales = state.db.sales().list(&filter).await?;
    Ok(Json(sales))
}

/// `GET /api/sales/{id}`: header plus every line with display names.
async fn get_sale(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SaleDetail>> {
    let sale = state.db.sales().get_detail(id).await?;
    Ok(Json(sale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackside_core::Money;

    #[test]
    fn test_sale_request_wire_shape() {
        // What the till actually posts: omitted collections default to
        // empty, omitted discounts to zero.
        let req: SaleRequest = serde_json::from_str(
            r#"{
                "payment_method": "cash",
                "services": [
                    {"service_id": "7f2c1e4a-9cf6-4f7e-aaaa-000000000001", "quantity": 2}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(req.services.len(), 1);
        assert!(req.packages.is_empty());
        assert!(req.menu_items.is_empty());
        assert_eq!(req.discount_amount, Money::zero());
        assert_eq!(req.services[0].quantity, 2);
        assert_eq!(req.services[0].discount_amount, Money::zero());
    }

    #[test]
    fn test_list_filter_accepts_query_dates() {
        let filter: SaleListFilter =
            serde_json::from_str(r#"{"start_date": "2025-03-01", "end_date": "2025-03-31"}"#)
                .unwrap();
        assert!(filter.start_date.is_some());
        assert!(filter.customer_id.is_none());
    }
}
