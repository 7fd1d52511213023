//! # HTTP Routes
//!
//! One module per resource, assembled under `/api`.
//!
//! ```text
//! /api
//! ├── /health          liveness (public)
//! ├── /sales           checkout + history
//! ├── /customers       customer records
//! ├── /services        track-time catalog
//! ├── /menu            café catalog
//! ├── /packages        bundle catalog
//! ├── /tracks          physical tracks
//! ├── /cars            rental fleet
//! ├── /expenses        expense ledger
//! ├── /tasks           task board
//! ├── /dashboard       aggregation + daybook
//! └── /audit           audit trail (main admin)
//! ```
//!
//! Everything except `/health` requires a bearer token; per-route
//! capability checks sit at the top of each mutating handler.

pub mod audit;
pub mod cars;
pub mod customers;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod menu;
pub mod packages;
pub mod sales;
pub mod services;
pub mod tasks;
pub mod tracks;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the full application router.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .nest("/sales", sales::router())
        .nest("/customers", customers::router())
        .nest("/services", services::router())
        .nest("/menu", menu::router())
        .nest("/packages", packages::router())
        .nest("/tracks", tracks::router())
        .nest("/cars", cars::router())
        .nest("/expenses", expenses::router())
        .nest("/tasks", tasks::router())
        .nest("/dashboard", dashboard::router())
        .nest("/audit", audit::router());

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
