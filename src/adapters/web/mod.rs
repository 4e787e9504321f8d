//! Web server adapter.
//!
//! Axum JSON API exposing trade CRUD, CSV import, and the aggregate summary
//! over a [`TradeStore`].

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ports::trade_store::TradeStore;

pub struct AppState {
    pub store: Arc<dyn TradeStore + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    // Single-user deployments run the frontend from anywhere, so CORS is
    // wide open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/trades",
            get(handlers::list_trades).post(handlers::create_trade),
        )
        .route("/api/trades/import", post(handlers::import_csv))
        .route(
            "/api/trades/{id}",
            get(handlers::get_trade)
                .put(handlers::update_trade)
                .delete(handlers::delete_trade),
        )
        .route("/api/summary", get(handlers::get_summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}
