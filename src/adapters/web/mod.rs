//! Web query surface.
//!
//! Axum JSON API consumed by the external dashboard: distinct filers, one
//! filer's joined trades+prices, holding-period returns, stored detail
//! documents, and the destructive delete-all.

mod error;
mod handlers;

pub use error::WebError;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::ports::store_port::TradeStore;

pub struct AppState {
    pub store: Arc<dyn TradeStore + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/members", get(handlers::list_members))
        .route("/api/members/{name}/trades", get(handlers::member_trades))
        .route("/api/members/{name}/returns", get(handlers::member_returns))
        .route("/api/members/{name}/detail", get(handlers::member_detail))
        .route("/api/admin/delete-trades", post(handlers::delete_trades))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
