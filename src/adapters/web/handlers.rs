//! HTTP request handlers for the web query surface.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domain::returns::{ReturnObservation, holding_returns};
use crate::domain::trade::JoinedTrade;

use super::{AppState, WebError};

#[derive(Debug, Serialize)]
pub struct MemberEntry {
    pub member: String,
}

/// Distinct filers, ordered by (last name, first name).
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberEntry>>, WebError> {
    let mut filers = state.store.distinct_filers()?;
    filers.sort_by(|a, b| {
        (a.last_name.as_str(), a.first_name.as_str())
            .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
    });
    Ok(Json(
        filers
            .into_iter()
            .map(|f| MemberEntry {
                member: f.full_name(),
            })
            .collect(),
    ))
}

/// One filer's trades joined to exact-date price bars.
pub async fn member_trades(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<JoinedTrade>>, WebError> {
    Ok(Json(state.store.trades_with_prices(&name)?))
}

/// One filer's holding-period returns as of today.
pub async fn member_returns(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ReturnObservation>>, WebError> {
    let as_of = chrono::Local::now().date_naive();
    Ok(Json(holding_returns(state.store.as_ref(), &name, as_of)?))
}

/// One filer's stored biographical document.
pub async fn member_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, WebError> {
    let detail = state
        .store
        .member_detail(&name)?
        .ok_or_else(|| WebError::not_found(format!("no detail stored for {name}")))?;
    let value: Value = serde_json::from_str(&detail)
        .unwrap_or_else(|_| Value::String(detail));
    Ok(Json(value))
}

/// Destructive delete-all: truncates the trade table and resets every
/// progress cursor.
pub async fn delete_trades(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, WebError> {
    state.store.delete_all_trades()?;
    Ok(Json(json!({ "status": "deleted" })))
}
