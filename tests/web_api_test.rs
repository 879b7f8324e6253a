//! Web query-surface tests.
//!
//! Exercises the JSON API against an in-memory store: member listing order,
//! joined trades, stored detail documents, and the destructive delete-all.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use housewatch::adapters::sqlite_store::SqliteStore;
use housewatch::adapters::web::{AppState, build_router};
use housewatch::ports::store_port::TradeStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    store.ensure_schema().unwrap();
    store
        .append_trades(&[
            make_trade("Ann", "Zimmer", "XYZ", date(2023, 1, 10), "purchase", "$1,000"),
            make_trade("Walter", "Abbott", "ABC", date(2023, 1, 11), "sale", "$2,000"),
        ])
        .unwrap();
    store
        .upsert_bars(&[make_bar("XYZ", date(2023, 1, 10), 10.0)])
        .unwrap();
    store
        .store_member_detail("Ann Zimmer", r#"{"district":"OH-01"}"#)
        .unwrap();
    store.set_cursor("members", "Walter Abbott").unwrap();
    store
}

fn app(store: SqliteStore) -> Router {
    build_router(AppState {
        store: Arc::new(store),
    })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn members_listed_by_last_name_first_name() {
    let (status, body) = get_json(app(seeded_store()), "/api/members").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([
            { "member": "Walter Abbott" },
            { "member": "Ann Zimmer" },
        ])
    );
}

#[tokio::test]
async fn member_trades_include_join_and_parsed_amount() {
    let (status, body) = get_json(app(seeded_store()), "/api/members/Ann%20Zimmer/trades").await;
    assert_eq!(status, StatusCode::OK);
    let trades = body.as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["symbol"], "XYZ");
    assert_eq!(trades[0]["buy_price"], 10.0);
    assert_eq!(trades[0]["parsed_amount"], 1000.0);
}

#[tokio::test]
async fn member_detail_roundtrips_the_stored_document() {
    let (status, body) = get_json(app(seeded_store()), "/api/members/Ann%20Zimmer/detail").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["district"], "OH-01");
}

#[tokio::test]
async fn missing_member_detail_is_404() {
    let (status, _body) =
        get_json(app(seeded_store()), "/api/members/Walter%20Abbott/detail").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn member_returns_for_unknown_member_is_empty() {
    let (status, body) = get_json(app(seeded_store()), "/api/members/Nobody%20Here/returns").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn delete_trades_truncates_and_resets_cursors() {
    let store = Arc::new(seeded_store());
    let app = build_router(AppState {
        store: store.clone(),
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/admin/delete-trades")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(store.get_cursor("members").unwrap(), None);

    let (status, body) = get_json(app, "/api/members").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}
