use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use larder_api::{app, AppState};
use larder_core::paths::DataPaths;
use serde_json::Value;
use tower::ServiceExt;

fn router_for(root: &std::path::Path) -> axum::Router {
    app(Arc::new(AppState {
        paths: DataPaths::new(root),
    }))
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).expect("body was not JSON");
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(router_for(dir.path()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn forecast_is_not_found_without_any_copy() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(router_for(dir.path()), "/forecast").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn forecast_serves_staged_rows() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::create_dir_all(paths.staged_dir()).unwrap();
    fs::write(
        paths.staged_forecast(),
        "ingredient_name,predicted_usage_next_month\nbeef,15.0\ncheese,10.0\n",
    )
    .unwrap();

    let (status, body) = get_json(router_for(dir.path()), "/forecast").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["ingredient_name"], "beef");
    assert_eq!(entries[0]["predicted_usage_next_month"], 15.0);
}

#[tokio::test]
async fn processed_copy_wins_over_staged() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::create_dir_all(paths.staged_dir()).unwrap();
    fs::create_dir_all(paths.processed_dir()).unwrap();
    fs::write(
        paths.staged_forecast(),
        "ingredient_name,predicted_usage_next_month\ncheese,10.0\n",
    )
    .unwrap();
    fs::write(
        paths.processed_dir().join("forecast_ingredients.csv"),
        "ingredient_name,predicted_usage_next_month\ncheese,99.0\n",
    )
    .unwrap();

    let (status, body) = get_json(router_for(dir.path()), "/forecast").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["predicted_usage_next_month"], 99.0);
}

#[tokio::test]
async fn forecast_with_missing_columns_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::create_dir_all(paths.staged_dir()).unwrap();
    fs::write(paths.staged_forecast(), "wrong,columns\na,b\n").unwrap();

    let (status, body) = get_json(router_for(dir.path()), "/forecast").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("missing required columns"));
}

#[tokio::test]
async fn inventory_groups_and_filters_by_month() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::create_dir_all(paths.staged_dir()).unwrap();
    fs::write(
        paths.staged_sales(),
        "month,menu_item,ingredient_name,quantity\n\
         october,Taco,cheese,5.0\n\
         october,Burrito,cheese,2.0\n\
         september,Taco,cheese,1.0\n",
    )
    .unwrap();

    let (status, body) = get_json(router_for(dir.path()), "/inventory?month=October").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["ingredient_name"], "cheese");
    assert_eq!(entries[0]["total_quantity"], 7.0);
    assert_eq!(entries[0]["month"], "october");
}

#[tokio::test]
async fn shipments_serve_nullable_fields() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::create_dir_all(paths.staged_dir()).unwrap();
    fs::write(
        paths.staged_shipments(),
        "ingredient_name,expected_date,arrival_date,quantity,delay_days\n\
         cheese,2024-01-01,2024-01-03,10.0,2\n\
         beef,2024-01-05,,4.0,\n",
    )
    .unwrap();

    let (status, body) = get_json(router_for(dir.path()), "/shipments").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["delay_days"], 2);
    assert!(entries[1]["delay_days"].is_null());
    assert!(entries[1]["arrival_date"].is_null());
}
