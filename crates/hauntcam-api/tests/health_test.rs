//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;
use hauntcam_core::model::GameMode;

#[tokio::test]
async fn test_health_reports_version_and_scenario_hash() {
    let (state, _mocks) = common::build_test_app(GameMode::ItemCatalog);

    let (status, json) = common::get_json(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["scenario_version"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_scenario_chapters_are_served() {
    let (state, _mocks) = common::build_test_app(GameMode::ItemCatalog);

    let (status, json) = common::get_json(&state, "/api/v1/scenario/chapters/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Room 3");
}
