use httpmock::prelude::*;
use serde_json::json;

mod common;
use common::TestApp;

/// Invalid batches must be rejected before any upstream fetch happens.
#[tokio::test]
async fn seven_part_numbers_are_rejected() {
    let server = MockServer::start();
    let upstream = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });
    let app = TestApp::spawn(&server.base_url()).await;

    let response = app
        .post_fetch_images(json!({
            "partNumbers": ["ABC123", "XYZ999", "Q1", "Q2", "Q3", "Q4", "Q5"]
        }))
        .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Maximum 6 part numbers allowed");
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn empty_string_part_number_is_rejected() {
    let server = MockServer::start();
    let upstream = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });
    let app = TestApp::spawn(&server.base_url()).await;

    let response = app
        .post_fetch_images(json!({ "partNumbers": ["ABC123", ""] }))
        .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "All part numbers must be non-empty strings");
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn non_array_part_numbers_field_is_rejected() {
    let server = MockServer::start();
    let app = TestApp::spawn(&server.base_url()).await;

    let response = app
        .post_fetch_images(json!({ "partNumbers": "ABC123" }))
        .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid part numbers provided");
}

#[tokio::test]
async fn missing_part_numbers_field_is_rejected() {
    let server = MockServer::start();
    let app = TestApp::spawn(&server.base_url()).await;

    let response = app.post_fetch_images(json!({})).await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid part numbers provided");
}
