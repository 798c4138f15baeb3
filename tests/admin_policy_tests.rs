// SPDX-License-Identifier: MIT

//! Admin gating tests for mutating routes.
//!
//! Non-admin principals must receive 403 from every members/schedule/
//! attendance mutation, before any database access happens (the mock
//! database would error with 500 if it were reached).

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn send_as(
    app: axum::Router,
    token: &str,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> StatusCode {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn test_non_admin_cannot_mutate_members() {
    let (_, state) = common::create_test_app();
    let token = common::create_member_jwt(&state);

    let cases = [
        (
            Method::POST,
            "/api/members",
            serde_json::json!({"name": "X", "email": "x@example.com"}),
        ),
        (
            Method::PUT,
            "/api/members/m1",
            serde_json::json!({"name": "X", "email": "x@example.com", "status": "Active"}),
        ),
        (Method::POST, "/api/members/m1/renew", serde_json::json!({})),
        (Method::DELETE, "/api/members/m1", serde_json::json!({})),
    ];

    for (method, uri, body) in cases {
        let (app, _) = common::create_test_app();
        let status = send_as(app, &token, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_non_admin_cannot_mutate_schedule_or_attendance() {
    let (_, state) = common::create_test_app();
    let token = common::create_member_jwt(&state);

    let cases = [
        (
            Method::POST,
            "/api/schedule",
            serde_json::json!({
                "class_name": "Yoga",
                "trainer_name": "Alice",
                "date_time": "2024-06-15T18:30"
            }),
        ),
        (Method::DELETE, "/api/schedule/c1", serde_json::json!({})),
        (
            Method::POST,
            "/api/attendance",
            serde_json::json!({
                "user_id": "m1",
                "class_id": "c1",
                "date": "2024-01-01",
                "status": "Present"
            }),
        ),
        (
            Method::PUT,
            "/api/attendance/a1",
            serde_json::json!({"status": "Absent"}),
        ),
        (Method::DELETE, "/api/attendance/a1", serde_json::json!({})),
    ];

    for (method, uri, body) in cases {
        let (app, _) = common::create_test_app();
        let status = send_as(app, &token, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_admin_mutation_reaches_database() {
    // The admin passes the policy check and the request proceeds to the
    // (offline) database, which reports an internal error - not 403.
    let (app, state) = common::create_test_app();
    let token = common::create_admin_jwt(&state);

    let status = send_as(
        app,
        &token,
        Method::POST,
        "/api/members",
        serde_json::json!({"name": "Test User", "email": "t@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
