// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Two-phase account deletion: stories first, then the account.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use storysync_web::services::QueryKey;
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn delete_request() -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri("/api/profile")
        .header(header::COOKIE, common::session_cookie_header())
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_successful_deletion_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/stories/all"))
        .and(header_matcher("authorization", "Bearer acc-123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/auth/delete"))
        .and(header_matcher("authorization", "Bearer acc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = common::create_test_app(&mock_server.uri());
    let key = QueryKey::UserProfile("u-1".to_string());
    state.cache.set(key.clone(), &common::user_json());

    let response = app.oneshot(delete_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies = common::set_cookie_headers(&response);
    for name in ["user", "access", "refresh"] {
        let cookie = common::find_cookie(&set_cookies, name)
            .unwrap_or_else(|| panic!("missing removal for {name}: {set_cookies:?}"));
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }
    assert!(!state.cache.contains(&key));

    let body = common::body_json(response).await;
    assert_eq!(body["level"], "success");
    assert_eq!(body["message"], "Account deleted successfully");
    assert_eq!(body["redirect"], "/login");
}

#[tokio::test]
async fn test_account_failure_after_stories_keeps_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/stories/all"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/auth/delete"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "database unavailable" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = common::create_test_app(&mock_server.uri());
    let key = QueryKey::UserProfile("u-1".to_string());
    state.cache.set(key.clone(), &common::user_json());

    let response = app.oneshot(delete_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(common::set_cookie_headers(&response).is_empty());
    assert!(state.cache.contains(&key));

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "auth_api_error");
    assert_eq!(body["details"], "database unavailable");
}

#[tokio::test]
async fn test_story_failure_skips_account_deletion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/stories/all"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/auth/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app.oneshot(delete_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(common::set_cookie_headers(&response).is_empty());

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "story_api_error");
    assert_eq!(body["details"], "HTTP 503 Service Unavailable");
}

#[tokio::test]
async fn test_concurrent_deletion_is_rejected() {
    let mock_server = MockServer::start().await;
    let (app, state) = common::create_test_app(&mock_server.uri());

    let _pending = state
        .profile
        .in_flight()
        .begin("u-1", storysync_web::profile::MutationKind::Delete)
        .unwrap();

    let response = app.oneshot(delete_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::body_json(response).await;
    assert_eq!(body["details"], "Account deletion already in progress");
}
