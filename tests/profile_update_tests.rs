// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile update flow against a mocked auth API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use storysync_web::services::QueryKey;
use storysync_web::models::UserProfile;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn patch_request(cookies: &str, form: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri("/api/profile")
        .header(header::COOKIE, cookies)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(form.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_only_changed_email_is_sent() {
    let mock_server = MockServer::start().await;
    let mut updated = common::user_json();
    updated["email"] = json!("b@x.com");

    Mock::given(method("PATCH"))
        .and(path("/auth/update"))
        .and(header_matcher("authorization", "Bearer acc-123"))
        .and(body_json(json!({ "email": "b@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({
                "username": "ada",
                "email": "b@x.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "birthdate": "1990-05-01",
                "password": "",
                "confirm_password": ""
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The user cookie is rewritten with the server's object
    let set_cookies = common::set_cookie_headers(&response);
    let user_cookie = common::find_cookie(&set_cookies, "user").expect("user cookie rewritten");
    assert_eq!(common::cookie_json(&user_cookie), updated);
    assert!(common::find_cookie(&set_cookies, "access").is_none());

    // The cache holds the server's object too
    let cached: UserProfile = state
        .cache
        .get(&QueryKey::UserProfile("u-1".to_string()))
        .expect("profile cached");
    assert_eq!(cached.email, "b@x.com");

    let body = common::body_json(response).await;
    assert_eq!(body["notice"]["level"], "success");
    assert_eq!(body["notice"]["message"], "Profile updated successfully");
    assert_eq!(body["user"]["email"], "b@x.com");
}

#[tokio::test]
async fn test_unchanged_form_makes_no_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({
                "username": "ada",
                "email": "a@x.com",
                "birthdate": "1990-05-01T00:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::set_cookie_headers(&response).is_empty());

    let body = common::body_json(response).await;
    assert_eq!(body["notice"]["level"], "info");
    assert_eq!(body["notice"]["message"], "No changes to update");
}

#[tokio::test]
async fn test_confirm_password_is_never_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/auth/update"))
        .and(body_json(json!({ "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({ "password": "secret1", "confirm_password": "secret1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_failed_update_leaves_cookies_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/auth/update"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Email already taken" })),
        )
        .mount(&mock_server)
        .await;

    let (app, state) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({ "email": "taken@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(common::set_cookie_headers(&response).is_empty());
    assert!(state.cache.is_empty());

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "auth_api_error");
    assert_eq!(body["details"], "Email already taken");
}

#[tokio::test]
async fn test_validation_failure_is_reported_per_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({
                "email": "not-an-email",
                "password": "secret1",
                "confirm_password": "secret2"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    assert!(body["fields"]["email"].is_array());
    assert_eq!(body["fields"]["confirm_password"][0], "Passwords don't match");
}

#[tokio::test]
async fn test_rejected_token_asks_for_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/auth/update"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({ "first_name": "Augusta" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["details"], "Please log in again");
}

#[tokio::test]
async fn test_missing_access_token_makes_no_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header_for(&common::user_json(), None),
            json!({ "email": "b@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_of_another_user_is_not_cached() {
    let mock_server = MockServer::start().await;
    let mut other = common::user_json();
    other["id"] = json!("u-2");
    other["email"] = json!("other@x.com");

    Mock::given(method("PATCH"))
        .and(path("/auth/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&other))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({ "email": "other@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!state.cache.contains(&QueryKey::UserProfile("u-1".to_string())));
    assert!(!state.cache.contains(&QueryKey::UserProfile("u-2".to_string())));
    assert!(!state
        .profile
        .in_flight()
        .is_pending("u-1", storysync_web::profile::MutationKind::Update));
}

#[tokio::test]
async fn test_password_without_confirmation_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _) = common::create_test_app(&mock_server.uri());

    let response = app
        .oneshot(patch_request(
            &common::session_cookie_header(),
            json!({ "password": "secret1", "confirm_password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::body_json(response).await;
    assert_eq!(body["fields"]["confirm_password"][0], "Passwords don't match");
}
