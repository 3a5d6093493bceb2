mod common;

use axum::http::StatusCode;
use common::{NO_AGENT, bare_request, body_json, json_request, signup_and_login, test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn signup_validates_and_reports_duplicates() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;

    // Bad username (too short).
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup",
            None,
            &json!({
                "username": "ab",
                "password": "hunter2secret",
                "name": "Tester",
                "nickname": "shorty",
                "email": "ab@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    signup_and_login(&app, "alice_01", "alice").await;

    // Same nickname, fresh everything else.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup",
            None,
            &json!({
                "username": "bobby_01",
                "password": "hunter2secret",
                "name": "Tester",
                "nickname": "alice",
                "email": "bobby_01@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["field"], "nickname");
}

#[tokio::test]
async fn login_failures_count_down_and_lock() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    signup_and_login(&app, "carol_01", "carol").await;

    for expected_remaining in (1..=4).rev() {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                &json!({ "username": "carol_01", "password": "bad-guess" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["remaining_attempts"], expected_remaining);
    }

    // Fifth failure deactivates the account.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": "carol_01", "password": "bad-guess" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The right password no longer helps.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": "carol_01", "password": "hunter2secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn me_requires_a_session_and_logout_ends_it() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/auth/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = signup_and_login(&app, "dave_001", "dave").await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "dave_001");
    assert!(body.get("password_hash").is_none());

    let response = app
        .clone()
        .oneshot(bare_request("POST", "/api/v1/auth/logout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_round_trip() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let token = signup_and_login(&app, "erin_001", "erin").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/auth/profile",
            Some(&token),
            &json!({
                "nickname": "erin2",
                "current_password": "hunter2secret",
                "new_password": "fresh-secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["nickname"], "erin2");

    // Old password is gone.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": "erin_001", "password": "hunter2secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": "erin_001", "password": "fresh-secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn account_deletion_is_self_or_admin() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let alice_token = signup_and_login(&app, "alice_01", "alice").await;
    let bob_token = signup_and_login(&app, "bobby_01", "bobby").await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/auth/me", Some(&alice_token)))
        .await
        .unwrap();
    let alice_id = body_json(response).await["id"].as_str().unwrap().to_string();

    // Bob cannot delete Alice.
    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/auth/users/{alice_id}"),
            Some(&bob_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Alice deletes herself; her session dies with the account.
    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/auth/users/{alice_id}"),
            Some(&alice_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/auth/me", Some(&alice_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
