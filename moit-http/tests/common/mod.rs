#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use moit_http::handlers::test_helpers::create_test_state;
use moit_http::server::{AppState, app};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

/// Port with nothing listening; fine for tests that never reach the agent.
pub const NO_AGENT: &str = "http://127.0.0.1:59999";

/// Build the full application router over an in-memory database and a
/// temporary upload directory. Keep the TempDir alive for the test's span.
pub async fn test_app(agent_url: &str) -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = create_test_state(agent_url, dir.path()).await;
    let router = app(state.clone(), dir.path());
    (router, state, dir)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("X-Session-Token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("X-Session-Token", token);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register an account and log in; returns the session token from the
/// Set-Cookie header.
pub async fn signup_and_login(router: &Router, username: &str, nickname: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup",
            None,
            &json!({
                "username": username,
                "password": "hunter2secret",
                "name": "Tester",
                "nickname": nickname,
                "email": format!("{username}@example.com"),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "username": username, "password": "hunter2secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .unwrap();
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, token)| token.to_string())
        .expect("cookie carries the token")
}

/// Spawn a stub agent that answers every invocation with `final_answer` and
/// accepts index pushes. Returns its base URL.
pub async fn spawn_mock_agent(final_answer: &'static str) -> String {
    use axum::routing::post;

    let router = Router::new()
        .route(
            "/agent/invoke",
            post(move |axum::Json(_body): axum::Json<Value>| async move {
                axum::Json(json!({ "final_answer": final_answer }))
            }),
        )
        .route("/meetings/add", post(|| async { axum::http::StatusCode::OK }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
