mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{NO_AGENT, bare_request, body_json, json_request, signup_and_login, test_app};
use serde_json::{Value, json};
use tower::ServiceExt;

fn meeting_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "kick a ball around",
        "category": "sports",
        "location": "Seoul",
        "max_members": 3,
        "starts_at": (Utc::now() + Duration::days(3)).to_rfc3339(),
    })
}

async fn create_meeting(app: &axum::Router, token: &str, title: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/meetings",
            Some(token),
            &meeting_payload(title),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn create_and_list_with_join_flags() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let host = signup_and_login(&app, "host_001", "hosty").await;
    let guest = signup_and_login(&app, "guest_01", "guesty").await;

    let meeting = create_meeting(&app, &host, "friday futsal").await;
    let meeting_id = meeting["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/v1/meetings/{meeting_id}/join"),
            Some(&guest),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Guest sees is_joined; anonymous callers do not.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/meetings", Some(&guest)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let listed = &body["meetings"][0];
    assert_eq!(listed["title"], "friday futsal");
    assert_eq!(listed["organizer_nickname"], "hosty");
    assert_eq!(listed["current_members"], 2);
    assert_eq!(listed["is_joined"], true);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/meetings", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["meetings"][0]["is_joined"], false);
}

#[tokio::test]
async fn join_rules_surface_as_conflicts() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let host = signup_and_login(&app, "host_001", "hosty").await;
    let guest_a = signup_and_login(&app, "guest_0a", "guesta").await;
    let guest_b = signup_and_login(&app, "guest_0b", "guestb").await;
    let guest_c = signup_and_login(&app, "guest_0c", "guestc").await;

    let meeting = create_meeting(&app, &host, "tight futsal").await;
    let meeting_id = meeting["id"].as_str().unwrap();
    let join_uri = format!("/api/v1/meetings/{meeting_id}/join");

    // Organizer cannot join their own meeting.
    let response = app
        .clone()
        .oneshot(bare_request("POST", &join_uri, Some(&host)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Two guests fill the meeting (max_members 3 counts the organizer).
    for token in [&guest_a, &guest_b] {
        let response = app
            .clone()
            .oneshot(bare_request("POST", &join_uri, Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Full for the third guest.
    let response = app
        .clone()
        .oneshot(bare_request("POST", &join_uri, Some(&guest_c)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Duplicate join rejected after cancelling frees a slot.
    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &join_uri, Some(&guest_a)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("POST", &join_uri, Some(&guest_b)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Anonymous join is a 401.
    let response = app
        .clone()
        .oneshot(bare_request("POST", &join_uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown meeting is a 404.
    let response = app
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/v1/meetings/nope/join",
            Some(&guest_c),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_lists_participants_organizer_first() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let host = signup_and_login(&app, "host_001", "hosty").await;
    let guest = signup_and_login(&app, "guest_01", "guesty").await;

    let meeting = create_meeting(&app, &host, "with guests").await;
    let meeting_id = meeting["id"].as_str().unwrap();

    app.clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/v1/meetings/{meeting_id}/join"),
            Some(&guest),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/v1/meetings/{meeting_id}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["participants"][0], "hosty (organizer)");
    assert_eq!(body["participants"][1], "guesty");

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/v1/meetings/{meeting_id}/participants"),
            None,
        ))
        .await
        .unwrap();
    let names = body_json(response).await;
    assert_eq!(names, json!(["hosty (organizer)", "guesty"]));
}

#[tokio::test]
async fn only_the_organizer_edits_and_deletes() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let host = signup_and_login(&app, "host_001", "hosty").await;
    let guest = signup_and_login(&app, "guest_01", "guesty").await;

    let meeting = create_meeting(&app, &host, "editable").await;
    let meeting_id = meeting["id"].as_str().unwrap();
    let uri = format!("/api/v1/meetings/{meeting_id}");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&guest),
            &meeting_payload("hijacked"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Past start times are rejected.
    let mut past = meeting_payload("rescheduled");
    past["starts_at"] = json!((Utc::now() - Duration::days(1)).to_rfc3339());
    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, Some(&host), &past))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&host),
            &meeting_payload("renamed"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "renamed");

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &uri, Some(&guest)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &uri, Some(&host)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", &uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn similar_and_stats() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let host = signup_and_login(&app, "host_001", "hosty").await;

    create_meeting(&app, &host, "friday futsal crew").await;
    create_meeting(&app, &host, "weekend baseball").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/meetings/similar",
            None,
            &json!({
                "title": "casual futsal night",
                "category": "sports",
                "location": "Seoul",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["meetings"].as_array().unwrap().len(), 1);
    assert_eq!(body["meetings"][0]["title"], "friday futsal crew");

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/meetings/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["total_meetings"], 2);
    assert_eq!(stats["popular_category"], "sports");
    assert_eq!(stats["new_users_this_week"], 1);
}
