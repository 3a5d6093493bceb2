mod common;

use axum::http::StatusCode;
use common::{NO_AGENT, bare_request, body_json, json_request, signup_and_login, spawn_mock_agent, test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn ai_search_relays_the_agent_answer() {
    let agent_url = spawn_mock_agent("Try the Friday futsal crew in Seoul.").await;
    let (app, _state, _dir) = test_app(&agent_url).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/search/ai",
            None,
            &json!({ "query": "somewhere to play football" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], "Try the Friday futsal crew in Seoul.");

    // Empty query never reaches the agent.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/search/ai",
            None,
            &json!({ "query": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ai_search_maps_a_dead_agent_to_bad_gateway() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/search/ai",
            None,
            &json!({ "query": "anything" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn meeting_match_relays_the_agent_document() {
    let agent_url = spawn_mock_agent(
        r#"{"summary":"a futsal crew already exists","recommendations":[{"meeting_id":"m-1","title":"friday futsal"}]}"#,
    )
    .await;
    let (app, _state, _dir) = test_app(&agent_url).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/meetings/match",
            None,
            &json!({
                "title": "casual futsal night",
                "description": "kick a ball around after work",
                "location": "Seoul",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["recommendations"][0]["meeting_id"], "m-1");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/meetings/match",
            None,
            &json!({ "title": "", "description": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn survey_results_are_one_per_user() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let token = signup_and_login(&app, "survey_u", "surveyn").await;

    // Nothing stored yet.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/survey", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for recommendations in [json!(["climbing"]), json!(["reading"])] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/survey",
                Some(&token),
                &json!({
                    "answers": { "Q6": 4, "monthly_budget": "under_50k" },
                    "recommendations": recommendations,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/survey", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // The second submission replaced the first.
    assert_eq!(body["recommendations"], json!(["reading"]));
}

#[tokio::test]
async fn recommend_parses_the_agent_json() {
    let agent_url =
        spawn_mock_agent(r#"{"summary":"try climbing","recommendations":["climbing"]}"#).await;
    let (app, _state, _dir) = test_app(&agent_url).await;
    let token = signup_and_login(&app, "survey_u", "surveyn").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/survey/recommend",
            Some(&token),
            &json!({
                "answers": {
                    "Q6": 5,
                    "Q7": 1,
                    "monthly_budget": "100k_200k",
                    "weekly_time": "over_10h",
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"], "try climbing");
    assert_eq!(body["recommendations"], json!(["climbing"]));

    // Anonymous callers never reach the agent.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/survey/recommend",
            None,
            &json!({ "answers": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
