mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{NO_AGENT, body_json, signup_and_login, test_app};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_request(uri: &str, token: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("X-Session-Token", token)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn image_upload_stores_and_serves_the_object() {
    let (app, _state, dir) = test_app(NO_AGENT).await;
    let token = signup_and_login(&app, "uploader", "uppy").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/image",
            &token,
            &[("image", Some("pic.png"), b"png-bytes")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let image_url = body["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("http://localhost:3000/uploads/post-images/"));
    assert!(image_url.ends_with(".png"));

    // The object landed on disk and is served back under /uploads.
    let key = image_url
        .strip_prefix("http://localhost:3000/uploads/")
        .unwrap();
    assert!(dir.path().join(key).exists());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{key}"))
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn file_upload_keeps_its_name_and_strips_directories() {
    let (app, _state, dir) = test_app(NO_AGENT).await;
    let token = signup_and_login(&app, "uploader", "uppy").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/file",
            &token,
            &[
                ("file", Some("upload.bin"), b"pdf-bytes"),
                ("original_name", None, b"../reports/final report.pdf"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["original_name"], "final report.pdf");
    assert_eq!(
        body["file_url"],
        "http://localhost:3000/uploads/post-files/final report.pdf"
    );
    assert!(dir.path().join("post-files/final report.pdf").exists());
}

#[tokio::test]
async fn uploads_require_a_session_and_the_right_field() {
    let (app, _state, _dir) = test_app(NO_AGENT).await;
    let token = signup_and_login(&app, "uploader", "uppy").await;

    // No session.
    let mut request = multipart_request(
        "/api/v1/uploads/image",
        &token,
        &[("image", Some("pic.png"), b"png-bytes")],
    );
    request.headers_mut().remove("X-Session-Token");
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong field name.
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/image",
            &token,
            &[("picture", Some("pic.png"), b"png-bytes")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Over the 5 MiB image limit.
    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/uploads/image",
            &token,
            &[("image", Some("big.png"), &oversized)],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
