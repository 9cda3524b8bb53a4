//! Integration tests for the HTTP client against a stub backend.

mod stub;

use std::time::Duration;

use axum::http::StatusCode;
use classroom_client::{ClassroomClient, ClientError, CourseLevel, CreateSlideRequest, Session};
use classroom_wizard::Config;
use serde_json::json;
use stub::{unreachable_base_url, StubBackend};

fn client(base_url: &str, session: Session) -> ClassroomClient {
    ClassroomClient::new(base_url, session, Duration::from_secs(5))
        .expect("Failed to create client")
}

#[tokio::test]
async fn test_list_courses_decodes_backend_records() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url, Session::with_token("abc"));

    let courses = client.list_courses().await.expect("Listing should succeed");

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].id, "c-1");
    assert_eq!(courses[0].level, Some(CourseLevel::Beginner));
    assert_eq!(courses[1].title, "Geometry");
    assert_eq!(courses[1].description.as_deref(), Some("Shapes and proofs"));

    let requests = backend.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/courses");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn test_client_from_config_with_trailing_slash() {
    let backend = StubBackend::start().await;
    let config = Config {
        api_base_url: format!("{}/", backend.base_url),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let client =
        ClassroomClient::from_config(&config, Session::anonymous()).expect("Valid config");

    client.list_courses().await.expect("Listing should succeed");
    assert_eq!(backend.requests()[0].path, "/api/courses");
}

#[tokio::test]
async fn test_unauthorized_response_is_remote_error() {
    let backend = StubBackend::failing(
        StatusCode::UNAUTHORIZED,
        json!({ "message": "Unauthorized", "statusCode": 401 }),
    )
    .await;
    let client = client(&backend.base_url, Session::anonymous());

    let err = client.list_courses().await.expect_err("Listing should fail");

    match err {
        ClientError::Remote {
            status_code,
            error,
            message,
        } => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "Unauthorized");
            assert_eq!(error.as_deref(), Some("Unauthorized"));
        }
        other => panic!("Expected a remote error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let base_url = unreachable_base_url().await;
    let client = client(&base_url, Session::anonymous());

    let err = client.list_courses().await.expect_err("Listing should fail");

    assert!(matches!(err, ClientError::Network(_)), "got: {err:?}");
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let backend = StubBackend::failing(StatusCode::OK, json!({ "unexpected": true })).await;
    let client = client(&backend.base_url, Session::anonymous());

    let err = client.list_courses().await.expect_err("Decoding should fail");

    assert!(
        matches!(&err, ClientError::Decode { path, .. } if path == "/api/courses"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_slide_identifier_is_path_encoded() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url, Session::anonymous());

    let request = CreateSlideRequest {
        lesson_id: "lesson 3".to_string(),
        title: "Intro".to_string(),
        content: "Hello".to_string(),
        order: None,
    };
    let slide = client
        .create_slide(&request)
        .await
        .expect("Slide creation should succeed");

    assert_eq!(slide.id, "slide-5");
    let requests = backend.requests();
    assert_eq!(requests[0].path, "/api/lessons/lesson%203/slides");
    assert_eq!(requests[0].body, json!({ "title": "Intro", "content": "Hello" }));
}
