//! Tests for the terminal runner against a stub backend.
//!
//! Prompts are answered from an in-memory script and everything the runner
//! prints is captured for assertions.

mod stub;

use std::io::Cursor;
use std::time::Duration;

use axum::http::StatusCode;
use classroom_cli::prompt::Prompter;
use classroom_cli::runner::{load_courses, run_batch, run_interactive};
use classroom_client::{ClassroomClient, Session};
use classroom_wizard::{Flow, Wizard};
use serde_json::json;
use stub::StubBackend;

fn client(base_url: &str) -> ClassroomClient {
    ClassroomClient::new(base_url, Session::anonymous(), Duration::from_secs(5))
        .expect("Failed to create client")
}

fn scripted(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn transcript(prompter: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(prompter.output().clone()).expect("Output is not UTF-8")
}

#[tokio::test]
async fn test_load_courses_lists_numbered_courses() {
    let backend = StubBackend::start().await;
    let mut out = Vec::new();

    let courses = load_courses(&client(&backend.base_url), &mut out)
        .await
        .expect("Writing output should succeed");

    let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c-1", "c-2"]);
    let out = String::from_utf8(out).expect("Output is not UTF-8");
    assert!(out.contains("Available courses:"));
    assert!(out.contains("  1. Algebra (c-1)"));
    assert!(out.contains("  2. Geometry (c-2)"));
}

#[tokio::test]
async fn test_load_courses_failure_yields_empty_list() {
    let backend = StubBackend::failing(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Database unavailable", "statusCode": 500 }),
    )
    .await;
    let mut out = Vec::new();

    let courses = load_courses(&client(&backend.base_url), &mut out)
        .await
        .expect("A failed listing should not be an error");

    assert!(courses.is_empty());
    let out = String::from_utf8(out).expect("Output is not UTF-8");
    assert!(out.contains("Could not load courses: Database unavailable (HTTP 500)"));
    assert!(out.contains("Enter course ids directly"));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_batch_stops_on_first_invalid_step() {
    let backend = StubBackend::start().await;
    let mut wizard = Wizard::new(Flow::Class.definition().expect("Invalid class wizard"));
    wizard.set_field("className", "Algebra I").expect("set className");

    let err = run_batch(&mut wizard, &client(&backend.base_url), Flow::Class)
        .await
        .expect_err("A missing start date should stop the run");

    let message = err.to_string();
    assert!(message.starts_with("Schedule: "), "got: {message}");
    assert!(message.contains("Start date is required"), "got: {message}");
    assert_eq!(wizard.step_index(), 1);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_batch_submits_complete_form() {
    let backend = StubBackend::start().await;
    let mut wizard = Wizard::new(Flow::Lesson.definition().expect("Invalid lesson wizard"));
    wizard.set_field("courseId", "c-1").expect("set courseId");
    wizard.set_field("title", "Linear equations").expect("set title");
    wizard.set_field("content", "# Solving for x").expect("set content");

    let created = run_batch(&mut wizard, &client(&backend.base_url), Flow::Lesson)
        .await
        .expect("A complete form should submit");

    assert_eq!(created.id(), "lesson-3");
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/courses/c-1/lessons");
}

#[tokio::test]
async fn test_interactive_retries_after_failed_submit() {
    let backend = StubBackend::flaky(
        1,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Database unavailable", "statusCode": 500 }),
    )
    .await;
    let client = client(&backend.base_url);
    let mut wizard = Wizard::new(Flow::Lesson.definition().expect("Invalid lesson wizard"));

    // Basics, back from content, keep basics, content, submit (fails),
    // retry, keep content, submit.
    let mut prompter = scripted(concat!(
        "c-1\nLinear equations\n2\n",
        ":back\n",
        "\n\n\n",
        "# Solving\n\n",
        "y\n",
        "y\n",
        "\n\n",
        "y\n",
    ));

    let created = run_interactive(&mut wizard, &mut prompter, &client, Flow::Lesson, &[])
        .await
        .expect("Runner should not fail")
        .expect("Second attempt should submit");

    assert_eq!(created.id(), "lesson-3");
    assert_eq!(wizard.step_index(), 0);
    assert!(wizard.form().is_empty());

    let out = transcript(&prompter);
    assert!(out.contains("Submission failed: Database unavailable (HTTP 500)"));
    assert!(out.contains("Step 2/2: Lesson Content (100%)"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
    assert_eq!(
        requests[1].body,
        json!({ "title": "Linear equations", "content": "# Solving", "order": 2 })
    );
}

#[tokio::test]
async fn test_interactive_gives_up_when_retry_declined() {
    let backend = StubBackend::failing(
        StatusCode::BAD_REQUEST,
        json!({ "message": "Course is archived", "statusCode": 400 }),
    )
    .await;
    let client = client(&backend.base_url);
    let mut wizard = Wizard::new(Flow::Slide.definition().expect("Invalid slide wizard"));
    let mut prompter = scripted("lesson-3\nTriangles\n\nThree sides\ny\nn\n");

    let err = run_interactive(&mut wizard, &mut prompter, &client, Flow::Slide, &[])
        .await
        .expect_err("Declining the retry should fail");

    assert_eq!(
        err.to_string(),
        "Submission failed: Course is archived (HTTP 400)"
    );
    assert_eq!(wizard.step_index(), 1);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_interactive_quit_submits_nothing() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url);
    let mut wizard = Wizard::new(Flow::Slide.definition().expect("Invalid slide wizard"));
    let mut prompter = scripted("lesson-3\n:quit\n");

    let created = run_interactive(&mut wizard, &mut prompter, &client, Flow::Slide, &[])
        .await
        .expect("Quitting should not fail");

    assert!(created.is_none());
    assert!(backend.requests().is_empty());
}
