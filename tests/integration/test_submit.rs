//! End-to-end tests for submitting wizards to a backend.
//!
//! A stub backend runs in-process on an ephemeral port; the wizard and the
//! real HTTP client talk to it exactly as they would to the live API.

mod stub;

use std::time::Duration;

use axum::http::StatusCode;
use classroom_client::{ClassroomClient, Created, FlowSubmitter, Session};
use classroom_wizard::{Flow, Wizard, WizardError};
use serde_json::json;
use stub::{unreachable_base_url, StubBackend};

fn client(base_url: &str, session: Session) -> ClassroomClient {
    ClassroomClient::new(base_url, session, Duration::from_secs(5))
        .expect("Failed to create client")
}

/// Walks a class wizard to its last step with valid values.
fn completed_class_wizard() -> Wizard {
    let mut wizard = Wizard::new(Flow::Class.definition().expect("Invalid class wizard"));

    wizard.set_field("className", "Algebra I").expect("set className");
    wizard.go_next().expect("Basic Information should be valid");

    wizard.set_field("startDate", "2026-09-01").expect("set startDate");
    wizard.set_field("endDate", "2027-06-30").expect("set endDate");
    wizard.set_field("maxStudents", 30).expect("set maxStudents");
    wizard.go_next().expect("Schedule should be valid");

    wizard
        .set_field("courses", json!(["c-1", "c-2"]))
        .expect("set courses");
    wizard.go_next().expect("Courses should be valid");

    wizard.set_field("visibility", "private").expect("set visibility");
    wizard.set_field("requireApproval", "yes").expect("set requireApproval");

    assert!(wizard.is_last_step());
    assert_eq!(wizard.progress_percentage(), 100);
    wizard
}

#[tokio::test]
async fn test_class_submission_creates_class_and_resets_wizard() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url, Session::with_token("t0k3n"));
    let mut wizard = completed_class_wizard();

    let created = wizard
        .submit(&FlowSubmitter::new(&client, Flow::Class))
        .await
        .expect("Submission should succeed");

    match &created {
        Created::Class(class) => {
            assert_eq!(class.id, "class-1");
            assert_eq!(class.class_name, "Algebra I");
            assert_eq!(class.max_students, Some(30));
        }
        other => panic!("Expected a class, got: {other:?}"),
    }

    assert_eq!(wizard.step_index(), 0);
    assert!(wizard.form().is_empty());
    assert_eq!(wizard.progress_percentage(), 25);
    assert_eq!(wizard.error_message(), None);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/classes");
    assert_eq!(request.authorization.as_deref(), Some("Bearer t0k3n"));
    assert_eq!(
        request.body,
        json!({
            "className": "Algebra I",
            "startDate": "2026-09-01",
            "endDate": "2027-06-30",
            "maxStudents": 30,
            "courses": ["c-1", "c-2"],
            "settings": {
                "allowSelfEnrollment": false,
                "requireApproval": true,
                "visibility": "private"
            }
        })
    );
}

#[tokio::test]
async fn test_rejected_submission_keeps_step_and_form() {
    let backend = StubBackend::failing(
        StatusCode::BAD_REQUEST,
        json!({
            "message": ["className already in use", "startDate must be in the future"],
            "error": "Bad Request",
            "statusCode": 400
        }),
    )
    .await;
    let client = client(&backend.base_url, Session::anonymous());
    let mut wizard = completed_class_wizard();
    let form_before = wizard.form().clone();

    let err = wizard
        .submit(&FlowSubmitter::new(&client, Flow::Class))
        .await
        .expect_err("Submission should fail");

    match &err {
        WizardError::Submission { message } => {
            assert_eq!(
                message,
                "className already in use; startDate must be in the future (HTTP 400)"
            );
        }
        other => panic!("Expected a submission error, got: {other:?}"),
    }
    assert!(err.is_recoverable());

    assert_eq!(wizard.step_index(), 3);
    assert_eq!(wizard.form(), &form_before);
    assert_eq!(
        wizard.error_message(),
        Some("className already in use; startDate must be in the future (HTTP 400)")
    );
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_network_failure_keeps_step_and_form() {
    let base_url = unreachable_base_url().await;
    let client = client(&base_url, Session::anonymous());
    let mut wizard = completed_class_wizard();
    let form_before = wizard.form().clone();

    let err = wizard
        .submit(&FlowSubmitter::new(&client, Flow::Class))
        .await
        .expect_err("Submission should fail");

    assert!(matches!(err, WizardError::Submission { .. }), "got: {err:?}");
    assert_eq!(wizard.step_index(), 3);
    assert_eq!(wizard.form(), &form_before);
    assert!(wizard
        .error_message()
        .is_some_and(|m| m.starts_with("network error")));
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() {
    let down = unreachable_base_url().await;
    let mut wizard = completed_class_wizard();

    let offline = client(&down, Session::anonymous());
    wizard
        .submit(&FlowSubmitter::new(&offline, Flow::Class))
        .await
        .expect_err("First attempt should fail");

    let backend = StubBackend::start().await;
    let online = client(&backend.base_url, Session::anonymous());
    let created = wizard
        .submit(&FlowSubmitter::new(&online, Flow::Class))
        .await
        .expect("Second attempt should succeed");

    assert_eq!(created.id(), "class-1");
    assert_eq!(wizard.step_index(), 0);
}

#[tokio::test]
async fn test_invalid_step_never_reaches_backend() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url, Session::anonymous());
    let mut wizard = Wizard::new(Flow::Class.definition().expect("Invalid class wizard"));

    wizard.set_field("className", "").expect("set className");
    let err = wizard.go_next().expect_err("Empty class name should fail");
    assert!(matches!(err, WizardError::Validation(_)));
    assert_eq!(wizard.step_index(), 0);

    let err = wizard
        .submit(&FlowSubmitter::new(&client, Flow::Class))
        .await
        .expect_err("Submit from the first step should fail");
    assert!(matches!(
        err,
        WizardError::NotOnFinalStep {
            current: 1,
            total: 4
        }
    ));

    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_lesson_is_posted_under_its_course() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url, Session::anonymous());
    let mut wizard = Wizard::new(Flow::Lesson.definition().expect("Invalid lesson wizard"));

    wizard.set_field("courseId", "c-1").expect("set courseId");
    wizard.set_field("title", "Linear equations").expect("set title");
    wizard.set_field("order", 2).expect("set order");
    wizard.go_next().expect("Lesson Basics should be valid");
    wizard
        .set_field("content", "# Solving for x")
        .expect("set content");

    let created = wizard
        .submit(&FlowSubmitter::new(&client, Flow::Lesson))
        .await
        .expect("Submission should succeed");
    assert_eq!(created.flow(), Flow::Lesson);
    assert_eq!(created.id(), "lesson-3");

    let requests = backend.requests();
    assert_eq!(requests[0].path, "/api/courses/c-1/lessons");
    assert_eq!(requests[0].authorization, None);
    assert_eq!(
        requests[0].body,
        json!({ "title": "Linear equations", "content": "# Solving for x", "order": 2 })
    );
}

#[tokio::test]
async fn test_course_and_slide_flows_submit() {
    let backend = StubBackend::start().await;
    let client = client(&backend.base_url, Session::with_token("abc"));

    let mut course = Wizard::new(Flow::Course.definition().expect("Invalid course wizard"));
    course.set_field("title", "Geometry").expect("set title");
    course.go_next().expect("Course Details should be valid");
    course.set_field("category", "Mathematics").expect("set category");
    course.set_field("level", "intermediate").expect("set level");
    course.go_next().expect("Classification should be valid");
    course.set_field("tags", "shapes, proofs").expect("set tags");

    let created = course
        .submit(&FlowSubmitter::new(&client, Flow::Course))
        .await
        .expect("Course submission should succeed");
    assert_eq!(created.id(), "course-9");

    let mut slide = Wizard::new(Flow::Slide.definition().expect("Invalid slide wizard"));
    slide.set_field("lessonId", "lesson-3").expect("set lessonId");
    slide.set_field("title", "Triangles").expect("set title");
    slide.go_next().expect("Slide Basics should be valid");
    slide.set_field("content", "Three sides").expect("set content");

    let created = slide
        .submit(&FlowSubmitter::new(&client, Flow::Slide))
        .await
        .expect("Slide submission should succeed");
    assert_eq!(created.id(), "slide-5");

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/courses");
    assert_eq!(requests[0].body["tags"], json!(["shapes", "proofs"]));
    assert_eq!(requests[0].body["level"], json!("intermediate"));
    assert_eq!(requests[1].path, "/api/lessons/lesson-3/slides");
}
