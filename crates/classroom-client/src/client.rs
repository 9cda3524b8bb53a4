//! HTTP client for the Classroom backend.
//!
//! This module provides [`ClassroomClient`], a thin wrapper around a
//! [`reqwest::Client`] that knows the backend's endpoints, attaches the
//! session's bearer token, and turns error bodies into [`ClientError`]s.

use std::time::Duration;

use classroom_wizard::Config;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::models::{
    ApiErrorBody, ClassRecord, Course, CreateClassRequest, CreateCourseRequest,
    CreateLessonRequest, CreateSlideRequest, ErrorMessage, LessonRecord, SlideRecord,
};
use crate::{ClientError, Session};

/// Longest raw body echoed in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the Classroom backend REST API.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use classroom_client::{ClassroomClient, Session};
///
/// # async fn example() -> Result<(), classroom_client::ClientError> {
/// let client = ClassroomClient::new(
///     "http://localhost:3001/api",
///     Session::with_token("token"),
///     Duration::from_secs(30),
/// )?;
/// for course in client.list_courses().await? {
///     println!("{} {}", course.id, course.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClassroomClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl ClassroomClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, and [`ClientError::Network`] if the HTTP
    /// client cannot be built.
    pub fn new(
        base_url: impl AsRef<str>,
        session: Session,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let raw = base_url.as_ref().trim();
        let base_url =
            Url::parse(raw).map_err(|_| ClientError::InvalidBaseUrl(raw.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(raw.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        debug!(
            base_url = %base_url,
            authenticated = session.is_authenticated(),
            "Created API client"
        );

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config, session: Session) -> Result<Self, ClientError> {
        Self::new(
            config.api_base_url(),
            session,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// The API root this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session whose credentials are sent.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Creates a class.
    #[instrument(skip(self, request), fields(class_name = %request.class_name))]
    pub async fn create_class(
        &self,
        request: &CreateClassRequest,
    ) -> Result<ClassRecord, ClientError> {
        let class: ClassRecord = self
            .send_json(Method::POST, &["classes"], Some(request))
            .await?;
        info!(class_id = %class.id, "Class created");
        Ok(class)
    }

    /// Lists the courses that can be attached to a class.
    #[instrument(skip(self))]
    pub async fn list_courses(&self) -> Result<Vec<Course>, ClientError> {
        let courses: Vec<Course> = self
            .send_json::<(), _>(Method::GET, &["courses"], None)
            .await?;
        debug!(count = courses.len(), "Loaded courses");
        Ok(courses)
    }

    /// Creates a course.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_course(
        &self,
        request: &CreateCourseRequest,
    ) -> Result<Course, ClientError> {
        let course: Course = self
            .send_json(Method::POST, &["courses"], Some(request))
            .await?;
        info!(course_id = %course.id, "Course created");
        Ok(course)
    }

    /// Adds a lesson to the course named in the request.
    #[instrument(skip(self, request), fields(course_id = %request.course_id))]
    pub async fn create_lesson(
        &self,
        request: &CreateLessonRequest,
    ) -> Result<LessonRecord, ClientError> {
        let lesson: LessonRecord = self
            .send_json(
                Method::POST,
                &["courses", &request.course_id, "lessons"],
                Some(request),
            )
            .await?;
        info!(lesson_id = %lesson.id, "Lesson created");
        Ok(lesson)
    }

    /// Adds a slide to the lesson named in the request.
    #[instrument(skip(self, request), fields(lesson_id = %request.lesson_id))]
    pub async fn create_slide(
        &self,
        request: &CreateSlideRequest,
    ) -> Result<SlideRecord, ClientError> {
        let slide: SlideRecord = self
            .send_json(
                Method::POST,
                &["lessons", &request.lesson_id, "slides"],
                Some(request),
            )
            .await?;
        info!(slide_id = %slide.id, "Slide created");
        Ok(slide)
    }

    /// Builds the URL for `segments` below the API root.
    ///
    /// Segments are percent-encoded, so identifiers cannot escape the path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!(method = %method, path = %path, "Sending request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.authorize(request).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let err = remote_error(status, &text);
            warn!(path = %path, status = status.as_u16(), error = %err, "Request rejected");
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode {
            path,
            message: e.to_string(),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Builds a [`ClientError::Remote`] from a failed response.
///
/// Prefers the `message` of a JSON error body, then the raw body, then the
/// status's reason phrase.
fn remote_error(status: StatusCode, body: &str) -> ClientError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let (message, error) = parsed.map_or((None, None), |b| {
        (b.message.map(ErrorMessage::into_text), b.error)
    });

    let reason = status.canonical_reason().unwrap_or("Request failed");
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                reason.to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        });

    ClientError::Remote {
        status_code: status.as_u16(),
        error: error.or_else(|| Some(reason.to_string())),
        message,
    }
}
