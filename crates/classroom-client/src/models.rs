//! Request and response bodies of the Classroom backend.
//!
//! Request types are built from a validated [`FormState`] with
//! `TryFrom<&FormState>`; the conversion re-checks only what it needs to
//! produce a well-typed body and reports the offending field otherwise.

use chrono::NaiveDate;
use classroom_wizard::{parse_date, FormState};
use serde::{Deserialize, Serialize};

use crate::ClientError;

// ============================================================================
// Enumerations
// ============================================================================

/// Who can see a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed in the class catalogue.
    #[default]
    Public,
    /// Only reachable by invitation.
    Private,
}

impl Visibility {
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Difficulty of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    /// No prior knowledge expected.
    Beginner,
    /// Builds on a beginner course.
    Intermediate,
    /// For experienced students.
    Advanced,
}

impl CourseLevel {
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

// ============================================================================
// Class
// ============================================================================

/// Enrollment settings of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSettings {
    /// Students may join without an invitation.
    pub allow_self_enrollment: bool,
    /// Join requests need teacher approval.
    pub require_approval: bool,
    /// Catalogue visibility.
    pub visibility: Visibility,
}

/// Body of `POST /classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    /// Display name.
    pub class_name: String,
    /// Optional summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First day of the class.
    pub start_date: NaiveDate,
    /// Last day of the class.
    pub end_date: NaiveDate,
    /// Enrollment cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
    /// Identifiers of the courses taught.
    pub courses: Vec<String>,
    /// Enrollment settings.
    pub settings: ClassSettings,
}

impl TryFrom<&FormState> for CreateClassRequest {
    type Error = ClientError;

    fn try_from(form: &FormState) -> Result<Self, Self::Error> {
        let visibility = match form.get_str("visibility") {
            Some(s) => Visibility::from_str_case_insensitive(s).ok_or_else(|| {
                ClientError::invalid_payload("visibility", format!("unknown visibility '{s}'"))
            })?,
            None => Visibility::default(),
        };

        Ok(Self {
            class_name: required_str(form, "className")?,
            description: optional_str(form, "description"),
            start_date: required_date(form, "startDate")?,
            end_date: required_date(form, "endDate")?,
            max_students: optional_u32(form, "maxStudents")?,
            courses: form.get_string_list("courses").unwrap_or_default(),
            settings: ClassSettings {
                allow_self_enrollment: form.get_bool("allowSelfEnrollment").unwrap_or(false),
                require_approval: form.get_bool("requireApproval").unwrap_or(false),
                visibility,
            },
        })
    }
}

/// A class as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    /// Backend identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub class_name: String,
    /// Optional summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Enrollment cap.
    #[serde(default)]
    pub max_students: Option<u32>,
}

// ============================================================================
// Course
// ============================================================================

/// Body of `POST /courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    /// Course title.
    pub title: String,
    /// Optional summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subject area.
    pub category: String,
    /// Difficulty.
    pub level: CourseLevel,
    /// Planned length in weeks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Publish immediately.
    pub is_published: bool,
}

impl TryFrom<&FormState> for CreateCourseRequest {
    type Error = ClientError;

    fn try_from(form: &FormState) -> Result<Self, Self::Error> {
        let level_text = required_str(form, "level")?;
        let level = CourseLevel::from_str_case_insensitive(&level_text).ok_or_else(|| {
            ClientError::invalid_payload("level", format!("unknown level '{level_text}'"))
        })?;

        Ok(Self {
            title: required_str(form, "title")?,
            description: optional_str(form, "description"),
            category: required_str(form, "category")?,
            level,
            duration_weeks: optional_u32(form, "durationWeeks")?,
            tags: form.get_string_list("tags").unwrap_or_default(),
            is_published: form.get_bool("isPublished").unwrap_or(false),
        })
    }
}

/// A course as returned by the backend, in listings and on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Backend identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Course title.
    pub title: String,
    /// Optional summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Difficulty, if the backend reports one.
    #[serde(default)]
    pub level: Option<CourseLevel>,
}

// ============================================================================
// Lesson and Slide
// ============================================================================

/// Body of `POST /courses/{courseId}/lessons`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    /// Course the lesson belongs to (sent in the path).
    #[serde(skip)]
    pub course_id: String,
    /// Lesson title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Position within the course.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Expected duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl TryFrom<&FormState> for CreateLessonRequest {
    type Error = ClientError;

    fn try_from(form: &FormState) -> Result<Self, Self::Error> {
        Ok(Self {
            course_id: required_str(form, "courseId")?,
            title: required_str(form, "title")?,
            content: required_str(form, "content")?,
            order: optional_u32(form, "order")?,
            estimated_minutes: optional_u32(form, "estimatedMinutes")?,
        })
    }
}

/// A lesson as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    /// Backend identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Lesson title.
    pub title: String,
    /// Position within the course.
    #[serde(default)]
    pub order: Option<u32>,
}

/// Body of `POST /lessons/{lessonId}/slides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlideRequest {
    /// Lesson the slide belongs to (sent in the path).
    #[serde(skip)]
    pub lesson_id: String,
    /// Slide title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Position within the lesson.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl TryFrom<&FormState> for CreateSlideRequest {
    type Error = ClientError;

    fn try_from(form: &FormState) -> Result<Self, Self::Error> {
        Ok(Self {
            lesson_id: required_str(form, "lessonId")?,
            title: required_str(form, "title")?,
            content: required_str(form, "content")?,
            order: optional_u32(form, "order")?,
        })
    }
}

/// A slide as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRecord {
    /// Backend identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Slide title.
    pub title: String,
    /// Position within the lesson.
    #[serde(default)]
    pub order: Option<u32>,
}

// ============================================================================
// Error body
// ============================================================================

/// Error body returned by the backend: `{ message, error, statusCode }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// One message, or one per failed validation.
    #[serde(default)]
    pub message: Option<ErrorMessage>,
    /// Short error name.
    #[serde(default)]
    pub error: Option<String>,
    /// Status code echoed in the body.
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// The `message` member of an error body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    /// A single message.
    Single(String),
    /// Several validation messages.
    Many(Vec<String>),
}

impl ErrorMessage {
    /// Flattens the message into one line, joining lists with "; ".
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Single(message) => message,
            Self::Many(messages) => messages.join("; "),
        }
    }
}

// ============================================================================
// Form helpers
// ============================================================================

fn required_str(form: &FormState, field: &str) -> Result<String, ClientError> {
    form.get_str(field)
        .map(String::from)
        .ok_or_else(|| ClientError::invalid_payload(field, "value is missing"))
}

fn optional_str(form: &FormState, field: &str) -> Option<String> {
    form.get_str(field).map(String::from)
}

fn required_date(form: &FormState, field: &str) -> Result<NaiveDate, ClientError> {
    form.get(field)
        .and_then(parse_date)
        .ok_or_else(|| ClientError::invalid_payload(field, "expected a YYYY-MM-DD date"))
}

fn optional_u32(form: &FormState, field: &str) -> Result<Option<u32>, ClientError> {
    if form.get(field).map_or(true, classroom_wizard::is_blank) {
        return Ok(None);
    }
    let value = form
        .get_i64(field)
        .ok_or_else(|| ClientError::invalid_payload(field, "expected a whole number"))?;
    u32::try_from(value)
        .map(Some)
        .map_err(|_| ClientError::invalid_payload(field, format!("{value} is out of range")))
}
