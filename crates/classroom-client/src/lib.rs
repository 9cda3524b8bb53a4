//! Classroom API client
//!
//! Typed access to the Classroom backend REST API via reqwest.
//!
//! This crate provides the request and response models for classes,
//! courses, lessons and slides, a [`ClassroomClient`] that talks to the
//! backend, and [`FlowSubmitter`], which plugs the client into a
//! [`classroom_wizard::Wizard`].

pub mod client;
pub mod models;
pub mod submit;

use thiserror::Error;

pub use client::ClassroomClient;
pub use models::{
    ApiErrorBody, ClassRecord, ClassSettings, Course, CourseLevel, CreateClassRequest,
    CreateCourseRequest, CreateLessonRequest, CreateSlideRequest, ErrorMessage, LessonRecord,
    SlideRecord, Visibility,
};
pub use submit::{Created, FlowSubmitter};

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status_code})")]
    Remote {
        /// HTTP status code of the response.
        status_code: u16,
        /// Short error name from the body, e.g. "Bad Request".
        error: Option<String>,
        /// User-visible description from the body.
        message: String,
    },

    /// A success response could not be decoded.
    #[error("unexpected response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder error.
        message: String,
    },

    /// The form could not be turned into a request body.
    #[error("invalid {field}: {message}")]
    InvalidPayload {
        /// Offending form field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The configured base URL cannot be used.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Creates a new `InvalidPayload` error.
    #[must_use]
    pub fn invalid_payload(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status of a remote error.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Credentials for the current user, passed explicitly to the client.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session without credentials.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// A session authenticated with a bearer token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    /// Reads the token from the environment variable `var`.
    ///
    /// An unset or empty variable yields an anonymous session.
    #[must_use]
    pub fn from_env(var: &str) -> Self {
        std::env::var(var).map_or_else(|_| Self::anonymous(), Self::with_token)
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns `true` if the session carries a token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
