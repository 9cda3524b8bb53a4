//! Error types for the Classroom wizards.
//!
//! This module defines the error hierarchy for wizard operations: local
//! validation failures, misuse of the controller, submission failures
//! reported by the backend collaborator, and configuration loading.

use std::path::PathBuf;

use crate::validation::ValidationErrors;

/// A specialized `Result` type for wizard operations.
pub type Result<T> = std::result::Result<T, WizardError>;

/// Errors that can occur while driving a creation wizard.
///
/// Validation and submission errors are recoverable: the wizard keeps its
/// state so the user can correct the form or retry.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    // ========================================================================
    // Form Errors
    // ========================================================================
    /// One or more fields of the current step failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A value was set for a field that no step of the wizard owns.
    #[error("Unknown field '{field}'\n\nSuggestion: Check the field name against the wizard's steps")]
    UnknownField {
        /// Name of the unknown field.
        field: String,
    },

    // ========================================================================
    // Controller Errors
    // ========================================================================
    /// `submit` was called before reaching the final step.
    #[error("Cannot submit from step {current} of {total}: the final step has not been reached")]
    NotOnFinalStep {
        /// The current step (1-indexed).
        current: usize,
        /// Total number of steps.
        total: usize,
    },

    /// A wizard definition is internally inconsistent.
    #[error("Invalid wizard definition: {message}")]
    InvalidDefinition {
        /// Description of the inconsistency.
        message: String,
    },

    // ========================================================================
    // Submission Errors
    // ========================================================================
    /// The backend collaborator rejected or failed the submission.
    #[error("Submission failed: {message}\n\nSuggestion: Check your connection and submit again")]
    Submission {
        /// User-visible description of the failure.
        message: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your classroom.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WizardError {
    /// Creates a new `UnknownField` error.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Creates a new `InvalidDefinition` error.
    #[must_use]
    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            message: message.into(),
        }
    }

    /// Creates a new `Submission` error.
    #[must_use]
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if the wizard state survived this error and the user
    /// can correct the form or retry.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UnknownField { .. }
                | Self::NotOnFinalStep { .. }
                | Self::Submission { .. }
        )
    }

    /// Returns the message that should be shown next to the form.
    ///
    /// For validation failures this is the first failing field's message,
    /// for everything else the full error text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors
                .first()
                .map_or_else(|| self.to_string(), |e| e.message.clone()),
            Self::Submission { message } => message.clone(),
            _ => self.to_string(),
        }
    }
}
