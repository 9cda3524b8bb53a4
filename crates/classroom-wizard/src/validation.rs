//! Field validation rules for wizard steps.
//!
//! Every field a step owns has a [`FieldRule`] describing its kind and
//! whether it is required. Steps can also carry [`CrossFieldRule`]s that
//! relate two fields, such as an end date that must fall after a start
//! date.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::{json_type_name, FormState};

/// Date format accepted for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Validation errors
// ============================================================================

/// A single failed check on a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Name of the field the error is attached to.
    pub field: String,
    /// User-visible message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// All validation errors produced by one check, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Returns the first error, which is the one surfaced to the user.
    #[must_use]
    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    /// Returns the first error attached to `field`.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// Adds an error.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Returns `true` if there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

// ============================================================================
// FieldKind and FieldRule
// ============================================================================

/// The kind of value a field accepts, with its bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, measured in characters after trimming.
    Text {
        /// Minimum length.
        min_len: Option<usize>,
        /// Maximum length.
        max_len: Option<usize>,
    },
    /// Whole number, inclusive bounds.
    Integer {
        /// Smallest accepted value.
        min: Option<i64>,
        /// Largest accepted value.
        max: Option<i64>,
    },
    /// Calendar date (`YYYY-MM-DD`, or an RFC 3339 timestamp).
    Date,
    /// Yes/no flag.
    Boolean,
    /// One value out of a fixed set.
    Choice {
        /// Accepted values.
        options: Vec<String>,
    },
    /// Multi-select list of identifiers.
    Collection {
        /// Minimum number of selected items when a value is present.
        min_items: usize,
    },
}

/// Validation rule for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name as it appears in the form.
    pub name: String,
    /// Human-readable label used in messages and prompts.
    pub label: String,
    /// What kind of value the field holds.
    pub kind: FieldKind,
    /// Whether the field must be filled in.
    pub required: bool,
}

impl FieldRule {
    fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
        }
    }

    /// An optional, unbounded text field.
    #[must_use]
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
    }

    /// An optional, unbounded integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Integer { min: None, max: None })
    }

    /// An optional date field.
    #[must_use]
    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// An optional boolean field.
    #[must_use]
    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    /// An optional choice between `options`.
    #[must_use]
    pub fn choice<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            label,
            FieldKind::Choice {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// An optional multi-select collection.
    #[must_use]
    pub fn collection(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Collection { min_items: 1 })
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets text length bounds. Has no effect on non-text fields.
    #[must_use]
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        if let FieldKind::Text { min_len, max_len } = &mut self.kind {
            *min_len = min;
            *max_len = max;
        }
        self
    }

    /// Sets integer bounds. Has no effect on non-integer fields.
    #[must_use]
    pub fn with_range(mut self, lower: Option<i64>, upper: Option<i64>) -> Self {
        if let FieldKind::Integer { min, max } = &mut self.kind {
            *min = lower;
            *max = upper;
        }
        self
    }

    /// Sets the minimum item count. Has no effect on non-collection fields.
    #[must_use]
    pub fn with_min_items(mut self, count: usize) -> Self {
        if let FieldKind::Collection { min_items } = &mut self.kind {
            *min_items = count;
        }
        self
    }

    /// Returns `true` if the field is a collection.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.kind, FieldKind::Collection { .. })
    }

    /// Checks the field's value in `form`.
    ///
    /// Blank values (missing, `null`, whitespace-only text, empty lists)
    /// fail only when the field is required.
    pub fn validate(&self, form: &FormState) -> Result<(), ValidationError> {
        let value = form.get(&self.name);
        if value.map_or(true, is_blank) {
            if self.required {
                return Err(self.error(format!("{} is required", self.label)));
            }
            return Ok(());
        }

        match &self.kind {
            FieldKind::Text { min_len, max_len } => {
                let Some(text) = value.and_then(Value::as_str) else {
                    return Err(self.type_error("text", value));
                };
                let len = text.trim().chars().count();
                if let Some(min) = min_len {
                    if len < *min {
                        return Err(self.error(format!(
                            "{} must be at least {min} characters",
                            self.label
                        )));
                    }
                }
                if let Some(max) = max_len {
                    if len > *max {
                        return Err(self.error(format!(
                            "{} must be at most {max} characters",
                            self.label
                        )));
                    }
                }
            }
            FieldKind::Integer { min, max } => {
                let Some(n) = form.get_i64(&self.name) else {
                    return Err(self.error(format!("{} must be a whole number", self.label)));
                };
                if let Some(min) = min {
                    if n < *min {
                        return Err(self.error(format!("{} must be at least {min}", self.label)));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(self.error(format!("{} must be at most {max}", self.label)));
                    }
                }
            }
            FieldKind::Date => {
                if value.and_then(parse_date).is_none() {
                    return Err(self.error(format!(
                        "{} must be a date in YYYY-MM-DD format",
                        self.label
                    )));
                }
            }
            FieldKind::Boolean => {
                if form.get_bool(&self.name).is_none() {
                    return Err(self.error(format!("{} must be yes or no", self.label)));
                }
            }
            FieldKind::Choice { options } => {
                let Some(choice) = value.and_then(Value::as_str) else {
                    return Err(self.type_error("text", value));
                };
                if !options.iter().any(|o| o.eq_ignore_ascii_case(choice.trim())) {
                    return Err(self.error(format!(
                        "{} must be one of: {}",
                        self.label,
                        options.join(", ")
                    )));
                }
            }
            FieldKind::Collection { min_items } => {
                let Some(items) = form.get_string_list(&self.name) else {
                    return Err(self.type_error("list", value));
                };
                // Only blank items, such as `[" "]` or `","`, count as no value.
                if items.is_empty() {
                    if self.required {
                        return Err(self.error(format!("{} is required", self.label)));
                    }
                    return Ok(());
                }
                if items.len() < *min_items {
                    return Err(self.error(format!(
                        "Select at least {min_items} {}",
                        self.label.to_lowercase()
                    )));
                }
            }
        }

        Ok(())
    }

    fn error(&self, message: String) -> ValidationError {
        ValidationError::new(self.name.clone(), message)
    }

    fn type_error(&self, expected: &str, value: Option<&Value>) -> ValidationError {
        let found = value.map_or("nothing", json_type_name);
        self.error(format!("{} must be {expected}, got {found}", self.label))
    }
}

// ============================================================================
// CrossFieldRule
// ============================================================================

/// A constraint relating two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// `field` must hold a date strictly after the date in `other`.
    DateAfter {
        /// Field the error is attached to.
        field: String,
        /// Field holding the earlier date.
        other: String,
        /// Message shown when the constraint fails.
        message: String,
    },
}

impl CrossFieldRule {
    /// Creates a `DateAfter` rule.
    #[must_use]
    pub fn date_after(
        field: impl Into<String>,
        other: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DateAfter {
            field: field.into(),
            other: other.into(),
            message: message.into(),
        }
    }

    /// Names of the fields this rule reads.
    #[must_use]
    pub fn fields(&self) -> [&str; 2] {
        match self {
            Self::DateAfter { field, other, .. } => [field.as_str(), other.as_str()],
        }
    }

    /// Checks the rule. Fields that are blank or unparseable are left to
    /// their own [`FieldRule`], so the rule passes in that case.
    pub fn validate(&self, form: &FormState) -> Result<(), ValidationError> {
        match self {
            Self::DateAfter {
                field,
                other,
                message,
            } => {
                let later = form.get(field).and_then(parse_date);
                let earlier = form.get(other).and_then(parse_date);
                match (later, earlier) {
                    (Some(later), Some(earlier)) if later <= earlier => {
                        Err(ValidationError::new(field.clone(), message.clone()))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns `true` for values that count as "not filled in".
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Parses a date value, accepting `YYYY-MM-DD` or an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
