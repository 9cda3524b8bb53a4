//! Classroom creation wizards
//!
//! Step controller, field validation and flow definitions for the
//! multi-step forms that create classes, courses, lessons and slides.

pub mod config;
pub mod error;
pub mod flows;
pub mod form;
pub mod validation;
pub mod wizard;

pub use config::Config;
pub use error::{Result, WizardError};
pub use flows::{Flow, COURSE_LEVELS, VISIBILITY_OPTIONS};
pub use form::FormState;
pub use validation::{
    is_blank, parse_date, CrossFieldRule, FieldKind, FieldRule, ValidationError, ValidationErrors,
    DATE_FORMAT,
};
pub use wizard::{StepDefinition, Submitter, Wizard, WizardDefinition};
