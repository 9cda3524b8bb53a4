//! Ready-made creation wizards for the Classroom platform.
//!
//! Each [`Flow`] builds the [`WizardDefinition`] for one kind of entity.
//! Field names match the JSON keys the backend expects, so a validated
//! form maps directly onto a request body.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{CrossFieldRule, FieldRule};
use crate::wizard::{StepDefinition, WizardDefinition};

/// Class visibility options.
pub const VISIBILITY_OPTIONS: [&str; 2] = ["public", "private"];

/// Course difficulty levels.
pub const COURSE_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

/// Largest position a lesson or slide can take (`u32::MAX`).
const MAX_ORDER: i64 = 4_294_967_295;

/// The creation wizards available on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Create a class and attach courses to it.
    Class,
    /// Create a course.
    Course,
    /// Add a lesson to a course.
    Lesson,
    /// Add a slide to a lesson.
    Slide,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Course => write!(f, "course"),
            Self::Lesson => write!(f, "lesson"),
            Self::Slide => write!(f, "slide"),
        }
    }
}

impl Flow {
    /// All flows, in menu order.
    pub const ALL: [Self; 4] = [Self::Class, Self::Course, Self::Lesson, Self::Slide];

    /// Builds the wizard definition for this flow.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in definition is inconsistent, which the
    /// tests rule out.
    pub fn definition(self) -> Result<WizardDefinition> {
        match self {
            Self::Class => class_definition(),
            Self::Course => course_definition(),
            Self::Lesson => lesson_definition(),
            Self::Slide => slide_definition(),
        }
    }
}

fn class_definition() -> Result<WizardDefinition> {
    WizardDefinition::new(
        "class",
        vec![
            StepDefinition::new("Basic Information", "Name and describe the class", 25)
                .with_field(
                    FieldRule::text("className", "Class name")
                        .required()
                        .with_length(Some(1), Some(100)),
                )
                .with_field(
                    FieldRule::text("description", "Description").with_length(None, Some(500)),
                ),
            StepDefinition::new("Schedule", "Set the dates and class size", 50)
                .with_field(FieldRule::date("startDate", "Start date").required())
                .with_field(FieldRule::date("endDate", "End date").required())
                .with_field(
                    FieldRule::integer("maxStudents", "Maximum students")
                        .with_range(Some(1), Some(500)),
                )
                .with_cross_field_rule(CrossFieldRule::date_after(
                    "endDate",
                    "startDate",
                    "End date must be after start date",
                )),
            StepDefinition::new("Courses", "Choose the courses taught in this class", 75)
                .with_field(FieldRule::collection("courses", "Courses").required()),
            StepDefinition::new("Settings", "Enrollment and visibility", 100)
                .with_field(FieldRule::boolean("allowSelfEnrollment", "Allow self-enrollment"))
                .with_field(FieldRule::boolean("requireApproval", "Require approval"))
                .with_field(
                    FieldRule::choice("visibility", "Visibility", VISIBILITY_OPTIONS).required(),
                ),
        ],
    )
}

fn course_definition() -> Result<WizardDefinition> {
    WizardDefinition::new(
        "course",
        vec![
            StepDefinition::new("Course Details", "Title and summary", 33)
                .with_field(
                    FieldRule::text("title", "Title")
                        .required()
                        .with_length(Some(3), Some(120)),
                )
                .with_field(
                    FieldRule::text("description", "Description").with_length(None, Some(2000)),
                ),
            StepDefinition::new("Classification", "Category, level and length", 66)
                .with_field(
                    FieldRule::text("category", "Category")
                        .required()
                        .with_length(Some(2), Some(60)),
                )
                .with_field(FieldRule::choice("level", "Level", COURSE_LEVELS).required())
                .with_field(
                    FieldRule::integer("durationWeeks", "Duration (weeks)")
                        .with_range(Some(1), Some(52)),
                ),
            StepDefinition::new("Publishing", "Tags and publication", 100)
                .with_field(FieldRule::collection("tags", "Tags"))
                .with_field(FieldRule::boolean("isPublished", "Publish now")),
        ],
    )
}

fn lesson_definition() -> Result<WizardDefinition> {
    WizardDefinition::new(
        "lesson",
        vec![
            StepDefinition::new("Lesson Basics", "Course, title and position", 50)
                .with_field(FieldRule::text("courseId", "Course").required())
                .with_field(
                    FieldRule::text("title", "Title")
                        .required()
                        .with_length(Some(3), Some(120)),
                )
                .with_field(
                    FieldRule::integer("order", "Position").with_range(Some(1), Some(MAX_ORDER)),
                ),
            StepDefinition::new("Lesson Content", "Markdown body and duration", 100)
                .with_field(FieldRule::text("content", "Content").required())
                .with_field(
                    FieldRule::integer("estimatedMinutes", "Estimated minutes")
                        .with_range(Some(1), Some(600)),
                ),
        ],
    )
}

fn slide_definition() -> Result<WizardDefinition> {
    WizardDefinition::new(
        "slide",
        vec![
            StepDefinition::new("Slide Basics", "Lesson, title and position", 50)
                .with_field(FieldRule::text("lessonId", "Lesson").required())
                .with_field(
                    FieldRule::text("title", "Title")
                        .required()
                        .with_length(Some(1), Some(120)),
                )
                .with_field(
                    FieldRule::integer("order", "Position").with_range(Some(1), Some(MAX_ORDER)),
                ),
            StepDefinition::new("Slide Content", "Markdown body", 100)
                .with_field(FieldRule::text("content", "Content").required()),
        ],
    )
}
