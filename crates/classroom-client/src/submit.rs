//! Wizard submission through the backend.

use classroom_wizard::{Flow, FormState, Submitter};
use tracing::debug;

use crate::models::{
    ClassRecord, Course, CreateClassRequest, CreateCourseRequest, CreateLessonRequest,
    CreateSlideRequest, LessonRecord, SlideRecord,
};
use crate::{ClassroomClient, ClientError};

/// The record the backend created for a submitted wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// A new class.
    Class(ClassRecord),
    /// A new course.
    Course(Course),
    /// A lesson added to a course.
    Lesson(LessonRecord),
    /// A slide added to a lesson.
    Slide(SlideRecord),
}

impl Created {
    /// Backend identifier of the new record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Class(c) => &c.id,
            Self::Course(c) => &c.id,
            Self::Lesson(l) => &l.id,
            Self::Slide(s) => &s.id,
        }
    }

    /// The flow that produced this record.
    #[must_use]
    pub const fn flow(&self) -> Flow {
        match self {
            Self::Class(_) => Flow::Class,
            Self::Course(_) => Flow::Course,
            Self::Lesson(_) => Flow::Lesson,
            Self::Slide(_) => Flow::Slide,
        }
    }
}

/// Submits a wizard's form to the endpoint for its flow.
#[derive(Debug, Clone, Copy)]
pub struct FlowSubmitter<'a> {
    client: &'a ClassroomClient,
    flow: Flow,
}

impl<'a> FlowSubmitter<'a> {
    /// Creates a submitter that sends `flow` forms through `client`.
    #[must_use]
    pub const fn new(client: &'a ClassroomClient, flow: Flow) -> Self {
        Self { client, flow }
    }

    /// The flow whose endpoint is used.
    #[must_use]
    pub const fn flow(&self) -> Flow {
        self.flow
    }
}

impl Submitter for FlowSubmitter<'_> {
    type Output = Created;
    type Error = ClientError;

    async fn submit(&self, form: &FormState) -> Result<Created, ClientError> {
        debug!(flow = %self.flow, "Building request from form");
        match self.flow {
            Flow::Class => {
                let request = CreateClassRequest::try_from(form)?;
                self.client.create_class(&request).await.map(Created::Class)
            }
            Flow::Course => {
                let request = CreateCourseRequest::try_from(form)?;
                self.client.create_course(&request).await.map(Created::Course)
            }
            Flow::Lesson => {
                let request = CreateLessonRequest::try_from(form)?;
                self.client.create_lesson(&request).await.map(Created::Lesson)
            }
            Flow::Slide => {
                let request = CreateSlideRequest::try_from(form)?;
                self.client.create_slide(&request).await.map(Created::Slide)
            }
        }
    }
}
