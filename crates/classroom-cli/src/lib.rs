//! Terminal front-end for the Classroom creation wizards.
//!
//! [`prompt`] asks for field values one step at a time and [`runner`]
//! drives a wizard to submission, prompting or not.

pub mod prompt;
pub mod runner;
