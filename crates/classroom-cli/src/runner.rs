//! Drives a wizard to submission, with or without prompting.

use std::io::{self, BufRead, Write};

use classroom_client::{ClassroomClient, Course, Created, FlowSubmitter};
use classroom_wizard::{Flow, Wizard, WizardError};

use crate::prompt::{fill_step, print_review, Prompter, StepAction};

/// Fetches the courses a class can include and lists them on `out`.
///
/// A failed request is reported and yields an empty list.
pub async fn load_courses<W: Write>(
    client: &ClassroomClient,
    out: &mut W,
) -> io::Result<Vec<Course>> {
    match client.list_courses().await {
        Ok(courses) => {
            if courses.is_empty() {
                writeln!(out, "No courses found; create a course first")?;
            } else {
                writeln!(out, "Available courses:")?;
                for (i, course) in courses.iter().enumerate() {
                    writeln!(out, "  {}. {} ({})", i + 1, course.title, course.id)?;
                }
            }
            Ok(courses)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load courses");
            writeln!(out, "Could not load courses: {e}")?;
            writeln!(out, "Enter course ids directly")?;
            Ok(Vec::new())
        }
    }
}

/// Validates every step in order and submits without prompting.
///
/// The first invalid step stops the run; its title prefixes the error.
pub async fn run_batch(
    wizard: &mut Wizard,
    client: &ClassroomClient,
    flow: Flow,
) -> anyhow::Result<Created> {
    while !wizard.is_last_step() {
        let step = wizard.current_step().title.clone();
        wizard.go_next().map_err(|e| anyhow::anyhow!("{step}: {e}"))?;
    }
    Ok(wizard.submit(&FlowSubmitter::new(client, flow)).await?)
}

/// Prompts step by step until the wizard is submitted or the user quits.
///
/// Returns `None` when the user quits or input ends.
pub async fn run_interactive<R: BufRead, W: Write>(
    wizard: &mut Wizard,
    prompter: &mut Prompter<R, W>,
    client: &ClassroomClient,
    flow: Flow,
    courses: &[Course],
) -> anyhow::Result<Option<Created>> {
    let submitter = FlowSubmitter::new(client, flow);
    prompter.say("Press Enter to keep a value, '-' to clear it, ':back' or ':quit' to navigate")?;

    loop {
        let step = wizard.current_step();
        prompter.say("")?;
        prompter.say(format!(
            "Step {}/{}: {} ({}%)",
            wizard.step_index() + 1,
            wizard.step_count(),
            step.title,
            wizard.progress_percentage()
        ))?;
        prompter.say(format!("  {}", step.description))?;

        match fill_step(wizard, prompter, courses)? {
            StepAction::Continue => {}
            StepAction::Back => {
                wizard.go_previous();
                continue;
            }
            StepAction::Quit => return Ok(None),
        }

        // On the last step a valid go_next stays put, so it doubles as a check.
        let on_last_step = wizard.is_last_step();
        if let Err(e) = wizard.go_next() {
            report(prompter, &e)?;
            continue;
        }
        if !on_last_step {
            continue;
        }

        print_review(wizard, prompter)?;
        if !prompter.confirm("Submit?")? {
            continue;
        }

        match wizard.submit(&submitter).await {
            Ok(created) => return Ok(Some(created)),
            Err(WizardError::Submission { message }) => {
                prompter.say(format!("Submission failed: {message}"))?;
                if !prompter.confirm("Edit and try again?")? {
                    anyhow::bail!("Submission failed: {message}");
                }
            }
            Err(e) => report(prompter, &e)?,
        }
    }
}

/// Prints a recoverable wizard error, one line per failed field.
fn report<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    error: &WizardError,
) -> io::Result<()> {
    match error {
        WizardError::Validation(errors) => {
            for e in errors {
                prompter.say(format!("  ! {e}"))?;
            }
            Ok(())
        }
        other => prompter.say(format!("  ! {other}")),
    }
}
