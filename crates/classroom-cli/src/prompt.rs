//! Line-based prompting for wizard steps.

use std::io::{self, BufRead, Write};

use classroom_client::Course;
use classroom_wizard::{FieldKind, FieldRule, Wizard};
use serde_json::Value;

/// What the user asked for while filling in a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Every field was answered; try to advance.
    Continue,
    /// Go back one step.
    Back,
    /// Stop without submitting.
    Quit,
}

/// Reads answers from `input` and writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter over the given streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Everything written so far.
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// Writes a line of output.
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Asks a question and returns the trimmed answer, or `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks a yes/no question. End of input counts as no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]: "))?;
        Ok(matches!(
            answer.as_deref().map(str::to_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }
}

/// Prompts for every field of the current step.
///
/// An empty answer keeps the current value and `-` clears it. `:back` and
/// `:quit` end the step early.
pub fn fill_step<R: BufRead, W: Write>(
    wizard: &mut Wizard,
    prompter: &mut Prompter<R, W>,
    courses: &[Course],
) -> anyhow::Result<StepAction> {
    let fields = wizard.current_step().fields.clone();

    for rule in &fields {
        let current = wizard.field(&rule.name).map(display_value);
        let Some(answer) = prompter.ask(&question(rule, current.as_deref()))? else {
            return Ok(StepAction::Quit);
        };

        match answer.as_str() {
            "" => {}
            ":back" => return Ok(StepAction::Back),
            ":quit" => return Ok(StepAction::Quit),
            "-" => {
                wizard.clear_field(&rule.name);
            }
            raw => wizard.set_field(&rule.name, parse_answer(rule, raw, courses))?,
        }
    }

    Ok(StepAction::Continue)
}

/// Builds the prompt for one field, e.g. `Visibility* (public/private) [public]: `.
pub fn question(rule: &FieldRule, current: Option<&str>) -> String {
    let mut q = rule.label.clone();
    if rule.required {
        q.push('*');
    }

    let hint = match &rule.kind {
        FieldKind::Date => Some("YYYY-MM-DD".to_string()),
        FieldKind::Boolean => Some("yes/no".to_string()),
        FieldKind::Choice { options } => Some(options.join("/")),
        FieldKind::Collection { .. } => Some("comma separated".to_string()),
        FieldKind::Text { .. } | FieldKind::Integer { .. } => None,
    };
    if let Some(hint) = hint {
        q.push_str(&format!(" ({hint})"));
    }
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        q.push_str(&format!(" [{current}]"));
    }
    q.push_str(": ");
    q
}

/// Turns a typed answer into a form value for `rule`.
///
/// Collections accept course numbers from the listing as well as ids.
/// Anything that does not parse is stored as text so validation can
/// report it.
pub fn parse_answer(rule: &FieldRule, raw: &str, courses: &[Course]) -> Value {
    match &rule.kind {
        FieldKind::Integer { .. } => raw
            .parse::<i64>()
            .map_or_else(|_| Value::String(raw.to_string()), Value::from),
        FieldKind::Collection { .. } => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(resolve_course(item, courses)))
                .collect(),
        ),
        FieldKind::Choice { .. } => Value::String(raw.to_lowercase()),
        FieldKind::Text { .. } | FieldKind::Date | FieldKind::Boolean => {
            Value::String(raw.to_string())
        }
    }
}

fn resolve_course(item: &str, courses: &[Course]) -> String {
    item.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| courses.get(i))
        .map_or_else(|| item.to_string(), |course| course.id.clone())
}

/// Renders a form value for prompts and the review.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Prints every step's values ahead of the final submit.
pub fn print_review<R: BufRead, W: Write>(
    wizard: &Wizard,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    prompter.say("")?;
    prompter.say("Review")?;
    for step in wizard.definition().steps() {
        prompter.say(format!("  {}", step.title))?;
        for rule in &step.fields {
            let value = wizard
                .field(&rule.name)
                .map(display_value)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "(not set)".to_string());
            prompter.say(format!("    {}: {value}", rule.label))?;
        }
    }
    Ok(())
}
