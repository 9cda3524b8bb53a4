//! Wizard step controller.
//!
//! A [`Wizard`] walks a [`WizardDefinition`] one step at a time. Moving
//! forward is gated on the current step's fields passing validation;
//! moving back is always allowed. Once the last step is reached the
//! collected [`FormState`] is handed to a [`Submitter`], and the wizard
//! resets itself when the submission succeeds.

use std::collections::HashSet;
use std::future::Future;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, WizardError};
use crate::form::FormState;
use crate::validation::{CrossFieldRule, FieldRule, ValidationErrors};

// ============================================================================
// StepDefinition
// ============================================================================

/// One page of a wizard: the fields it owns and how far along it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    /// Short title shown above the step.
    pub title: String,
    /// One-line description of what the step collects.
    pub description: String,
    /// Rules for the fields this step owns, in display order.
    pub fields: Vec<FieldRule>,
    /// Constraints between fields, checked with this step.
    pub cross_field_rules: Vec<CrossFieldRule>,
    /// Progress shown while this step is current (0-100).
    pub progress_percentage: u8,
}

impl StepDefinition {
    /// Creates a step with no fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        progress_percentage: u8,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            cross_field_rules: Vec::new(),
            progress_percentage,
        }
    }

    /// Adds a field to the step.
    #[must_use]
    pub fn with_field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Adds a cross-field constraint to the step.
    #[must_use]
    pub fn with_cross_field_rule(mut self, rule: CrossFieldRule) -> Self {
        self.cross_field_rules.push(rule);
        self
    }

    /// Returns `true` if this step owns `field`.
    #[must_use]
    pub fn owns(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.name == field)
    }

    /// Validates the fields this step owns.
    ///
    /// Field rules run first, in display order. A cross-field rule is only
    /// reported when its target field passed its own rule, so the user sees
    /// one message per field.
    #[must_use]
    pub fn validate(&self, form: &FormState) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for rule in &self.fields {
            if let Err(e) = rule.validate(form) {
                errors.push(e);
            }
        }
        for rule in &self.cross_field_rules {
            if let Err(e) = rule.validate(form) {
                if errors.for_field(&e.field).is_none() {
                    errors.push(e);
                }
            }
        }
        errors
    }
}

// ============================================================================
// WizardDefinition
// ============================================================================

/// An ordered, checked list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardDefinition {
    name: String,
    steps: Vec<StepDefinition>,
}

impl WizardDefinition {
    /// Creates a definition after checking its consistency.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidDefinition` if there are no steps, a
    /// progress value exceeds 100 or decreases from one step to the next,
    /// a field is owned by more than one step, or a cross-field rule reads
    /// a field no step owns.
    pub fn new(name: impl Into<String>, steps: Vec<StepDefinition>) -> Result<Self> {
        let name = name.into();
        if steps.is_empty() {
            return Err(WizardError::invalid_definition(format!(
                "wizard '{name}' has no steps"
            )));
        }

        let mut previous_progress = 0u8;
        let mut seen = HashSet::new();
        for step in &steps {
            if step.progress_percentage > 100 {
                return Err(WizardError::invalid_definition(format!(
                    "step '{}' has progress {}%, above 100%",
                    step.title, step.progress_percentage
                )));
            }
            if step.progress_percentage < previous_progress {
                return Err(WizardError::invalid_definition(format!(
                    "step '{}' has progress {}%, below the previous step's {previous_progress}%",
                    step.title, step.progress_percentage
                )));
            }
            previous_progress = step.progress_percentage;

            for field in &step.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(WizardError::invalid_definition(format!(
                        "field '{}' is owned by more than one step",
                        field.name
                    )));
                }
            }
        }

        for step in &steps {
            for rule in &step.cross_field_rules {
                if let Some(missing) = rule.fields().into_iter().find(|f| !seen.contains(f)) {
                    return Err(WizardError::invalid_definition(format!(
                        "step '{}' has a rule on unknown field '{missing}'",
                        step.title
                    )));
                }
            }
        }

        Ok(Self { name, steps })
    }

    /// Name of the wizard, used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Returns the step at `index`.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    /// Number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns the rule for `field`, searching every step.
    #[must_use]
    pub fn field_rule(&self, field: &str) -> Option<&FieldRule> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == field)
    }

    /// Returns the index of the step that owns `field`.
    #[must_use]
    pub fn owning_step(&self, field: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.owns(field))
    }
}

// ============================================================================
// Submitter
// ============================================================================

/// External collaborator that persists a completed form.
///
/// Implemented by the REST client; tests use in-memory fakes.
pub trait Submitter {
    /// What the backend returns for a successful submission.
    type Output;
    /// Failure reported by the backend or the transport.
    type Error: std::fmt::Display;

    /// Persists the assembled form.
    fn submit(
        &self,
        form: &FormState,
    ) -> impl Future<Output = std::result::Result<Self::Output, Self::Error>>;
}

// ============================================================================
// Wizard
// ============================================================================

/// Step controller for a multi-step creation form.
///
/// # Examples
///
/// ```
/// use classroom_wizard::{FieldRule, StepDefinition, Wizard, WizardDefinition};
///
/// let definition = WizardDefinition::new(
///     "example",
///     vec![
///         StepDefinition::new("Name", "Name the class", 50)
///             .with_field(FieldRule::text("name", "Name").required()),
///         StepDefinition::new("Details", "Anything else", 100),
///     ],
/// )
/// .unwrap();
///
/// let mut wizard = Wizard::new(definition);
/// assert!(wizard.go_next().is_err());
///
/// wizard.set_field("name", "Algebra I").unwrap();
/// assert_eq!(wizard.go_next().unwrap(), 1);
/// assert_eq!(wizard.progress_percentage(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct Wizard {
    definition: WizardDefinition,
    current: usize,
    form: FormState,
    error_message: Option<String>,
}

impl Wizard {
    /// Opens a wizard on its first step with an empty form.
    #[must_use]
    pub fn new(definition: WizardDefinition) -> Self {
        Self {
            definition,
            current: 0,
            form: FormState::new(),
            error_message: None,
        }
    }

    /// The definition this wizard walks.
    #[must_use]
    pub const fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    /// Index of the current step.
    #[must_use]
    pub const fn step_index(&self) -> usize {
        self.current
    }

    /// Number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.definition.step_count()
    }

    /// The current step's definition.
    #[must_use]
    pub fn current_step(&self) -> &StepDefinition {
        // `current` is always within bounds and definitions are never empty.
        &self.definition.steps[self.current]
    }

    /// Returns `true` on the first step.
    #[must_use]
    pub const fn is_first_step(&self) -> bool {
        self.current == 0
    }

    /// Returns `true` on the last step.
    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.step_count()
    }

    /// Progress of the current step.
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        self.current_step().progress_percentage
    }

    /// The message to display next to the form, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Values entered so far.
    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// Returns a field's current value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.form.get(name)
    }

    /// Sets a field owned by any step.
    ///
    /// Editing the form clears the displayed error message.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.definition.owning_step(name).is_none() {
            return Err(WizardError::unknown_field(name));
        }
        self.form.set(name, value);
        self.error_message = None;
        Ok(())
    }

    /// Removes a field's value.
    ///
    /// Like [`set_field`](Self::set_field), this clears the displayed error message.
    pub fn clear_field(&mut self, name: &str) -> Option<Value> {
        self.error_message = None;
        self.form.remove(name)
    }

    /// Merges prefilled values into the form.
    ///
    /// Either every key is accepted or the form is left untouched.
    pub fn prefill(&mut self, values: FormState) -> Result<()> {
        if let Some((unknown, _)) = values
            .iter()
            .find(|(name, _)| self.definition.owning_step(name).is_none())
        {
            return Err(WizardError::unknown_field(unknown));
        }
        for (name, value) in values.iter() {
            self.form.set(name, value.clone());
        }
        Ok(())
    }

    /// Validation errors for the step at `index`.
    #[must_use]
    pub fn step_errors(&self, index: usize) -> ValidationErrors {
        self.definition
            .step(index)
            .map(|step| step.validate(&self.form))
            .unwrap_or_default()
    }

    /// Returns `true` if every field of the step at `index` is valid.
    ///
    /// Out-of-range indices are never valid.
    #[must_use]
    pub fn is_step_valid(&self, index: usize) -> bool {
        self.definition
            .step(index)
            .is_some_and(|step| step.validate(&self.form).is_empty())
    }

    /// Advances to the next step if the current one is valid.
    ///
    /// Returns the new step index. On the last step a valid form leaves
    /// the index where it is.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Validation` with every failing field of the
    /// current step. The step index and form are unchanged and the first
    /// message becomes [`error_message`](Self::error_message).
    pub fn go_next(&mut self) -> Result<usize> {
        let errors = self.current_step().validate(&self.form);
        if let Some(first) = errors.first() {
            debug!(
                wizard = %self.definition.name(),
                step = self.current,
                field = %first.field,
                error_count = errors.len(),
                "Step validation failed"
            );
            self.error_message = Some(first.message.clone());
            return Err(WizardError::Validation(errors));
        }

        self.error_message = None;
        if !self.is_last_step() {
            self.current += 1;
            debug!(
                wizard = %self.definition.name(),
                step = self.current,
                progress = self.progress_percentage(),
                "Advanced to next step"
            );
        }
        Ok(self.current)
    }

    /// Moves back one step, stopping at the first. Never validates.
    pub fn go_previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.error_message = None;
        debug!(
            wizard = %self.definition.name(),
            step = self.current,
            "Moved to previous step"
        );
        self.current
    }

    /// Returns to the first step with an empty form.
    pub fn reset(&mut self) {
        self.current = 0;
        self.form.clear();
        self.error_message = None;
    }

    /// Submits the form from the last step.
    ///
    /// Every step is re-validated before the submitter is called. On
    /// success the wizard resets and the submitter's output is returned.
    ///
    /// # Errors
    ///
    /// - `WizardError::NotOnFinalStep` if called before the last step.
    /// - `WizardError::Validation` if any step has become invalid.
    /// - `WizardError::Submission` if the submitter fails. The step index
    ///   and form are kept so the caller can retry.
    pub async fn submit<S: Submitter>(&mut self, submitter: &S) -> Result<S::Output> {
        if !self.is_last_step() {
            return Err(WizardError::NotOnFinalStep {
                current: self.current + 1,
                total: self.step_count(),
            });
        }

        if let Some(errors) = self
            .definition
            .steps()
            .iter()
            .map(|step| step.validate(&self.form))
            .find(|errors| !errors.is_empty())
        {
            self.error_message = errors.first().map(|e| e.message.clone());
            return Err(WizardError::Validation(errors));
        }

        info!(
            wizard = %self.definition.name(),
            fields = self.form.len(),
            "Submitting wizard"
        );

        match submitter.submit(&self.form).await {
            Ok(output) => {
                info!(wizard = %self.definition.name(), "Submission succeeded");
                self.reset();
                Ok(output)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(
                    wizard = %self.definition.name(),
                    error = %message,
                    "Submission failed"
                );
                self.error_message = Some(message.clone());
                Err(WizardError::submission(message))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
