//! Multi-step application wizard.
//!
//! The wizard owns the form state of one application. `next` validates the
//! current step and saves it before advancing, `back` and `jump_to` move
//! freely, and `submit` performs the final send from the last step. `save`
//! stores a draft of the current step as is, and `delete` discards the
//! application. Only one backend call may be in flight; navigation is
//! refused until it settles.

use super::form_state::FormState;
use super::validation::{self, FieldSchema};
use crate::error::AppError;
use crate::i18n::Translations;
use crate::models::ApplicationStep;
use crate::services::events::{EventBus, Notification, UiEvent};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

const ACTIONS_BASE: &str = "common:applications.actions";

/// Fields belonging to one wizard step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub step: ApplicationStep,
    pub fields: Vec<FieldSchema>,
}

impl StepDefinition {
    pub fn new(step: ApplicationStep, fields: Vec<FieldSchema>) -> Self {
        Self { step, fields }
    }
}

/// Where step data goes.
pub trait StepPersistence: Send + Sync {
    /// Save a completed intermediate step.
    fn save(
        &self,
        step: ApplicationStep,
        values: &Value,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Send the finished application.
    fn submit(&self, values: &Value) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Discard the application.
    fn delete(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Result of a forward transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The step was saved and the wizard moved on.
    Advanced(ApplicationStep),
    /// Validation failed; errors are in the form state and the step is unchanged.
    Invalid(Vec<String>),
    /// The application was sent.
    Submitted,
}

/// Clears the in-flight flag when the save finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, AppError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| AppError::busy("Application is being saved"))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Wizard<P> {
    steps: Vec<StepDefinition>,
    index: AtomicUsize,
    pending: AtomicBool,
    form: Mutex<FormState>,
    persistence: P,
    events: EventBus,
    translations: Translations,
}

impl<P: StepPersistence> Wizard<P> {
    pub fn new(
        steps: Vec<StepDefinition>,
        form: FormState,
        persistence: P,
        events: EventBus,
        translations: Translations,
    ) -> Result<Self, AppError> {
        if steps.is_empty() {
            return Err(AppError::invalid_input("Wizard needs at least one step"));
        }
        Ok(Self {
            steps,
            index: AtomicUsize::new(0),
            pending: AtomicBool::new(false),
            form: Mutex::new(form),
            persistence,
            events,
            translations,
        })
    }

    /// Resume at a previously saved step. Unknown steps keep the first step.
    pub fn resume_at(self, step: ApplicationStep) -> Self {
        if let Some(index) = self.position(step) {
            self.index.store(index, Ordering::Release);
        }
        self
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub fn current_step(&self) -> ApplicationStep {
        self.current_definition().step
    }

    pub fn is_first_step(&self) -> bool {
        self.current_index() == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_index() + 1 == self.steps.len()
    }

    /// Whether a save or submit is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Label of the primary button: continue, or send on the last step.
    pub fn primary_action_label(&self) -> String {
        let action = if self.is_last_step() { "send" } else { "continue" };
        self.translations.t(&format!("{}.{}", ACTIONS_BASE, action))
    }

    /// Schema of a field on any step.
    pub fn field_schema(&self, id: &str) -> Option<&FieldSchema> {
        self.steps
            .iter()
            .flat_map(|definition| definition.fields.iter())
            .find(|schema| schema.id == id)
    }

    /// Locked form state. Do not hold the guard across an await.
    pub fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and save the current step, then advance.
    pub async fn next(&self) -> Result<StepOutcome, AppError> {
        let _in_flight = InFlight::acquire(&self.pending)?;
        if self.is_last_step() {
            return Err(AppError::invalid_input(
                "The last step is sent with submit",
            ));
        }

        let index = self.current_index();
        let definition = self.current_definition();
        let values = match self.validate(definition) {
            Ok(values) => values,
            Err(invalid) => {
                log::debug!("{} has {} invalid field(s)", definition.step, invalid.len());
                return Ok(StepOutcome::Invalid(invalid));
            }
        };

        if let Err(e) = self.persistence.save(definition.step, &values).await {
            self.report_failure(definition.step, &e);
            return Err(e);
        }

        let next = (index + 1).min(self.steps.len() - 1);
        self.index.store(next, Ordering::Release);
        self.events.emit(UiEvent::ScrollToTop);
        log::info!("Saved {}, moved to {}", definition.step, self.current_step());
        Ok(StepOutcome::Advanced(self.current_step()))
    }

    /// Go to the previous step without validating.
    pub fn back(&self) -> Result<ApplicationStep, AppError> {
        self.ensure_idle()?;
        let index = self.current_index().saturating_sub(1);
        self.move_to(index);
        Ok(self.current_step())
    }

    /// Jump to any step, e.g. from an edit shortcut on the summary.
    pub fn jump_to(&self, step: ApplicationStep) -> Result<ApplicationStep, AppError> {
        self.ensure_idle()?;
        let index = self.position(step).ok_or_else(|| {
            AppError::invalid_input_field(format!("{} is not part of this form", step), "step")
        })?;
        self.move_to(index);
        Ok(step)
    }

    /// Validate the last step and send the application.
    pub async fn submit(&self) -> Result<StepOutcome, AppError> {
        let _in_flight = InFlight::acquire(&self.pending)?;
        if !self.is_last_step() {
            return Err(AppError::invalid_input(
                "Application can only be sent from the last step",
            ));
        }

        let definition = self.current_definition();
        let values = match self.validate(definition) {
            Ok(values) => values,
            Err(invalid) => return Ok(StepOutcome::Invalid(invalid)),
        };

        if let Err(e) = self.persistence.submit(&values).await {
            self.report_failure(definition.step, &e);
            return Err(e);
        }

        log::info!("Application submitted");
        Ok(StepOutcome::Submitted)
    }

    /// Save the current step without validating it, e.g. to continue later.
    /// The wizard stays on the step.
    pub async fn save(&self) -> Result<ApplicationStep, AppError> {
        let _in_flight = InFlight::acquire(&self.pending)?;
        let step = self.current_step();
        let values = self.form().values().clone();

        if let Err(e) = self.persistence.save(step, &values).await {
            self.report_failure(step, &e);
            return Err(e);
        }

        log::info!("Saved draft of {}", step);
        Ok(step)
    }

    /// Delete the application.
    pub async fn delete(&self) -> Result<(), AppError> {
        let _in_flight = InFlight::acquire(&self.pending)?;

        if let Err(e) = self.persistence.delete().await {
            log::error!("Failed to delete application: {}", e);
            self.notify_generic_error();
            return Err(e);
        }

        log::info!("Application deleted");
        Ok(())
    }

    fn current_definition(&self) -> &StepDefinition {
        let index = self.current_index().min(self.steps.len() - 1);
        &self.steps[index]
    }

    fn position(&self, step: ApplicationStep) -> Option<usize> {
        self.steps.iter().position(|definition| definition.step == step)
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.is_pending() {
            return Err(AppError::busy("Application is being saved"));
        }
        Ok(())
    }

    fn move_to(&self, index: usize) {
        if self.index.swap(index, Ordering::AcqRel) != index {
            self.events.emit(UiEvent::ScrollToTop);
        }
    }

    fn validate(&self, definition: &StepDefinition) -> Result<Value, Vec<String>> {
        let mut form = self.form();
        let invalid = validation::validate_fields(&definition.fields, &mut form);
        if invalid.is_empty() {
            Ok(form.values().clone())
        } else {
            Err(invalid)
        }
    }

    fn report_failure(&self, step: ApplicationStep, error: &AppError) {
        log::error!("Failed to save {}: {}", step, error);
        self.notify_generic_error();
    }

    fn notify_generic_error(&self) {
        self.events.notify(Notification::error(
            self.translations.t("common:error.generic.label"),
            self.translations.t("common:error.generic.text"),
        ));
    }
}
