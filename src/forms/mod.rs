//! Application form: value store, validation, field adapter and wizard.

pub mod field;
pub mod form_state;
pub mod steps;
pub mod validation;
pub mod wizard;

pub use field::FormField;
pub use form_state::{FieldError, FormState};
pub use steps::benefit_application_steps;
pub use validation::{Condition, FieldSchema, Rule};
pub use wizard::{StepDefinition, StepOutcome, StepPersistence, Wizard};
