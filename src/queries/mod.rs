//! Query and mutation hooks.
//!
//! Each hook runs a backend request through the session and turns failures
//! into UI state: page errors, notifications or redirects.

pub mod application_form;
pub mod application_list;
pub mod batch_complete;
pub mod user;

pub use application_form::{open_application_wizard, BackendStepPersistence};
pub use application_list::{application_list, fetch_applications, APPLICATIONS_LIST_QUERY};
pub use batch_complete::complete_batch;
pub use user::{approve_terms, fetch_current_user, start_user_refresh, UserRefreshHandle};
