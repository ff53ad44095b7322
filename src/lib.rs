//! Benefit Portal - client core for the benefit application portal.
//!
//! Fetches and caches applications, shapes them into list view-models, drives
//! the multi-step application wizard and runs the handler's batch completion.
//! Rendering is left to a hosting shell, which drains [`services::UiEvent`]s
//! for toasts, redirects and scrolling.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod forms;
pub mod i18n;
pub mod models;
pub mod queries;
pub mod routes;
pub mod services;
pub mod session;
pub mod view_models;

pub use config::PortalConfig;
pub use error::AppError;
pub use session::Session;
