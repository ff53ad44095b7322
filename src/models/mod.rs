//! Data models for the portal.
//!
//! These models mirror the backend's JSON payloads (snake_case on the wire)
//! and are the input to the view-model mappers.

pub mod application;
pub mod batch;
pub mod step;
pub mod user;

// Re-exports for convenient access
pub use application::{ApplicationRecord, ApplicationStatus, BatchReference, Employee};
pub use batch::{
    BatchCompletionDetails, BatchProposal, BatchStatus, BatchStatusChange, InspectionStage,
    ProposalForDecision,
};
pub use step::ApplicationStep;
pub use user::User;
