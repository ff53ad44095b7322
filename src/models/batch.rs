//! Batch proposal model.
//!
//! A batch groups handled applications that go through one decision in the
//! city's case management system (Ahjo) before payment.

use serde::{Deserialize, Serialize};

/// Processing status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Draft,
    /// Report created, not yet sent for a decision.
    #[serde(rename = "exported_ahjo_report")]
    AhjoReportCreated,
    /// Sent for a decision; waiting for the inspection form.
    #[serde(rename = "awaiting_ahjo_decision")]
    AwaitingForDecision,
    #[serde(rename = "accepted")]
    DecidedAccepted,
    #[serde(rename = "rejected")]
    DecidedRejected,
    /// Returned without a decision.
    Returned,
    SentToTalpa,
    Completed,
    /// A status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::AhjoReportCreated => "exported_ahjo_report",
            Self::AwaitingForDecision => "awaiting_ahjo_decision",
            Self::DecidedAccepted => "accepted",
            Self::DecidedRejected => "rejected",
            Self::Returned => "returned",
            Self::SentToTalpa => "sent_to_talpa",
            Self::Completed => "completed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision proposed for every application in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalForDecision {
    Accepted,
    Rejected,
}

/// Which batch action panel applies to a batch in its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionStage {
    /// Decision metadata still has to be filled in.
    InspectionForm,
    /// Decision registered; batch can be completed.
    Completion,
    /// No inspection actions for this status.
    None,
}

/// Batch as returned by the handler batch endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProposal {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub proposal_for_decision: Option<ProposalForDecision>,
    #[serde(default)]
    pub decision_maker_name: Option<String>,
    #[serde(default)]
    pub decision_maker_title: Option<String>,
    #[serde(default)]
    pub section_of_the_law: Option<String>,
    /// Decision date (ISO date).
    #[serde(default)]
    pub decision_date: Option<String>,
    #[serde(default)]
    pub expert_inspector_name: Option<String>,
    #[serde(default)]
    pub expert_inspector_title: Option<String>,
}

impl BatchProposal {
    /// Select the action panel for this batch.
    pub fn inspection_stage(&self) -> InspectionStage {
        match self.status {
            BatchStatus::AwaitingForDecision => InspectionStage::InspectionForm,
            BatchStatus::DecidedAccepted => InspectionStage::Completion,
            _ => InspectionStage::None,
        }
    }
}

/// Decision metadata entered by the handler when completing a batch.
///
/// `decision_date` is typed in the UI format (`d.M.yyyy`) and converted to
/// `yyyy-MM-dd` before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCompletionDetails {
    pub decision_maker_name: String,
    pub decision_maker_title: String,
    pub section_of_the_law: String,
    pub decision_date: String,
    pub expert_inspector_name: String,
    pub expert_inspector_title: String,
}

/// Response of the batch status change endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusChange {
    #[serde(default)]
    pub id: Option<String>,
    pub status: BatchStatus,
    #[serde(default)]
    pub previous_status: Option<BatchStatus>,
    #[serde(default)]
    pub decision: Option<ProposalForDecision>,
}
