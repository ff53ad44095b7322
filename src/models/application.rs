//! Application record model, as returned by the backend.

use serde::{Deserialize, Serialize};

/// Status of a benefit application.
///
/// Unknown wire values land in [`ApplicationStatus::Unknown`] instead of
/// failing deserialization of a whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    /// Handler has requested more information from the applicant.
    AdditionalInformationNeeded,
    Received,
    Handling,
    Accepted,
    Rejected,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    /// Every status the backend is known to send, in filter order.
    pub const ALL: [ApplicationStatus; 7] = [
        Self::Draft,
        Self::AdditionalInformationNeeded,
        Self::Received,
        Self::Handling,
        Self::Accepted,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::AdditionalInformationNeeded => "additional_information_needed",
            Self::Received => "received",
            Self::Handling => "handling",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// camelCase form used in translation keys.
    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::AdditionalInformationNeeded => "additionalInformationNeeded",
            Self::Received => "received",
            Self::Handling => "handling",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Statuses in which the applicant may still edit the application.
    pub fn is_applicant_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::AdditionalInformationNeeded)
    }

    /// Statuses in which a handler may edit the application.
    ///
    /// Drafts are included because handlers enter paper applications.
    pub fn is_handler_editable(&self) -> bool {
        matches!(
            self,
            Self::Draft | Self::Received | Self::Handling | Self::AdditionalInformationNeeded
        )
    }

    /// Final statuses shown in the handler's archive.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Cancelled)
    }
}

impl From<&str> for ApplicationStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "draft" => Self::Draft,
            "additional_information_needed" | "info_required" => {
                Self::AdditionalInformationNeeded
            }
            "received" => Self::Received,
            "handling" => Self::Handling,
            "accepted" | "approved" => Self::Accepted,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee sub-record of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Reference to the batch an application has been grouped into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReference {
    pub id: String,
    #[serde(default)]
    pub status: Option<super::batch::BatchStatus>,
}

/// Application record from the simplified list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Backend UUID; drafts created client-side may not have one yet.
    #[serde(default)]
    pub id: String,

    pub status: ApplicationStatus,

    #[serde(default)]
    pub employee: Option<Employee>,

    /// Human-facing running number.
    #[serde(default)]
    pub application_number: Option<i64>,

    /// Submission timestamp (ISO 8601).
    #[serde(default)]
    pub submitted_at: Option<String>,

    /// Last modification timestamp (ISO 8601).
    #[serde(default)]
    pub modified_at: Option<String>,

    /// Deadline for the applicant to provide requested information (ISO date).
    #[serde(default)]
    pub additional_information_needed_by: Option<String>,

    #[serde(default)]
    pub unread_messages_count: Option<u32>,

    #[serde(default)]
    pub batch: Option<BatchReference>,
}

impl ApplicationRecord {
    /// Create a bare record with the given id and status.
    pub fn new(id: impl Into<String>, status: ApplicationStatus) -> Self {
        Self {
            id: id.into(),
            status,
            employee: None,
            application_number: None,
            submitted_at: None,
            modified_at: None,
            additional_information_needed_by: None,
            unread_messages_count: None,
            batch: None,
        }
    }
}
