//! Application form steps.

use serde::{Deserialize, Serialize};

/// Step of the benefit application form, as stored on the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApplicationStep {
    #[serde(rename = "step_1")]
    CompanyDetails,
    #[serde(rename = "step_2")]
    EmployeeDetails,
    #[serde(rename = "step_3")]
    Attachments,
    #[serde(rename = "step_4")]
    Summary,
    #[serde(rename = "step_5")]
    PowerOfAttorney,
    #[serde(rename = "step_6")]
    TermsAndSend,
}

impl ApplicationStep {
    pub const ALL: [ApplicationStep; 6] = [
        Self::CompanyDetails,
        Self::EmployeeDetails,
        Self::Attachments,
        Self::Summary,
        Self::PowerOfAttorney,
        Self::TermsAndSend,
    ];

    /// Wire representation (`step_1` .. `step_6`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyDetails => "step_1",
            Self::EmployeeDetails => "step_2",
            Self::Attachments => "step_3",
            Self::Summary => "step_4",
            Self::PowerOfAttorney => "step_5",
            Self::TermsAndSend => "step_6",
        }
    }

    /// One-based step number shown in the stepper.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or(1)
    }
}

impl Default for ApplicationStep {
    fn default() -> Self {
        Self::CompanyDetails
    }
}

impl std::fmt::Display for ApplicationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
