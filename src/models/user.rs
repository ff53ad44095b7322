//! Signed-in user model.

use serde::{Deserialize, Serialize};

/// Current user from `GET /v1/users/me/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Token to echo back in the `X-CSRFToken` header on writes.
    #[serde(default)]
    pub csrf_token: String,
    /// Whether the latest terms of service still need to be approved.
    #[serde(default)]
    pub terms_of_service_approval_needed: bool,
}
