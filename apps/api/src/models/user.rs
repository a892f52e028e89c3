use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity record owned by the hosted auth service.
/// Only the id and email are ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Display string used by the navigation chrome.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or("Signed in")
    }
}
