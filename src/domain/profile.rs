//! User Profile Entity
//!
//! Role-scoped profile documents written once on first sign-in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed-in identity handed over by the auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Who is signing in; decides the profile collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Tech,
    FleetManager,
    Customer,
}

impl Role {
    /// Customers and fleet managers share one collection
    pub fn collection(&self) -> &'static str {
        match self {
            Role::Tech => "Techusers",
            Role::FleetManager | Role::Customer => "FleetManagerusers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_identity(identity: &AuthIdentity, created_at: DateTime<Utc>) -> Self {
        Self {
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            created_at,
        }
    }
}
