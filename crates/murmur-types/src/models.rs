use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One reshare event: `sharer_username` republished the status `status_id`.
/// Facts are append-only; nothing updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareFact {
    pub status_id: Uuid,
    pub sharer_username: String,
    pub shared_at: DateTime<Utc>,
}

impl ShareFact {
    pub fn new(status_id: Uuid, sharer_username: impl Into<String>) -> Self {
        Self {
            status_id,
            sharer_username: sharer_username.into(),
            shared_at: Utc::now(),
        }
    }
}

/// Read-only account projection used by the login flow.
/// Not serializable: it carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub activated: bool,
    pub authorities: Vec<String>,
}

/// A granted role, e.g. `ROLE_USER`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub const USER: &'static str = "ROLE_USER";
    pub const ADMIN: &'static str = "ROLE_ADMIN";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Authority {
    fn from(role: String) -> Self {
        Self(role)
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the authentication layer needs to verify a login: the normalized
/// username, the stored hash and the granted authorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub username: String,
    pub password_hash: String,
    pub authorities: Vec<Authority>,
}

impl AccountDetails {
    pub fn has_authority(&self, role: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == role)
    }
}
