use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims issued at login and checked by the REST middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Normalized (lowercase) username.
    pub sub: String,
    pub authorities: Vec<String>,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountStatusResponse {
    pub username: String,
    pub activated: bool,
}

#[derive(Debug, Deserialize)]
pub struct ActivateQuery {
    pub key: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub authorities: Vec<String>,
    pub token: String,
}

// -- Shares --

#[derive(Debug, Serialize, Deserialize)]
pub struct SharersResponse {
    pub status_id: String,
    pub usernames: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SharedResponse {
    pub status_id: String,
    pub shared: bool,
}
