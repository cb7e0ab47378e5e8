use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{EncodingKey, Header, encode};
use rand::RngCore;
use rand_core::OsRng;
use tracing::{error, info, warn};

use murmur_db::Database;
use murmur_types::api::{
    AccountStatusResponse, ActivateQuery, Claims, LoginRequest, LoginResponse, RegisterRequest,
};
use murmur_types::models::Authority;

use crate::cache::ShareCache;
use crate::credentials::CredentialLookupAdapter;
use crate::error::AuthError;
use crate::shares::ShareRecordService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub shares: ShareRecordService,
    pub credentials: CredentialLookupAdapter,
    pub jwt_secret: String,
    /// Skip the activation step for new accounts.
    pub auto_activate: bool,
}

impl AppStateInner {
    pub fn new(
        db: Arc<Database>,
        cache: Arc<dyn ShareCache>,
        jwt_secret: String,
        auto_activate: bool,
    ) -> Self {
        Self {
            shares: ShareRecordService::new(db.clone(), cache),
            credentials: CredentialLookupAdapter::new(db.clone()),
            db,
            jwt_secret,
            auto_activate,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Validate input
    if !valid_username(&req.username) {
        return Err(StatusCode::BAD_REQUEST);
    }
    if req.password.len() < 8 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let username = req.username.to_lowercase();

    // Check if username is taken
    if state
        .db
        .account_exists(&username)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        return Err(StatusCode::CONFLICT);
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .to_string();

    let activation_key = (!state.auto_activate).then(generate_activation_key);

    state
        .db
        .create_account(
            &username,
            &password_hash,
            state.auto_activate,
            activation_key.as_deref(),
            &[Authority::USER],
        )
        .map_err(|e| {
            error!("Failed to create account {}: {}", username, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    // No mailer: the key goes to the log for an operator to hand out.
    match &activation_key {
        Some(key) => info!("Account {} registered, activation key {}", username, key),
        None => info!("Account {} registered and activated", username),
    }

    Ok((
        StatusCode::CREATED,
        Json(AccountStatusResponse {
            username,
            activated: state.auto_activate,
        }),
    ))
}

pub async fn activate(
    State(state): State<AppState>,
    Query(query): Query<ActivateQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let username = state
        .db
        .activate_account(&query.key)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    info!("Account {} activated", username);

    Ok(Json(AccountStatusResponse {
        username,
        activated: true,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Not-found and not-activated are only told apart in the log.
    let details = state
        .credentials
        .load_account_details(&req.username)
        .map_err(|e| {
            match &e {
                AuthError::Repository(_) => error!("Account lookup failed: {}", e),
                _ => warn!("Login refused: {}", e),
            }
            e.status_code()
        })?;

    // Verify password
    let parsed_hash =
        PasswordHash::new(&details.password_hash).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            warn!("Login refused: bad password for {}", details.username);
            StatusCode::UNAUTHORIZED
        })?;

    let authorities: Vec<String> = details
        .authorities
        .iter()
        .map(|a| a.as_str().to_string())
        .collect();

    let token = create_token(&state.jwt_secret, &details.username, &authorities)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(LoginResponse {
        username: details.username,
        authorities,
        token,
    }))
}

fn valid_username(username: &str) -> bool {
    (3..=32).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn generate_activation_key() -> String {
    let mut bytes = [0u8; 24];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn create_token(secret: &str, username: &str, authorities: &[String]) -> anyhow::Result<String> {
    let claims = Claims {
        sub: username.to_string(),
        authorities: authorities.to_vec(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
