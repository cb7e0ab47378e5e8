use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tokio::task::JoinError;
use tracing::{debug, error};

use murmur_types::api::{Claims, SharedResponse, SharersResponse};

use crate::auth::AppState;
use crate::error::ShareError;

/// Record that the caller reshared `status_id`.
pub async fn share_status(
    State(state): State<AppState>,
    Path(status_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    // Run blocking DB work off the async runtime
    let shares = state.shares.clone();
    tokio::task::spawn_blocking(move || shares.record_share(&status_id, &claims.sub))
        .await
        .map_err(join_failure)?
        .map_err(share_failure)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_sharers(
    State(state): State<AppState>,
    Path(status_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let shares = state.shares.clone();
    let id = status_id.clone();
    let usernames = tokio::task::spawn_blocking(move || shares.list_sharers(&id))
        .await
        .map_err(join_failure)?
        .map_err(share_failure)?;

    Ok(Json(SharersResponse {
        status_id,
        usernames,
    }))
}

pub async fn has_been_shared(
    State(state): State<AppState>,
    Path(status_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let shares = state.shares.clone();
    let id = status_id.clone();
    let shared = tokio::task::spawn_blocking(move || shares.has_been_shared(&id))
        .await
        .map_err(join_failure)?
        .map_err(share_failure)?;

    Ok(Json(SharedResponse { status_id, shared }))
}

fn join_failure(e: JoinError) -> StatusCode {
    error!("spawn_blocking join error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn share_failure(e: ShareError) -> StatusCode {
    match &e {
        ShareError::Store(_) => error!("{}", e),
        _ => debug!("Rejected share request: {}", e),
    }
    e.status_code()
}
