//! User administration. Every route here sits behind `require_admin`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    middleware::AuthPrincipal,
    models::{Grant, User, UserDetailResponse},
    services::ServiceError,
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetPermissionsRequest {
    pub server_permissions: Vec<Grant>,
}

#[derive(Debug, Serialize)]
pub struct IssueTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

pub async fn create_user(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    // Only a super admin hands out admin rights.
    if req.is_admin && !principal.is_super_admin {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only a super administrator can create administrators."
        )));
    }

    let user = User::new(req.username, req.display_name).with_admin(req.is_admin);
    state
        .users
        .insert_user(user.clone())
        .await
        .map_err(ServiceError::Internal)?;

    tracing::info!(
        user_id = %user.user_id,
        is_admin = user.is_admin,
        principal_id = %principal.id,
        "User created"
    );
    Ok((StatusCode::CREATED, Json(user.detail())))
}

/// User detail with server permissions.
pub async fn get_user_detail(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetailResponse>, AppError> {
    let user = state
        .users
        .find_user(&user_id)
        .await
        .map_err(ServiceError::Internal)?
        .ok_or(ServiceError::UserNotFound)?;

    Ok(Json(user.detail()))
}

/// Replace a user's server permissions. Every granted server must exist.
pub async fn set_user_permissions(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(user_id): Path<String>,
    Json(req): Json<SetPermissionsRequest>,
) -> Result<Json<UserDetailResponse>, AppError> {
    for grant in &req.server_permissions {
        state.servers.get_server(&grant.resource_id).await?;
    }

    let user = state
        .users
        .set_server_permissions(&user_id, req.server_permissions)
        .await
        .map_err(ServiceError::Internal)?
        .ok_or(ServiceError::UserNotFound)?;

    tracing::info!(
        user_id = %user.user_id,
        grants = user.server_permissions.len(),
        principal_id = %principal.id,
        "Server permissions updated"
    );
    Ok(Json(user.detail()))
}

/// Issue an access token for a user, e.g. when provisioning a client.
pub async fn issue_user_token(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(user_id): Path<String>,
) -> Result<Json<IssueTokenResponse>, AppError> {
    let user = state
        .users
        .find_user(&user_id)
        .await
        .map_err(ServiceError::Internal)?
        .ok_or(ServiceError::UserNotFound)?;

    if !user.enabled {
        return Err(AppError::Forbidden(anyhow::anyhow!("Account is disabled")));
    }

    let access_token = state.tokens.issue(&user.user_id)?;

    tracing::info!(user_id = %user.user_id, principal_id = %principal.id, "Access token issued");
    Ok(Json(IssueTokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.access_token_expiry_seconds(),
    }))
}
