use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service_core::error::AppError;
use std::sync::Arc;

use crate::{models::Principal, AppState};

/// Middleware to require authentication.
///
/// Resolves the bearer token to a [`Principal`] snapshot and stores it in
/// request extensions for the guards and handlers that follow.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Missing or invalid Authorization header"
        )));
    };

    let claims = state.tokens.validate(bearer.token()).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
    })?;

    let user = state
        .users
        .find_user(&claims.sub)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %claims.sub, "User lookup failed");
            AppError::InternalError(e)
        })?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Unknown user")))?;

    if !user.enabled {
        tracing::warn!(user_id = %user.user_id, "Disabled user attempted access");
        return Err(AppError::Forbidden(anyhow::anyhow!("Account is disabled")));
    }

    req.extensions_mut().insert(Arc::new(user.to_principal()));

    Ok(next.run(req).await)
}

/// Extractor for the authenticated principal.
///
/// Only valid behind [`auth_middleware`]; a missing principal is a routing
/// bug and surfaces as 500.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Arc<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_extensions(&parts.extensions).map(AuthPrincipal)
    }
}

pub(crate) fn principal_from_extensions(
    extensions: &axum::http::Extensions,
) -> Result<Arc<Principal>, AppError> {
    extensions.get::<Arc<Principal>>().cloned().ok_or_else(|| {
        tracing::error!("Principal missing from request extensions");
        AppError::InternalError(anyhow::anyhow!(
            "Principal missing from request extensions"
        ))
    })
}
