use axum::{extract::Request, middleware::Next, response::Response};
use service_core::error::AppError;

use super::auth::principal_from_extensions;

/// Middleware restricting user administration to global admins.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let principal = principal_from_extensions(request.extensions())?;

    if !principal.is_global_admin() {
        tracing::warn!(
            principal_id = %principal.id,
            path = %request.uri().path(),
            "Non-admin attempted an administrative action"
        );
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "This action requires administrator permissions."
        )));
    }

    Ok(next.run(request).await)
}
