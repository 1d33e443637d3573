//! First-run provisioning of a super administrator.

use super::{TokenService, UserStore};
use crate::models::User;

/// Create a super-admin account and an access token for it.
///
/// Used when the service starts against an empty user store so the first
/// operator can sign in and grant permissions to others.
pub async fn bootstrap_super_admin(
    users: &dyn UserStore,
    tokens: &TokenService,
    username: &str,
) -> Result<(User, String), anyhow::Error> {
    let user = User::new(username.to_string(), None).with_super_admin(true);
    users.insert_user(user.clone()).await?;
    let token = tokens.issue(&user.user_id)?;

    tracing::info!(user_id = %user.user_id, username = %username, "Bootstrapped super admin");
    Ok((user, token))
}
