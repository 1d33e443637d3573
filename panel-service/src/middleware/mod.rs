pub mod admin;
pub mod auth;
pub mod resource_guard;

pub use admin::require_admin;
pub use auth::{auth_middleware, AuthPrincipal};
pub use resource_guard::{resource_guard_middleware, RouteGuard, SERVER_ID_PARAM};
