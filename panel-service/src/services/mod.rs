//! Services layer for panel-service.
//!
//! Authorization, token handling and the stores behind the API.

pub mod bootstrap;
pub mod error;
pub mod guard;
pub mod metrics;
pub mod servers;
pub mod tasks;
mod token;
pub mod users;

pub use error::ServiceError;
pub use guard::{Decision, Denial, DenialReason, Operation, ResourceGuard};
pub use servers::{InMemoryServerStore, ServerStore};
pub use tasks::{InMemoryTaskStore, TaskStore};
pub use token::{AccessTokenClaims, TokenService};
pub use users::{InMemoryUserStore, UserStore};
