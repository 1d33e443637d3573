//! User model - panel accounts and their server permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Grant, Principal};

/// User entity.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub enabled: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
    pub server_permissions: Vec<Grant>,
    pub created_utc: DateTime<Utc>,
}

impl User {
    /// Create a new, enabled, non-admin user.
    pub fn new(username: String, display_name: Option<String>) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            username,
            display_name,
            enabled: true,
            is_admin: false,
            is_super_admin: false,
            server_permissions: Vec::new(),
            created_utc: Utc::now(),
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_super_admin(mut self, is_super_admin: bool) -> Self {
        self.is_super_admin = is_super_admin;
        self
    }

    pub fn with_grant(mut self, grant: Grant) -> Self {
        self.server_permissions.push(grant);
        self
    }

    /// Snapshot of the user as the actor of a request.
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.user_id.clone(),
            is_admin: self.is_admin,
            is_super_admin: self.is_super_admin,
            grants: self.server_permissions.clone(),
        }
    }

    /// Convert to the detail response.
    pub fn detail(&self) -> UserDetailResponse {
        UserDetailResponse::from(self.clone())
    }
}

/// User detail returned to administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub enabled: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
    pub server_permissions: Vec<Grant>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDetailResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.user_id,
            username: u.username,
            display_name: u.display_name,
            enabled: u.enabled,
            is_admin: u.is_admin,
            is_super_admin: u.is_super_admin,
            server_permissions: u.server_permissions,
            created_at: u.created_utc,
        }
    }
}
