use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::models::{Grant, User};

/// Lookup of panel accounts, consulted once per authenticated request.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, anyhow::Error>;
    async fn insert_user(&self, user: User) -> Result<(), anyhow::Error>;
    /// Replace the user's grants. `None` when the user does not exist.
    async fn set_server_permissions(
        &self,
        user_id: &str,
        grants: Vec<Grant>,
    ) -> Result<Option<User>, anyhow::Error>;
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, anyhow::Error> {
        Ok(self.users.get(user_id).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, user: User) -> Result<(), anyhow::Error> {
        self.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn set_server_permissions(
        &self,
        user_id: &str,
        grants: Vec<Grant>,
    ) -> Result<Option<User>, anyhow::Error> {
        Ok(self.users.get_mut(user_id).map(|mut user| {
            user.server_permissions = grants;
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermissionLevel;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryUserStore::new();
        let user = User::new("alice".to_string(), Some("Alice".to_string()));
        let id = user.user_id.clone();
        store.insert_user(user).await.unwrap();

        let found = store.find_user(&id).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(store.find_user("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_server_permissions_replaces_grants() {
        let store = InMemoryUserStore::new();
        let user = User::new("bob".to_string(), None)
            .with_grant(Grant::new("srv-1", PermissionLevel::Owner));
        let id = user.user_id.clone();
        store.insert_user(user).await.unwrap();

        let updated = store
            .set_server_permissions(&id, vec![Grant::new("srv-2", PermissionLevel::Viewer)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            updated.server_permissions,
            vec![Grant::new("srv-2", PermissionLevel::Viewer)]
        );

        let stored = store.find_user(&id).await.unwrap().unwrap();
        assert_eq!(stored.server_permissions, updated.server_permissions);

        assert!(store
            .set_server_permissions("missing", Vec::new())
            .await
            .unwrap()
            .is_none());
    }
}
