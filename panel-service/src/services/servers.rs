use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::ServiceError;
use crate::models::{Server, ServerUpdate};

/// Persistence for managed servers.
#[async_trait]
pub trait ServerStore: Send + Sync {
    async fn list_servers(&self) -> Result<Vec<Server>, ServiceError>;
    async fn get_server(&self, server_id: &str) -> Result<Server, ServiceError>;
    async fn insert_server(&self, server: Server) -> Result<(), ServiceError>;
    async fn update_server(
        &self,
        server_id: &str,
        update: ServerUpdate,
    ) -> Result<Server, ServiceError>;
    async fn delete_server(&self, server_id: &str) -> Result<(), ServiceError>;
    async fn set_url_enabled(
        &self,
        server_id: &str,
        url_id: &str,
        enabled: bool,
    ) -> Result<Server, ServiceError>;
    async fn add_url(&self, server_id: &str, url: &str) -> Result<Server, ServiceError>;
    async fn delete_url(&self, server_id: &str, url_id: &str) -> Result<Server, ServiceError>;
    async fn set_folder_enabled(
        &self,
        server_id: &str,
        folder_id: &str,
        enabled: bool,
    ) -> Result<Server, ServiceError>;
}

#[derive(Clone, Default)]
pub struct InMemoryServerStore {
    servers: Arc<DashMap<String, Server>>,
}

impl InMemoryServerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to the stored server under its shard lock.
    fn modify<F>(&self, server_id: &str, f: F) -> Result<Server, ServiceError>
    where
        F: FnOnce(&mut Server) -> Result<(), ServiceError>,
    {
        let mut entry = self
            .servers
            .get_mut(server_id)
            .ok_or(ServiceError::ServerNotFound)?;
        f(entry.value_mut())?;
        Ok(entry.value().clone())
    }
}

#[async_trait]
impl ServerStore for InMemoryServerStore {
    async fn list_servers(&self) -> Result<Vec<Server>, ServiceError> {
        let mut servers: Vec<Server> = self.servers.iter().map(|s| s.value().clone()).collect();
        servers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(servers)
    }

    async fn get_server(&self, server_id: &str) -> Result<Server, ServiceError> {
        self.servers
            .get(server_id)
            .map(|s| s.value().clone())
            .ok_or(ServiceError::ServerNotFound)
    }

    async fn insert_server(&self, server: Server) -> Result<(), ServiceError> {
        self.servers.insert(server.id.clone(), server);
        Ok(())
    }

    async fn update_server(
        &self,
        server_id: &str,
        update: ServerUpdate,
    ) -> Result<Server, ServiceError> {
        self.modify(server_id, |server| {
            update.apply(server);
            Ok(())
        })
    }

    async fn delete_server(&self, server_id: &str) -> Result<(), ServiceError> {
        self.servers
            .remove(server_id)
            .map(|_| ())
            .ok_or(ServiceError::ServerNotFound)
    }

    async fn set_url_enabled(
        &self,
        server_id: &str,
        url_id: &str,
        enabled: bool,
    ) -> Result<Server, ServiceError> {
        self.modify(server_id, |server| {
            server.url_mut(url_id).ok_or(ServiceError::UrlNotFound)?.enabled = enabled;
            server.touch();
            Ok(())
        })
    }

    async fn add_url(&self, server_id: &str, url: &str) -> Result<Server, ServiceError> {
        self.modify(server_id, |server| {
            server.add_url(url);
            server.touch();
            Ok(())
        })
    }

    async fn delete_url(&self, server_id: &str, url_id: &str) -> Result<Server, ServiceError> {
        self.modify(server_id, |server| {
            let before = server.urls.len();
            server.urls.retain(|u| u.id != url_id);
            if server.urls.len() == before {
                return Err(ServiceError::UrlNotFound);
            }
            server.touch();
            Ok(())
        })
    }

    async fn set_folder_enabled(
        &self,
        server_id: &str,
        folder_id: &str,
        enabled: bool,
    ) -> Result<Server, ServiceError> {
        self.modify(server_id, |server| {
            server
                .folder_mut(folder_id)
                .ok_or(ServiceError::FolderNotFound)?
                .enabled = enabled;
            server.touch();
            Ok(())
        })
    }
}
