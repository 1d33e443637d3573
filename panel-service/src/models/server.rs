//! Server model - media servers managed through the panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    Jellyfin,
    Navidrome,
    Subsonic,
}

/// One address the panel can reach a server on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerUrl {
    pub id: String,
    pub url: String,
    pub enabled: bool,
}

/// A library folder exposed by a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFolder {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub server_type: ServerType,
    /// Server accepts requests without per-user credentials.
    pub no_credential: bool,
    pub urls: Vec<ServerUrl>,
    pub folders: Vec<ServerFolder>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Server {
    pub fn new(name: String, server_type: ServerType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            server_type,
            no_credential: false,
            urls: Vec::new(),
            folders: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.add_url(url);
        self
    }

    pub fn with_folder(mut self, name: impl Into<String>) -> Self {
        self.folders.push(ServerFolder {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            enabled: true,
        });
        self
    }

    /// Append an enabled URL and return its id.
    pub fn add_url(&mut self, url: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.urls.push(ServerUrl {
            id: id.clone(),
            url: url.into(),
            enabled: true,
        });
        id
    }

    pub fn url_mut(&mut self, url_id: &str) -> Option<&mut ServerUrl> {
        self.urls.iter_mut().find(|u| u.id == url_id)
    }

    pub fn folder_mut(&mut self, folder_id: &str) -> Option<&mut ServerFolder> {
        self.folders.iter_mut().find(|f| f.id == folder_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial update applied by `PATCH /servers/:server_id`.
#[derive(Debug, Clone, Default)]
pub struct ServerUpdate {
    pub name: Option<String>,
    pub no_credential: Option<bool>,
}

impl ServerUpdate {
    pub fn apply(self, server: &mut Server) {
        if let Some(name) = self.name {
            server.name = name;
        }
        if let Some(no_credential) = self.no_credential {
            server.no_credential = no_credential;
        }
        server.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_only_touches_given_fields() {
        let mut server = Server::new("Living room".to_string(), ServerType::Jellyfin);
        ServerUpdate {
            name: None,
            no_credential: Some(true),
        }
        .apply(&mut server);

        assert_eq!(server.name, "Living room");
        assert!(server.no_credential);
    }

    #[test]
    fn test_server_type_serializes_as_type() {
        let server = Server::new("Music".to_string(), ServerType::Navidrome).with_id("srv-1");
        let json = serde_json::to_value(&server).unwrap();
        assert_eq!(json["type"], "navidrome");
        assert_eq!(json["id"], "srv-1");
    }
}
