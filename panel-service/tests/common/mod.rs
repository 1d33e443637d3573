//! Test helpers for panel-service integration tests.
//!
//! Builds the full router over in-memory stores and drives it with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use panel_service::{
    build_router,
    config::{Environment, JwtConfig, PanelConfig, SecurityConfig},
    models::{Grant, PermissionLevel, Server, ServerType, User},
    services::{
        InMemoryServerStore, InMemoryTaskStore, InMemoryUserStore, ServerStore, TokenService,
    },
    AppState,
};
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn test_config() -> PanelConfig {
    PanelConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "panel-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        jwt: JwtConfig {
            secret: Secret::new(TEST_SECRET.to_string()),
            issuer: "panel-service".to_string(),
            access_token_expiry_minutes: 15,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        bootstrap_admin: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_server_store(Arc::new(InMemoryServerStore::new()))
    }

    pub fn with_server_store(servers: Arc<dyn ServerStore>) -> Self {
        let config = test_config();
        let tokens = TokenService::new(&config.jwt).expect("Failed to create token service");

        let state = AppState {
            config,
            tokens,
            users: Arc::new(InMemoryUserStore::new()),
            servers,
            tasks: Arc::new(InMemoryTaskStore::new()),
        };

        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Store `user` and return a bearer token for it.
    pub async fn login(&self, user: User) -> String {
        let token = self.state.tokens.issue(&user.user_id).unwrap();
        self.state.users.insert_user(user).await.unwrap();
        token
    }

    pub async fn viewer_of(&self, server_id: &str) -> String {
        self.user_with(Grant::new(server_id, PermissionLevel::Viewer))
            .await
    }

    pub async fn user_with(&self, grant: Grant) -> String {
        self.login(User::new(format!("user-{}", grant.resource_id), None).with_grant(grant))
            .await
    }

    pub async fn admin(&self) -> String {
        self.login(User::new("admin".to_string(), None).with_admin(true))
            .await
    }

    /// Insert a server with one URL and one folder under a fixed id.
    pub async fn add_server(&self, id: &str) -> Server {
        let server = Server::new(format!("Server {}", id), ServerType::Jellyfin)
            .with_id(id)
            .with_url(format!("http://{}.local:8096", id))
            .with_folder("Music");
        self.state.servers.insert_server(server.clone()).await.unwrap();
        server
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(self.router.clone(), method, uri, token, body).await
    }
}

pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
