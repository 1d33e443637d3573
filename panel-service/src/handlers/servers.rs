//! Server management endpoints.
//!
//! Every route taking `:server_id` is mounted behind a resource guard; the
//! handlers assume authorization already happened. Creating a server is
//! reserved to global admins.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use validator::Validate;

use crate::{
    middleware::AuthPrincipal,
    models::{ScanType, Server, ServerType, ServerUpdate, Task},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub server_type: ServerType,
    #[serde(default, alias = "noCredential")]
    pub no_credential: bool,
    #[validate(url(message = "Invalid server URL"))]
    pub url: Option<String>,
    #[serde(default)]
    pub folders: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddUrlRequest {
    #[validate(url(message = "Invalid server URL"))]
    pub url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(alias = "noCredential")]
    pub no_credential: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StartScanRequest {
    #[serde(rename = "type")]
    pub scan_type: ScanType,
}

/// Servers the caller holds any grant on; everything for global admins.
pub async fn list_servers(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<Vec<Server>>, AppError> {
    let servers = state
        .servers
        .list_servers()
        .await?
        .into_iter()
        .filter(|s| principal.can_see(&s.id))
        .collect();

    Ok(Json(servers))
}

pub async fn create_server(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(req): Json<CreateServerRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let mut server = Server::new(req.name, req.server_type);
    server.no_credential = req.no_credential;
    if let Some(url) = req.url {
        server.add_url(url);
    }
    server = req
        .folders
        .into_iter()
        .fold(server, |server, folder| server.with_folder(folder));

    state.servers.insert_server(server.clone()).await?;

    tracing::info!(server_id = %server.id, principal_id = %principal.id, "Server created");
    Ok((StatusCode::CREATED, Json(server)))
}

pub async fn get_server(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
) -> Result<Json<Server>, AppError> {
    Ok(Json(state.servers.get_server(&server_id).await?))
}

pub async fn update_server(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(server_id): Path<String>,
    Json(req): Json<UpdateServerRequest>,
) -> Result<Json<Server>, AppError> {
    req.validate()?;

    let server = state
        .servers
        .update_server(
            &server_id,
            ServerUpdate {
                name: req.name,
                no_credential: req.no_credential,
            },
        )
        .await?;

    tracing::info!(server_id = %server_id, principal_id = %principal.id, "Server updated");
    Ok(Json(server))
}

pub async fn delete_server(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(server_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.servers.delete_server(&server_id).await?;
    state.tasks.forget_server(&server_id).await?;

    tracing::info!(server_id = %server_id, principal_id = %principal.id, "Server deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enable_url(
    State(state): State<AppState>,
    Path((server_id, url_id)): Path<(String, String)>,
) -> Result<Json<Server>, AppError> {
    Ok(Json(
        state.servers.set_url_enabled(&server_id, &url_id, true).await?,
    ))
}

pub async fn disable_url(
    State(state): State<AppState>,
    Path((server_id, url_id)): Path<(String, String)>,
) -> Result<Json<Server>, AppError> {
    Ok(Json(
        state.servers.set_url_enabled(&server_id, &url_id, false).await?,
    ))
}

pub async fn add_url(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    Json(req): Json<AddUrlRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let server = state.servers.add_url(&server_id, &req.url).await?;
    Ok((StatusCode::CREATED, Json(server)))
}

pub async fn delete_url(
    State(state): State<AppState>,
    Path((server_id, url_id)): Path<(String, String)>,
) -> Result<Json<Server>, AppError> {
    Ok(Json(state.servers.delete_url(&server_id, &url_id).await?))
}

pub async fn enable_folder(
    State(state): State<AppState>,
    Path((server_id, folder_id)): Path<(String, String)>,
) -> Result<Json<Server>, AppError> {
    Ok(Json(
        state
            .servers
            .set_folder_enabled(&server_id, &folder_id, true)
            .await?,
    ))
}

pub async fn disable_folder(
    State(state): State<AppState>,
    Path((server_id, folder_id)): Path<(String, String)>,
) -> Result<Json<Server>, AppError> {
    Ok(Json(
        state
            .servers
            .set_folder_enabled(&server_id, &folder_id, false)
            .await?,
    ))
}

/// Queue a full or quick library scan. One running scan per server.
pub async fn start_scan(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(server_id): Path<String>,
    Json(req): Json<StartScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 404 before 409: the server has to exist to be scanned.
    state.servers.get_server(&server_id).await?;

    let task: Task = state
        .tasks
        .start_scan(&server_id, req.scan_type, &principal.id)
        .await?;

    // A delete may have landed since the existence check; drop the orphan.
    if let Err(err) = state.servers.get_server(&server_id).await {
        state.tasks.forget_server(&server_id).await?;
        return Err(err.into());
    }

    tracing::info!(
        server_id = %server_id,
        task_id = %task.id,
        scan_type = ?task.scan_type,
        principal_id = %principal.id,
        "Scan started"
    );
    Ok((StatusCode::ACCEPTED, Json(task)))
}
