use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use crate::{middleware::AuthPrincipal, models::Task, AppState};

/// Scan tasks on servers the caller can see, newest first.
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state
        .tasks
        .list_tasks()
        .await?
        .into_iter()
        .filter(|t| principal.can_see(&t.server_id))
        .collect();

    Ok(Json(tasks))
}

/// Mark a scan finished. Called by the scanner when it reports back.
pub async fn complete_task(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path((server_id, task_id)): Path<(String, String)>,
) -> Result<Json<Task>, AppError> {
    let task = state.tasks.complete_task(&server_id, &task_id).await?;

    tracing::info!(
        server_id = %server_id,
        task_id = %task.id,
        principal_id = %principal.id,
        "Scan completed"
    );
    Ok(Json(task))
}
