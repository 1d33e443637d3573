use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::ServiceError;
use crate::models::{ScanType, Task};

/// Scan task bookkeeping. At most one running scan per server.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    async fn start_scan(
        &self,
        server_id: &str,
        scan_type: ScanType,
        started_by: &str,
    ) -> Result<Task, ServiceError>;
    async fn complete_task(&self, server_id: &str, task_id: &str) -> Result<Task, ServiceError>;
    async fn forget_server(&self, server_id: &str) -> Result<(), ServiceError>;
}

/// Tasks grouped by server so the running-scan check and the insert happen
/// under the same shard lock.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    by_server: Arc<DashMap<String, Vec<Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let mut tasks: Vec<Task> = self
            .by_server
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn start_scan(
        &self,
        server_id: &str,
        scan_type: ScanType,
        started_by: &str,
    ) -> Result<Task, ServiceError> {
        let mut tasks = self.by_server.entry(server_id.to_string()).or_default();
        if tasks.iter().any(Task::is_running) {
            return Err(ServiceError::ScanAlreadyRunning);
        }

        let task = Task::new(server_id.to_string(), scan_type, started_by.to_string());
        tasks.push(task.clone());
        Ok(task)
    }

    async fn complete_task(&self, server_id: &str, task_id: &str) -> Result<Task, ServiceError> {
        let mut tasks = self
            .by_server
            .get_mut(server_id)
            .ok_or(ServiceError::TaskNotFound)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(ServiceError::TaskNotFound)?;

        task.complete();
        Ok(task.clone())
    }

    async fn forget_server(&self, server_id: &str) -> Result<(), ServiceError> {
        self.by_server.remove(server_id);
        Ok(())
    }
}
