//! Task endpoints, and the client as the list's remote item source

use async_trait::async_trait;
use task_order::{RemoteError, TaskSource, ViewIdentity};

use super::{ApiError, TodoistClient};
use crate::models::{Task, TaskDraft};

impl TodoistClient {
    /// Active tasks of `view`
    pub async fn fetch_tasks(&self, view: &ViewIdentity) -> Result<Vec<Task>, ApiError> {
        let (param, value) = view.query_pair();
        self.get_json("/tasks", &[(param, value)]).await
    }

    pub async fn close_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("/tasks/{}/close", id)).await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.post_json("/tasks", draft).await
    }
}

#[async_trait(?Send)]
impl TaskSource for TodoistClient {
    type Item = Task;
    type Draft = TaskDraft;

    async fn fetch_items(&self, view: &ViewIdentity) -> Result<Vec<Task>, RemoteError> {
        self.fetch_tasks(view)
            .await
            .map_err(|e| RemoteError::Fetch(e.to_string()))
    }

    async fn complete_item(&self, id: &str) -> Result<(), RemoteError> {
        self.close_task(id)
            .await
            .map_err(|e| RemoteError::Mutation(e.to_string()))
    }

    async fn create_item(&self, draft: &TaskDraft) -> Result<Task, RemoteError> {
        self.create_task(draft)
            .await
            .map_err(|e| RemoteError::Mutation(e.to_string()))
    }
}
