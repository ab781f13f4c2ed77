//! Project and comment endpoints

use super::{ApiError, TodoistClient};
use crate::models::{Comment, Project};

impl TodoistClient {
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects", &[]).await
    }

    pub async fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.get_json("/comments", &[("task_id", task_id)]).await
    }
}
