//! Frontend Models
//!
//! Todoist REST payloads, trimmed to the fields the list shows.

use serde::{Deserialize, Serialize};
use task_order::{Entity, ViewIdentity, ViewMode};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Due {
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Active task as returned by `GET /tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// API priority: 4 is most urgent, 1 is normal
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub comment_count: u32,
}

fn default_priority() -> u8 {
    1
}

impl Task {
    /// Priority as shown in Todoist's own UI, P1 being most urgent
    pub fn ui_priority(&self) -> u8 {
        match self.priority {
            4 => 1,
            3 => 2,
            2 => 3,
            _ => 4,
        }
    }

    pub fn due_label(&self) -> String {
        self.due
            .as_ref()
            .and_then(|d| d.string.clone().filter(|s| !s.is_empty()).or_else(|| d.date.clone()))
            .unwrap_or_default()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

impl Entity for Task {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub posted_at: Option<String>,
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl TaskDraft {
    /// New task placed where `view` will show it.
    ///
    /// Filter views have no single attribute to assign, so the task is
    /// created plain.
    pub fn for_view(content: impl Into<String>, view: &ViewIdentity) -> Self {
        let content = content.into().trim().to_string();
        let selector = view.selector.clone();
        match view.mode {
            ViewMode::Label => Self {
                content,
                labels: vec![selector],
                project_id: None,
            },
            ViewMode::Project => Self {
                content,
                labels: Vec::new(),
                project_id: Some(selector),
            },
            ViewMode::Filter => Self {
                content,
                labels: Vec::new(),
                project_id: None,
            },
        }
    }
}

/// Heading for the list of `view`
pub fn view_title(view: &ViewIdentity, projects: &[Project]) -> String {
    if !view.is_configured() {
        return "Tasks".to_string();
    }
    match view.mode {
        ViewMode::Label => format!("Tasks for label: {}", view.selector),
        ViewMode::Project => {
            let name = projects
                .iter()
                .find(|p| p.id == view.selector)
                .map(|p| p.name.as_str())
                .unwrap_or(view.selector.as_str());
            format!("Tasks in project: {}", name)
        }
        ViewMode::Filter => format!("Tasks matching: {}", view.selector),
    }
}
