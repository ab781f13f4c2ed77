//! View Identity
//!
//! Which subset of tasks is displayed, and therefore which persisted order
//! applies to it.

use serde::{Deserialize, Serialize};

const ORDER_KEY_PREFIX: &str = "todoissimus_order_";

/// How the selector is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Tasks carrying a label
    #[default]
    Label,
    /// Tasks in a project (selector is the project id)
    Project,
    /// Tasks matching a filter expression
    Filter,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Label, ViewMode::Project, ViewMode::Filter];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Label => "label",
            ViewMode::Project => "project",
            ViewMode::Filter => "filter",
        }
    }

    /// Mode named `s`; anything unknown is a label view
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "project" => ViewMode::Project,
            "filter" => ViewMode::Filter,
            _ => ViewMode::Label,
        }
    }

    /// Query parameter name understood by the task endpoint
    pub fn query_param(&self) -> &'static str {
        match self {
            ViewMode::Label => "label",
            ViewMode::Project => "project_id",
            ViewMode::Filter => "filter",
        }
    }
}

/// A (mode, selector) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ViewIdentity {
    pub mode: ViewMode,
    pub selector: String,
}

impl ViewIdentity {
    pub fn new(mode: ViewMode, selector: impl Into<String>) -> Self {
        Self {
            mode,
            selector: selector.into().trim().to_string(),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::new(ViewMode::Label, label)
    }

    /// A view needs a selector before anything can be fetched
    pub fn is_configured(&self) -> bool {
        !self.selector.trim().is_empty()
    }

    /// Key of the persisted order for this view.
    ///
    /// Label views keep the bare `todoissimus_order_<label>` form so orders
    /// saved before project and filter views existed still apply.
    pub fn storage_key(&self) -> String {
        match self.mode {
            ViewMode::Label => format!("{}{}", ORDER_KEY_PREFIX, self.selector),
            mode => format!("{}{}:{}", ORDER_KEY_PREFIX, mode.as_str(), self.selector),
        }
    }

    /// (name, value) pair for the remote task query
    pub fn query_pair(&self) -> (&'static str, &str) {
        (self.mode.query_param(), self.selector.as_str())
    }
}
