//! UI Components
//!
//! Reusable Leptos components.

mod new_task_form;
mod notices;
mod settings_panel;
mod task_list;
mod task_row;

pub use new_task_form::NewTaskForm;
pub use notices::Notices;
pub use settings_panel::SettingsPanel;
pub use task_list::TaskList;
pub use task_row::TaskRow;
