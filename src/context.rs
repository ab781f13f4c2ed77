//! Application Context
//!
//! Shared state provided via Leptos Context API.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use task_order::{LoadSequence, ViewIdentity};

use crate::api::TodoistClient;
use crate::models::{Project, Task};
use crate::storage::Settings;

/// How long a notice stays on screen
pub const NOTICE_MS: u32 = 4_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub settings: RwSignal<Settings>,
    /// Working list of the current view, in display order
    pub tasks: RwSignal<Vec<Task>>,
    /// View whose tasks are on screen; `None` while nothing valid is shown
    pub shown_view: RwSignal<Option<ViewIdentity>>,
    pub loads: RwSignal<LoadSequence>,
    pub projects: RwSignal<Vec<Project>>,
    pub loading: RwSignal<bool>,
    pub show_settings: RwSignal<bool>,
    pub notices: RwSignal<Vec<Notice>>,
    next_notice: RwSignal<u64>,
    /// Bumped to refetch the current view
    pub reload_trigger: RwSignal<u32>,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        let show_settings = !settings.view.is_configured();
        Self {
            settings: RwSignal::new(settings),
            tasks: RwSignal::new(Vec::new()),
            shown_view: RwSignal::new(None),
            loads: RwSignal::new(LoadSequence::default()),
            projects: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            show_settings: RwSignal::new(show_settings),
            notices: RwSignal::new(Vec::new()),
            next_notice: RwSignal::new(0),
            reload_trigger: RwSignal::new(0),
        }
    }

    /// Trigger a reload of the current view
    pub fn reload(&self) {
        self.reload_trigger.update(|v| *v += 1);
    }

    pub fn view_untracked(&self) -> ViewIdentity {
        self.settings.with_untracked(|s| s.view.clone())
    }

    /// View the displayed tasks belong to, if it is still the selected one
    pub fn shown_view_untracked(&self) -> Option<ViewIdentity> {
        let selected = self.view_untracked();
        self.shown_view
            .get_untracked()
            .filter(|shown| *shown == selected)
    }

    /// Drop the list on screen, e.g. before showing another view
    pub fn clear_tasks(&self) {
        self.shown_view.set(None);
        self.tasks.set(Vec::new());
    }

    /// Client for the current token
    pub fn client(&self) -> TodoistClient {
        self.settings.with_untracked(|s| TodoistClient::for_token(&s.token))
    }

    /// Show a transient message; it is also written to the console
    pub fn notify(&self, text: impl Into<String>) {
        let text = text.into();
        web_sys::console::log_1(&format!("[APP] {}", text).into());

        let id = self.next_notice.get_untracked();
        self.next_notice.set(id + 1);
        self.notices.update(|n| n.push(Notice { id, text }));

        let ctx = *self;
        Timeout::new(NOTICE_MS, move || ctx.dismiss(id)).forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|n| n.retain(|notice| notice.id != id));
    }
}
