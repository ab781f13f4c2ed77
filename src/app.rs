//! Todoissimus App
//!
//! Header, settings, composer and the ordered task list.

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_order::{load_working_list, LoadOutcome};

use crate::components::{NewTaskForm, Notices, SettingsPanel, TaskList};
use crate::context::AppContext;
use crate::models::view_title;
use crate::storage::{LocalOrderStore, Settings};

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(Settings::load());
    provide_context(ctx);

    // Load the working list whenever the view is (re)loaded
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let view = ctx.view_untracked();
        if !view.is_configured() {
            ctx.clear_tasks();
            ctx.show_settings.set(true);
            return;
        }
        if ctx.shown_view.get_untracked().as_ref() != Some(&view) {
            ctx.clear_tasks();
        }
        let Some(ticket) = ctx.loads.try_update(|loads| loads.begin(view.clone())) else {
            return;
        };
        web_sys::console::log_1(
            &format!("[APP] Loading {} '{}', trigger={}", view.mode.as_str(), view.selector, trigger).into(),
        );
        let client = ctx.client();
        ctx.loading.set(true);
        spawn_local(async move {
            let result = load_working_list(&client, &LocalOrderStore, &ticket.view).await;
            let selected = ctx.view_untracked();
            match ctx.loads.with_untracked(|loads| loads.settle(&ticket, &selected, result)) {
                LoadOutcome::Loaded(tasks) => {
                    web_sys::console::log_1(&format!("[APP] Loaded {} tasks", tasks.len()).into());
                    ctx.tasks.set(tasks);
                    ctx.shown_view.set(Some(ticket.view));
                    ctx.loading.set(false);
                }
                LoadOutcome::Failed(e) => {
                    ctx.clear_tasks();
                    ctx.loading.set(false);
                    ctx.notify(e.to_string());
                    ctx.show_settings.set(true);
                }
                LoadOutcome::Stale => {
                    web_sys::console::log_1(&format!("[APP] Dropped stale answer #{}", ticket.seq).into());
                }
            }
        });
    });

    // Projects name the project pills and fill the project picker
    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let client = ctx.client();
        spawn_local(async move {
            match client.list_projects().await {
                Ok(projects) => ctx.projects.set(projects),
                Err(e) => web_sys::console::log_1(&format!("[APP] projects unavailable: {}", e).into()),
            }
        });
    });

    let title = move || ctx.settings.with(|s| ctx.projects.with(|p| view_title(&s.view, p)));

    view! {
        <div class="app">
            <header class="app-header">
                <h1 id="list-title">{title}</h1>
                <div class="header-actions">
                    <button
                        id="refresh"
                        title="Refresh"
                        disabled=move || ctx.loading.get()
                        on:click=move |_| ctx.reload()
                    >
                        "⟳"
                    </button>
                    <button
                        id="toggle-settings"
                        title="Settings"
                        on:click=move |_| ctx.show_settings.update(|s| *s = !*s)
                    >
                        "⚙"
                    </button>
                </div>
            </header>

            <Show when=move || ctx.show_settings.get()>
                <SettingsPanel />
            </Show>

            <main>
                <NewTaskForm />
                <TaskList />
                <Show when=move || !ctx.loading.get() && ctx.tasks.with(Vec::is_empty)>
                    <p id="empty" class="empty">"No tasks."</p>
                </Show>
            </main>

            <Notices />
        </div>
    }
}
