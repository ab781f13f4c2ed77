//! New Task Form Component
//!
//! Creates a task in the current view and appends it to the saved order.

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_order::{create_and_append, ids_of};
use wasm_bindgen::JsCast;

use crate::context::AppContext;
use crate::models::TaskDraft;
use crate::storage::LocalOrderStore;

#[component]
pub fn NewTaskForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (new_text, set_new_text) = signal(String::new());
    let (busy, set_busy) = signal(false);

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get_untracked();
        if text.trim().is_empty() || busy.get_untracked() {
            return;
        }
        let view = ctx.view_untracked();
        if !view.is_configured() {
            ctx.notify("Choose a label, project or filter before adding tasks.");
            ctx.show_settings.set(true);
            return;
        }
        // the new id is appended to the displayed order, which must be this view's
        if ctx.shown_view_untracked().is_none() {
            ctx.notify("The list is still loading.");
            return;
        }

        let draft = TaskDraft::for_view(text, &view);
        let displayed = ctx.tasks.with_untracked(|tasks| ids_of(tasks));
        let client = ctx.client();
        set_busy.set(true);
        spawn_local(async move {
            match create_and_append(&client, &LocalOrderStore, &view, &displayed, &draft).await {
                Ok(task) => {
                    web_sys::console::log_1(&format!("[APP] Created task {}", task.id).into());
                    ctx.tasks.update(|tasks| tasks.push(task));
                    set_new_text.set(String::new());
                }
                // the input keeps its text so nothing typed is lost
                Err(e) => ctx.notify(e.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <input
                id="new-task-content"
                type="text"
                placeholder="Add a task..."
                prop:value=move || new_text.get()
                on:input=move |ev| {
                    if let Some(input) = ev
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                    {
                        set_new_text.set(input.value());
                    }
                }
            />
            <button id="add-task" type="submit" disabled=move || busy.get()>"Add"</button>
        </form>
    }
}
