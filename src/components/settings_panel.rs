//! Settings Panel Component
//!
//! Token and view selection. Save stores the form; Load stores it too and
//! then fetches the view.

use leptos::prelude::*;
use task_order::{ViewIdentity, ViewMode};
use wasm_bindgen::JsCast;

use crate::context::AppContext;
use crate::storage::{Settings, SettingsError};

fn input_value(ev: &web_sys::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn select_value(ev: &web_sys::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|select| select.value())
        .unwrap_or_default()
}

fn selector_placeholder(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Label => "Label name, e.g. focus",
        ViewMode::Project => "Project id",
        ViewMode::Filter => "Filter, e.g. today | overdue",
    }
}

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let initial = ctx.settings.get_untracked();
    let token = RwSignal::new(initial.token);
    let mode = RwSignal::new(initial.view.mode);
    let selector = RwSignal::new(initial.view.selector);
    let open_in_app = RwSignal::new(initial.open_in_app);

    let apply = move || -> Result<Settings, SettingsError> {
        let settings = Settings {
            token: token.get_untracked().trim().to_string(),
            view: ViewIdentity::new(mode.get_untracked(), selector.get_untracked()),
            open_in_app: open_in_app.get_untracked(),
        };
        ctx.settings.set(settings.clone());
        settings.save().map(|_| settings)
    };

    let on_save = move |_| match apply() {
        Ok(_) => ctx.notify("Settings saved."),
        Err(e) => ctx.notify(format!("Settings not saved: {}", e)),
    };

    let on_load = move |_| {
        if let Err(e) = apply() {
            ctx.notify(format!("Settings not saved: {}", e));
        }
        if ctx.settings.with_untracked(|s| s.view.is_configured()) {
            ctx.show_settings.set(false);
            ctx.reload();
        } else {
            ctx.notify("Enter a label, project or filter first.");
        }
    };

    let project_picker = move || {
        let projects = ctx.projects.get();
        if projects.is_empty() {
            return None;
        }
        Some(view! {
            <select
                id="project"
                on:change=move |ev| selector.set(select_value(&ev))
            >
                <option value="" selected=move || selector.with(String::is_empty)>"Choose a project"</option>
                {projects
                    .into_iter()
                    .map(|p| {
                        let id = p.id.clone();
                        let is_selected = move || selector.with(|s| *s == id);
                        view! { <option value=p.id selected=is_selected>{p.name}</option> }
                    })
                    .collect_view()}
            </select>
        })
    };

    view! {
        <section id="settings" class="settings">
            <label>
                "API token (optional, empty uses the proxy)"
                <input
                    id="token"
                    type="password"
                    autocomplete="off"
                    prop:value=move || token.get()
                    on:input=move |ev| token.set(input_value(&ev))
                />
            </label>

            <label>
                "View"
                <select id="mode" on:change=move |ev| mode.set(ViewMode::parse_lossy(&select_value(&ev)))>
                    {ViewMode::ALL
                        .into_iter()
                        .map(|m| {
                            view! {
                                <option value=m.as_str() selected=move || mode.get() == m>
                                    {m.as_str()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </label>

            <Show
                when=move || mode.get() == ViewMode::Project && !ctx.projects.with(Vec::is_empty)
                fallback=move || view! {
                    <input
                        id="selector"
                        type="text"
                        placeholder=move || selector_placeholder(mode.get())
                        prop:value=move || selector.get()
                        on:input=move |ev| selector.set(input_value(&ev))
                    />
                }
            >
                {project_picker}
            </Show>

            <label class="inline">
                <input
                    id="open-in-app"
                    type="checkbox"
                    prop:checked=move || open_in_app.get()
                    on:change=move |ev| {
                        let checked = ev
                            .target()
                            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                            .map(|input| input.checked())
                            .unwrap_or(false);
                        open_in_app.set(checked);
                    }
                />
                "Open tasks in the Todoist app when installed"
            </label>

            <div class="settings-actions">
                <button id="save-settings" type="button" on:click=on_save>"Save"</button>
                <button id="load-list" type="button" on:click=on_load>"Load"</button>
            </div>
        </section>
    }
}
