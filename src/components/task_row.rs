//! Task Row Component
//!
//! One task: completion checkbox, content, metadata pills and the external
//! open button. Pressing and holding anywhere else on the row starts a
//! reorder.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_contextmenu, make_on_pointerdown, DragPhase, ReorderController};
use task_order::complete_and_prune;

use crate::context::AppContext;
use crate::external::{BrowserOpener, DeepLinkPlan, ExternalOpener};
use crate::models::{Comment, Task};
use crate::storage::LocalOrderStore;

#[component]
pub fn TaskRow(id: String, ctrl: ReorderController) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    // Follows this task through reloads without re-rendering the row
    let task = Memo::new({
        let id = id.clone();
        move |_| ctx.tasks.with(|tasks| tasks.iter().find(|t| t.id == id).cloned())
    });
    let field = move |f: fn(&Task) -> String| move || task.with(|t| t.as_ref().map(f).unwrap_or_default());

    let (checked, set_checked) = signal(false);
    let (busy, set_busy) = signal(false);
    let show_description = RwSignal::new(false);
    let comments = RwSignal::new(None::<Vec<Comment>>);

    let row_class = {
        let id = id.clone();
        move || {
            let prio = task.with(|t| t.as_ref().map(Task::ui_priority).unwrap_or(4));
            let mut c = format!("task-item prio-{}", prio);
            ctrl.engine.with(|e| {
                if e.active_item() == Some(id.as_str()) {
                    match e.phase() {
                        DragPhase::ArmPending => c.push_str(" armed"),
                        DragPhase::Dragging => c.push_str(" dragging"),
                        DragPhase::Idle => {}
                    }
                }
            });
            c
        }
    };

    // Floating position of the dragged row
    let row_style = {
        let id = id.clone();
        move || {
            ctrl.engine.with(|e| {
                if e.dragged_item() != Some(id.as_str()) {
                    return String::new();
                }
                match (e.ghost_top(), e.dragged_rect()) {
                    (Some(top), Some(rect)) => format!(
                        "position: fixed; top: {}px; left: {}px; width: {}px; z-index: 1000; pointer-events: none;",
                        top, rect.left, rect.width
                    ),
                    _ => String::new(),
                }
            })
        }
    };

    let on_complete = {
        let id = id.clone();
        move |_| {
            if busy.get_untracked() {
                return;
            }
            let Some(view) = ctx.shown_view_untracked() else {
                return;
            };
            set_checked.set(true);
            set_busy.set(true);
            let id = id.clone();
            let client = ctx.client();
            spawn_local(async move {
                match complete_and_prune(&client, &LocalOrderStore, &view, &id).await {
                    Ok(()) => {
                        set_busy.set(false);
                        ctx.tasks.update(|tasks| tasks.retain(|t| t.id != id));
                    }
                    Err(e) => {
                        set_checked.set(false);
                        set_busy.set(false);
                        ctx.notify(e.to_string());
                    }
                }
            });
        }
    };

    let on_open = move |_| {
        if let Some(t) = task.get_untracked() {
            let opener = BrowserOpener {
                try_app_schemes: ctx.settings.with_untracked(|s| s.open_in_app),
            };
            let attempted = opener.open_externally(&DeepLinkPlan::for_task(&t));
            if !attempted.is_empty() {
                web_sys::console::log_1(&format!("[APP] tried {:?}", attempted).into());
            }
        }
    };

    let on_comments = {
        let id = id.clone();
        move |_| {
            if comments.with_untracked(Option::is_some) {
                comments.set(None);
                return;
            }
            let id = id.clone();
            let client = ctx.client();
            spawn_local(async move {
                match client.list_comments(&id).await {
                    Ok(list) => comments.set(Some(list)),
                    Err(e) => ctx.notify(e.to_string()),
                }
            });
        }
    };

    let project_name = move || {
        let project_id = task.with(|t| t.as_ref().and_then(|t| t.project_id.clone()))?;
        ctx.projects
            .with(|ps| ps.iter().find(|p| p.id == project_id).map(|p| p.name.clone()))
    };
    let has_description = move || task.with(|t| t.as_ref().map(Task::has_description).unwrap_or(false));
    let comment_count = move || task.with(|t| t.as_ref().map(|t| t.comment_count).unwrap_or(0));

    view! {
        <li
            class=row_class
            style=row_style
            data-reorder-id=id.clone()
            on:pointerdown=make_on_pointerdown(ctrl, id.clone())
            on:contextmenu=make_on_contextmenu(ctrl)
        >
            <input
                type="checkbox"
                class="task-checkbox"
                prop:checked=move || checked.get()
                disabled=move || busy.get()
                on:change=on_complete
            />
            <div class="task-main">
                <span class="task-content">{field(|t| t.content.clone())}</span>
                <div class="task-meta">
                    <span class="task-priority-read">{field(|t| format!("P{}", t.ui_priority()))}</span>
                    <span class="task-due-read">{field(Task::due_label)}</span>
                    {move || project_name().map(|name| view! { <span class="pill project-pill">{name}</span> })}
                    <Show when=has_description>
                        <button
                            type="button"
                            class="pill description-pill"
                            title="Description"
                            on:click=move |_| show_description.update(|s| *s = !*s)
                        >
                            "≡"
                        </button>
                    </Show>
                    <Show when=move || { comment_count() > 0 }>
                        <button type="button" class="pill comment-pill" title="Comments" on:click=on_comments.clone()>
                            "💬 " {comment_count}
                        </button>
                    </Show>
                </div>
                <Show when=move || show_description.get()>
                    <p class="task-description">{field(|t| t.description.clone())}</p>
                </Show>
                {move || {
                    comments
                        .get()
                        .map(|list| {
                            view! {
                                <ul class="task-comments">
                                    {list
                                        .into_iter()
                                        .map(|c| view! { <li class="task-comment">{c.content}</li> })
                                        .collect_view()}
                                </ul>
                            }
                        })
                }}
            </div>
            <button type="button" class="open-todoist" title="Open in Todoist" on:click=on_open>
                "↗"
            </button>
        </li>
    }
}
