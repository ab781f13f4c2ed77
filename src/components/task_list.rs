//! Task List Component
//!
//! Renders the working list through the reorder engine. Rows are keyed by
//! task id, so a drag only moves DOM nodes; the marker is the only slot
//! that comes and goes.

use leptos::html::Ul;
use leptos::prelude::*;
use leptos_dragdrop::*;
use task_order::{commit_order, ids_of, reconcile};

use crate::components::TaskRow;
use crate::context::AppContext;
use crate::storage::LocalOrderStore;

#[component]
pub fn TaskList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let list_ref = NodeRef::<Ul>::new();

    let on_committed = Callback::new(move |order: Vec<String>| {
        // the order belongs to the view on screen, not to unapplied settings
        let Some(view) = ctx.shown_view_untracked() else {
            web_sys::console::log_1(&"[DND] no loaded view; order not saved".into());
            return;
        };
        // a failed write is logged by the store; the list still shows the drop
        let _ = commit_order(&LocalOrderStore, &view, &order);
        ctx.tasks.update(|tasks| {
            let current = std::mem::take(tasks);
            *tasks = reconcile(current, &order);
        });
    });

    let ctrl = create_reorder_controller(list_ref, ReorderConfig::default(), on_committed);
    bind_global_pointer_handlers(ctrl);

    // Keep the engine's order in step with the list
    Effect::new(move |_| {
        let ids = ctx.tasks.with(|tasks| ids_of(tasks));
        ctrl.sync_order(ids);
    });

    let slots = move || ctrl.engine.with(|e| e.display_slots());
    let list_class = move || {
        if ctrl.engine.with(|e| e.is_dragging()) {
            "task-list reordering"
        } else {
            "task-list"
        }
    };
    let marker_style = move || {
        let height = ctrl
            .engine
            .with(|e| e.dragged_rect().map(|r| r.height))
            .unwrap_or(0.0);
        format!("height: {}px;", height)
    };

    view! {
        <ul id="task-list" class=list_class node_ref=list_ref>
            <For
                each=slots
                key=|slot| slot.key()
                children=move |slot| match slot {
                    Slot::Row(id) => view! { <TaskRow id=id ctrl=ctrl /> }.into_any(),
                    Slot::Marker => view! {
                        <li class="drop-marker" aria-hidden="true" style=marker_style></li>
                    }
                    .into_any(),
                }
            />
        </ul>
    }
}
