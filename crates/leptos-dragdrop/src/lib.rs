//! Leptos DragDrop Utilities
//!
//! Press-and-hold reordering of a flat list using pointer events, so mouse,
//! pen and touch share one code path.
//!
//! - `geometry`: pure helpers (insertion index, edge scrolling, hit tests)
//! - `session`: the reorder state machine, free of any DOM access
//! - `dom`: Leptos/web-sys bindings that feed browser events into it

mod dom;
mod geometry;
mod session;

pub use dom::{
    bind_global_pointer_handlers, create_reorder_controller, make_on_contextmenu,
    make_on_pointerdown, ReorderController, ROW_ID_ATTR,
};
pub use geometry::{
    edge_scroll_delta, insertion_index, is_interactive_tag, PointerSample, RowRect,
    INTERACTIVE_SELECTOR,
};
pub use session::{DragPhase, DragSession, ReorderConfig, ReorderEngine, Slot, Transition};
