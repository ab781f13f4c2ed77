//! Browser bindings for the reorder engine.
//!
//! Rows register a pointerdown handler; pointer move/up/cancel are bound
//! once on the document. The hold timer and the auto-scroll loop report
//! back into the engine, which lives in a signal owned by the list.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::html::Ul;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::geometry::{is_interactive_tag, PointerSample, RowRect, INTERACTIVE_SELECTOR};
use crate::session::{DragPhase, ReorderConfig, ReorderEngine, Transition};

/// Attribute carrying the item id on each rendered row
pub const ROW_ID_ATTR: &str = "data-reorder-id";

fn log(msg: &str) {
    web_sys::console::log_1(&format!("[DND] {}", msg).into());
}

impl From<web_sys::DomRect> for RowRect {
    fn from(rect: web_sys::DomRect) -> Self {
        RowRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }
}

/// Reorder state for one list, passed to every row and handler
#[derive(Clone, Copy)]
pub struct ReorderController {
    pub engine: RwSignal<ReorderEngine>,
    list: NodeRef<Ul>,
    on_committed: Callback<Vec<String>>,
}

/// Create the controller for a list rendered into `list`.
///
/// `on_committed` receives the full new order after every successful drop.
pub fn create_reorder_controller(
    list: NodeRef<Ul>,
    config: ReorderConfig,
    on_committed: Callback<Vec<String>>,
) -> ReorderController {
    ReorderController {
        engine: RwSignal::new(ReorderEngine::new(config)),
        list,
        on_committed,
    }
}

impl ReorderController {
    /// Keep the engine in step with the rendered list
    pub fn sync_order(&self, ids: Vec<String>) {
        self.engine.update(|e| e.set_order(ids));
    }

    /// Whether a session is armed or dragging
    pub fn is_active(&self) -> bool {
        self.engine.with_untracked(|e| e.phase() != DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.with_untracked(ReorderEngine::is_dragging)
    }

    /// Pointer pressed on the row for `item_id`
    pub fn on_drag_armed(&self, item_id: &str, ev: &web_sys::PointerEvent) {
        if !ev.is_primary() || ev.button() != 0 {
            return;
        }

        let interactive = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| is_interactive_element(&el))
            .unwrap_or(false);
        let rect = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| RowRect::from(el.get_bounding_client_rect()))
            .unwrap_or_default();
        let at = PointerSample::new(ev.client_x() as f64, ev.client_y() as f64);

        let transition = self
            .engine
            .try_update(|e| e.press(item_id, at, rect, interactive));

        if let Some(Transition::Armed { epoch, superseded }) = transition {
            if let Some(previous) = superseded {
                log(&format!("session for {} superseded by {}", previous, item_id));
            }
            let hold_ms = self.engine.with_untracked(|e| e.config().hold_ms);
            let ctrl = *self;
            let _ = Timeout::new(hold_ms, move || ctrl.hold_elapsed(epoch)).forget();
        }
    }

    fn hold_elapsed(&self, epoch: u64) {
        if let Some(Transition::Started { item_id }) =
            self.engine.try_update(|e| e.hold_elapsed(epoch))
        {
            log(&format!("dragging {}", item_id));
            self.start_auto_scroll();
        }
    }

    /// Pointer moved anywhere in the document
    pub fn on_drag_moved(&self, at: PointerSample) {
        if !self.is_active() {
            return;
        }
        let rows = if self.is_dragging() { self.measure_rows() } else { Vec::new() };
        if let Some(Transition::Dismissed) = self.engine.try_update(|e| e.pointer_moved(at, &rows)) {
            log("hold interrupted by movement");
        }
    }

    /// Pointer released anywhere in the document
    pub fn on_drag_released(&self) {
        if !self.is_active() {
            return;
        }
        match self.engine.try_update(ReorderEngine::release) {
            Some(Transition::Committed { order }) => {
                log(&format!("drop committed ({} items)", order.len()));
                self.on_committed.run(order);
            }
            Some(Transition::Unchanged) => log("dropped in place"),
            _ => {}
        }
    }

    /// Abort the running session, if any
    pub fn on_cancelled(&self) {
        if !self.is_active() {
            return;
        }
        if let Some(Transition::Cancelled { item_id }) = self.engine.try_update(ReorderEngine::cancel) {
            log(&format!("session for {} cancelled", item_id));
        }
    }

    /// Boxes of the rendered rows other than the dragged one, in DOM order
    fn measure_rows(&self) -> Vec<RowRect> {
        let dragged = self
            .engine
            .with_untracked(|e| e.dragged_item().map(str::to_string));
        let Some(list) = self.list.get_untracked() else {
            return Vec::new();
        };
        let Ok(nodes) = list.query_selector_all(&format!("[{}]", ROW_ID_ATTR)) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .filter(|el| el.get_attribute(ROW_ID_ATTR) != dragged)
            .map(|el| RowRect::from(el.get_bounding_client_rect()))
            .collect()
    }

    /// Scroll near the viewport edges once per frame until the drag ends
    fn start_auto_scroll(self) {
        let Some(win) = web_sys::window() else {
            return;
        };
        let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let next = frame.clone();
        let frame_win = win.clone();

        *frame.borrow_mut() = Some(Closure::new(move || {
            if !self.is_dragging() {
                let _ = next.borrow_mut().take();
                return;
            }
            let viewport = frame_win
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            if let Some(dy) = self.engine.with_untracked(|e| e.auto_scroll_delta(viewport)) {
                frame_win.scroll_by_with_x_and_y(0.0, dy);
                let rows = self.measure_rows();
                self.engine.update(|e| {
                    e.scrolled(&rows);
                });
            }
            if let Some(cb) = next.borrow().as_ref() {
                let _ = frame_win.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }));

        let first = frame.borrow();
        if let Some(cb) = first.as_ref() {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

fn is_interactive_element(el: &web_sys::Element) -> bool {
    if is_interactive_tag(&el.tag_name()) {
        return true;
    }
    if el
        .dyn_ref::<web_sys::HtmlElement>()
        .map(|h| h.is_content_editable())
        .unwrap_or(false)
    {
        return true;
    }
    matches!(el.closest(INTERACTIVE_SELECTOR), Ok(Some(_)))
}

/// Create the pointerdown handler for the row showing `item_id`
pub fn make_on_pointerdown(
    ctrl: ReorderController,
    item_id: String,
) -> impl Fn(web_sys::PointerEvent) + Clone + 'static {
    move |ev: web_sys::PointerEvent| ctrl.on_drag_armed(&item_id, &ev)
}

/// Suppress the long-press context menu while a session is running
pub fn make_on_contextmenu(ctrl: ReorderController) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ctrl.is_active() {
            ev.prevent_default();
        }
    }
}

/// Bind document-level pointer handlers feeding `ctrl`.
///
/// `touchmove` is registered non-passive so panning can be blocked while a
/// row is being dragged.
pub fn bind_global_pointer_handlers(ctrl: ReorderController) {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let on_move = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |ev: web_sys::PointerEvent| {
        if ev.is_primary() {
            ctrl.on_drag_moved(PointerSample::new(ev.client_x() as f64, ev.client_y() as f64));
        }
    });
    let on_up = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |ev: web_sys::PointerEvent| {
        if ev.is_primary() {
            ctrl.on_drag_released();
        }
    });
    let on_cancel = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |_ev: web_sys::PointerEvent| {
        ctrl.on_cancelled();
    });
    let on_touchmove = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        if ctrl.is_dragging() {
            ev.prevent_default();
        }
    });

    let _ = doc.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref());
    let _ = doc.add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref());
    let _ = doc.add_event_listener_with_callback("pointercancel", on_cancel.as_ref().unchecked_ref());

    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(false);
    let _ = doc.add_event_listener_with_callback_and_add_event_listener_options(
        "touchmove",
        on_touchmove.as_ref().unchecked_ref(),
        &options,
    );

    on_move.forget();
    on_up.forget();
    on_cancel.forget();
    on_touchmove.forget();
}
