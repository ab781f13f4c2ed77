//! Reorder State Machine
//!
//! One engine per list. A row moves through
//! `Idle -> ArmPending -> Dragging -> (Committed | Cancelled) -> Idle`:
//!
//! - a press on a row arms a session and starts the hold timer
//! - moving further than the tolerance before the timer fires dismisses the
//!   session (the gesture was a scroll or a tap), for every pointer type
//! - the timer firing promotes the session to dragging
//! - while dragging, pointer and scroll updates move the insertion marker
//! - release commits the marker position, cancel restores the original order
//!
//! At most one session exists; a new press supersedes the previous one.
//! The engine never touches the DOM: callers pass in pointer samples and
//! row geometry and act on the returned [`Transition`].

use crate::geometry::{edge_scroll_delta, insertion_index, PointerSample, RowRect};

/// Tuning knobs for the gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReorderConfig {
    /// Press-and-hold delay before a press becomes a drag
    pub hold_ms: u32,
    /// Movement allowed during the hold before the press counts as a scroll
    pub move_tolerance_px: f64,
    /// Distance from the viewport edge that triggers auto-scroll
    pub edge_band_px: f64,
    /// Auto-scroll distance per animation frame
    pub scroll_step_px: f64,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            hold_ms: 275,
            move_tolerance_px: 10.0,
            edge_band_px: 60.0,
            scroll_step_px: 12.0,
        }
    }
}

/// Phase of the list's (single) session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    ArmPending,
    Dragging,
}

/// State of one gesture
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub item_id: String,
    /// Index of the row when the press happened
    pub origin_index: usize,
    /// Insertion slot among the other rows
    pub marker_index: usize,
    pub phase: DragPhase,
    pub start: PointerSample,
    pub last: PointerSample,
    /// Row geometry at press time
    pub rect: RowRect,
    /// Identifies the hold timer belonging to this session
    pub epoch: u64,
}

/// Outcome of feeding an event to the engine
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Nothing changed
    Ignored,
    /// A session was armed; the hold timer must report back with `epoch`
    Armed {
        epoch: u64,
        superseded: Option<String>,
    },
    /// The hold completed and the row is now being dragged
    Started { item_id: String },
    /// The insertion marker moved
    MarkerMoved { index: usize },
    /// Released at a new position; `order` is the full new order
    Committed { order: Vec<String> },
    /// Released at the original position
    Unchanged,
    /// The press ended (release or movement) before the hold completed
    Dismissed,
    /// The session was aborted without changes
    Cancelled { item_id: String },
}

/// What the list shows in each position
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Row(String),
    Marker,
}

impl Slot {
    /// Stable render key
    pub fn key(&self) -> String {
        match self {
            Slot::Row(id) => format!("row:{}", id),
            Slot::Marker => "marker".to_string(),
        }
    }
}

/// Reorder engine for one list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReorderEngine {
    config: ReorderConfig,
    order: Vec<String>,
    session: Option<DragSession>,
    epoch: u64,
}

impl ReorderEngine {
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> ReorderConfig {
        self.config
    }

    /// Ids in committed display order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Replace the list contents.
    ///
    /// A session whose row disappeared is dropped; otherwise it follows its
    /// row to the new index.
    pub fn set_order(&mut self, ids: Vec<String>) {
        self.order = ids;
        let last_slot = self.order.len().saturating_sub(1);
        let keep = match self.session.as_mut() {
            Some(session) => match self.order.iter().position(|id| *id == session.item_id) {
                Some(index) => {
                    session.origin_index = index;
                    session.marker_index = session.marker_index.min(last_slot);
                    true
                }
                None => false,
            },
            None => true,
        };
        if !keep {
            self.session = None;
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> DragPhase {
        self.session.as_ref().map(|s| s.phase).unwrap_or(DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        self.phase() == DragPhase::Dragging
    }

    /// Row the current session belongs to
    pub fn active_item(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.item_id.as_str())
    }

    /// Row currently being dragged
    pub fn dragged_item(&self) -> Option<&str> {
        self.session
            .as_ref()
            .filter(|s| s.phase == DragPhase::Dragging)
            .map(|s| s.item_id.as_str())
    }

    /// Pointer pressed on a row.
    ///
    /// `interactive` marks presses on controls inside the row; those never
    /// arm and leave any running session alone.
    pub fn press(
        &mut self,
        item_id: &str,
        at: PointerSample,
        rect: RowRect,
        interactive: bool,
    ) -> Transition {
        if interactive {
            return Transition::Ignored;
        }
        let Some(origin_index) = self.order.iter().position(|id| id == item_id) else {
            return Transition::Ignored;
        };

        let superseded = self.session.take().map(|s| s.item_id);
        self.epoch += 1;
        self.session = Some(DragSession {
            item_id: item_id.to_string(),
            origin_index,
            marker_index: origin_index,
            phase: DragPhase::ArmPending,
            start: at,
            last: at,
            rect,
            epoch: self.epoch,
        });
        Transition::Armed {
            epoch: self.epoch,
            superseded,
        }
    }

    /// Hold timer fired for the session armed with `epoch`
    pub fn hold_elapsed(&mut self, epoch: u64) -> Transition {
        match self.session.as_mut() {
            Some(session) if session.epoch == epoch && session.phase == DragPhase::ArmPending => {
                session.phase = DragPhase::Dragging;
                session.marker_index = session.origin_index;
                Transition::Started {
                    item_id: session.item_id.clone(),
                }
            }
            _ => Transition::Ignored,
        }
    }

    /// Pointer moved; `rows` are the other rows' current boxes
    pub fn pointer_moved(&mut self, at: PointerSample, rows: &[RowRect]) -> Transition {
        let tolerance = self.config.move_tolerance_px;
        let Some(session) = self.session.as_mut() else {
            return Transition::Ignored;
        };
        match session.phase {
            DragPhase::ArmPending => {
                if session.start.distance(at) > tolerance {
                    self.session = None;
                    Transition::Dismissed
                } else {
                    session.last = at;
                    Transition::Ignored
                }
            }
            DragPhase::Dragging => {
                session.last = at;
                self.reposition(rows)
            }
            DragPhase::Idle => Transition::Ignored,
        }
    }

    /// The list scrolled under a stationary pointer
    pub fn scrolled(&mut self, rows: &[RowRect]) -> Transition {
        self.reposition(rows)
    }

    fn reposition(&mut self, rows: &[RowRect]) -> Transition {
        let last_slot = self.order.len().saturating_sub(1);
        match self.session.as_mut() {
            Some(session) if session.phase == DragPhase::Dragging => {
                let index = insertion_index(rows, session.last.y).min(last_slot);
                if index == session.marker_index {
                    Transition::Ignored
                } else {
                    session.marker_index = index;
                    Transition::MarkerMoved { index }
                }
            }
            _ => Transition::Ignored,
        }
    }

    /// Scroll step for the current pointer position, if dragging near an edge
    pub fn auto_scroll_delta(&self, viewport_height: f64) -> Option<f64> {
        let session = self.session.as_ref().filter(|s| s.phase == DragPhase::Dragging)?;
        edge_scroll_delta(
            session.last.y,
            viewport_height,
            self.config.edge_band_px,
            self.config.scroll_step_px,
        )
    }

    /// Pointer released
    pub fn release(&mut self) -> Transition {
        let Some(session) = self.session.take() else {
            return Transition::Ignored;
        };
        match session.phase {
            DragPhase::Dragging => {
                let moved = move_item(&self.order, session.origin_index, session.marker_index);
                if moved == self.order {
                    Transition::Unchanged
                } else {
                    self.order = moved.clone();
                    Transition::Committed { order: moved }
                }
            }
            _ => Transition::Dismissed,
        }
    }

    /// Abort the session without changing the order
    pub fn cancel(&mut self) -> Transition {
        match self.session.take() {
            Some(session) => Transition::Cancelled {
                item_id: session.item_id,
            },
            None => Transition::Ignored,
        }
    }

    /// Rows and marker in render order.
    ///
    /// While dragging, the dragged row sits directly before the marker; it
    /// is rendered floating, so the marker is what occupies the gap.
    pub fn display_slots(&self) -> Vec<Slot> {
        let Some(session) = self.session.as_ref().filter(|s| s.phase == DragPhase::Dragging) else {
            return self.order.iter().cloned().map(Slot::Row).collect();
        };

        let mut slots: Vec<Slot> = self
            .order
            .iter()
            .filter(|id| **id != session.item_id)
            .cloned()
            .map(Slot::Row)
            .collect();
        let at = session.marker_index.min(slots.len());
        slots.insert(at, Slot::Marker);
        slots.insert(at, Slot::Row(session.item_id.clone()));
        slots
    }

    /// Viewport top of the floating row, keeping the original grab offset
    pub fn ghost_top(&self) -> Option<f64> {
        let session = self.session.as_ref().filter(|s| s.phase == DragPhase::Dragging)?;
        Some(session.last.y - (session.start.y - session.rect.top))
    }

    /// Geometry of the dragged row at press time
    pub fn dragged_rect(&self) -> Option<RowRect> {
        self.session
            .as_ref()
            .filter(|s| s.phase == DragPhase::Dragging)
            .map(|s| s.rect)
    }
}

fn move_item(order: &[String], from: usize, to: usize) -> Vec<String> {
    let mut moved = order.to_vec();
    if from >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    let to = to.min(moved.len());
    moved.insert(to, item);
    moved
}
