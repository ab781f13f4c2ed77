//! Geometry helpers for the reorder engine.
//!
//! All coordinates are viewport (client) pixels.

/// Elements that keep their own pointer behaviour; a press inside one of
/// them never starts a reorder
pub const INTERACTIVE_SELECTOR: &str =
    "input, select, button, textarea, option, a[href], [contenteditable=''], [contenteditable='true']";

const INTERACTIVE_TAGS: &[&str] = &["INPUT", "SELECT", "BUTTON", "TEXTAREA", "OPTION"];

/// A pointer position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: PointerSample) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Bounding box of a rendered row
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RowRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Slot before the first row whose vertical midpoint lies below `pointer_y`;
/// `rows.len()` when there is none.
///
/// `rows` are the rows other than the dragged one, in display order.
pub fn insertion_index(rows: &[RowRect], pointer_y: f64) -> usize {
    rows.iter()
        .position(|row| row.midpoint() > pointer_y)
        .unwrap_or(rows.len())
}

/// Scroll step for a pointer near the viewport edges: negative within `band`
/// of the top, positive within `band` of the bottom.
pub fn edge_scroll_delta(pointer_y: f64, viewport_height: f64, band: f64, step: f64) -> Option<f64> {
    if pointer_y < band {
        Some(-step)
    } else if pointer_y > viewport_height - band {
        Some(step)
    } else {
        None
    }
}

/// Whether an element with this tag name is a form control
pub fn is_interactive_tag(tag: &str) -> bool {
    INTERACTIVE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}
