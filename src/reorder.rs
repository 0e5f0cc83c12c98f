//! The reorder gesture controller.
//!
//! Translates a pointer drag-and-drop interaction over the rendered list
//! into a permutation for the [`SelectionStore`]. The gesture is modelled
//! as an explicit tagged state ([`DragState`]) so transition legality is
//! enforced by the type: a drag start while already dragging is ignored,
//! and hover updates outside a drag do nothing.
//!
//! Hover updates are preview-only; the store is untouched until drop, at
//! which point the final visual order (each row still carrying the original
//! position it started the gesture with) becomes the permutation submitted
//! to the store. The permutation is exactly "what the user sees", not a
//! computed diff.
//!
//! [`SelectionStore`]: crate::selection::SelectionStore

use std::cmp::Ordering;

/// Which side of a hovered item's vertical midline the pointer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSide {
    /// Pointer is above the midline.
    Above,
    /// Pointer is on or below the midline.
    Below,
}

impl HoverSide {
    /// Classify a pointer position against a hovered item's geometry.
    ///
    /// # Arguments
    ///
    /// * `pointer_y` - Pointer's vertical coordinate
    /// * `item_top` - Hovered item's top edge
    /// * `item_height` - Hovered item's height
    pub fn from_pointer(pointer_y: f64, item_top: f64, item_height: f64) -> Self {
        if pointer_y < item_top + item_height / 2.0 {
            Self::Above
        } else {
            Self::Below
        }
    }
}

/// Ephemeral state of the gesture controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress.
    Idle,
    /// A drag is in progress.
    Dragging {
        /// Original position of the item being dragged.
        source: usize,
        /// Current visual order, expressed as original positions.
        preview: Vec<usize>,
    },
}

/// State machine driving a single drag session at a time.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl Default for DragState {
    fn default() -> Self {
        Self::Idle
    }
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag session is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The current visual preview order, if dragging.
    pub fn preview(&self) -> Option<&[usize]> {
        match &self.state {
            DragState::Dragging { preview, .. } => Some(preview),
            DragState::Idle => None,
        }
    }

    /// Begin a drag on the item at `source` in a list of `len` items.
    ///
    /// Returns whether the gesture started. Ignored (returns false) if a
    /// drag is already in progress or `source` is out of range.
    pub fn begin(&mut self, source: usize, len: usize) -> bool {
        if self.is_dragging() || source >= len {
            return false;
        }
        self.state = DragState::Dragging {
            source,
            preview: (0..len).collect(),
        };
        true
    }

    /// Update the visual preview for a pointer hovering over `target`.
    ///
    /// `target` is the *original* position carried by the hovered row, and
    /// `side` is where the pointer sits relative to that row's midline.
    /// The dragged row is moved before or after the hovered row per the
    /// midline rule; hovering the dragged row itself is a no-op, as is any
    /// hover outside an active drag.
    pub fn hover(&mut self, target: usize, side: HoverSide) {
        let DragState::Dragging { source, preview } = &mut self.state else {
            return;
        };
        let source = *source;
        if target == source {
            return;
        }

        let Some(dragged_at) = preview.iter().position(|&p| p == source) else {
            return;
        };

        // Midline rule table over (source vs target, pointer side). The two
        // "insert after" rows and the two "insert before" rows collapse to
        // the same outcome by symmetry; the table is kept in full so the
        // behavior reads off directly.
        let insert_before = match (source.cmp(&target), side) {
            (Ordering::Less, HoverSide::Above) => true,
            (Ordering::Less, HoverSide::Below) => false,
            (Ordering::Greater, HoverSide::Above) => true,
            (Ordering::Greater, HoverSide::Below) => false,
            (Ordering::Equal, _) => return,
        };

        preview.remove(dragged_at);
        let Some(target_at) = preview.iter().position(|&p| p == target) else {
            // Target vanished from the preview; restore and bail.
            preview.insert(dragged_at, source);
            return;
        };
        let insert_at = if insert_before { target_at } else { target_at + 1 };
        preview.insert(insert_at, source);
    }

    /// Drop: end the gesture and return the final visual order.
    ///
    /// The returned sequence of original positions is the permutation to
    /// submit to the selection store. Returns `None` when no drag is
    /// active.
    pub fn drop(&mut self) -> Option<Vec<usize>> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { preview, .. } => Some(preview),
            DragState::Idle => None,
        }
    }

    /// Cancel: discard the gesture without producing a permutation.
    ///
    /// The caller re-projects from the store to revert any visual preview.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
