use crate::foundation::core::Point;

/// Identifies one rig on a stage. Assigned by the caller (or by [`crate::Stage`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RigId(pub u32);

/// The node currently held by the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragTarget {
    pub rig: RigId,
    /// Index into the owning rig's node arena.
    pub node: usize,
}

/// Pointer state shared by every rig on a stage.
///
/// The host owns pointer position and button state. Rigs only claim the drag slot when one of
/// their nodes is hit while it is empty, and only clear it when it refers to one of their own
/// nodes.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    pointer: Point,
    is_down: bool,
    drag: Option<DragTarget>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position in device pixels.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn is_down(&self) -> bool {
        self.is_down
    }

    pub fn drag(&self) -> Option<DragTarget> {
        self.drag
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.pointer = Point::new(x, y);
    }

    pub fn press(&mut self) {
        self.is_down = true;
    }

    pub fn press_at(&mut self, x: f64, y: f64) {
        self.move_to(x, y);
        self.press();
    }

    /// Button up. The drag slot is left for its owning rig to clear on its next tick.
    pub fn release(&mut self) {
        self.is_down = false;
    }

    /// `true` when the dragged node belongs to `rig`.
    pub fn is_dragging(&self, rig: RigId) -> bool {
        matches!(self.drag, Some(t) if t.rig == rig)
    }

    /// `true` when some other rig's node is being dragged.
    pub fn is_dragging_other(&self, rig: RigId) -> bool {
        matches!(self.drag, Some(t) if t.rig != rig)
    }

    pub(crate) fn claim(&mut self, target: DragTarget) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.drag = Some(target);
        true
    }

    pub(crate) fn clear_owned_by(&mut self, rig: RigId) {
        if self.is_dragging(rig) {
            self.drag = None;
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/input.rs"]
mod tests;
