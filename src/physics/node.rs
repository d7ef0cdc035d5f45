use crate::foundation::core::{Point, Vec2, Viewport};
use crate::input::{DragTarget, InteractionState};
use crate::physics::motion::{self, Motion};

/// Per-frame parameters a rig hands to each of its nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    /// Velocity retention, `1.0` keeps all momentum.
    pub friction: f64,
    /// Current direction sign (±1) read by scripted motions.
    pub direction: f64,
    /// Hit-test radius as a multiple of node radius.
    pub hit_radius_factor: f64,
}

/// A Verlet point mass. Velocity is implicit as `pos - prev`.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Current position in simulation space.
    pub pos: Point,
    /// Position one integration step in the past.
    pub prev: Point,
    pub radius: f64,
    pub mass: f64,
    pub motion: Motion,
    /// Multiplier applied to the scripted motion.
    pub force: f64,
}

impl Node {
    pub fn new(pos: Point, radius: f64, mass: f64) -> Self {
        Self {
            pos,
            prev: pos,
            radius,
            mass,
            motion: Motion::None,
            force: 1.0,
        }
    }

    pub fn with_motion(mut self, motion: Motion, force: f64) -> Self {
        self.motion = motion;
        self.force = force;
        self
    }

    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev
    }

    /// One frame of node update: scripted nudge, Verlet step, pointer claim/release, ground
    /// clamp.
    ///
    /// `me` names this node inside the shared drag slot. Scripted motion is skipped while any
    /// node of the same rig is being dragged.
    pub fn integrate(
        &mut self,
        me: DragTarget,
        viewport: Viewport,
        step: StepParams,
        input: &mut InteractionState,
    ) {
        if !input.is_dragging(me.rig) {
            self.pos += motion::apply(self.motion, step.direction, self.force);
        }

        let before = self.pos;
        self.pos += (self.pos - self.prev) * step.friction;
        self.prev = before;

        if input.is_down() {
            if input.drag().is_none()
                && self.hit_test(viewport, input.pointer(), step.hit_radius_factor)
            {
                input.claim(me);
            }
        } else {
            input.clear_owned_by(me.rig);
        }

        self.clamp_to_ground(viewport.floor_y(self.radius));
    }

    /// Clamp to the floor line. Touching the floor kills both vertical and horizontal
    /// velocity.
    ///
    /// Returns `true` when a clamp happened.
    pub fn clamp_to_ground(&mut self, floor_y: f64) -> bool {
        if self.pos.y > floor_y {
            self.pos.x += self.prev.x - self.pos.x;
            self.prev.x = self.pos.x;
            self.pos.y = floor_y;
            self.prev.y = self.pos.y;
            return true;
        }
        false
    }

    /// Whether `pointer_px` (device pixels) lies inside this node's padded grab circle.
    pub fn hit_test(&self, viewport: Viewport, pointer_px: Point, radius_factor: f64) -> bool {
        let center = viewport.to_pixels(self.pos);
        let r = self.radius * viewport.scale() * radius_factor;
        (pointer_px - center).hypot2() < r * r
    }

    /// First-order pull towards `target` (simulation space). `rate` is the fraction of the
    /// remaining gap closed this frame.
    pub fn pull_towards(&mut self, target: Point, rate: f64) {
        self.pos += (target - self.pos) * rate;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/node.rs"]
mod tests;
