use crate::foundation::core::Vec2;

/// Scripted per-frame nudge attached to a node.
///
/// The rig flips its direction sign every `pace` frames; motions read that sign to alternate
/// between two symmetric poses. The node's force multiplier scales every displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "params")]
pub enum Motion {
    /// No scripted displacement.
    #[default]
    None,
    /// Both axes follow the direction sign: `(x * dir, y * dir) * force`.
    Swing { x: f64, y: f64 },
    /// Horizontal sway with a constant vertical push: `(x * dir, y) * force`.
    Bob { x: f64, y: f64 },
    /// Constant displacement independent of direction: `(x, y) * force`.
    Push { x: f64, y: f64 },
}

impl Motion {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub(crate) fn is_finite(&self) -> bool {
        match *self {
            Self::None => true,
            Self::Swing { x, y } | Self::Bob { x, y } | Self::Push { x, y } => {
                x.is_finite() && y.is_finite()
            }
        }
    }
}

/// Displacement produced by `kind` for direction sign `direction` (±1) and force multiplier
/// `force`.
pub fn apply(kind: Motion, direction: f64, force: f64) -> Vec2 {
    match kind {
        Motion::None => Vec2::ZERO,
        Motion::Swing { x, y } => Vec2::new(x * direction, y * direction) * force,
        Motion::Bob { x, y } => Vec2::new(x * direction, y) * force,
        Motion::Push { x, y } => Vec2::new(x, y) * force,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/motion.rs"]
mod tests;
