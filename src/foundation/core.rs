use crate::foundation::error::{MarionetteError, MarionetteResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of the drawing surface and the uniform scale derived from them.
///
/// Simulation space is unscaled: `x = 0` sits on the horizontal centre of the surface and
/// `y = 0` on its top edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Length (in pixels) of the shorter surface side that maps to scale `1.0`.
    pub const REFERENCE_UNIT: f64 = 1100.0;

    pub fn new(width: u32, height: u32) -> MarionetteResult<Self> {
        // vello_cpu surfaces are addressed with u16 dimensions.
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(MarionetteError::validation(format!(
                "viewport {width}x{height} exceeds {}x{}",
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    pub fn scale(self) -> f64 {
        f64::from(self.width.min(self.height)) / Self::REFERENCE_UNIT
    }

    pub fn is_degenerate(self) -> bool {
        let s = self.scale();
        !(s.is_finite() && s > 0.0)
    }

    /// Map a simulation-space point to device pixels.
    pub fn to_pixels(self, p: Point) -> Point {
        let s = self.scale();
        Point::new(p.x * s + f64::from(self.width) * 0.5, p.y * s)
    }

    /// Map a device-pixel point back to simulation space.
    ///
    /// Returns `None` for a degenerate (zero-sized) viewport.
    pub fn to_sim(self, px: Point) -> Option<Point> {
        if self.is_degenerate() {
            return None;
        }
        let s = self.scale();
        Some(Point::new(
            (px.x - f64::from(self.width) * 0.5) / s,
            px.y / s,
        ))
    }

    /// Ground line in simulation space for a node of radius `radius`.
    pub fn floor_y(self, radius: f64) -> f64 {
        f64::from(self.height) / self.scale() - radius
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
