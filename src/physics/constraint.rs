use std::f64::consts::FRAC_PI_2;

use crate::assets::raster::{ArtCache, Bitmap};
use crate::foundation::core::{Affine, Vec2, Viewport};
use crate::foundation::error::{MarionetteError, MarionetteResult};
use crate::physics::node::Node;

/// Fixed-distance link between two nodes of the same arena, optionally carrying art.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub n0: usize,
    pub n1: usize,
    dist_sq: f64,
    /// Art offset from `n0` in the segment's rotated frame, simulation units.
    pub offset: Vec2,
    /// Extra rotation applied on top of the segment angle, radians.
    pub angle: f64,
    pub(crate) art: Option<ArtCache>,
}

impl Constraint {
    /// Bind `n0` and `n1` at their current separation.
    pub fn new(n0: usize, n1: usize, nodes: &[Node]) -> MarionetteResult<Self> {
        let (Some(a), Some(b)) = (nodes.get(n0), nodes.get(n1)) else {
            return Err(MarionetteError::validation(format!(
                "constraint ({n0}, {n1}) out of range for {} nodes",
                nodes.len()
            )));
        };
        Ok(Self {
            n0,
            n1,
            dist_sq: (a.pos - b.pos).hypot2(),
            offset: Vec2::ZERO,
            angle: 0.0,
            art: None,
        })
    }

    pub fn with_draw_offset(mut self, offset: Vec2, angle: f64) -> Self {
        self.offset = offset;
        self.angle = angle;
        self
    }

    pub fn with_art(mut self, art: ArtCache) -> Self {
        self.art = Some(art);
        self
    }

    /// Squared rest length, fixed at construction.
    pub fn rest_dist_sq(&self) -> f64 {
        self.dist_sq
    }

    pub fn art(&self) -> Option<&ArtCache> {
        self.art.as_ref()
    }

    /// One soft relaxation step towards the rest length.
    ///
    /// `delta = rest² / (d² + rest²) - 0.5` stays in `(-0.5, 0.5)` and vanishes at the rest
    /// length; the correction is split by mass so the heavier end moves less. Coincident nodes
    /// on a zero-length link, or two massless nodes, leave positions untouched.
    pub fn solve(&self, nodes: &mut [Node]) {
        let (p0, m0) = (nodes[self.n0].pos, nodes[self.n0].mass);
        let (p1, m1) = (nodes[self.n1].pos, nodes[self.n1].mass);

        let d = p1 - p0;
        let denom = d.hypot2() + self.dist_sq;
        let total = m0 + m1;
        if !(denom > 0.0 && total > 0.0) {
            return;
        }

        let delta = self.dist_sq / denom - 0.5;
        let share0 = m1 / total;
        let share1 = m0 / total;

        nodes[self.n1].pos += Vec2::new(delta * d.x * share1, delta * d.y * share1);
        nodes[self.n0].pos -= Vec2::new(delta * d.x * share0, delta * d.y * share0);
    }

    /// Device-pixel transform that places this constraint's bitmap.
    ///
    /// Origin at `n0`, rotated so bitmap +y runs along `n0 -> n1` (plus `angle`), then shifted
    /// by the scaled draw offset.
    pub fn draw_transform(&self, nodes: &[Node], viewport: Viewport) -> Affine {
        let p0 = nodes[self.n0].pos;
        let d = nodes[self.n1].pos - p0;
        let a = d.y.atan2(d.x) - FRAC_PI_2 + self.angle;
        let origin = viewport.to_pixels(p0);

        Affine::translate(origin.to_vec2())
            * Affine::rotate(a)
            * Affine::translate(self.offset * viewport.scale())
    }

    /// Bitmap and placement, if this constraint has rasterized art.
    pub fn drawable(&self, nodes: &[Node], viewport: Viewport) -> Option<(&Bitmap, Affine)> {
        let bitmap = self.art.as_ref()?.bitmap()?;
        Some((bitmap, self.draw_transform(nodes, viewport)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/constraint.rs"]
mod tests;
