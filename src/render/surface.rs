use vello_cpu::kurbo::Shape as _;

use crate::assets::raster::Bitmap;
use crate::foundation::core::{Affine, Viewport};
use crate::foundation::error::MarionetteResult;

/// Radius of the projector disc, in simulation units.
const PROJECTOR_RADIUS: f64 = 500.0;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Clear colours for a [`Surface`], straight (not premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SurfaceOpts {
    pub background_rgba: [u8; 4],
    /// Disc of radius `500 * scale` drawn over the background at the surface centre.
    pub projector_rgba: Option<[u8; 4]>,
}

impl Default for SurfaceOpts {
    fn default() -> Self {
        Self {
            background_rgba: [0x11, 0x11, 0x11, 0xff],
            projector_rgba: None,
        }
    }
}

/// CPU drawing surface sized to the viewport.
///
/// Draw calls record into a `vello_cpu` context; [`Surface::snapshot`] rasterizes them.
pub struct Surface {
    viewport: Viewport,
    opts: SurfaceOpts,
    // `None` while the viewport has a zero side.
    ctx: Option<vello_cpu::RenderContext>,
    draws: usize,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("viewport", &self.viewport)
            .field("opts", &self.opts)
            .field("draws", &self.draws)
            .finish()
    }
}

impl Surface {
    pub fn new(viewport: Viewport, opts: SurfaceOpts) -> Self {
        Self {
            viewport,
            opts,
            ctx: make_ctx(viewport),
            draws: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.viewport.scale()
    }

    /// Bitmaps drawn since the last clear.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Adopt a new size. Returns `true` when the size actually changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.ctx = make_ctx(viewport);
        self.draws = 0;
        true
    }

    /// Start a new frame: background fill, then the projector disc if one is configured.
    pub fn clear(&mut self) {
        self.draws = 0;
        let viewport = self.viewport;
        let opts = self.opts;
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let [r, g, b, a] = opts.background_rgba;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(viewport.width),
            f64::from(viewport.height),
        ));

        if let Some(projector) = opts.projector_rgba
            && projector != opts.background_rgba
        {
            let [r, g, b, a] = projector;
            let disc = vello_cpu::kurbo::Circle::new(
                (
                    f64::from(viewport.width) * 0.5,
                    f64::from(viewport.height) * 0.5,
                ),
                viewport.scale() * PROJECTOR_RADIUS,
            );
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_path(&disc.to_path(0.1));
        }
    }

    /// Blit `bitmap` with its top-left corner at the origin of `transform`.
    ///
    /// Every draw sets its own transform, so nothing carries over to the next call.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, transform: Affine) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(bitmap.paint());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(bitmap.width()),
            f64::from(bitmap.height()),
        ));
        self.draws += 1;
    }

    /// Rasterize everything recorded since the last clear.
    pub fn snapshot(&mut self) -> MarionetteResult<FrameRGBA> {
        let (width, height) = (self.viewport.width, self.viewport.height);
        let Some(ctx) = self.ctx.as_mut() else {
            return Ok(FrameRGBA {
                width,
                height,
                data: Vec::new(),
                premultiplied: true,
            });
        };
        let mut pixmap = vello_cpu::Pixmap::new(ctx.width(), ctx.height());
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn make_ctx(viewport: Viewport) -> Option<vello_cpu::RenderContext> {
    let w = u16::try_from(viewport.width).ok()?;
    let h = u16::try_from(viewport.height).ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some(vello_cpu::RenderContext::new(w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
