use std::sync::Arc;

use crate::foundation::error::{MarionetteError, MarionetteResult};

/// Largest bitmap side we agree to allocate.
const MAX_DIM: u32 = 16_384;

/// A rasterized piece of art, ready to be used as an image paint every frame.
#[derive(Clone)]
pub struct Bitmap {
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Decode state of one constraint's art.
#[derive(Clone, Debug)]
pub enum ArtState {
    /// Submitted, no result yet.
    Pending,
    Decoded(Arc<usvg::Tree>),
    /// Decode failed; the art never counts as loaded.
    Failed(String),
}

/// What a decode completion did to an [`ArtCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// First successful decode.
    Loaded,
    Failed,
    /// The art was already settled; nothing changed.
    Ignored,
}

/// What a rasterize request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterOutcome {
    /// A new bitmap was produced.
    Rasterized,
    /// The cached bitmap already matches the requested scale.
    Reused,
    /// Nothing to do: art not decoded yet, or the scale is degenerate.
    Skipped,
}

/// Decoded vector art plus its bitmap at the last requested scale.
#[derive(Clone, Debug)]
pub struct ArtCache {
    key: String,
    state: ArtState,
    bitmap: Option<Bitmap>,
    scale: Option<f64>,
}

impl ArtCache {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: ArtState::Pending,
            bitmap: None,
            scale: None,
        }
    }

    /// Key of this art in the rig description's art map.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &ArtState {
        &self.state
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self.state, ArtState::Decoded(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            ArtState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Intrinsic SVG size, once decoded.
    pub fn source_size(&self) -> Option<(f32, f32)> {
        match &self.state {
            ArtState::Decoded(tree) => Some((tree.size().width(), tree.size().height())),
            _ => None,
        }
    }

    /// Settle a pending decode. Later completions for already settled art are ignored.
    pub(crate) fn complete(&mut self, result: MarionetteResult<Arc<usvg::Tree>>) -> DecodeOutcome {
        if !matches!(self.state, ArtState::Pending) {
            return DecodeOutcome::Ignored;
        }
        match result {
            Ok(tree) => {
                self.state = ArtState::Decoded(tree);
                DecodeOutcome::Loaded
            }
            Err(e) => {
                self.state = ArtState::Failed(e.to_string());
                DecodeOutcome::Failed
            }
        }
    }

    /// Re-rasterize the decoded art for `scale`.
    ///
    /// Non-positive or non-finite scales keep the previous bitmap. Repeating the last scale
    /// keeps the cached bitmap as-is.
    pub fn rasterize(&mut self, scale: f64) -> MarionetteResult<RasterOutcome> {
        match self.prepare(scale)? {
            Prepared::Fresh(bitmap) => {
                self.install(bitmap, scale);
                Ok(RasterOutcome::Rasterized)
            }
            Prepared::Keep(outcome) => Ok(outcome),
        }
    }

    /// Produce the bitmap for `scale` without touching the cache.
    pub(crate) fn prepare(&self, scale: f64) -> MarionetteResult<Prepared> {
        let ArtState::Decoded(tree) = &self.state else {
            return Ok(Prepared::Keep(RasterOutcome::Skipped));
        };
        if !(scale.is_finite() && scale > 0.0) {
            tracing::warn!(art = %self.key, scale, "skipping rasterization for degenerate scale");
            return Ok(Prepared::Keep(RasterOutcome::Skipped));
        }
        if self.bitmap.is_some() && self.scale == Some(scale) {
            tracing::trace!(art = %self.key, scale, "raster cache hit");
            return Ok(Prepared::Keep(RasterOutcome::Reused));
        }

        let size = tree.size();
        let (w, h) = bitmap_dims(size.width(), size.height(), scale)?;
        Ok(Prepared::Fresh(rasterize_svg(tree, w, h)?))
    }

    pub(crate) fn install(&mut self, bitmap: Bitmap, scale: f64) {
        self.bitmap = Some(bitmap);
        self.scale = Some(scale);
    }
}

/// Result of [`ArtCache::prepare`].
pub(crate) enum Prepared {
    Fresh(Bitmap),
    Keep(RasterOutcome),
}

/// Bitmap size for art of intrinsic size `src_w x src_h` at `scale`:
/// `floor(src * scale) + 1` on each axis.
pub fn bitmap_dims(src_w: f32, src_h: f32, scale: f64) -> MarionetteResult<(u32, u32)> {
    fn side(src: f32, scale: f64) -> MarionetteResult<u32> {
        let v = (f64::from(src) * scale).floor();
        if !v.is_finite() || v < 0.0 {
            return Err(MarionetteError::render(format!(
                "invalid art raster side {src} at scale {scale}"
            )));
        }
        let px = v + 1.0;
        if px > f64::from(MAX_DIM) {
            return Err(MarionetteError::render(format!(
                "art raster side too large: {px} (max {MAX_DIM})"
            )));
        }
        Ok(px as u32)
    }

    Ok((side(src_w, scale)?, side(src_h, scale)?))
}

/// Render `tree` stretched to exactly `width x height` pixels.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> MarionetteResult<Bitmap> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MarionetteError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    let pixmap = pixmap_from_premul_bytes(pixmap.data(), width, height)?;
    Ok(Bitmap {
        pixmap: Arc::new(pixmap),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> MarionetteResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MarionetteError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MarionetteError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(MarionetteError::render("pixmap byte len mismatch"));
    }
    // tiny-skia already hands out premultiplied pixels.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
