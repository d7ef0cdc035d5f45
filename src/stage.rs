use crate::assets::loader::DecodeMode;
use crate::effects::{EffectSignal, EffectSink, NullEffects};
use crate::foundation::core::Viewport;
use crate::foundation::error::{MarionetteError, MarionetteResult};
use crate::input::{InteractionState, RigId};
use crate::render::surface::{FrameRGBA, Surface, SurfaceOpts};
use crate::rig::opts::RigOpts;
use crate::rig::runtime::Rig;
use crate::scene::description::RigDescription;

/// Options for a [`Stage`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StageOpts {
    pub surface: SurfaceOpts,
    /// How rigs added to the stage decode their art.
    pub decode: DecodeMode,
}

/// A surface, the rigs painted on it (back to front in insertion order), and the pointer they
/// share.
pub struct Stage {
    surface: Surface,
    rigs: Vec<Rig>,
    input: InteractionState,
    effects: Box<dyn EffectSink>,
    decode: DecodeMode,
    next_id: u32,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("surface", &self.surface)
            .field("rigs", &self.rigs.len())
            .field("input", &self.input)
            .field("decode", &self.decode)
            .finish()
    }
}

impl Stage {
    pub fn new(viewport: Viewport, opts: StageOpts) -> Self {
        Self {
            surface: Surface::new(viewport, opts.surface),
            rigs: Vec::new(),
            input: InteractionState::new(),
            effects: Box::new(NullEffects),
            decode: opts.decode,
            next_id: 0,
        }
    }

    /// Route mode-change signals to `sink`.
    pub fn with_effects(mut self, sink: impl EffectSink + 'static) -> Self {
        self.effects = Box::new(sink);
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.surface.viewport()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn input(&self) -> &InteractionState {
        &self.input
    }

    pub fn rigs(&self) -> &[Rig] {
        &self.rigs
    }

    pub fn rig(&self, id: RigId) -> Option<&Rig> {
        self.rigs.iter().find(|r| r.id() == id)
    }

    pub fn rig_mut(&mut self, id: RigId) -> Option<&mut Rig> {
        self.rigs.iter_mut().find(|r| r.id() == id)
    }

    /// Add a rig built from `desc` (using its own `opts` block, if any).
    pub fn add_rig(&mut self, desc: &RigDescription) -> MarionetteResult<RigId> {
        let opts = desc.opts.unwrap_or_default();
        self.add_rig_with_opts(desc, opts)
    }

    pub fn add_rig_with_opts(
        &mut self,
        desc: &RigDescription,
        opts: RigOpts,
    ) -> MarionetteResult<RigId> {
        let id = RigId(self.next_id);
        let mut rig = Rig::with_opts(id, desc, opts, self.decode)?;
        if self.input.is_down() {
            rig.down();
        }
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| MarionetteError::validation("too many rigs on one stage"))?;
        self.rigs.push(rig);
        Ok(id)
    }

    /// Adopt a new surface size and regenerate every rig's bitmaps before the next frame.
    pub fn resize(&mut self, width: u32, height: u32) -> MarionetteResult<()> {
        let viewport = Viewport::new(width, height)?;
        if !self.surface.resize(viewport) {
            return Ok(());
        }
        tracing::debug!(width, height, scale = viewport.scale(), "stage resized");
        first_error(self.rigs.iter_mut().map(|rig| rig.resize(viewport)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.input.move_to(x, y);
    }

    /// Button down: every rig turns excited.
    pub fn press(&mut self) {
        self.input.press();
        for rig in &mut self.rigs {
            rig.down();
        }
        self.effects.signal(EffectSignal::Excited);
    }

    /// Button up: every rig goes back to idle.
    pub fn release(&mut self) {
        self.input.release();
        for rig in &mut self.rigs {
            rig.up();
        }
        self.effects.signal(EffectSignal::Idle);
    }

    /// Wait for every rig's outstanding decodes. Returns `true` when all rigs are ready.
    pub fn finish_loading(&mut self) -> MarionetteResult<bool> {
        let viewport = self.viewport();
        let mut all = true;
        for rig in &mut self.rigs {
            all &= rig.finish_loading(viewport)?;
        }
        Ok(all)
    }

    pub fn is_ready(&self) -> bool {
        self.rigs.iter().all(Rig::is_ready)
    }

    /// Clear the surface and advance/draw every rig once.
    ///
    /// A rig that fails does not stop the others; the first error is returned.
    pub fn tick(&mut self) -> MarionetteResult<()> {
        self.surface.clear();
        let (surface, input) = (&mut self.surface, &mut self.input);
        first_error(self.rigs.iter_mut().map(|rig| rig.tick(surface, input)))
    }

    /// Pixels of the last tick.
    pub fn snapshot(&mut self) -> MarionetteResult<FrameRGBA> {
        self.surface.snapshot()
    }

    /// [`Stage::tick`] followed by [`Stage::snapshot`].
    pub fn render_frame(&mut self) -> MarionetteResult<FrameRGBA> {
        self.tick()?;
        self.snapshot()
    }
}

/// Drive every result to completion, keeping the first error.
fn first_error(results: impl Iterator<Item = MarionetteResult<()>>) -> MarionetteResult<()> {
    let mut first = None;
    for r in results {
        if let Err(e) = r {
            tracing::warn!(error = %e, "rig update failed");
            first.get_or_insert(e);
        }
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
