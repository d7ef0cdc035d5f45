use std::sync::Arc;

use crate::assets::loader::{ArtLoader, DecodeEvent, DecodeMode};
use crate::assets::raster::{ArtCache, DecodeOutcome, Prepared};
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::error::{MarionetteError, MarionetteResult};
use crate::input::{DragTarget, InteractionState, RigId};
use crate::physics::constraint::Constraint;
use crate::physics::node::{Node, StepParams};
use crate::render::surface::Surface;
use crate::rig::opts::RigOpts;
use crate::scene::description::RigDescription;

/// Lifecycle of a rig. `Loading -> Ready` is the only transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigState {
    /// Some art is still decoding (or failed to decode).
    Loading,
    Ready,
}

/// Behavioural mode toggled by [`Rig::down`] / [`Rig::up`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Excited,
}

/// Art decode progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadStatus {
    pub loaded: usize,
    pub total: usize,
    /// `(constraint index, art key, error)` for every art that failed to decode.
    pub failed: Vec<(usize, String, String)>,
}

impl LoadStatus {
    /// `true` when loading can no longer complete.
    pub fn is_stuck(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// One articulated character: nodes, constraints, and the dance state driving them.
#[derive(Debug)]
pub struct Rig {
    id: RigId,
    opts: RigOpts,
    nodes: Vec<Node>,
    constraints: Vec<Constraint>,
    // Constraint indices with art, in declaration (paint) order.
    drawables: Vec<usize>,
    frame: u64,
    direction: f64,
    mode: Mode,
    friction: f64,
    pace: u32,
    loaded: usize,
    state: RigState,
    loader: ArtLoader,
    viewport: Option<Viewport>,
}

impl Rig {
    /// Build a rig using the description's own `opts` block (or defaults).
    pub fn new(id: RigId, desc: &RigDescription, decode: DecodeMode) -> MarionetteResult<Self> {
        let opts = desc.opts.unwrap_or_default();
        Self::with_opts(id, desc, opts, decode)
    }

    /// Build a rig with explicit options; the description's `opts` block is ignored.
    #[tracing::instrument(skip(desc, opts), fields(nodes = desc.nodes.len(), constraints = desc.constraints.len()))]
    pub fn with_opts(
        id: RigId,
        desc: &RigDescription,
        opts: RigOpts,
        decode: DecodeMode,
    ) -> MarionetteResult<Self> {
        desc.validate()?;
        opts.validate().map_err(MarionetteError::validation)?;

        let nodes: Vec<Node> = desc
            .nodes
            .iter()
            .map(|n| {
                Node::new(Point::new(n.x + opts.anchor_x, n.y), n.w, n.mass)
                    .with_motion(n.motion, opts.force_idle)
            })
            .collect();

        let mut loader = ArtLoader::new(decode);
        let mut constraints = Vec::with_capacity(desc.constraints.len());
        let mut drawables = Vec::new();
        for (ci, c) in desc.constraints.iter().enumerate() {
            let lookup = |id: &str| {
                desc.node_index(id).ok_or_else(|| {
                    MarionetteError::validation(format!(
                        "constraints[{ci}] references unknown node '{id}'"
                    ))
                })
            };
            let n0 = lookup(&c.n0)?;
            let n1 = lookup(&c.n1)?;
            let mut constraint =
                Constraint::new(n0, n1, &nodes)?.with_draw_offset(Vec2::new(c.x, c.y), c.a);

            if let Some(key) = &c.art {
                let markup = desc.art.get(key).ok_or_else(|| {
                    MarionetteError::validation(format!(
                        "constraints[{ci}] references unknown art '{key}'"
                    ))
                })?;
                constraint = constraint.with_art(ArtCache::new(key.clone()));
                loader.submit(ci, Arc::from(markup.as_str()));
                drawables.push(ci);
            }
            constraints.push(constraint);
        }

        Ok(Self {
            id,
            opts,
            nodes,
            constraints,
            drawables,
            frame: 0,
            direction: 1.0,
            mode: Mode::Idle,
            friction: opts.friction_idle,
            pace: opts.pace_idle,
            loaded: 0,
            state: RigState::Loading,
            loader,
            viewport: None,
        })
    }

    pub fn id(&self) -> RigId {
        self.id
    }

    pub fn opts(&self) -> &RigOpts {
        &self.opts
    }

    pub fn state(&self) -> RigState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == RigState::Ready
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current direction sign, `1.0` or `-1.0`.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn pace(&self) -> u32 {
        self.pace
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraint indices that carry art, in paint order.
    pub fn drawables(&self) -> &[usize] {
        &self.drawables
    }

    pub fn load_status(&self) -> LoadStatus {
        let failed = self
            .drawables
            .iter()
            .filter_map(|&ci| {
                let art = self.constraints[ci].art.as_ref()?;
                let err = art.failure()?;
                Some((ci, art.key().to_string(), err.to_string()))
            })
            .collect();
        LoadStatus {
            loaded: self.loaded,
            total: self.drawables.len(),
            failed,
        }
    }

    /// Apply finished decodes; on the first moment every art is decoded, switch to `Ready` and
    /// rasterize everything for `viewport`.
    ///
    /// Returns `true` once the rig is ready.
    pub fn load(&mut self, viewport: Viewport) -> MarionetteResult<bool> {
        let events = self.loader.drain();
        self.apply_decodes(events, viewport)
    }

    /// Block until every outstanding decode has reported, then behave like [`Rig::load`].
    pub fn finish_loading(&mut self, viewport: Viewport) -> MarionetteResult<bool> {
        let events = self.loader.wait()?;
        self.apply_decodes(events, viewport)
    }

    fn apply_decodes(
        &mut self,
        events: Vec<DecodeEvent>,
        viewport: Viewport,
    ) -> MarionetteResult<bool> {
        for ev in events {
            let Some(art) = self
                .constraints
                .get_mut(ev.slot)
                .and_then(|c| c.art.as_mut())
            else {
                continue;
            };
            match art.complete(ev.result) {
                DecodeOutcome::Loaded => self.loaded += 1,
                DecodeOutcome::Failed => {
                    tracing::warn!(
                        rig = self.id.0,
                        constraint = ev.slot,
                        art = art.key(),
                        error = art.failure().unwrap_or_default(),
                        "art decode failed; rig stays loading"
                    );
                }
                DecodeOutcome::Ignored => {}
            }
        }

        if self.state == RigState::Loading && self.loaded == self.drawables.len() {
            self.state = RigState::Ready;
            tracing::debug!(rig = self.id.0, art = self.loaded, "rig ready");
            self.resize(viewport)?;
        }
        Ok(self.is_ready())
    }

    /// Re-rasterize all decoded art for `viewport`'s scale.
    ///
    /// Bitmaps are swapped in only once every art has rasterized; on error the rig keeps all of
    /// its previous bitmaps and the next [`Rig::tick`] retries. A degenerate viewport keeps the
    /// current bitmaps.
    #[tracing::instrument(skip(self), fields(rig = self.id.0))]
    pub fn resize(&mut self, viewport: Viewport) -> MarionetteResult<()> {
        let scale = viewport.scale();
        let mut fresh = Vec::with_capacity(self.drawables.len());
        for &ci in &self.drawables {
            if let Some(art) = self.constraints[ci].art.as_ref()
                && let Prepared::Fresh(bitmap) = art.prepare(scale)?
            {
                fresh.push((ci, bitmap));
            }
        }
        for (ci, bitmap) in fresh {
            if let Some(art) = self.constraints[ci].art.as_mut() {
                art.install(bitmap, scale);
            }
        }
        self.viewport = Some(viewport);
        Ok(())
    }

    /// Switch to excited mode: slight damping, faster direction flips, stronger motions.
    pub fn down(&mut self) {
        self.set_mode(Mode::Excited);
    }

    /// Switch back to idle mode.
    pub fn up(&mut self) {
        self.set_mode(Mode::Idle);
    }

    fn set_mode(&mut self, mode: Mode) {
        let (friction, pace, force) = match mode {
            Mode::Idle => (
                self.opts.friction_idle,
                self.opts.pace_idle,
                self.opts.force_idle,
            ),
            Mode::Excited => (
                self.opts.friction_excited,
                self.opts.pace_excited,
                self.opts.force_excited,
            ),
        };
        self.mode = mode;
        self.friction = friction;
        self.pace = pace;
        self.set_force(force);
        tracing::debug!(rig = self.id.0, ?mode, "mode switch");
    }

    /// Set every node's motion force multiplier. The next mode switch overrides it.
    pub fn set_force(&mut self, force: f64) {
        for n in &mut self.nodes {
            n.force = force;
        }
    }

    /// Run one relaxation sweep over every constraint, `opts.iterations` times.
    pub fn relax(&mut self) {
        for _ in 0..self.opts.iterations {
            for c in &self.constraints {
                c.solve(&mut self.nodes);
            }
        }
    }

    /// Advance the simulation by one frame without drawing.
    pub fn step(&mut self, viewport: Viewport, input: &mut InteractionState) {
        self.frame += 1;
        if self.frame % u64::from(self.pace) == 0 {
            self.direction = -self.direction;
        }

        let target = viewport.to_sim(input.pointer());
        if input.is_dragging(self.id) {
            if let (Some(target), Some(node)) = (
                target,
                input.drag().and_then(|t| self.nodes.get_mut(t.node)),
            ) {
                node.pull_towards(target, self.opts.drag_rate);
            }
        } else if input.is_dragging_other(self.id)
            && self.opts.follow_rate > 0.0
            && let Some(target) = target
        {
            for n in &mut self.nodes {
                n.pull_towards(target, self.opts.follow_rate);
            }
        }

        let params = StepParams {
            friction: self.friction,
            direction: self.direction,
            hit_radius_factor: self.opts.hit_radius_factor,
        };
        for (i, n) in self.nodes.iter_mut().enumerate() {
            let me = DragTarget {
                rig: self.id,
                node: i,
            };
            n.integrate(me, viewport, params, input);
        }

        self.relax();
    }

    /// Paint every rasterized constraint in declaration order. Returns the number drawn.
    pub fn draw(&self, surface: &mut Surface) -> usize {
        let viewport = surface.viewport();
        let mut drawn = 0;
        for &ci in &self.drawables {
            if let Some((bitmap, transform)) = self.constraints[ci].drawable(&self.nodes, viewport)
            {
                surface.draw_bitmap(bitmap, transform);
                drawn += 1;
            }
        }
        drawn
    }

    /// One animation frame: apply finished decodes, step the simulation, draw.
    pub fn tick(
        &mut self,
        surface: &mut Surface,
        input: &mut InteractionState,
    ) -> MarionetteResult<()> {
        let viewport = surface.viewport();
        self.load(viewport)?;
        if self.viewport != Some(viewport) {
            self.resize(viewport)?;
        }
        self.step(viewport, input);
        self.draw(surface);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/runtime.rs"]
mod tests;
