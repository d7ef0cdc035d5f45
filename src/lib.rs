//! Articulated, Verlet-integrated rigs drawn from cached SVG art.
//!
//! A [`RigDescription`] (nodes, distance constraints, per-limb SVG) becomes a [`Rig`]: an arena
//! of [`Node`]s relaxed by [`Constraint`]s every frame, with limb art decoded off-thread and
//! rasterized once per canvas scale. A [`Stage`] owns the [`Surface`], the shared pointer state,
//! and any number of rigs.
#![forbid(unsafe_code)]

pub mod assets;
pub mod effects;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod rig;
pub mod scene;
pub mod stage;

pub use assets::decode::parse_svg;
pub use assets::loader::{ArtLoader, DecodeEvent, DecodeMode};
pub use assets::raster::{
    ArtCache, ArtState, Bitmap, DecodeOutcome, RasterOutcome, bitmap_dims, rasterize_svg,
};
pub use effects::{EffectSignal, EffectSink, NullEffects, RecordingEffects};
pub use foundation::core::{Affine, Point, Rect, Vec2, Viewport};
pub use foundation::error::{MarionetteError, MarionetteResult};
pub use input::{DragTarget, InteractionState, RigId};
pub use physics::constraint::Constraint;
pub use physics::motion::{Motion, apply as apply_motion};
pub use physics::node::{Node, StepParams};
pub use render::surface::{FrameRGBA, Surface, SurfaceOpts};
pub use rig::opts::RigOpts;
pub use rig::runtime::{LoadStatus, Mode, Rig, RigState};
pub use scene::description::{ConstraintDef, NodeDef, RigDescription};
pub use scene::validate::validate_description;
pub use stage::{Stage, StageOpts};
