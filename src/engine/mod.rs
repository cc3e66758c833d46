//! Procedural character-grid animation engine
//!
//! Grid buffer, field functions, particle pools, compositor, render loop and
//! resize adapter. Effects in [`crate::effects`] are built from these parts.

pub mod compositor;
pub mod field;
pub mod grid;
pub mod particles;
pub mod render_loop;
pub mod resize;

pub use compositor::{
    Anchor, Compositor, FlickerMask, Layer, PostEffect, ReversalScope, RowReversal, SliceDisplacement,
    SliceTargets, TextLayer, Trigger,
};
pub use field::{banded, Bands, Field, FieldLayer, Ramp, Sample};
pub use grid::{frame_has_shape, Dimensions, GridBuffer};
pub use particles::{
    DriftParams, DriftStar, Particle, ParticleLayer, ParticlePool, PoolSize, WarpParams, WarpStar,
};
pub use render_loop::{
    AnimationState, CancelToken, Clock, FrameSink, LoopCommand, PhaseSchedule, RenderLoop, Scene,
    SteppedClock, SystemClock,
};
pub use resize::{CellMetrics, PixelArea, ResizeAdapter, Resolution};
