//! The render loop: tick, composite, flatten, publish.
//!
//! A [`RenderLoop`] owns one [`Scene`] and the grid it draws into. Every tick
//! it asks the sink how much room there is, resizes if that changed, takes
//! one consistent [`AnimationState`] snapshot, renders, and hands the
//! flattened frame to the sink. Cancelling its [`CancelToken`] stops the loop
//! before the next render or publish.

use super::compositor::Compositor;
use super::grid::{frame_has_shape, Dimensions, GridBuffer};
use super::resize::{CellMetrics, PixelArea, ResizeAdapter, Resolution};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often a paused loop checks for input.
const PAUSE_POLL: Duration = Duration::from_millis(100);

/// Snapshot of one tick. Every layer in a tick sees the same values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Ticks rendered so far, including this one.
    pub frame: u64,
    /// Unpaused time since the loop started.
    pub elapsed: Duration,
    pub phase: usize,
    /// How many times the phase clock has restarted.
    pub cycle: u64,
    /// Time since the current phase cycle began.
    pub cycle_elapsed: Duration,
    pub dims: Dimensions,
}

impl AnimationState {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            frame: 0,
            elapsed: Duration::ZERO,
            phase: 0,
            cycle: 0,
            cycle_elapsed: Duration::ZERO,
            dims,
        }
    }

    /// Seconds since start.
    pub fn time(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Whole `step`s since the current cycle began.
    pub fn cycle_steps(&self, step: Duration) -> u64 {
        if step.is_zero() {
            return 0;
        }
        (self.cycle_elapsed.as_nanos() / step.as_nanos()) as u64
    }

    /// Whole `step`s since the loop started.
    pub fn steps(&self, step: Duration) -> u64 {
        if step.is_zero() {
            return 0;
        }
        (self.elapsed.as_nanos() / step.as_nanos()) as u64
    }

    /// State for the next tick. Elapsed time never runs backwards.
    pub fn advance(self, elapsed: Duration, phases: &PhaseSchedule) -> Self {
        let elapsed = elapsed.max(self.elapsed);
        let (cycle, cycle_elapsed, phase) = phases.locate(elapsed);
        Self {
            frame: self.frame + 1,
            elapsed,
            phase,
            cycle,
            cycle_elapsed,
            dims: self.dims,
        }
    }
}

/// Elapsed-time phase lookup: phase `i` begins at `boundaries[i - 1]`.
/// Phases only move forward, except that the whole schedule may restart
/// from phase 0 every `restart_after`.
#[derive(Clone, Debug, Default)]
pub struct PhaseSchedule {
    boundaries: Vec<Duration>,
    restart_after: Option<Duration>,
}

impl PhaseSchedule {
    pub fn new(mut boundaries: Vec<Duration>) -> Self {
        boundaries.sort();
        Self {
            boundaries,
            restart_after: None,
        }
    }

    pub fn restart_after(mut self, period: Duration) -> Self {
        self.restart_after = (!period.is_zero()).then_some(period);
        self
    }

    pub fn phase_count(&self) -> usize {
        self.boundaries.len() + 1
    }

    /// `(cycle, cycle_elapsed, phase)` at `elapsed`.
    pub fn locate(&self, elapsed: Duration) -> (u64, Duration, usize) {
        let (cycle, within) = match self.restart_after {
            Some(period) => {
                let n = elapsed.as_nanos() / period.as_nanos();
                let rem = elapsed.as_nanos() % period.as_nanos();
                (n as u64, Duration::from_nanos(rem as u64))
            }
            None => (0, elapsed),
        };
        let phase = self.boundaries.iter().take_while(|&&b| within >= b).count();
        (cycle, within, phase)
    }
}

/// One showcased effect: its layers, cadence, grid sizing and phases.
pub struct Scene {
    pub name: &'static str,
    pub interval: Duration,
    pub resolution: Resolution,
    pub phases: PhaseSchedule,
    compositor: Compositor,
}

impl Scene {
    pub fn new(name: &'static str, interval: Duration, resolution: Resolution, compositor: Compositor) -> Self {
        Self {
            name,
            interval,
            resolution,
            phases: PhaseSchedule::default(),
            compositor,
        }
    }

    pub fn with_phases(mut self, phases: PhaseSchedule) -> Self {
        self.phases = phases;
        self
    }

    pub fn resize(&mut self, dims: Dimensions, rng: &mut StdRng) {
        self.compositor.resize(dims, rng);
    }

    pub fn render(&mut self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        self.compositor.render(state, grid, rng);
    }
}

/// Source of time for the loop.
pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;
    fn sleep(&mut self, d: Duration);
}

/// Wall clock.
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Clock that only moves when slept on. Deterministic rendering for print mode and tests.
#[derive(Default)]
pub struct SteppedClock {
    now: Duration,
}

impl Clock for SteppedClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, d: Duration) {
        self.now += d;
    }
}

/// Shared stop flag. Once cancelled the loop renders and publishes nothing further.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Requests a sink may feed back into the loop (typically from key presses).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCommand {
    Quit,
    TogglePause,
    SetInterval(Duration),
    /// Back to the scene's own cadence.
    ResetInterval,
}

/// The presentation surface finished frames are pushed to.
pub trait FrameSink {
    /// Area currently available for drawing.
    fn area(&mut self) -> io::Result<PixelArea>;

    /// `frame` is `dims.height` lines of `dims.width` glyphs joined by `\n`.
    fn publish(&mut self, frame: &str, dims: Dimensions) -> io::Result<()>;

    fn poll_command(&mut self) -> io::Result<Option<LoopCommand>> {
        Ok(None)
    }
}

pub struct RenderLoop {
    scene: Scene,
    grid: GridBuffer,
    adapter: ResizeAdapter,
    state: AnimationState,
    rng: StdRng,
    cancel: CancelToken,
    interval: Duration,
    paused: bool,
    frame_limit: Option<u64>,
    published: u64,
}

impl RenderLoop {
    pub fn new(scene: Scene, cell: CellMetrics, rng: StdRng) -> Self {
        let dims = scene.resolution.min_dims();
        Self {
            adapter: ResizeAdapter::new(cell, scene.resolution),
            grid: GridBuffer::blank(dims),
            state: AnimationState::new(dims),
            interval: scene.interval,
            scene,
            rng,
            cancel: CancelToken::new(),
            paused: false,
            frame_limit: None,
            published: 0,
        }
    }

    /// Override the scene's tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop on its own after publishing `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    /// Render and publish one frame for time `elapsed`.
    pub fn tick<S: FrameSink>(&mut self, sink: &mut S, elapsed: Duration) -> io::Result<()> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        let area = sink.area()?;
        if let Some(dims) = self.adapter.observe(area) {
            debug!("{}: grid {}x{}", self.scene.name, dims.width, dims.height);
            self.grid.resize(dims);
            self.scene.resize(dims, &mut self.rng);
            self.state.dims = dims;
        }

        let before = (self.state.cycle, self.state.phase);
        self.state = self.state.advance(elapsed, &self.scene.phases);
        if (self.state.cycle, self.state.phase) != before {
            debug!(
                "{}: cycle {} phase {} at {:?}",
                self.scene.name, self.state.cycle, self.state.phase, self.state.elapsed
            );
        }

        self.scene.render(&self.state, &mut self.grid, &mut self.rng);

        if self.cancel.is_cancelled() {
            return Ok(());
        }
        let frame = self.grid.flatten();
        debug_assert!(frame_has_shape(&frame, self.grid.dims()), "ragged frame");
        sink.publish(&frame, self.grid.dims())?;
        self.published += 1;
        trace!("{}: frame {} published", self.scene.name, self.state.frame);
        Ok(())
    }

    fn handle(&mut self, cmd: LoopCommand) {
        match cmd {
            LoopCommand::Quit => self.cancel.cancel(),
            LoopCommand::TogglePause => self.paused = !self.paused,
            LoopCommand::SetInterval(d) => self.interval = d.max(Duration::from_millis(1)),
            LoopCommand::ResetInterval => self.interval = self.scene.interval,
        }
    }

    /// Tick until cancelled, the frame limit is reached, or the sink fails.
    pub fn run<S: FrameSink, C: Clock>(&mut self, sink: &mut S, clock: &mut C) -> io::Result<()> {
        let origin = clock.now();
        let mut paused_total = Duration::ZERO;
        let mut paused_at: Option<Duration> = None;
        info!("{}: started, {:?} per tick", self.scene.name, self.interval);

        while !self.cancel.is_cancelled() {
            while let Some(cmd) = sink.poll_command()? {
                self.handle(cmd);
            }
            if self.cancel.is_cancelled() {
                break;
            }

            match (self.paused, paused_at) {
                (true, None) => paused_at = Some(clock.now()),
                (false, Some(at)) => {
                    paused_total += clock.now().saturating_sub(at);
                    paused_at = None;
                }
                _ => {}
            }
            if self.paused {
                clock.sleep(PAUSE_POLL);
                continue;
            }

            let elapsed = clock.now().saturating_sub(origin).saturating_sub(paused_total);
            self.tick(sink, elapsed)?;

            if self.frame_limit.is_some_and(|limit| self.published >= limit) {
                break;
            }
            clock.sleep(self.interval);
        }

        info!("{}: stopped after {} frames", self.scene.name, self.published);
        Ok(())
    }
}
