//! Layer compositing and post-effects.
//!
//! Layers are drawn in ascending z-order onto a cleared grid, so a later
//! layer occludes an earlier one wherever it writes. Post-effects then run
//! over the finished grid in registration order.

use super::grid::{Dimensions, GridBuffer};
use super::render_loop::AnimationState;
use rand::prelude::*;
use std::ops::RangeInclusive;
use std::time::Duration;

pub trait Layer {
    /// Called whenever the grid dimensions change.
    fn resize(&mut self, _dims: Dimensions, _rng: &mut StdRng) {}

    /// Advance internal state by one tick.
    fn update(&mut self, _state: &AnimationState, _rng: &mut StdRng) {}

    fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng);
}

pub trait PostEffect {
    fn apply(&mut self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng);
}

struct Slot {
    z: i32,
    phase: Option<usize>,
    layer: Box<dyn Layer>,
}

#[derive(Default)]
pub struct Compositor {
    slots: Vec<Slot>,
    post: Vec<Box<dyn PostEffect>>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer drawn in every phase.
    pub fn layer(self, z: i32, layer: impl Layer + 'static) -> Self {
        self.insert(Slot { z, phase: None, layer: Box::new(layer) })
    }

    /// Register a layer that only updates and draws while `phase` is current.
    pub fn layer_in_phase(self, phase: usize, z: i32, layer: impl Layer + 'static) -> Self {
        self.insert(Slot { z, phase: Some(phase), layer: Box::new(layer) })
    }

    pub fn post(mut self, effect: impl PostEffect + 'static) -> Self {
        self.post.push(Box::new(effect));
        self
    }

    // Equal z keeps registration order.
    fn insert(mut self, slot: Slot) -> Self {
        let at = self.slots.iter().position(|s| s.z > slot.z).unwrap_or(self.slots.len());
        self.slots.insert(at, slot);
        self
    }

    pub fn resize(&mut self, dims: Dimensions, rng: &mut StdRng) {
        for slot in &mut self.slots {
            slot.layer.resize(dims, rng);
        }
    }

    pub fn render(&mut self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        grid.clear();
        for slot in &mut self.slots {
            if slot.phase.is_some_and(|p| p != state.phase) {
                continue;
            }
            slot.layer.update(state, rng);
            slot.layer.draw(state, grid, rng);
        }
        for effect in &mut self.post {
            effect.apply(state, grid, rng);
        }
    }
}

/// Where a [`TextLayer`] places its block of lines.
#[derive(Clone, Copy, Debug)]
pub enum Anchor {
    At(i32, i32),
    Center,
}

/// Opaque block of text, regenerated every tick from the animation state.
pub struct TextLayer<F> {
    anchor: Anchor,
    text: F,
}

impl<F> TextLayer<F>
where
    F: Fn(&AnimationState) -> Vec<String>,
{
    pub fn new(anchor: Anchor, text: F) -> Self {
        Self { anchor, text }
    }
}

impl<F> Layer for TextLayer<F>
where
    F: Fn(&AnimationState) -> Vec<String>,
{
    fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, _rng: &mut StdRng) {
        let lines = (self.text)(state);
        let (x0, y0) = match self.anchor {
            Anchor::At(x, y) => (x, y),
            Anchor::Center => {
                let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                (
                    (grid.width() as i32 - widest as i32) / 2,
                    (grid.height() as i32 - lines.len() as i32) / 2,
                )
            }
        };
        for (i, line) in lines.iter().enumerate() {
            grid.put_str(x0, y0 + i as i32, line);
        }
    }
}

/// Clamp to `[0, 1]`; NaN never fires.
fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// When a probabilistic glitch fires.
#[derive(Clone, Copy, Debug)]
pub enum Trigger {
    /// Independent chance per tick.
    Chance(f64),
    /// Fires while `frame % period >= from`.
    Window { period: u64, from: u64 },
}

impl Trigger {
    fn fires(&self, frame: u64, rng: &mut StdRng) -> bool {
        match *self {
            Trigger::Chance(p) => rng.gen_bool(probability(p)),
            Trigger::Window { period, from } => period > 0 && frame % period >= from,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReversalScope {
    /// Reverse the whole frame: last glyph first, bottom row on top.
    Frame,
    /// Mirror every row in place.
    EveryRow,
    /// Mirror one randomly chosen row.
    RandomRow,
}

/// Signal-glitch mirroring. Lasts only for the tick it fires on.
pub struct RowReversal {
    trigger: Trigger,
    scope: ReversalScope,
}

impl RowReversal {
    pub fn new(trigger: Trigger, scope: ReversalScope) -> Self {
        Self { trigger, scope }
    }
}

impl PostEffect for RowReversal {
    fn apply(&mut self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        if !self.trigger.fires(state.frame, rng) {
            return;
        }
        match self.scope {
            ReversalScope::Frame => grid.cells_mut().reverse(),
            ReversalScope::EveryRow => {
                for y in 0..grid.height() {
                    if let Some(row) = grid.row_mut(y) {
                        row.reverse();
                    }
                }
            }
            ReversalScope::RandomRow => {
                let y = rng.gen_range(0..grid.height());
                if let Some(row) = grid.row_mut(y) {
                    row.reverse();
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceTargets {
    /// Every slice gets its own offset.
    All,
    /// A single random slice is displaced.
    One,
}

/// Horizontal "slice" glitch: the grid is cut into horizontal bands that are
/// rotated sideways by a random offset, then snap back to zero once `hold`
/// has elapsed. It never re-fires while displaced.
pub struct SliceDisplacement {
    slices: usize,
    per_row: bool,
    targets: SliceTargets,
    range: RangeInclusive<i32>,
    hold: Duration,
    chance: f64,
    noise: Vec<char>,
    noise_chance: f64,
    offsets: Vec<i32>,
    fired: Option<(u64, Duration)>,
}

impl SliceDisplacement {
    pub fn new(slices: usize, range: RangeInclusive<i32>, hold: Duration, chance: f64) -> Self {
        let slices = slices.max(1);
        Self {
            slices,
            per_row: false,
            targets: SliceTargets::All,
            range,
            hold,
            chance: probability(chance),
            noise: Vec::new(),
            noise_chance: 0.0,
            offsets: vec![0; slices],
            fired: None,
        }
    }

    /// One slice per grid row, however tall the grid becomes.
    pub fn per_row(range: RangeInclusive<i32>, hold: Duration, chance: f64) -> Self {
        let mut glitch = Self::new(1, range, hold, chance);
        glitch.per_row = true;
        glitch
    }

    pub fn targets(mut self, targets: SliceTargets) -> Self {
        self.targets = targets;
        self
    }

    /// Sprinkle `glyphs` over displaced slices with probability `chance` per cell.
    pub fn noise(mut self, glyphs: &str, chance: f64) -> Self {
        self.noise = glyphs.chars().filter(|c| !c.is_control()).collect();
        self.noise_chance = probability(chance);
        self
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn is_active(&self) -> bool {
        self.fired.is_some()
    }

    /// Displace now, regardless of chance. Ignored while already displaced.
    pub fn trigger(&mut self, state: &AnimationState, rng: &mut StdRng) {
        if self.fired.is_some() {
            return;
        }
        let range = self.range.clone();
        let roll = |rng: &mut StdRng| if range.is_empty() { 0 } else { rng.gen_range(range.clone()) };
        match self.targets {
            SliceTargets::All => {
                for off in &mut self.offsets {
                    *off = roll(rng);
                }
            }
            SliceTargets::One => {
                let i = rng.gen_range(0..self.offsets.len());
                self.offsets[i] = roll(rng);
            }
        }
        self.fired = Some((state.frame, state.elapsed));
        log::trace!("slice glitch at frame {}: {:?}", state.frame, self.offsets);
    }

    /// Snap back once the hold has run out. Returns true on the tick it snaps.
    fn settle(&mut self, state: &AnimationState) -> bool {
        match self.fired {
            Some((frame, at)) if state.frame > frame && state.elapsed.saturating_sub(at) >= self.hold => {
                self.offsets.fill(0);
                self.fired = None;
                true
            }
            _ => false,
        }
    }
}

impl PostEffect for SliceDisplacement {
    fn apply(&mut self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        if self.per_row && self.slices != grid.height() {
            self.slices = grid.height();
            self.offsets = vec![0; self.slices];
            self.fired = None;
        }
        // A snapped-back frame is always shown clean
        let snapped = self.settle(state);
        if self.fired.is_none() && !snapped && rng.gen_bool(self.chance) {
            self.trigger(state, rng);
        }
        if self.fired.is_none() {
            return;
        }

        let w = grid.width();
        let slice_height = (grid.height() / self.slices).max(1);
        let mut scratch = vec![' '; w];
        for y in 0..grid.height() {
            let offset = self.offsets.get(y / slice_height).copied().unwrap_or(0);
            if offset == 0 {
                continue;
            }
            let Some(row) = grid.row_mut(y) else { continue };
            scratch.copy_from_slice(row);
            let shift = offset.rem_euclid(w as i32) as usize;
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = if !self.noise.is_empty() && rng.gen_bool(self.noise_chance) {
                    self.noise[rng.gen_range(0..self.noise.len())]
                } else {
                    scratch[(x + shift) % w]
                };
            }
        }
    }
}

/// Interference: each visible glyph is blanked with probability `chance`.
pub struct FlickerMask {
    chance: f64,
    replacement: char,
}

impl FlickerMask {
    pub fn new(chance: f64) -> Self {
        Self {
            chance: probability(chance),
            replacement: ' ',
        }
    }
}

impl PostEffect for FlickerMask {
    fn apply(&mut self, _state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        for cell in grid.cells_mut() {
            if *cell != ' ' && rng.gen_bool(self.chance) {
                *cell = self.replacement;
            }
        }
    }
}
