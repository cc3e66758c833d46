//! Particle pools: fixed-count sets of independently stepped entities.
//!
//! A particle that leaves the visible area is respawned in place, never
//! removed, so a pool holds the same number of particles from one resize to
//! the next.

use super::compositor::Layer;
use super::grid::{Dimensions, GridBuffer};
use super::render_loop::AnimationState;
use rand::prelude::*;

/// How many particles a pool holds for a given grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PoolSize {
    Fixed(usize),
    /// One particle per grid column.
    PerColumn,
    /// `per_cell` particles per grid cell, but never fewer than `min`.
    Density { per_cell: f64, min: usize },
}

impl PoolSize {
    pub fn count(&self, dims: Dimensions) -> usize {
        match *self {
            PoolSize::Fixed(n) => n,
            PoolSize::PerColumn => dims.width,
            PoolSize::Density { per_cell, min } => ((dims.area() as f64 * per_cell) as usize).max(min),
        }
    }
}

pub trait Particle: Sized {
    /// Shared tuning for every particle in the pool.
    type Params;

    /// Fresh particle for pool slot `slot`.
    fn spawn(params: &Self::Params, dims: Dimensions, rng: &mut StdRng, slot: usize) -> Self;

    /// Integrate one tick of motion.
    fn advance(&mut self, params: &Self::Params);

    /// Left the visible bounds (or crossed the viewer plane).
    fn expired(&self, params: &Self::Params, dims: Dimensions) -> bool;

    /// Re-enter at a valid edge. Defaults to a full respawn.
    fn respawn(&mut self, params: &Self::Params, dims: Dimensions, rng: &mut StdRng, slot: usize) {
        *self = Self::spawn(params, dims, rng, slot);
    }

    fn draw(&self, params: &Self::Params, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng);
}

pub struct ParticlePool<P: Particle> {
    params: P::Params,
    size: PoolSize,
    dims: Option<Dimensions>,
    particles: Vec<P>,
}

impl<P: Particle> ParticlePool<P> {
    /// Empty until the first [`resize`](Self::resize) tells it how big the grid is.
    pub fn new(params: P::Params, size: PoolSize) -> Self {
        Self {
            params,
            size,
            dims: None,
            particles: Vec::new(),
        }
    }

    /// Repopulate for new bounds. Returns false (and does nothing) when the
    /// bounds are unchanged.
    pub fn resize(&mut self, dims: Dimensions, rng: &mut StdRng) -> bool {
        let dims = dims.clamped();
        if self.dims == Some(dims) {
            return false;
        }
        let count = self.size.count(dims);
        self.particles = (0..count)
            .map(|slot| P::spawn(&self.params, dims, rng, slot))
            .collect();
        self.dims = Some(dims);
        log::debug!("particle pool reseeded: {} particles for {}x{}", count, dims.width, dims.height);
        true
    }

    pub fn step(&mut self, rng: &mut StdRng) {
        let Some(dims) = self.dims else {
            return;
        };
        for (slot, p) in self.particles.iter_mut().enumerate() {
            p.advance(&self.params);
            if p.expired(&self.params, dims) {
                p.respawn(&self.params, dims, rng, slot);
            }
        }
    }

    pub fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        for p in &self.particles {
            p.draw(&self.params, state, grid, rng);
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn dims(&self) -> Option<Dimensions> {
        self.dims
    }

    pub fn params_mut(&mut self) -> &mut P::Params {
        &mut self.params
    }

    pub fn particles(&self) -> &[P] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [P] {
        &mut self.particles
    }
}

/// A pool drawn as one compositor layer: stepped in `update`, plotted in `draw`.
pub struct ParticleLayer<P: Particle> {
    pool: ParticlePool<P>,
}

impl<P: Particle> ParticleLayer<P> {
    pub fn new(pool: ParticlePool<P>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ParticlePool<P> {
        &self.pool
    }
}

impl<P: Particle> Layer for ParticleLayer<P> {
    fn resize(&mut self, dims: Dimensions, rng: &mut StdRng) {
        self.pool.resize(dims, rng);
    }

    fn update(&mut self, _state: &AnimationState, rng: &mut StdRng) {
        self.pool.step(rng);
    }

    fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        self.pool.draw(state, grid, rng);
    }
}

// Perspective starfield

const MID_GLYPHS: &[char] = &['.', ',', '+', '*'];

#[derive(Clone, Copy, Debug)]
pub struct WarpParams {
    /// Projection constant: `screen = world * (k / z) + centre`.
    pub k: f64,
    /// Depth travelled per tick.
    pub speed: f64,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self { k: 128.0, speed: 1.6 }
    }
}

/// A star flying toward the viewer. `z` runs from the grid width (far plane) to 0.
#[derive(Clone, Copy, Debug)]
pub struct WarpStar {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WarpStar {
    pub fn project(&self, k: f64, dims: Dimensions) -> (f64, f64) {
        let (cx, cy) = dims.center();
        let scale = k / self.z;
        (self.x * scale + cx, self.y * scale + cy)
    }

    /// Pick x/y so the star projects inside the grid at depth `z`.
    fn place(&mut self, k: f64, dims: Dimensions, rng: &mut StdRng) {
        let frustum = (self.z / k).min(1.0);
        self.x = rng.gen_range(-0.5..0.5) * dims.width as f64 * frustum;
        self.y = rng.gen_range(-0.5..0.5) * dims.height as f64 * frustum;
    }

    /// Glyph by depth: far stars are dots, near stars streak along their direction of travel.
    pub fn glyph(&self, dims: Dimensions, dx: f64, dy: f64, rng: &mut StdRng) -> char {
        let far = dims.width as f64;
        if self.z > far * 0.8 {
            '.'
        } else if self.z > far * 0.4 {
            MID_GLYPHS[rng.gen_range(0..MID_GLYPHS.len())]
        } else {
            streak_glyph(dx, dy)
        }
    }
}

/// Motion-blur glyph for travel along `(dx, dy)` in screen space (y grows downward).
pub fn streak_glyph(dx: f64, dy: f64) -> char {
    let angle = dy.atan2(dx).to_degrees();
    let abs = angle.abs();
    if !(22.5..=157.5).contains(&abs) {
        '-'
    } else if abs > 67.5 && abs < 112.5 {
        '|'
    } else if angle > 0.0 {
        if angle < 67.5 { '\\' } else { '/' }
    } else if angle > -67.5 {
        '/'
    } else {
        '\\'
    }
}

impl Particle for WarpStar {
    type Params = WarpParams;

    fn spawn(params: &WarpParams, dims: Dimensions, rng: &mut StdRng, _slot: usize) -> Self {
        let far = dims.width as f64;
        let mut star = WarpStar {
            x: 0.0,
            y: 0.0,
            z: far - rng.gen_range(0.0..far),
        };
        star.place(params.k, dims, rng);
        star
    }

    fn advance(&mut self, params: &WarpParams) {
        self.z -= params.speed;
    }

    fn expired(&self, params: &WarpParams, dims: Dimensions) -> bool {
        if self.z <= 0.0 {
            return true;
        }
        let (px, py) = self.project(params.k, dims);
        !px.is_finite() || !py.is_finite() || !dims.contains(px.floor() as i32, py.floor() as i32)
    }

    fn respawn(&mut self, params: &WarpParams, dims: Dimensions, rng: &mut StdRng, _slot: usize) {
        self.z = dims.width as f64;
        self.place(params.k, dims, rng);
    }

    fn draw(&self, params: &WarpParams, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        let dims = state.dims;
        let (px, py) = self.project(params.k, dims);
        let (px, py) = (px.floor(), py.floor());
        let (cx, cy) = dims.center();
        let ch = self.glyph(dims, px - cx, py - cy, rng);
        grid.plot(px, py, ch);
    }
}

// Parallax drift

#[derive(Clone, Copy, Debug)]
pub struct DriftParams {
    /// Horizontal cells travelled per tick per unit of depth.
    pub rate: f64,
}

/// A star scrolling right-to-left; deeper `z` means nearer and faster.
#[derive(Clone, Copy, Debug)]
pub struct DriftStar {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub glyph: char,
}

impl Particle for DriftStar {
    type Params = DriftParams;

    fn spawn(_params: &DriftParams, dims: Dimensions, rng: &mut StdRng, _slot: usize) -> Self {
        let z = rng.gen_range(0.2..2.2);
        let glyph = if z > 1.5 {
            '✦'
        } else if z > 1.0 {
            '*'
        } else {
            '.'
        };
        DriftStar {
            x: rng.gen_range(0.0..dims.width as f64),
            y: rng.gen_range(0.0..dims.height as f64),
            z,
            glyph,
        }
    }

    fn advance(&mut self, params: &DriftParams) {
        self.x -= self.z * params.rate;
    }

    fn expired(&self, _params: &DriftParams, _dims: Dimensions) -> bool {
        self.x < 0.0
    }

    fn respawn(&mut self, _params: &DriftParams, dims: Dimensions, rng: &mut StdRng, _slot: usize) {
        self.x = (dims.width - 1) as f64;
        self.y = rng.gen_range(0..dims.height) as f64;
    }

    fn draw(&self, _params: &DriftParams, _state: &AnimationState, grid: &mut GridBuffer, _rng: &mut StdRng) {
        grid.plot(self.x, self.y, self.glyph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_counts() {
        let dims = Dimensions::new(100, 40);
        assert_eq!(PoolSize::Fixed(7).count(dims), 7);
        assert_eq!(PoolSize::PerColumn.count(dims), 100);
        assert_eq!(PoolSize::Density { per_cell: 0.075, min: 10 }.count(dims), 300);
        assert_eq!(PoolSize::Density { per_cell: 0.075, min: 500 }.count(dims), 500);
    }

    #[test]
    fn test_streak_glyphs() {
        assert_eq!(streak_glyph(10.0, 0.0), '-');
        assert_eq!(streak_glyph(-10.0, 1.0), '-');
        assert_eq!(streak_glyph(0.0, 10.0), '|');
        assert_eq!(streak_glyph(0.0, -10.0), '|');
        assert_eq!(streak_glyph(5.0, 5.0), '\\');
        assert_eq!(streak_glyph(-5.0, -5.0), '\\');
        assert_eq!(streak_glyph(5.0, -5.0), '/');
        assert_eq!(streak_glyph(-5.0, 5.0), '/');
    }

    #[test]
    fn test_warp_spawn_projects_inside_grid() {
        let mut rng = StdRng::seed_from_u64(3);
        let dims = Dimensions::new(80, 40);
        let params = WarpParams::default();
        for slot in 0..500 {
            let star = WarpStar::spawn(&params, dims, &mut rng, slot);
            assert!(star.z > 0.0 && star.z <= 80.0);
            assert!(!star.expired(&params, dims));
        }
    }

    #[test]
    fn test_drift_star_wraps_to_right_edge() {
        let mut rng = StdRng::seed_from_u64(9);
        let dims = Dimensions::new(20, 10);
        let mut pool: ParticlePool<DriftStar> = ParticlePool::new(DriftParams { rate: 0.5 }, PoolSize::Fixed(1));
        pool.resize(dims, &mut rng);
        pool.particles_mut()[0].x = 0.1;
        pool.particles_mut()[0].z = 2.0;
        pool.step(&mut rng);
        let star = pool.particles()[0];
        assert_eq!(star.x, 19.0);
        assert!(star.y >= 0.0 && star.y < 10.0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool: ParticlePool<WarpStar> = ParticlePool::new(WarpParams::default(), PoolSize::Fixed(50));
        assert!(pool.is_empty());
        assert!(pool.resize(Dimensions::new(80, 40), &mut rng));
        let before: Vec<f64> = pool.particles().iter().map(|s| s.z).collect();
        assert!(!pool.resize(Dimensions::new(80, 40), &mut rng));
        let after: Vec<f64> = pool.particles().iter().map(|s| s.z).collect();
        assert_eq!(before, after);
        assert_eq!(pool.len(), 50);
    }

    #[test]
    fn test_zero_sized_bounds_are_clamped() {
        let mut rng = StdRng::seed_from_u64(8);
        for dims in [Dimensions::new(0, 10), Dimensions::new(10, 0), Dimensions::new(0, 0)] {
            let mut warp: ParticlePool<WarpStar> = ParticlePool::new(WarpParams::default(), PoolSize::Fixed(5));
            let mut drift: ParticlePool<DriftStar> =
                ParticlePool::new(DriftParams { rate: 0.5 }, PoolSize::Fixed(5));
            assert!(warp.resize(dims, &mut rng));
            assert!(drift.resize(dims, &mut rng));
            assert_eq!(warp.dims(), Some(dims.clamped()));
            for _ in 0..100 {
                warp.step(&mut rng);
                drift.step(&mut rng);
            }
            assert_eq!(warp.len(), 5);
            assert_eq!(drift.len(), 5);
            assert!(!drift.resize(dims.clamped(), &mut rng));
        }
    }
}
