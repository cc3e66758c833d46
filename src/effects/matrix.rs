//! Matrix rain: one falling head per column over a slowly mutating glyph sheet

use crate::engine::{
    AnimationState, Compositor, Dimensions, GridBuffer, Layer, Particle, ParticlePool, PoolSize, Ramp,
    Resolution, Scene,
};
use rand::prelude::*;
use std::time::Duration;

// Pure ASCII keeps every column the same width
const GLYPHS: &str = "101010102345689ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TRAIL: i64 = 15;
const FLIPS_PER_TICK: usize = 20;
const SPEED_MIN: f64 = 0.5;
const SPEED_MAX: f64 = 1.3;

pub struct RainParams {
    ramp: Ramp,
    sheet: GridBuffer,
}

impl RainParams {
    fn new() -> Self {
        Self {
            ramp: Ramp::new(GLYPHS),
            sheet: GridBuffer::blank(Dimensions::new(1, 1)),
        }
    }

    fn reseed_sheet(&mut self, dims: Dimensions, rng: &mut StdRng) {
        self.sheet = GridBuffer::blank(dims);
        for cell in self.sheet.cells_mut() {
            *cell = self.ramp.random(rng);
        }
    }
}

/// Head of one column of rain. Rows above the head, up to the trail length, are lit.
#[derive(Clone, Copy, Debug)]
pub struct RainColumn {
    pub x: usize,
    pub y: f64,
    pub speed: f64,
}

impl Particle for RainColumn {
    type Params = RainParams;

    fn spawn(_params: &RainParams, _dims: Dimensions, rng: &mut StdRng, slot: usize) -> Self {
        RainColumn {
            x: slot,
            y: -rng.gen_range(0.0..100.0_f64).floor(),
            speed: rng.gen_range(SPEED_MIN..SPEED_MAX),
        }
    }

    fn advance(&mut self, _params: &RainParams) {
        self.y += self.speed;
    }

    fn expired(&self, _params: &RainParams, dims: Dimensions) -> bool {
        self.y > (dims.height + 10) as f64
    }

    fn respawn(&mut self, _params: &RainParams, _dims: Dimensions, rng: &mut StdRng, _slot: usize) {
        self.y = -rng.gen_range(0.0..50.0_f64).floor() - 10.0;
        self.speed = rng.gen_range(SPEED_MIN..SPEED_MAX);
    }

    fn draw(&self, params: &RainParams, _state: &AnimationState, grid: &mut GridBuffer, _rng: &mut StdRng) {
        let head = self.y.floor() as i64;
        let x = self.x as i32;
        for y in (head - TRAIL + 1)..=head {
            let y = y as i32;
            if let Some(ch) = params.sheet.get(x, y) {
                grid.set(x, y, ch);
            }
        }
    }
}

struct MatrixLayer {
    pool: ParticlePool<RainColumn>,
}

impl Layer for MatrixLayer {
    fn resize(&mut self, dims: Dimensions, rng: &mut StdRng) {
        self.pool.params_mut().reseed_sheet(dims, rng);
        self.pool.resize(dims, rng);
    }

    fn update(&mut self, _state: &AnimationState, rng: &mut StdRng) {
        let params = self.pool.params_mut();
        let (w, h) = (params.sheet.width(), params.sheet.height());
        for _ in 0..FLIPS_PER_TICK {
            let ch = params.ramp.random(rng);
            params.sheet.set(rng.gen_range(0..w) as i32, rng.gen_range(0..h) as i32, ch);
        }
        self.pool.step(rng);
    }

    fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        self.pool.draw(state, grid, rng);
    }
}

pub fn scene() -> Scene {
    let layer = MatrixLayer {
        pool: ParticlePool::new(RainParams::new(), PoolSize::PerColumn),
    };
    Scene::new(
        "matrix",
        Duration::from_millis(50),
        Resolution::Adaptive { min: Dimensions::new(20, 10) },
        Compositor::new().layer(0, layer),
    )
}
