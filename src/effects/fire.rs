//! Fire effect (buffer-based): heat seeded along the bottom row rises and cools

use crate::engine::{AnimationState, Compositor, Dimensions, GridBuffer, Layer, Ramp, Resolution, Scene};
use rand::prelude::*;
use std::time::Duration;

const FIRE_GLYPHS: &str = " ,;+ltgti!lI?/\\|)(1}{][rcvzjftJUOQocxfXhqwWB8&%$#@";

struct FireLayer {
    ramp: Ramp,
    heat: Vec<usize>,
    dims: Dimensions,
}

impl FireLayer {
    fn new() -> Self {
        Self {
            ramp: Ramp::new(FIRE_GLYPHS),
            heat: Vec::new(),
            dims: Dimensions::new(0, 0),
        }
    }
}

impl Layer for FireLayer {
    fn resize(&mut self, dims: Dimensions, _rng: &mut StdRng) {
        self.dims = dims;
        self.heat = vec![0; dims.area()];
    }

    fn update(&mut self, _state: &AnimationState, rng: &mut StdRng) {
        let (w, h) = (self.dims.width, self.dims.height);
        if w == 0 || h == 0 || self.heat.len() != w * h {
            return;
        }
        let bottom = w * (h - 1);
        let hottest = self.ramp.len();

        // Flare random embers, then snuff out as many
        for _ in 0..w {
            self.heat[bottom + rng.gen_range(0..w)] = rng.gen_range(0..hottest);
        }
        for _ in 0..w {
            self.heat[bottom + rng.gen_range(0..w)] = 0;
        }

        // Each cell takes the average of itself, its right neighbour and the two below
        for i in 0..bottom {
            let right = self.heat.get(i + 1).copied().unwrap_or(0);
            let below_right = self.heat.get(i + w + 1).copied().unwrap_or(0);
            self.heat[i] = (self.heat[i] + right + self.heat[i + w] + below_right) / 4;
        }
    }

    fn draw(&self, _state: &AnimationState, grid: &mut GridBuffer, _rng: &mut StdRng) {
        let w = self.dims.width;
        if w == 0 {
            return;
        }
        // The seed row stays hidden
        let visible = w * self.dims.height.saturating_sub(1);
        for (i, &heat) in self.heat.iter().take(visible).enumerate() {
            grid.set((i % w) as i32, (i / w) as i32, self.ramp.glyph(heat));
        }
    }
}

pub fn scene() -> Scene {
    Scene::new(
        "fire",
        Duration::from_millis(30),
        Resolution::Adaptive { min: Dimensions::new(40, 8) },
        Compositor::new().layer(0, FireLayer::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_stays_on_ramp() {
        let mut rng = StdRng::seed_from_u64(42);
        let dims = Dimensions::new(30, 10);
        let mut layer = FireLayer::new();
        layer.resize(dims, &mut rng);
        let state = AnimationState::new(dims);
        for _ in 0..50 {
            layer.update(&state, &mut rng);
        }
        assert!(layer.heat.iter().all(|&h| h < layer.ramp.len()));
        assert!(layer.heat[..dims.width * 9].iter().any(|&h| h > 0), "fire never rose");
    }

    #[test]
    fn test_bottom_row_is_hidden() {
        let mut rng = StdRng::seed_from_u64(1);
        let dims = Dimensions::new(8, 3);
        let mut layer = FireLayer::new();
        layer.resize(dims, &mut rng);
        layer.heat.fill(layer.ramp.len() - 1);
        let mut grid = GridBuffer::blank(dims);
        layer.draw(&AnimationState::new(dims), &mut grid, &mut rng);
        assert_eq!(grid.flatten(), "@@@@@@@@\n@@@@@@@@\n        ");
    }
}
