//! Warp starfield: stars rush toward the viewer from the far plane

use crate::engine::{
    Compositor, Dimensions, ParticleLayer, ParticlePool, PoolSize, Resolution, Scene, WarpParams, WarpStar,
};
use std::time::Duration;

pub const STAR_COUNT: usize = 200;

pub fn scene() -> Scene {
    let pool: ParticlePool<WarpStar> = ParticlePool::new(WarpParams::default(), PoolSize::Fixed(STAR_COUNT));
    Scene::new(
        "warp",
        Duration::from_millis(16),
        Resolution::Adaptive { min: Dimensions::new(20, 10) },
        Compositor::new().layer(0, ParticleLayer::new(pool)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AnimationState, GridBuffer, Layer, Particle};
    use rand::prelude::*;

    #[test]
    fn test_stars_stay_in_flight() {
        let mut rng = StdRng::seed_from_u64(11);
        let dims = Dimensions::new(80, 24);
        let params = WarpParams::default();
        let mut layer = ParticleLayer::new(ParticlePool::<WarpStar>::new(params, PoolSize::Fixed(STAR_COUNT)));
        layer.resize(dims, &mut rng);
        let state = AnimationState::new(dims);
        for _ in 0..300 {
            layer.update(&state, &mut rng);
            assert_eq!(layer.pool().len(), STAR_COUNT);
            for star in layer.pool().particles() {
                assert!(star.z > 0.0 && star.z <= 80.0);
                assert!(!star.expired(&params, dims));
            }
        }
        let mut grid = GridBuffer::blank(dims);
        layer.draw(&state, &mut grid, &mut rng);
        assert!(grid.cells().iter().any(|&c| c != ' '));
    }
}
