//! Nebula: drifting dust clouds behind a parallax star layer, with the odd torn scanline

use crate::engine::{
    Compositor, Dimensions, DriftParams, DriftStar, FieldLayer, ParticleLayer, ParticlePool, PoolSize, Ramp,
    Resolution, Sample, Scene, SliceDisplacement, SliceTargets,
};
use rand::rngs::StdRng;
use std::time::Duration;

const DUST: &str = " .:-=+*#%@";

/// Cloud density at a cell; only values above 0.5 are visible.
pub fn dust_density(s: &Sample) -> f64 {
    let t = s.frame as f64 * 0.05;
    let nx = s.x as f64 * 0.08 + t * 0.2;
    let ny = s.y as f64 * 0.15 + t * 0.1;
    nx.sin() * ny.cos() + (nx + ny).sin()
}

pub fn scene() -> Scene {
    let ramp = Ramp::new(DUST);
    let dust = FieldLayer::new(move |s: &Sample, _: &mut StdRng| {
        let v = dust_density(s);
        (v > 0.5).then(|| ramp.glyph(((v - 0.5) * 4.0) as usize))
    });
    let stars: ParticlePool<DriftStar> = ParticlePool::new(
        DriftParams { rate: 0.5 },
        PoolSize::Density { per_cell: 0.075, min: 300 },
    );
    let tear = SliceDisplacement::per_row(0..=9, Duration::ZERO, 0.02).targets(SliceTargets::One);

    Scene::new(
        "nebula",
        Duration::from_millis(16),
        Resolution::Adaptive { min: Dimensions::new(20, 10) },
        Compositor::new()
            .layer(0, dust)
            .layer(1, ParticleLayer::new(stars))
            .post(tear),
    )
}
