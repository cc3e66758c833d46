//! Glitch slices: a sparse data field torn into six bands that jump sideways and snap back

use crate::engine::{Compositor, Dimensions, FieldLayer, Ramp, Resolution, Sample, Scene, SliceDisplacement};
use rand::rngs::StdRng;
use std::time::Duration;

pub const SLICES: usize = 6;
pub const SNAP_BACK: Duration = Duration::from_millis(100);
const DATA: &str = "01:. ";
const NOISE: &str = "@#|!X ";

pub fn scene() -> Scene {
    let data = Ramp::new(DATA);
    let field = FieldLayer::new(move |s: &Sample, rng: &mut StdRng| {
        let noise = (s.x as f64 * 0.15 + s.y as f64 * 0.1 + s.frame as f64 * 0.08).sin();
        (noise > 0.85).then(|| data.random(rng))
    });
    let tear = SliceDisplacement::new(SLICES, -23..=22, SNAP_BACK, 0.018).noise(NOISE, 0.1);

    Scene::new(
        "glitch",
        Duration::from_millis(50),
        Resolution::Fixed(Dimensions::new(100, 30)),
        Compositor::new().layer(0, field).post(tear),
    )
}
