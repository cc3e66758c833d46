//! Lightning: a bolt-shaped mask filled with crackling glyphs that flicker out at random

use crate::engine::{Compositor, Dimensions, FieldLayer, FlickerMask, Ramp, Resolution, Sample, Scene};
use rand::rngs::StdRng;
use std::time::Duration;

const GLYPHS: &str = "↯~*+!=^";
pub const FLICKER: f64 = 0.3;

// Outline in an 80x40 design space
const BOLT: [(f64, f64); 7] = [
    (55.0, 2.0),
    (35.0, 22.0),
    (48.0, 22.0),
    (40.0, 38.0),
    (65.0, 16.0),
    (52.0, 16.0),
    (58.0, 2.0),
];

/// Even-odd point-in-polygon test.
fn inside(px: f64, py: f64, poly: &[(f64, f64)]) -> bool {
    let mut hit = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            hit = !hit;
        }
        j = i;
    }
    hit
}

/// Whether the bolt covers cell `(x, y)` of a grid sized `dims`.
pub fn in_bolt(x: usize, y: usize, dims: Dimensions) -> bool {
    let px = (x as f64 + 0.5) * 80.0 / dims.width as f64;
    let py = (y as f64 + 0.5) * 40.0 / dims.height as f64;
    inside(px, py, &BOLT)
}

pub fn scene() -> Scene {
    let ramp = Ramp::new(GLYPHS);
    let bolt = FieldLayer::new(move |s: &Sample, rng: &mut StdRng| {
        in_bolt(s.x, s.y, s.dims).then(|| ramp.random(rng))
    });
    Scene::new(
        "lightning",
        Duration::from_millis(60),
        Resolution::Fixed(Dimensions::new(80, 40)),
        Compositor::new().layer(0, bolt).post(FlickerMask::new(FLICKER)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bolt_shape() {
        let dims = Dimensions::new(80, 40);
        assert!(in_bolt(56, 3, dims));
        assert!(in_bolt(45, 20, dims));
        assert!(!in_bolt(0, 0, dims));
        assert!(!in_bolt(79, 39, dims));
        assert!(!in_bolt(10, 20, dims));
        let covered = (0..40).flat_map(|y| (0..80).map(move |x| (x, y))).filter(|&(x, y)| in_bolt(x, y, dims)).count();
        assert!(covered > 100 && covered < 800, "bolt covers {} cells", covered);
    }
}
