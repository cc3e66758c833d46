//! Aurora: layered sine curtains banded into wave glyphs

use crate::engine::{banded, Bands, Compositor, FieldLayer, Resolution, Sample, Scene};
use std::f64::consts::PI;
use std::time::Duration;

pub fn bands() -> Bands {
    Bands::new([(0.15, '≈'), (0.08, '~'), (0.02, '∼'), (-0.05, '-'), (-0.12, '.')], ' ')
}

/// Signed distance into the curtain: positive values are brighter.
pub fn curtain(s: &Sample) -> f64 {
    let (nx, ny, t) = (s.nx(), s.ny(), s.t);
    let center = ((nx - 0.5).powi(2) + (ny - 0.5).powi(2)).sqrt();

    let wave1 = (nx * PI * 4.0 - t * 0.5).sin() * 0.15;
    let wave2 = (nx * PI * 3.0 + t * 0.3).sin() * 0.1;
    let wave3 = ((nx + ny) * PI * 5.0 - t * 0.4).sin() * 0.08;
    let wave4 = (center * PI * 8.0 - t * 0.6).sin() * 0.05;
    let wave5 = (nx * PI * 12.0 + ny * PI * 8.0 - t * 0.8).sin() * 0.03;

    ny - 0.5 + wave1 + wave2 + wave3 + wave4 + wave5
}

pub fn scene() -> Scene {
    Scene::new(
        "aurora",
        Duration::from_millis(16),
        Resolution::FixedRows { rows: 40, min_cols: 80 },
        Compositor::new().layer(0, FieldLayer::new(banded(curtain, bands()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Dimensions;

    #[test]
    fn test_bottom_is_denser_than_top() {
        let dims = Dimensions::new(80, 40);
        let b = bands();
        let at = |x, y| Sample { x, y, dims, t: 3.0, cycle_t: 3.0, frame: 0 };
        for x in (0..80).step_by(7) {
            assert!(['.', ' '].contains(&b.pick(curtain(&at(x, 0)))));
            assert!(['≈', '~', '∼'].contains(&b.pick(curtain(&at(x, 39)))));
        }
    }
}
