//! Water: a tide that rises and falls, with foam on the crest and bubbles in the deep

use crate::engine::{Compositor, FieldLayer, Resolution, Sample, Scene};
use rand::rngs::StdRng;
use std::f64::consts::PI;
use std::time::Duration;

/// Height of the water surface (0 = bottom row, 1 = top) at column `nx`.
pub fn surface(nx: f64, t: f64) -> f64 {
    let level = ((t * 0.3).sin() * 0.5 + 0.5) * 0.7;
    level
        + (nx * PI * 4.0 + t * 0.5).sin() * 0.05
        + (nx * PI * 6.0 - t * 0.7).sin() * 0.03
        + (nx * PI * 10.0 + t * 1.2).sin() * 0.02
}

fn unit_sin(v: f64) -> f64 {
    v.sin() * 0.5 + 0.5
}

pub fn water(s: &Sample, _rng: &mut StdRng) -> Option<char> {
    let t = s.t;
    let nx = s.nx();
    let ny = 1.0 - s.ny();
    let dist = ny - surface(nx, t);

    let foam = unit_sin(nx * PI * 15.0 + t * 2.0);
    let bubble1 = unit_sin(nx * PI * 8.0 + ny * PI * 6.0 - t * 0.8);
    let bubble2 = unit_sin(nx * PI * 12.0 - ny * PI * 4.0 + t * 1.1);
    let turbulence = unit_sin(nx * PI * 20.0 + ny * PI * 15.0 - t * 1.5);

    let ch = if dist < 0.0 {
        let depth = -dist;
        if depth > 0.3 {
            if bubble1 > 0.85 && bubble2 > 0.8 {
                'o'
            } else if turbulence > 0.75 {
                '∼'
            } else {
                '~'
            }
        } else if depth > 0.15 {
            if bubble1 > 0.8 {
                '°'
            } else if turbulence > 0.7 {
                '∼'
            } else {
                '~'
            }
        } else if depth > 0.05 {
            if turbulence > 0.65 { '∼' } else { '-' }
        } else if turbulence > 0.6 {
            '-'
        } else {
            '·'
        }
    } else if dist > -0.02 && dist < 0.03 && foam > 0.5 {
        '≈'
    } else if dist < 0.05 && foam > 0.7 {
        '·'
    } else {
        return None;
    };
    Some(ch)
}

pub fn scene() -> Scene {
    Scene::new(
        "water",
        Duration::from_millis(16),
        Resolution::FixedRows { rows: 40, min_cols: 80 },
        Compositor::new().layer(0, FieldLayer::new(water)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Dimensions;
    use rand::SeedableRng;

    #[test]
    fn test_air_above_and_water_below() {
        let mut rng = StdRng::seed_from_u64(0);
        let dims = Dimensions::new(80, 40);
        // sin(t * 0.3) = 1 puts the tide near its peak of 0.7
        let t = std::f64::consts::FRAC_PI_2 / 0.3;
        for x in 0..80 {
            let top = Sample { x, y: 0, dims, t, cycle_t: t, frame: 0 };
            let bottom = Sample { x, y: 39, dims, t, cycle_t: t, frame: 0 };
            assert_eq!(water(&top, &mut rng), None);
            assert!(water(&bottom, &mut rng).is_some());
        }
    }
}
