//! Data stream: hex digits spiralling into a dark core

use crate::engine::{Compositor, Dimensions, FieldLayer, Resolution, Sample, Scene};
use rand::rngs::StdRng;
use std::time::Duration;

const DIGITS: [char; 4] = ['0', '1', 'A', 'F'];

pub fn stream(s: &Sample, _rng: &mut StdRng) -> Option<char> {
    let t = s.frame as f64 * 0.05;
    let (dx, dy) = s.from_center(2.0);
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 5.0 {
        return None;
    }
    let spiral = dy.atan2(dx) + dist * 0.05 - t;
    if (spiral * 12.0).sin() <= 0.8 {
        return None;
    }
    let pos = (dist - t * 2.0).floor();
    if pos.rem_euclid(3.0) != 0.0 {
        return None;
    }
    Some(DIGITS[(pos.sin().abs() * 4.0) as usize % DIGITS.len()])
}

pub fn scene() -> Scene {
    Scene::new(
        "stream",
        Duration::from_millis(16),
        Resolution::Adaptive { min: Dimensions::new(20, 10) },
        Compositor::new().layer(0, FieldLayer::new(stream)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_core_stays_dark() {
        let mut rng = StdRng::seed_from_u64(0);
        let dims = Dimensions::new(80, 40);
        for frame in 0..200 {
            for (x, y) in [(40, 20), (43, 20), (40, 21)] {
                let s = Sample { x, y, dims, t: 0.0, cycle_t: 0.0, frame };
                assert_eq!(stream(&s, &mut rng), None);
            }
        }
    }

    #[test]
    fn test_only_hex_digits() {
        let mut rng = StdRng::seed_from_u64(0);
        let dims = Dimensions::new(80, 40);
        let mut lit = 0;
        for y in 0..40 {
            for x in 0..80 {
                let s = Sample { x, y, dims, t: 0.0, cycle_t: 0.0, frame: 30 };
                if let Some(ch) = stream(&s, &mut rng) {
                    assert!(DIGITS.contains(&ch));
                    lit += 1;
                }
            }
        }
        assert!(lit > 0);
    }
}
