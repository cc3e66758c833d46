//! Reactor core: a pulsing core inside counter-rotating rings, hex pillars on the flanks
//! and a live status panel

use crate::engine::{
    AnimationState, Anchor, Compositor, Dimensions, FieldLayer, Resolution, Sample, Scene, SliceDisplacement,
    TextLayer,
};
use rand::prelude::*;
use std::f64::consts::TAU;
use std::time::Duration;

const STEP: Duration = Duration::from_millis(50);
const HEX: &[u8] = b"0123456789ABCDEF";
const RING: [char; 4] = ['-', '\\', '|', '/'];
const CORE_RADIUS: f64 = 12.0;

fn step_of(s: &Sample) -> f64 {
    (s.t / STEP.as_secs_f64()).floor()
}

fn pillars(s: &Sample, rng: &mut StdRng) -> Option<char> {
    let w = s.dims.width;
    if s.x >= 10 && s.x + 10 <= w {
        return None;
    }
    let f = step_of(s) as usize;
    ((s.y + f + (s.x % 2) * 5) % 15 < 8).then(|| HEX[rng.gen_range(0..HEX.len())] as char)
}

/// Glyph for a ring cell at `angle`, spun by `spin` radians.
fn ring_glyph(angle: f64, spin: f64) -> char {
    let idx = ((angle + spin) / TAU * 4.0 + 4.0).floor().rem_euclid(4.0) as usize;
    RING[idx]
}

fn rings(s: &Sample, _rng: &mut StdRng) -> Option<char> {
    let f = step_of(s);
    let (cx, cy) = s.dims.center();
    let dx = (s.x as f64 - cx) * 0.55;
    let dy = s.y as f64 - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    if dist > 14.0 && dist < 15.0 {
        Some(ring_glyph(angle, f * 0.05))
    } else if dist > 18.0 && dist < 19.0 {
        Some(ring_glyph(angle, -f * 0.03))
    } else {
        None
    }
}

fn core(s: &Sample, rng: &mut StdRng) -> Option<char> {
    let f = step_of(s);
    let (cx, cy) = s.dims.center();
    let dx = (s.x as f64 - cx) * 0.5;
    let dy = s.y as f64 - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    let pulse = (f * 0.1).sin() * 2.0;
    if dist >= CORE_RADIUS + pulse {
        return None;
    }
    let hot = rng.gen_bool(0.5);
    let ch = if dist < 4.0 {
        '█'
    } else if dist < 8.0 {
        if hot { '▓' } else { '▒' }
    } else if hot {
        '░'
    } else {
        return None;
    };
    Some(ch)
}

/// Status panel: voltage and temperature drift with the step counter.
pub fn status_panel(state: &AnimationState) -> Vec<String> {
    let f = state.steps(STEP) as f64;
    let voltage = 2400.0 + (f * 0.1).sin() * 100.0;
    let temp = 450.0 + (f * 0.05).cos() * 50.0;
    let body = format!(" CORE_VOLT: {:.0}kV  TEMP: {:.0}K ", voltage, temp);
    let inner = body.chars().count();
    let title = "═ REACTOR STATUS ";
    let rule = "═".repeat(inner.saturating_sub(title.chars().count()));
    vec![
        format!("╔{}{}╗", title, rule),
        format!("║{}║", body),
        format!("╚{}╝", "═".repeat(inner)),
    ]
}

pub fn scene() -> Scene {
    let dims = Dimensions::new(80, 30);
    let footer = TextLayer::new(Anchor::At(2, dims.height as i32 - 2), |_: &AnimationState| {
        vec!["SYSTEM STABLE".to_string()]
    });
    Scene::new(
        "reactor",
        STEP,
        Resolution::Fixed(dims),
        Compositor::new()
            .layer(0, FieldLayer::new(pillars))
            .layer(1, FieldLayer::new(rings))
            .layer(2, FieldLayer::new(core))
            .layer(3, TextLayer::new(Anchor::At(2, 1), status_panel))
            .layer(3, footer)
            .post(SliceDisplacement::new(1, 1..=2, STEP, 0.02)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_glyph_wraps_for_negative_spin() {
        for i in 0..100 {
            let spin = -(i as f64) * 0.37;
            assert!(RING.contains(&ring_glyph(-3.0, spin)));
        }
        assert_eq!(ring_glyph(0.0, 0.0), '-');
    }

    #[test]
    fn test_status_panel_is_rectangular() {
        let mut state = AnimationState::new(Dimensions::new(80, 30));
        for ms in [0u64, 1_000, 31_400, 99_950] {
            state.elapsed = Duration::from_millis(ms);
            let panel = status_panel(&state);
            let width = panel[0].chars().count();
            assert!(panel.iter().all(|l| l.chars().count() == width), "{:?}", panel);
        }
    }

    #[test]
    fn test_core_center_is_solid() {
        let mut rng = StdRng::seed_from_u64(4);
        let dims = Dimensions::new(80, 30);
        let s = Sample { x: 40, y: 15, dims, t: 0.0, cycle_t: 0.0, frame: 0 };
        assert_eq!(core(&s, &mut rng), Some('█'));
        let far = Sample { x: 0, y: 0, dims, t: 0.0, cycle_t: 0.0, frame: 0 };
        assert_eq!(core(&far, &mut rng), None);
    }
}
