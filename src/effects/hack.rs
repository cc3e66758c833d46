//! Intrusion sequence in three timed acts: boot log, decrypt storm, access granted

use crate::engine::{
    AnimationState, Anchor, Compositor, Dimensions, FieldLayer, PhaseSchedule, Resolution, Sample, Scene,
    TextLayer,
};
use rand::prelude::*;
use std::time::Duration;

pub const STEP: Duration = Duration::from_millis(50);
pub const DECRYPT_AT: Duration = Duration::from_millis(9_000);
pub const GRANTED_AT: Duration = Duration::from_millis(17_500);
pub const RESTART_AFTER: Duration = Duration::from_millis(22_500);

const BOOT: [&str; 10] = [
    "BIOS DATE 01/15/2099 14:22:55 VER 1.0.2",
    "CPU: QUANTUM CORE i9-9900K @ 80.0GHz",
    "DETECTING NEURAL LINK... [OK]",
    "LOADING KERNEL... [OK]",
    "MOUNTING VFS... [OK]",
    "BYPASSING FIREWALL... [FAIL]",
    "RETRYING... [OK]",
    "INJECTING PAYLOAD...",
    "DECRYPTING SECURITY KEYS...",
    "ACCESSING MAINFRAME...",
];

const GRANTED: [&str; 7] = [
    "╔════════════════════════════════════════╗",
    "║                                        ║",
    "║             ACCESS GRANTED             ║",
    "║                                        ║",
    "║         WELCOME TO THE SYSTEM          ║",
    "║                                        ║",
    "╚════════════════════════════════════════╝",
];

const DECRYPT: &[char] = &['0', '1', 'A', 'B', 'C', 'D'];

/// Boot lines printed so far, one every 15 steps, with a blinking cursor.
pub fn boot_log(state: &AnimationState) -> Vec<String> {
    let f = state.cycle_steps(STEP);
    let shown = ((f / 15) as usize).min(BOOT.len());
    let mut lines: Vec<String> = BOOT[..shown].iter().map(|l| l.to_string()).collect();
    if f % 10 < 5 {
        match lines.last_mut() {
            Some(last) => last.push('_'),
            None => lines.push("_".to_string()),
        }
    }
    lines
}

fn decrypt(s: &Sample, rng: &mut StdRng) -> Option<char> {
    let f = (s.cycle_t / STEP.as_secs_f64()).floor();
    let wave = (s.y as f64 * 0.2 + f * 0.1).sin() * 20.0;
    if (s.x as f64 - s.dims.width as f64 / 2.0 + wave).abs() < 10.0 {
        DECRYPT.choose(rng).copied()
    } else if f as u64 % 20 > 15 {
        char::from_u32(rng.gen_range(33..93))
    } else {
        None
    }
}

fn static_noise(_s: &Sample, rng: &mut StdRng) -> Option<char> {
    rng.gen_bool(0.02).then_some('.')
}

pub fn scene() -> Scene {
    let phases = PhaseSchedule::new(vec![DECRYPT_AT, GRANTED_AT]).restart_after(RESTART_AFTER);
    let compositor = Compositor::new()
        .layer_in_phase(0, 0, TextLayer::new(Anchor::At(0, 0), boot_log))
        .layer_in_phase(1, 0, FieldLayer::new(decrypt))
        .layer_in_phase(2, 0, FieldLayer::new(static_noise))
        .layer_in_phase(2, 1, TextLayer::new(Anchor::Center, |_: &AnimationState| {
            GRANTED.iter().map(|l| l.to_string()).collect()
        }));

    Scene::new("hack", STEP, Resolution::Fixed(Dimensions::new(80, 24)), compositor).with_phases(phases)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> AnimationState {
        let schedule = PhaseSchedule::new(vec![DECRYPT_AT, GRANTED_AT]).restart_after(RESTART_AFTER);
        AnimationState::new(Dimensions::new(80, 24)).advance(Duration::from_millis(ms), &schedule)
    }

    #[test]
    fn test_phase_timeline() {
        assert_eq!(at(0).phase, 0);
        assert_eq!(at(8_999).phase, 0);
        assert_eq!(at(9_000).phase, 1);
        assert_eq!(at(17_500).phase, 2);
        assert_eq!(at(22_499).phase, 2);
        assert_eq!(at(22_500).phase, 0);
        assert_eq!(at(22_500).cycle, 1);
    }

    #[test]
    fn test_boot_log_grows_then_stops() {
        assert_eq!(boot_log(&at(0)), vec!["_".to_string()]);
        // Step 45, cursor off
        assert_eq!(boot_log(&at(2_250)).len(), 3);
        assert!(!boot_log(&at(2_250)).concat().contains('_'));
        let full = boot_log(&at(8_500));
        assert_eq!(full.len(), BOOT.len());
        assert_eq!(full[0], BOOT[0]);
    }

    #[test]
    fn test_granted_box_is_rectangular() {
        let width = GRANTED[0].chars().count();
        assert!(GRANTED.iter().all(|l| l.chars().count() == width));
    }
}
