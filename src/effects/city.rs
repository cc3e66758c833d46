//! Night city: slanted rain, sky-bridges and a scrolling two-depth skyline, with a
//! periodic mirrored-signal glitch

use crate::engine::{
    AnimationState, Compositor, Dimensions, GridBuffer, Layer, ReversalScope, Resolution, RowReversal, Scene,
    Trigger,
};
use rand::prelude::*;
use std::time::Duration;

const CABLE_ROW: i32 = 5;
const HOLO_ROW: i32 = 10;
const BRIDGE_ROW: i32 = 15;
const RAIN_DROPS: u64 = 40;
const HOLO_GLYPHS: [char; 6] = ['Ω', 'Ψ', 'Ξ', 'Δ', '0', '1'];

#[derive(Clone, Copy, Debug, PartialEq)]
enum Facade {
    Billboard(&'static str),
    Antenna,
    BridgeAnchor,
    Windows,
    Solid,
    /// Far layer: dashed outline only.
    Distant,
}

#[derive(Clone, Copy, Debug)]
struct Building {
    height: usize,
    width: usize,
    x: usize,
    /// Columns scrolled per frame.
    speed: f64,
    facade: Facade,
}

const SKYLINE: [Building; 7] = [
    Building { height: 15, width: 25, x: 15, speed: 0.02, facade: Facade::Distant },
    Building { height: 20, width: 20, x: 75, speed: 0.02, facade: Facade::Distant },
    Building { height: 32, width: 16, x: 5, speed: 0.04, facade: Facade::Billboard("CYBER-Dyne") },
    Building { height: 38, width: 10, x: 30, speed: 0.04, facade: Facade::Antenna },
    Building { height: 28, width: 18, x: 55, speed: 0.04, facade: Facade::BridgeAnchor },
    Building { height: 35, width: 12, x: 85, speed: 0.04, facade: Facade::Windows },
    Building { height: 22, width: 20, x: 105, speed: 0.04, facade: Facade::Solid },
];

impl Building {
    fn draw(&self, f: u64, grid: &mut GridBuffer) {
        let (gw, gh) = (grid.width(), grid.height());
        let scroll = (self.x as f64 + f as f64 * self.speed).floor() as usize % gw;
        for by in 0..self.height.min(gh) {
            let y = (gh - 1 - by) as i32;
            for bx in 0..self.width {
                let x = ((scroll + bx) % gw) as i32;
                if let Some(ch) = self.glyph(bx, by, x, y, f) {
                    grid.set(x, y, ch);
                }
            }
            if self.facade == Facade::Antenna && by + 1 == self.height {
                let mast = ((scroll + self.width / 2) % gw) as i32;
                grid.set(mast, y - 1, if f % 10 > 5 { '!' } else { '.' });
                grid.set(mast, y - 2, '|');
            }
        }
    }

    fn glyph(&self, bx: usize, by: usize, x: i32, y: i32, f: u64) -> Option<char> {
        let left = bx == 0;
        let right = bx + 1 == self.width;
        let top = by + 1 == self.height;

        if self.facade == Facade::Distant {
            return if top {
                Some('━')
            } else if left || right {
                Some('┆')
            } else if (x as u64 + y as u64 + f) % 60 == 0 {
                Some('·')
            } else {
                None
            };
        }

        match (top, left, right) {
            (true, true, _) => return Some('┏'),
            (true, _, true) => return Some('┓'),
            (true, _, _) => return Some('━'),
            (_, true, _) | (_, _, true) => return Some('┃'),
            _ => {}
        }

        let inner = bx > 1 && bx + 2 < self.width;
        match self.facade {
            Facade::Billboard(label) if inner && by > 12 && by < 22 => {
                let label: Vec<char> = label.chars().collect();
                Some(label[(bx + f as usize) % label.len()])
            }
            Facade::Windows if inner && by % 4 == 0 => {
                Some(if (f as f64 * 0.1 + x as f64 * 0.5).sin() > 0.0 { '▒' } else { ' ' })
            }
            _ => None,
        }
    }
}

struct CityLayer;

impl CityLayer {
    fn rain(f: u64, grid: &mut GridBuffer, rng: &mut StdRng) {
        let (w, h) = (grid.width() as u64, grid.height() as u64);
        for i in 0..RAIN_DROPS {
            let x = ((i * 17 + f * 2) % w) as i32;
            let y = ((i * 7 + f * 3) % h) as i32;
            grid.set(x, y, '\\');
            if (y as u64) + 1 < h && rng.gen_bool(0.2) {
                grid.set(x, y + 1, '.');
            }
        }
    }

    fn wiring(f: u64, grid: &mut GridBuffer) {
        for x in 0..grid.width() {
            if (x as f64 * 0.1 + f as f64 * 0.01).sin() > 0.8 {
                grid.set(x as i32, CABLE_ROW, '~');
            }
            if x > 20 && x < 80 && (x as u64 + f) % 5 == 0 {
                grid.set(x as i32, BRIDGE_ROW, '=');
            }
        }
    }

    fn holograms(f: u64, grid: &mut GridBuffer) {
        if f % 4 != 0 {
            return;
        }
        let w = grid.width() as f64;
        let hx = (w / 2.0 + (f as f64 * 0.05).sin() * 20.0).floor() as usize;
        for i in 0..3 {
            let x = ((hx + i) % grid.width()) as i32;
            grid.set(x, HOLO_ROW, HOLO_GLYPHS[(f as usize + i) % HOLO_GLYPHS.len()]);
        }
    }
}

impl Layer for CityLayer {
    fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        let f = state.frame;
        Self::rain(f, grid, rng);
        Self::wiring(f, grid);
        for building in &SKYLINE {
            building.draw(f, grid);
        }
        Self::holograms(f, grid);
    }
}

pub fn scene() -> Scene {
    Scene::new(
        "city",
        Duration::from_millis(40),
        Resolution::Fixed(Dimensions::new(120, 40)),
        Compositor::new()
            .layer(0, CityLayer)
            .post(RowReversal::new(Trigger::Window { period: 100, from: 96 }, ReversalScope::EveryRow)),
    )
}
