//! Field functions: per-cell formulas of position and time.
//!
//! A field is evaluated for every cell of the grid each tick. It returns a
//! glyph, or `None` to leave whatever lower layers drew. Continuous scalar
//! fields are turned into glyphs with [`Bands`] (explicit thresholds) or a
//! [`Ramp`] (evenly spaced density steps).

use super::compositor::Layer;
use super::grid::{Dimensions, GridBuffer};
use super::render_loop::AnimationState;
use rand::rngs::StdRng;

/// Everything a field may read about the cell it is evaluating.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub x: usize,
    pub y: usize,
    pub dims: Dimensions,
    /// Seconds since the loop started. Identical for every cell of one tick.
    pub t: f64,
    /// Seconds since the current phase cycle began.
    pub cycle_t: f64,
    pub frame: u64,
}

impl Sample {
    /// Horizontal position on the unit interval.
    #[inline]
    pub fn nx(&self) -> f64 {
        self.x as f64 / self.dims.width as f64
    }

    /// Vertical position on the unit interval, 0 at the top row.
    #[inline]
    pub fn ny(&self) -> f64 {
        self.y as f64 / self.dims.height as f64
    }

    /// Offset from the grid centre, with `y` stretched by `aspect` to account for tall glyphs.
    #[inline]
    pub fn from_center(&self, aspect: f64) -> (f64, f64) {
        let (cx, cy) = self.dims.center();
        (self.x as f64 - cx, (self.y as f64 - cy) * aspect)
    }
}

pub trait Field {
    fn sample(&self, s: &Sample, rng: &mut StdRng) -> Option<char>;
}

impl<F> Field for F
where
    F: Fn(&Sample, &mut StdRng) -> Option<char>,
{
    fn sample(&self, s: &Sample, rng: &mut StdRng) -> Option<char> {
        self(s, rng)
    }
}

/// Adapts a [`Field`] into a compositor layer.
pub struct FieldLayer<F> {
    field: F,
}

impl<F: Field> FieldLayer<F> {
    pub fn new(field: F) -> Self {
        Self { field }
    }
}

impl<F: Field> Layer for FieldLayer<F> {
    fn draw(&self, state: &AnimationState, grid: &mut GridBuffer, rng: &mut StdRng) {
        let dims = grid.dims();
        let t = state.time();
        let cycle_t = state.cycle_elapsed.as_secs_f64();
        for y in 0..dims.height {
            for x in 0..dims.width {
                let s = Sample { x, y, dims, t, cycle_t, frame: state.frame };
                if let Some(ch) = self.field.sample(&s, rng) {
                    grid.set(x as i32, y as i32, ch);
                }
            }
        }
    }
}

/// Turn a scalar field into a glyph field by banding it.
pub fn banded<S>(scalar: S, bands: Bands) -> impl Fn(&Sample, &mut StdRng) -> Option<char>
where
    S: Fn(&Sample) -> f64,
{
    move |s: &Sample, _rng: &mut StdRng| Some(bands.pick(scalar(s)))
}

/// Threshold banding. A value picks the glyph of the first band whose
/// threshold it strictly exceeds, scanning from the highest threshold down.
/// Bands are stored sorted, so denser glyphs can never sit below sparser ones.
#[derive(Clone, Debug)]
pub struct Bands {
    bands: Vec<(f64, char)>,
    floor: char,
}

impl Bands {
    /// `bands` pairs a lower threshold with its glyph, densest glyph at the
    /// highest threshold. `floor` is used when no threshold is exceeded.
    pub fn new(bands: impl IntoIterator<Item = (f64, char)>, floor: char) -> Self {
        let mut bands: Vec<(f64, char)> = bands.into_iter().filter(|(t, _)| !t.is_nan()).collect();
        bands.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self { bands, floor }
    }

    /// Band index for `v`: 0 is the densest band, `len()` is the floor.
    pub fn level(&self, v: f64) -> usize {
        if v.is_nan() {
            return self.bands.len();
        }
        self.bands
            .iter()
            .position(|&(threshold, _)| v > threshold)
            .unwrap_or(self.bands.len())
    }

    pub fn pick(&self, v: f64) -> char {
        self.bands
            .get(self.level(v))
            .map(|&(_, ch)| ch)
            .unwrap_or(self.floor)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Density-ordered glyph ramp, sparse first.
#[derive(Clone, Debug)]
pub struct Ramp {
    glyphs: Vec<char>,
}

impl Ramp {
    pub fn new(glyphs: &str) -> Self {
        let mut glyphs: Vec<char> = glyphs.chars().filter(|c| !c.is_control()).collect();
        if glyphs.is_empty() {
            glyphs.push(' ');
        }
        Self { glyphs }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, clamped to the densest glyph.
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// Map a value on `[0, 1]` onto the ramp. Out-of-range values clamp.
    pub fn pick(&self, normalized: f64) -> char {
        self.glyph(self.index(normalized))
    }

    pub fn index(&self, normalized: f64) -> usize {
        let v = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
        ((v * (self.glyphs.len() - 1) as f64) as usize).min(self.glyphs.len() - 1)
    }

    pub fn random(&self, rng: &mut StdRng) -> char {
        use rand::Rng;
        self.glyphs[rng.gen_range(0..self.glyphs.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn water_bands() -> Bands {
        Bands::new([(0.8, '≈'), (0.5, '~'), (0.0, '-')], ' ')
    }

    #[test]
    fn test_threshold_banding() {
        let bands = water_bands();
        assert_eq!(bands.pick(0.9), '≈');
        assert_eq!(bands.pick(0.3), '-');
        assert_eq!(bands.pick(0.5), '-');
        assert_eq!(bands.pick(0.0), ' ');
        assert_eq!(bands.pick(-4.0), ' ');
        assert_eq!(bands.pick(f64::NAN), ' ');
    }

    #[test]
    fn test_unsorted_bands_do_not_invert() {
        let bands = Bands::new([(0.0, '-'), (0.8, '≈'), (0.5, '~')], ' ');
        assert_eq!(bands.pick(0.9), '≈');
        assert_eq!(bands.pick(0.6), '~');

        let mut prev = bands.level(-1.0);
        let mut v = -1.0;
        while v < 1.5 {
            let level = bands.level(v);
            assert!(level <= prev, "band order inverted at {}", v);
            prev = level;
            v += 0.01;
        }
    }

    #[test]
    fn test_ramp_clamps() {
        let ramp = Ramp::new(" .:#");
        assert_eq!(ramp.pick(-1.0), ' ');
        assert_eq!(ramp.pick(0.0), ' ');
        assert_eq!(ramp.pick(0.5), '.');
        assert_eq!(ramp.pick(1.0), '#');
        assert_eq!(ramp.pick(7.0), '#');
        assert_eq!(ramp.glyph(99), '#');
    }

    #[test]
    fn test_sample_normalizes_to_unit_square() {
        let s = Sample { x: 40, y: 10, dims: Dimensions::new(80, 20), t: 0.0, cycle_t: 0.0, frame: 0 };
        assert_eq!(s.nx(), 0.5);
        assert_eq!(s.ny(), 0.5);
        assert_eq!(s.from_center(2.0), (0.0, 0.0));
    }

    #[test]
    fn test_field_layer_transparent_cells() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = GridBuffer::new(Dimensions::new(4, 1), '.');
        let layer = FieldLayer::new(|s: &Sample, _: &mut StdRng| if s.x % 2 == 0 { Some('#') } else { None });
        let state = AnimationState::new(grid.dims());
        layer.draw(&state, &mut grid, &mut rng);
        assert_eq!(grid.flatten(), "#.#.");
    }
}
