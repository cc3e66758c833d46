//! Derive grid dimensions from the display's available area.

use super::grid::Dimensions;

/// Available drawing area in device pixels, as reported by a display sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelArea {
    pub width: f64,
    pub height: f64,
}

impl PixelArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Estimated pixel size of one monospace glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl Default for CellMetrics {
    // 12px monospace, leading-none
    fn default() -> Self {
        Self { width: 7.2, height: 14.0 }
    }
}

impl CellMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let d = Self::default();
        Self {
            width: sane(width, d.width),
            height: sane(height, d.height),
        }
    }

    /// Pixel area covered by a `cols` x `rows` block of glyphs.
    pub fn area_of(&self, cols: u16, rows: u16) -> PixelArea {
        PixelArea::new(cols as f64 * self.width, rows as f64 * self.height)
    }

    fn cells(px: f64, cell: f64) -> usize {
        if !px.is_finite() || px <= 0.0 {
            return 0;
        }
        // Tolerate round-off when the area was computed as cols * cell.
        (px / cell + 1e-6).floor() as usize
    }
}

/// How an effect sizes its grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    /// Always this size, whatever the display reports.
    Fixed(Dimensions),
    /// Fill the area, but never drop below `min`.
    Adaptive { min: Dimensions },
    /// Columns follow the area width, row count is fixed.
    FixedRows { rows: usize, min_cols: usize },
}

impl Resolution {
    pub fn min_dims(&self) -> Dimensions {
        match *self {
            Resolution::Fixed(d) => d,
            Resolution::Adaptive { min } => min,
            Resolution::FixedRows { rows, min_cols } => Dimensions::new(min_cols, rows),
        }
        .clamped()
    }
}

pub struct ResizeAdapter {
    cell: CellMetrics,
    resolution: Resolution,
    current: Option<Dimensions>,
}

impl ResizeAdapter {
    pub fn new(cell: CellMetrics, resolution: Resolution) -> Self {
        Self {
            cell,
            resolution,
            current: None,
        }
    }

    pub fn grid_for(&self, area: PixelArea) -> Dimensions {
        let cols = CellMetrics::cells(area.width, self.cell.width);
        let rows = CellMetrics::cells(area.height, self.cell.height);
        match self.resolution {
            Resolution::Fixed(d) => d,
            Resolution::Adaptive { min } => Dimensions::new(cols.max(min.width), rows.max(min.height)),
            Resolution::FixedRows { rows, min_cols } => Dimensions::new(cols.max(min_cols), rows),
        }
        .clamped()
    }

    /// Feed the latest reported area. Returns the new dimensions only when
    /// they differ from the last ones handed out.
    pub fn observe(&mut self, area: PixelArea) -> Option<Dimensions> {
        let dims = self.grid_for(area);
        if self.current == Some(dims) {
            return None;
        }
        self.current = Some(dims);
        Some(dims)
    }

    pub fn current(&self) -> Option<Dimensions> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_enforces_minimum() {
        let adapter = ResizeAdapter::new(
            CellMetrics::default(),
            Resolution::Adaptive { min: Dimensions::new(20, 10) },
        );
        assert_eq!(adapter.grid_for(PixelArea::new(0.0, -50.0)), Dimensions::new(20, 10));
        assert_eq!(adapter.grid_for(PixelArea::new(720.0, 560.0)), Dimensions::new(100, 40));
        assert_eq!(adapter.grid_for(PixelArea::new(f64::NAN, f64::INFINITY)), Dimensions::new(20, 10));
    }

    #[test]
    fn test_zero_minimum_still_clamps_to_one() {
        let adapter = ResizeAdapter::new(CellMetrics::default(), Resolution::Adaptive { min: Dimensions::new(0, 0) });
        assert_eq!(adapter.grid_for(PixelArea::new(1.0, 1.0)), Dimensions::new(1, 1));
    }

    #[test]
    fn test_round_trip_through_cell_area() {
        let cell = CellMetrics::default();
        let adapter = ResizeAdapter::new(cell, Resolution::Adaptive { min: Dimensions::new(1, 1) });
        for cols in [1u16, 7, 80, 133, 211] {
            for rows in [1u16, 24, 61] {
                let dims = adapter.grid_for(cell.area_of(cols, rows));
                assert_eq!(dims, Dimensions::new(cols as usize, rows as usize));
            }
        }
    }

    #[test]
    fn test_fixed_rows() {
        let adapter = ResizeAdapter::new(
            CellMetrics::new(6.0, 10.0),
            Resolution::FixedRows { rows: 40, min_cols: 80 },
        );
        assert_eq!(adapter.grid_for(PixelArea::new(300.0, 10.0)), Dimensions::new(80, 40));
        assert_eq!(adapter.grid_for(PixelArea::new(900.0, 10.0)), Dimensions::new(150, 40));
    }

    #[test]
    fn test_observe_is_idempotent() {
        let mut adapter = ResizeAdapter::new(CellMetrics::default(), Resolution::Adaptive { min: Dimensions::new(20, 10) });
        let area = PixelArea::new(800.0, 600.0);
        assert!(adapter.observe(area).is_some());
        assert!(adapter.observe(area).is_none());
        assert!(adapter.observe(PixelArea::new(801.0, 600.0)).is_none());
        assert!(adapter.observe(PixelArea::new(900.0, 600.0)).is_some());
    }

    #[test]
    fn test_bad_cell_metrics_fall_back() {
        let cell = CellMetrics::new(0.0, f64::NAN);
        assert_eq!(cell, CellMetrics::default());
    }
}
