//! Fixed-pitch character grid that every effect draws into.

/// Column/row count of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Never hand out a zero-sized grid.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// Row-major character buffer. `cells.len() == width * height` at all times.
#[derive(Clone, Debug)]
pub struct GridBuffer {
    dims: Dimensions,
    cells: Vec<char>,
}

impl GridBuffer {
    pub fn new(dims: Dimensions, fill: char) -> Self {
        let dims = dims.clamped();
        Self {
            dims,
            cells: vec![sanitize(fill); dims.area()],
        }
    }

    pub fn blank(dims: Dimensions) -> Self {
        Self::new(dims, ' ')
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    /// Reallocate for new dimensions. Contents are discarded; same dimensions is a no-op.
    pub fn resize(&mut self, dims: Dimensions) {
        let dims = dims.clamped();
        if dims == self.dims {
            return;
        }
        self.dims = dims;
        self.cells = vec![' '; dims.area()];
    }

    pub fn fill(&mut self, ch: char) {
        self.cells.fill(sanitize(ch));
    }

    pub fn clear(&mut self) {
        self.fill(' ');
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, ch: char) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = sanitize(ch);
        }
    }

    /// Write at floating-point coordinates, flooring toward the cell that contains them.
    pub fn plot(&mut self, x: f64, y: f64, ch: char) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let (x, y) = (x.floor(), y.floor());
        if x < i32::MIN as f64 || x > i32::MAX as f64 || y < i32::MIN as f64 || y > i32::MAX as f64 {
            return;
        }
        self.set(x as i32, y as i32, ch);
    }

    /// Write a string starting at position, clipping at the edges
    pub fn put_str(&mut self, x: i32, y: i32, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch);
        }
    }

    pub fn row(&self, y: usize) -> Option<&[char]> {
        if y >= self.dims.height {
            return None;
        }
        let start = y * self.dims.width;
        Some(&self.cells[start..start + self.dims.width])
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [char]> {
        if y >= self.dims.height {
            return None;
        }
        let start = y * self.dims.width;
        Some(&mut self.cells[start..start + self.dims.width])
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Mutable view for post-effects. Callers must not write control characters.
    pub fn cells_mut(&mut self) -> &mut [char] {
        &mut self.cells
    }

    /// `height` rows of `width` glyphs joined by `\n`, no trailing newline.
    pub fn flatten(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 2 + self.dims.height);
        for (y, row) in self.cells.chunks(self.dims.width).enumerate() {
            if y > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
        out
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.dims.contains(x, y) {
            Some(y as usize * self.dims.width + x as usize)
        } else {
            None
        }
    }
}

/// Control characters (newlines, tabs) would break column alignment.
fn sanitize(ch: char) -> char {
    if ch.is_control() {
        ' '
    } else {
        ch
    }
}

/// Check that `frame` has exactly `dims.height` lines of `dims.width` glyphs each.
pub fn frame_has_shape(frame: &str, dims: Dimensions) -> bool {
    let mut lines = 0;
    for line in frame.split('\n') {
        if line.chars().count() != dims.width {
            return false;
        }
        lines += 1;
    }
    lines == dims.height
}
