/// Width of the blank border around the symbol, in modules
pub const QUIET_ZONE: u32 = 4;

/// Largest accepted module side, in pixels
pub const MAX_MODULE_SIZE: u32 = 64;

/// A dark module with its precomputed pixel position
///
/// Light modules are never materialized: the surface starts out cleared to
/// the background color, so an absent draw is a light module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Module {
    /// Matrix row
    pub row: usize,
    /// Matrix column
    pub col: usize,
    /// Left pixel edge
    pub x: u32,
    /// Top pixel edge
    pub y: u32,
}

impl Module {
    /// Distance to the nearest of the four symbol corners
    ///
    /// Sum of row and column offsets to that corner, so the corner module
    /// itself is 0 and the center of the symbol is largest.
    pub fn corner_distance(&self, module_count: usize) -> usize {
        let last = module_count.saturating_sub(1);
        let up = self.row;
        let down = last.saturating_sub(self.row);
        let left = self.col;
        let right = last.saturating_sub(self.col);
        (up + left).min(down + left).min(up + right).min(down + right)
    }

    /// Euclidean distance from the symbol center `(n/2, n/2)`
    pub fn center_distance(&self, module_count: usize) -> f64 {
        let center = module_count as f64 / 2.0;
        let dr = self.row as f64 - center;
        let dc = self.col as f64 - center;
        (dr * dr + dc * dc).sqrt()
    }

    /// Sinusoidal sweep key: rows bend by a sine of the column
    pub fn wave_key(&self) -> f64 {
        (self.col as f64 * 0.2).sin() * 5.0 + self.row as f64
    }
}

/// Pixel geometry for one generated symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSettings {
    /// Side of one module in pixels
    pub module_size: u32,
    /// Side of the symbol in modules
    pub module_count: usize,
    /// Quiet zone width in modules
    pub quiet_zone: u32,
    /// Side of the whole canvas in pixels
    pub total_size: u32,
    /// Pixel offset of the first module row/column
    pub offset: u32,
}

impl CanvasSettings {
    /// Derive the canvas geometry
    ///
    /// `None` when the module count is zero or the module size falls outside
    /// `1..=MAX_MODULE_SIZE`.
    pub fn new(module_size: u32, module_count: usize) -> Option<Self> {
        if !(1..=MAX_MODULE_SIZE).contains(&module_size) || module_count == 0 {
            return None;
        }
        let count = u32::try_from(module_count).ok()?;
        let total_size = count
            .checked_add(2 * QUIET_ZONE)?
            .checked_mul(module_size)?;
        Some(Self {
            module_size,
            module_count,
            quiet_zone: QUIET_ZONE,
            total_size,
            offset: QUIET_ZONE * module_size,
        })
    }

    /// Build the record for a dark module at (`row`, `col`)
    pub fn module_at(&self, row: usize, col: usize) -> Module {
        Module {
            row,
            col,
            x: self.offset + col as u32 * self.module_size,
            y: self.offset + row as u32 * self.module_size,
        }
    }

    /// Pixel span covered by the symbol itself, excluding the quiet zone
    pub fn symbol_span(&self) -> std::ops::Range<u32> {
        self.offset..self.offset + self.module_count as u32 * self.module_size
    }
}
