/// Compact bit matrix for storing binary data
///
/// Used as the module grid handed back by an encoder: `get(x, y)` addresses
/// column `x`, row `y`, and a set bit is a dark module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new bit matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Create a square matrix, the shape of every QR symbol
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a square matrix from rows of `'#'` (dark) and anything else (light)
    ///
    /// Returns `None` when the rows do not form a square.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut matrix = Self::square(size);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != size {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                matrix.set(x, y, ch == '#');
            }
        }
        Some(matrix)
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y)
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        (self.data[byte_index] >> bit_index) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Read access to a square grid of QR modules
///
/// `row` and `col` are matrix coordinates in `[0, module_count)`.
pub trait ModuleGrid {
    /// Side length of the symbol in modules
    fn module_count(&self) -> usize;

    /// Whether the module at (`row`, `col`) is dark
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

impl ModuleGrid for BitMatrix {
    fn module_count(&self) -> usize {
        self.width.min(self.height)
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        self.get(col, row)
    }
}

impl ModuleGrid for qrcodegen::QrCode {
    fn module_count(&self) -> usize {
        self.size().max(0) as usize
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        self.get_module(col as i32, row as i32)
    }
}
