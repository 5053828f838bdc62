use super::{Color, DrawingSurface, SurfaceError};

/// One operation applied to a [`RecordingSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOp {
    /// Canvas resized
    Resize {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// Rectangle filled
    Fill {
        /// Left edge
        x: u32,
        /// Top edge
        y: u32,
        /// Rectangle width
        width: u32,
        /// Rectangle height
        height: u32,
        /// Fill color
        color: Color,
    },
}

/// Surface that records what was drawn instead of rasterizing it
///
/// Export always fails with [`SurfaceError::Unsupported`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: (u32, u32),
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation in order
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Top-left corners of fills in `color`, in draw order
    pub fn fills_of(&self, color: Color) -> Vec<(u32, u32)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                SurfaceOp::Fill { x, y, color: c, .. } if c == color => Some((x, y)),
                _ => None,
            })
            .collect()
    }

    /// Fills made since the last full-canvas clear
    ///
    /// A clear is a fill covering the whole canvas from the origin.
    pub fn fills_since_clear(&self) -> &[SurfaceOp] {
        let (w, h) = self.size;
        let start = self
            .ops
            .iter()
            .rposition(|op| {
                matches!(*op, SurfaceOp::Fill { x: 0, y: 0, width, height, .. } if width == w && height == h)
                    || matches!(op, SurfaceOp::Resize { .. })
            })
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.ops[start..]
    }
}

impl DrawingSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.ops.push(SurfaceOp::Resize { width, height });
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        self.ops.push(SurfaceOp::Fill {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        Err(SurfaceError::Unsupported)
    }
}
