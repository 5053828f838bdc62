use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};

use super::{Color, DrawingSurface, SurfaceError};

/// Surface backed by an in-memory RGB image
#[derive(Debug, Clone)]
pub struct ImageSurface {
    canvas: RgbImage,
}

impl ImageSurface {
    /// Create an empty (0x0) surface
    pub fn new() -> Self {
        Self {
            canvas: RgbImage::new(0, 0),
        }
    }

    /// Borrow the rendered image
    pub fn image(&self) -> &RgbImage {
        &self.canvas
    }

    /// Color of one pixel, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.canvas.width() && y < self.canvas.height() {
            Some(*self.canvas.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Number of pixels equal to `color`
    pub fn count_pixels(&self, color: Color) -> usize {
        self.canvas.pixels().filter(|p| **p == color).count()
    }
}

impl Default for ImageSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for ImageSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas = RgbImage::new(width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        let (canvas_w, canvas_h) = self.canvas.dimensions();
        let x_end = x.saturating_add(width).min(canvas_w);
        let y_end = y.saturating_add(height).min(canvas_h);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.canvas.put_pixel(px, py, color);
            }
        }
    }

    fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let (width, height) = self.canvas.dimensions();
        if width == 0 || height == 0 {
            return Err(SurfaceError::Empty);
        }
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(self.canvas.as_raw(), width, height, ColorType::Rgb8)?;
        Ok(bytes)
    }
}
