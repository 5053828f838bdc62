//! Drawing surfaces
//!
//! A surface is a square pixel canvas that modules are painted onto one
//! rectangle at a time. [`ImageSurface`] renders into an in-memory RGB image
//! and exports PNG; [`RecordingSurface`] keeps a log of operations instead.

pub mod image_surface;
pub mod recording;

pub use image_surface::ImageSurface;
pub use recording::{RecordingSurface, SurfaceOp};

use image::Rgb;

/// RGB color used for fills
pub type Color = Rgb<u8>;

/// Dark module color
pub const BLACK: Color = Rgb([0, 0, 0]);
/// Background / light module color
pub const WHITE: Color = Rgb([255, 255, 255]);

/// Foreground and background colors for a render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Dark module color
    pub foreground: Color,
    /// Quiet zone and light module color
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: BLACK,
            background: WHITE,
        }
    }
}

/// Failure exporting a surface
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Nothing to export: the surface was never sized
    #[error("surface is empty")]
    Empty,
    /// Export is not available for this surface
    #[error("export is not supported by this surface")]
    Unsupported,
    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Pixel canvas the animation draws onto
pub trait DrawingSurface {
    /// Resize the canvas, discarding its contents
    fn resize(&mut self, width: u32, height: u32);

    /// Current canvas size in pixels
    fn size(&self) -> (u32, u32);

    /// Fill an axis-aligned rectangle, clipped to the canvas
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color);

    /// Paint the whole canvas with `color`
    fn clear(&mut self, color: Color) {
        let (width, height) = self.size();
        self.fill_rect(0, 0, width, height, color);
    }

    /// Encode the current canvas as PNG bytes
    fn export_png(&self) -> Result<Vec<u8>, SurfaceError>;
}

impl<T: DrawingSurface + ?Sized> DrawingSurface for &mut T {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        (**self).fill_rect(x, y, width, height, color)
    }

    fn clear(&mut self, color: Color) {
        (**self).clear(color)
    }

    fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        (**self).export_png()
    }
}
