//! Drawing targets for the map viewer. `PixelBuffer` is raw pixel access,
//! `DrawSurface` is the small set of primitives the BSP renderer needs.

mod soft;

use glam::Vec2;

pub use soft::SoftFramebuffer;

/// channels should match pixel format
pub const SOFT_PIXEL_CHANNELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferSize {
    width_usize: usize,
    height_usize: usize,
    width: i32,
    height: i32,
    width_f32: f32,
    height_f32: f32,
}

impl BufferSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width_usize: width,
            height_usize: height,
            width: width as i32,
            height: height as i32,
            width_f32: width as f32,
            height_f32: height as f32,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn width_usize(&self) -> usize {
        self.width_usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height_usize
    }

    pub const fn width_f32(&self) -> f32 {
        self.width_f32
    }

    pub const fn height_f32(&self) -> f32 {
        self.height_f32
    }
}

pub trait PixelBuffer {
    fn size(&self) -> &BufferSize;
    fn clear(&mut self);
    fn clear_with_colour(&mut self, colour: &[u8; SOFT_PIXEL_CHANNELS]);
    /// Pixels outside the buffer are ignored
    fn set_pixel(&mut self, x: i32, y: i32, colour: &[u8; SOFT_PIXEL_CHANNELS]);
    /// `None` for pixels outside the buffer
    fn read_pixel(&self, x: i32, y: i32) -> Option<[u8; SOFT_PIXEL_CHANNELS]>;
    /// The whole buffer, rows top to bottom, RGBA
    fn read_pixels(&self) -> &[u8];
}

/// What the renderer draws with. Positions are in surface pixels with the
/// origin top left.
pub trait DrawSurface {
    fn size(&self) -> &BufferSize;
    fn clear(&mut self);
    fn draw_line(&mut self, a: Vec2, b: Vec2, colour: [u8; 4], width: u32);
    /// Outline only
    fn draw_rect(&mut self, top_left: Vec2, bottom_right: Vec2, colour: [u8; 4], width: u32);
    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: [u8; 4]);
}

#[cfg(test)]
mod tests {
    use super::BufferSize;

    #[test]
    fn buffer_size_forms() {
        let size = BufferSize::new(320, 200);
        assert_eq!(size.width(), 320);
        assert_eq!(size.height_usize(), 200);
        assert_eq!(size.width_f32(), 320.0);
        assert_eq!(size.height_f32(), 200.0);
    }
}
