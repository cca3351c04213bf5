use glam::Vec2;

use crate::{BufferSize, DrawSurface, PixelBuffer, SOFT_PIXEL_CHANNELS};

/// An RGBA framebuffer in memory. Everything drawn is clipped to the buffer.
pub struct SoftFramebuffer {
    size: BufferSize,
    /// Total length is width * height * CHANNELS
    buffer: Vec<u8>,
    stride: usize,
}

impl SoftFramebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: BufferSize::new(width, height),
            buffer: vec![0; width * height * SOFT_PIXEL_CHANNELS],
            stride: width * SOFT_PIXEL_CHANNELS,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size.width() || y >= self.size.height() {
            return None;
        }
        Some(y as usize * self.stride + x as usize * SOFT_PIXEL_CHANNELS)
    }

    /// A square of `width` pixels centred on x|y
    fn brush(&mut self, x: i32, y: i32, width: u32, colour: &[u8; 4]) {
        if width <= 1 {
            self.set_pixel(x, y, colour);
            return;
        }
        let lo = -((width as i32 - 1) / 2);
        let hi = lo + width as i32;
        for by in lo..hi {
            for bx in lo..hi {
                self.set_pixel(x + bx, y + by, colour);
            }
        }
    }
}

impl PixelBuffer for SoftFramebuffer {
    #[inline(always)]
    fn size(&self) -> &BufferSize {
        &self.size
    }

    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn clear_with_colour(&mut self, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        self.buffer
            .chunks_mut(SOFT_PIXEL_CHANNELS)
            .for_each(|n| n.copy_from_slice(colour));
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        if let Some(pos) = self.index(x, y) {
            self.buffer[pos..pos + SOFT_PIXEL_CHANNELS].copy_from_slice(colour);
        }
    }

    #[inline]
    fn read_pixel(&self, x: i32, y: i32) -> Option<[u8; SOFT_PIXEL_CHANNELS]> {
        let pos = self.index(x, y)?;
        let mut slice = [0u8; SOFT_PIXEL_CHANNELS];
        slice.copy_from_slice(&self.buffer[pos..pos + SOFT_PIXEL_CHANNELS]);
        Some(slice)
    }

    fn read_pixels(&self) -> &[u8] {
        &self.buffer
    }
}

impl DrawSurface for SoftFramebuffer {
    #[inline(always)]
    fn size(&self) -> &BufferSize {
        &self.size
    }

    /// Clears to opaque black
    fn clear(&mut self) {
        self.clear_with_colour(&[0, 0, 0, 255]);
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, colour: [u8; 4], width: u32) {
        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;

        loop {
            self.brush(x0, y0, width, &colour);
            if x0 == x1 && y0 == y1 {
                break;
            }

            let error2 = error.saturating_mul(2);
            if error2 >= dy {
                error = error.saturating_add(dy);
                x0 = x0.saturating_add(sx);
            }
            if error2 <= dx {
                error = error.saturating_add(dx);
                y0 = y0.saturating_add(sy);
            }
        }
    }

    fn draw_rect(&mut self, top_left: Vec2, bottom_right: Vec2, colour: [u8; 4], width: u32) {
        let top_right = Vec2::new(bottom_right.x, top_left.y);
        let bottom_left = Vec2::new(top_left.x, bottom_right.y);
        self.draw_line(top_left, top_right, colour, width);
        self.draw_line(top_right, bottom_right, colour, width);
        self.draw_line(bottom_right, bottom_left, colour, width);
        self.draw_line(bottom_left, top_left, colour, width);
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: [u8; 4]) {
        let r = radius.max(0.0);
        let cx = centre.x.round() as i32;
        let cy = centre.y.round() as i32;
        let reach = r.ceil() as i32;
        let r2 = r * r;
        for y in -reach..=reach {
            for x in -reach..=reach {
                if (x * x + y * y) as f32 <= r2 {
                    self.set_pixel(cx + x, cy + y, &colour);
                }
            }
        }
    }
}
