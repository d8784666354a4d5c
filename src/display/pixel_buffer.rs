use super::{Stencil, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::blend::{average, BlendMode, BLACK, OPAQUE};

// ============================================================================
// PixelBuffer
// ============================================================================

/// Packed `0xAABBGGRR` pixel buffer for software rendering.
/// This is our canvas - all demoscene effects render to this
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new pixel buffer with custom resolution, cleared to opaque black
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![BLACK; (width * height) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Clear to a solid color (alpha forced opaque)
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color | OPAQUE);
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Direct access for per-pixel fills (LUT-driven effects)
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Read a pixel (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color | OPAQUE;
        }
    }

    /// Composite a single pixel through a blend operator (bounds checked)
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32, mode: BlendMode) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = mode.apply(color, self.pixels[idx]);
        }
    }

    /// Draw a horizontal span, clipped to the buffer
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: u32, mode: BlendMode) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let row = self.pixel_index(0, y as u32);
        let span = &mut self.pixels[row + start as usize..=row + end as usize];
        if mode == BlendMode::Replace {
            span.fill(color | OPAQUE);
        } else {
            for px in span {
                *px = mode.apply(color, *px);
            }
        }
    }

    /// Draw a filled circle using horizontal spans (clipped on both axes)
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        self.fill_circle_blend(cx, cy, radius, color, BlendMode::Replace);
    }

    /// Fill a circle through a blend operator.
    ///
    /// One clipped span per scanline, so non-idempotent operators (additive)
    /// never double-apply where octants meet.
    pub fn fill_circle_blend(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: u32,
        mode: BlendMode,
    ) {
        if radius <= 0 {
            if radius == 0 {
                self.blend_pixel(cx, cy, color, mode);
            }
            return;
        }

        let top = (cy - radius).max(0);
        let bottom = (cy + radius).min(self.height as i32 - 1);
        let r2 = radius * radius;
        for y in top..=bottom {
            let dy = y - cy;
            let half = ((r2 - dy * dy) as f32).sqrt() as i32;
            self.hline(cx - half, cx + half, y, color, mode);
        }
    }

    /// Draw a circle outline (1px ring) through a blend operator
    pub fn draw_circle_blend(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: u32,
        mode: BlendMode,
    ) {
        if radius <= 0 {
            self.blend_pixel(cx, cy, color, mode);
            return;
        }

        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while x >= y {
            // Octant points; on the diagonal and axes some coincide, plot each once
            let mut points = [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ];
            points.sort_unstable();
            let mut prev = None;
            for p in points {
                if prev != Some(p) {
                    self.blend_pixel(cx + p.0, cy + p.1, color, mode);
                    prev = Some(p);
                }
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Stamp a 16x16 stencil with its top-left corner at (x, y); set bits get `color`
    pub fn stamp(&mut self, stencil: &Stencil, x: i32, y: i32, color: u32, mode: BlendMode) {
        for (row, &bits) in stencil.rows().iter().enumerate() {
            let py = y + row as i32;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for col in 0..Stencil::SIZE {
                if bits & (0x8000u16 >> col) != 0 {
                    self.blend_pixel(x + col as i32, py, color, mode);
                }
            }
        }
    }

    /// Copy pixels from another buffer of the same size
    pub fn copy_from(&mut self, src: &PixelBuffer) {
        debug_assert!(
            self.width == src.width && self.height == src.height,
            "copy_from: size mismatch"
        );
        self.pixels.copy_from_slice(&src.pixels);
    }

    /// Zoom feedback: average every pixel with `src` sampled at `zoom` scale around
    /// the center. With `zoom < 1.0` the previous frame appears to drift outward.
    pub fn zoom_average_from(&mut self, src: &PixelBuffer, zoom: f64) {
        debug_assert!(
            self.width == src.width && self.height == src.height,
            "zoom_average_from: size mismatch"
        );
        debug_assert!(zoom > 0.0 && zoom <= 1.0, "zoom must be in (0, 1]");

        let w = self.width as usize;
        let expand = (1.0 - zoom) * 0.5;
        let x_off = self.width as f64 * expand;
        let y_off = self.height as f64 * expand;

        for (i, row) in self.pixels.chunks_exact_mut(w).enumerate() {
            let sy = (i as f64 * zoom + y_off) as usize;
            let src_row = &src.pixels[sy * w..(sy + 1) * w];
            for (j, px) in row.iter_mut().enumerate() {
                let sx = (j as f64 * zoom + x_off) as usize;
                *px = average(*px, src_row[sx]);
            }
        }
    }

    /// Raw bytes for texture upload (`ABGR8888` packed, RGBA in memory on little-endian)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::{pack, WHITE};

    fn count(buffer: &PixelBuffer, color: u32) -> usize {
        buffer.pixels().iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn test_new_buffer_is_opaque_black() {
        let buffer = PixelBuffer::with_size(8, 4);
        assert_eq!(buffer.pixels().len(), 32);
        assert_eq!(count(&buffer, BLACK), 32);

        let buffer = PixelBuffer::default();
        assert_eq!((buffer.width(), buffer.height()), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(buffer.as_bytes().len(), 128);
    }

    #[test]
    fn test_set_pixel_clips_and_forces_alpha() {
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.set_pixel(-1, 0, WHITE);
        buffer.set_pixel(4, 0, WHITE);
        buffer.set_pixel(0, 4, WHITE);
        assert_eq!(count(&buffer, BLACK), 16);
        buffer.set_pixel(1, 2, 0x0000_00FF);
        assert_eq!(buffer.get_pixel(1, 2), Some(pack(255, 0, 0)));
        assert_eq!(buffer.get_pixel(9, 9), None);
    }

    #[test]
    fn test_hline_clips() {
        let mut buffer = PixelBuffer::with_size(10, 3);
        buffer.hline(-5, 20, 1, WHITE, BlendMode::Replace);
        assert_eq!(count(&buffer, WHITE), 10);
        buffer.hline(0, 9, 7, WHITE, BlendMode::Replace);
        assert_eq!(count(&buffer, WHITE), 10);
    }

    #[test]
    fn test_fill_circle_shape() {
        let mut buffer = PixelBuffer::with_size(32, 32);
        buffer.fill_circle(16, 16, 5, WHITE);
        assert_eq!(buffer.get_pixel(16, 16), Some(WHITE));
        assert_eq!(buffer.get_pixel(21, 16), Some(WHITE));
        assert_eq!(buffer.get_pixel(16, 11), Some(WHITE));
        assert_eq!(buffer.get_pixel(22, 16), Some(BLACK));
        assert_eq!(buffer.get_pixel(20, 20), Some(BLACK));
        // Symmetric about the center
        for y in 1..32 {
            for x in 1..32 {
                assert_eq!(buffer.get_pixel(x, y), buffer.get_pixel(32 - x, 32 - y));
            }
        }
    }

    #[test]
    fn test_fill_circle_clips_at_edges() {
        let mut buffer = PixelBuffer::with_size(16, 16);
        buffer.fill_circle(0, 0, 6, WHITE);
        buffer.fill_circle(15, 15, 40, WHITE);
        buffer.fill_circle(-100, 5, 3, WHITE);
        assert_eq!(count(&buffer, WHITE), 256);
    }

    #[test]
    fn test_additive_circle_touches_each_pixel_once() {
        let mut buffer = PixelBuffer::with_size(64, 64);
        buffer.fill_circle_blend(32, 32, 20, pack(10, 10, 10), BlendMode::Additive);
        for &p in buffer.pixels() {
            assert!(p == BLACK || p == pack(10, 10, 10), "pixel {:#x} blended twice", p);
        }
    }

    #[test]
    fn test_ring_touches_each_pixel_once() {
        let mut buffer = PixelBuffer::with_size(64, 64);
        for r in 0..25 {
            buffer.clear(BLACK);
            buffer.draw_circle_blend(32, 32, r, pack(10, 10, 10), BlendMode::Additive);
            for &p in buffer.pixels() {
                assert!(p == BLACK || p == pack(10, 10, 10));
            }
            let center = if r == 0 { pack(10, 10, 10) } else { BLACK };
            assert_eq!(buffer.get_pixel(32, 32), Some(center));
        }
    }

    #[test]
    fn test_stamp_copies_set_bits_and_clips() {
        let stencil = Stencil::new([0x8001; 16]);
        let mut buffer = PixelBuffer::with_size(20, 20);
        buffer.stamp(&stencil, 2, 2, WHITE, BlendMode::Replace);
        assert_eq!(count(&buffer, WHITE), 32);
        assert_eq!(buffer.get_pixel(2, 2), Some(WHITE));
        assert_eq!(buffer.get_pixel(17, 17), Some(WHITE));
        assert_eq!(buffer.get_pixel(3, 2), Some(BLACK));

        buffer.clear(BLACK);
        buffer.stamp(&stencil, 10, -8, WHITE, BlendMode::Replace);
        // Column 25 is off-buffer, rows -8..-1 are clipped
        assert_eq!(count(&buffer, WHITE), 8);
    }

    #[test]
    fn test_zoom_average_identity() {
        let mut prev = PixelBuffer::with_size(8, 8);
        prev.clear(pack(100, 50, 0));
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.clear(pack(0, 50, 200));
        buffer.zoom_average_from(&prev, 1.0);
        assert_eq!(count(&buffer, pack(50, 50, 100)), 64);
    }

    #[test]
    fn test_zoom_average_samples_toward_center() {
        let mut prev = PixelBuffer::with_size(100, 100);
        prev.set_pixel(0, 0, WHITE);
        let mut buffer = PixelBuffer::with_size(100, 100);
        buffer.zoom_average_from(&prev, 0.5);
        // Corner now samples (25, 25), which is black in prev
        assert_eq!(buffer.get_pixel(0, 0), Some(BLACK));
    }
}
