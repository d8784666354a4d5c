//! Texture System for Demoscene Effects
//!
//! Flat `0xAABBGGRR` pixel arrays indexed by `x + y * width`, plus the
//! procedural generators the effects use in place of image files.

use crate::blend::{gray, pack};

/// A texture stored as packed pixels
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Texture {
    /// Create a new black texture
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![pack(0, 0, 0); (width * height) as usize],
        }
    }

    /// Wrap host-supplied pixels; `None` if the length does not match
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() == (width * height) as usize {
            Some(Self {
                width,
                height,
                pixels,
            })
        } else {
            None
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

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Fast nearest-neighbor sample using texel coordinates with bitmask wrapping.
    /// Only works correctly for power-of-2 sized textures.
    #[inline]
    pub fn sample_texel(&self, tx: i32, ty: i32) -> u32 {
        debug_assert!(self.width.is_power_of_two() && self.height.is_power_of_two());
        let x = (tx as u32) & (self.width - 1);
        let y = (ty as u32) & (self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// XOR pattern tinted by a warm/cool gradient: the classic tunnel wall
    pub fn xor_pattern(size: u32) -> Self {
        let mut tex = Self::new(size, size);
        let scale = 256 / size.max(1);
        for y in 0..size {
            for x in 0..size {
                let v = ((x ^ y) * scale) as u8;
                let r = v;
                let g = ((v as u16 * 3) / 4) as u8;
                let b = (((x * scale) as u8) / 2).saturating_add(v / 3);
                tex.set_pixel(x, y, pack(r, g, b));
            }
        }
        tex
    }

    /// Brick wall: offset mortar rows with per-brick variation
    pub fn bricks(size: u32) -> Self {
        let mut tex = Self::new(size, size);

        let brick_w = (size / 4).max(8);
        let brick_h = (size / 8).max(4);

        for y in 0..size {
            for x in 0..size {
                let row = y / brick_h;
                let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
                let bx = (x + offset) % brick_w;
                let by = y % brick_h;

                let color = if bx < 3 || by < 3 {
                    gray(90)
                } else {
                    let brick_id = (row * 17 + ((x + offset) / brick_w) * 31) & 0xFF;
                    let base = 150 + (brick_id & 0x3F) as u8;
                    pack(base, base / 2, base / 3)
                };

                tex.set_pixel(x, y, color);
            }
        }
        tex
    }
}
