//! Tunnel Effect
//!
//! Two copies of one polar lookup table slide over each other on Lissajous
//! paths. The difference of their packed `(distance, angle)` entries indexes a
//! 256x256 texture that scrolls with time, and both vignette masks are averaged
//! in so the walls fade toward the vanishing points.

use super::Effect;
use crate::blend::average;
use crate::display::PixelBuffer;
use crate::lut::{scroll_offset, LutParams, LutTable};
use crate::texture::Texture;

const TEXTURE_SIZE: u32 = 256;
/// Radians per millisecond of the horizontal scroll
const DRIFT_X: f64 = 0.000645234;
const DRIFT_Y: f64 = 0.000445234;

pub struct Tunnel {
    lut: Option<LutTable>,
    params: LutParams,
    texture: Texture,
    ticks: u64,
}

impl Tunnel {
    pub fn new() -> Self {
        Self {
            lut: None,
            params: LutParams::default(),
            texture: Texture::xor_pattern(TEXTURE_SIZE),
            ticks: 0,
        }
    }

    /// Use a host-supplied texture; only 256x256 images map onto the table
    pub fn with_texture(texture: Texture) -> Option<Self> {
        if texture.width() != TEXTURE_SIZE || texture.height() != TEXTURE_SIZE {
            return None;
        }
        Some(Self {
            texture,
            ..Self::new()
        })
    }

    pub fn with_params(mut self, params: LutParams) -> Self {
        self.params = params;
        self.lut = None;
        self
    }

    fn build_lut(&mut self, width: u32, height: u32) {
        let stale = self
            .lut
            .as_ref()
            .map_or(true, |lut| lut.width() != width || lut.height() != height);
        if stale {
            self.lut = Some(LutTable::build_with(width, height, self.params));
        }
    }
}

impl Default for Tunnel {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Tunnel {
    fn update(&mut self, ticks: u64, width: u32, height: u32) {
        self.ticks = ticks;
        self.build_lut(width, height);
    }

    fn render(&mut self, buffer: &mut PixelBuffer) {
        let (width, height) = (buffer.width(), buffer.height());
        if width == 0 || height == 0 {
            return;
        }
        self.build_lut(width, height);
        let Some(lut) = self.lut.as_ref() else {
            return;
        };

        let t = self.ticks as f64;
        let (ox1, oy1) = (scroll_offset(t * DRIFT_X, width), scroll_offset(t * DRIFT_Y, height));
        let (ox2, oy2) = (scroll_offset(-t * DRIFT_X, width), scroll_offset(-t * DRIFT_Y, height));
        let u_shift = (self.ticks / 32) as i32 & 0xFF;
        let v_shift = (self.ticks / 8) as i32 & 0xFF;

        let table = lut.lut();
        let mask = lut.mask();
        let texels = self.texture.pixels();

        for (row, line) in buffer.pixels_mut().chunks_exact_mut(width as usize).enumerate() {
            let row = row as u32;
            for (col, px) in line.iter_mut().enumerate() {
                let a = lut.index(col as u32, row, ox1, oy1);
                let b = lut.index(col as u32, row, ox2, oy2);
                let d = i32::from(table[a]) - i32::from(table[b]);

                let u = (d + u_shift) & 0xFF;
                let v = ((d >> 8) + v_shift) & 0xFF;
                let texel = texels[(u + v * TEXTURE_SIZE as i32) as usize];

                *px = average(average(texel, mask[a]), mask[b]);
            }
        }
    }

    fn name(&self) -> &'static str {
        "Tunnel"
    }
}
