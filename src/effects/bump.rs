//! Bump Mapping
//!
//! A brick texture lit by a wandering spot light. Heightmap normals offset the
//! lookup into the light table, so mortar grooves and noisy brick faces catch
//! the light on one side and fall into shadow on the other.

use super::Effect;
use crate::blend::{gray, multiply, unpack};
use crate::display::PixelBuffer;
use crate::lut::{light_spot, GradientTable};
use crate::noise::HeightNoise;
use crate::texture::Texture;

const MAP_SIZE: u32 = 256;
const SPOT_SIZE: u32 = 128;
/// Light floor so unlit areas keep some texture
const AMBIENT: u8 = 24;
/// Coarsest noise cell in texels; halves each octave
const NOISE_CELL: u32 = 32;
const NOISE_OCTAVES: u32 = 4;

pub struct Bump {
    gradients: GradientTable,
    texture: Texture,
    spot: Vec<u8>,
    ticks: u64,
}

impl Bump {
    /// Brick wall with a value-noise surface
    pub fn new(seed: u32) -> Self {
        let texture = Texture::bricks(MAP_SIZE);
        let heights = brick_heightmap(&texture, seed);
        Self::with_heightmap(&heights, texture)
    }

    /// Light an arbitrary `MAP_SIZE` square texture with the given heights
    pub fn with_heightmap(heights: &[u8], texture: Texture) -> Self {
        debug_assert!(texture.width() == MAP_SIZE && texture.height() == MAP_SIZE);
        Self {
            gradients: GradientTable::from_heightmap(heights, MAP_SIZE, MAP_SIZE),
            texture,
            spot: light_spot(SPOT_SIZE),
            ticks: 0,
        }
    }

    /// Screen position of the light center at the current tick
    fn light_position(&self, width: u32, height: u32) -> (i32, i32) {
        let t = self.ticks as f32;
        let (w, h) = (width as f32, height as f32);
        let x = w / 2.0 + (t * 0.0011).cos() * w / 3.0;
        let y = h / 2.0 + (t * 0.0017).sin() * h / 3.0;
        (x as i32, y as i32)
    }
}

/// Noise on the brick faces, mortar pressed in
fn brick_heightmap(texture: &Texture, seed: u32) -> Vec<u8> {
    let noise = HeightNoise::new(MAP_SIZE, NOISE_CELL, NOISE_OCTAVES, seed);
    noise
        .heightmap()
        .into_iter()
        .zip(texture.pixels())
        .map(|(height, &texel)| {
            let (r, _, _) = unpack(texel);
            (height / 2).saturating_add(r / 2)
        })
        .collect()
}

impl Effect for Bump {
    fn update(&mut self, ticks: u64, _width: u32, _height: u32) {
        self.ticks = ticks;
    }

    fn render(&mut self, buffer: &mut PixelBuffer) {
        let width = buffer.width();
        if width == 0 {
            return;
        }
        let (lx, ly) = self.light_position(width, buffer.height());
        let half = SPOT_SIZE as i32 / 2;
        let wrap = MAP_SIZE - 1;

        for (y, line) in buffer.pixels_mut().chunks_exact_mut(width as usize).enumerate() {
            let y = y as i32;
            for (x, px) in line.iter_mut().enumerate() {
                let x = x as i32;
                let (nx, ny) = self.gradients.normal(x as u32 & wrap, y as u32 & wrap);
                let sx = x - lx + i32::from(nx) + half;
                let sy = y - ly + i32::from(ny) + half;

                let span = 0..SPOT_SIZE as i32;
                let intensity = if span.contains(&sx) && span.contains(&sy) {
                    self.spot[(sy * SPOT_SIZE as i32 + sx) as usize]
                } else {
                    0
                };

                let texel = self.texture.sample_texel(x, y);
                *px = multiply(texel, gray(intensity.max(AMBIENT)));
            }
        }
    }

    fn name(&self) -> &'static str {
        "Bump"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::WHITE;

    fn white_texture() -> Texture {
        let texels = vec![WHITE; (MAP_SIZE * MAP_SIZE) as usize];
        Texture::from_pixels(MAP_SIZE, MAP_SIZE, texels).unwrap()
    }

    fn flat_white() -> Bump {
        let heights = vec![0u8; (MAP_SIZE * MAP_SIZE) as usize];
        Bump::with_heightmap(&heights, white_texture())
    }

    #[test]
    fn test_flat_surface_lit_under_light() {
        let mut bump = flat_white();
        let mut buffer = PixelBuffer::with_size(96, 48);
        bump.update(0, 96, 48);
        bump.render(&mut buffer);

        // tick 0: light at (w/2 + w/3, h/2)
        assert_eq!(bump.light_position(96, 48), (80, 24));
        assert_eq!(buffer.get_pixel(80, 24), Some(gray(254)));
        // Outside the spot only the ambient floor remains
        assert_eq!(buffer.get_pixel(0, 0), Some(multiply(WHITE, gray(AMBIENT))));
    }

    #[test]
    fn test_slope_shifts_highlight() {
        // A ramp along x tilts every normal by the same amount
        let heights: Vec<u8> = (0..MAP_SIZE * MAP_SIZE)
            .map(|i| ((i % MAP_SIZE) / 2) as u8)
            .collect();
        let mut bump = Bump::with_heightmap(&heights, white_texture());
        let mut flat = PixelBuffer::with_size(96, 48);
        let mut sloped = PixelBuffer::with_size(96, 48);
        flat_white().render(&mut flat);
        bump.render(&mut sloped);
        assert_ne!(flat.pixels(), sloped.pixels());
    }

    #[test]
    fn test_generated_surface_has_relief() {
        let bump = Bump::new(42);
        let bumpy = (0..MAP_SIZE).any(|x| bump.gradients.normal(x, 100) != (0, 0));
        assert!(bumpy);
    }

    #[test]
    fn test_heightmap_tiles_with_bricks() {
        let texture = Texture::bricks(MAP_SIZE);
        let heights = brick_heightmap(&texture, 5);
        assert_eq!(heights.len(), (MAP_SIZE * MAP_SIZE) as usize);
        assert_eq!(heights, brick_heightmap(&texture, 5));
        assert_ne!(heights, brick_heightmap(&texture, 6));
        // Both halves stay below 128, so nothing saturates
        assert!(heights.iter().all(|&h| h < 255));
    }
}
