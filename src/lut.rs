//! Lookup Tables
//!
//! Precomputed per-offset tables so effects never call atan2/sqrt per pixel:
//!
//! - [`LutTable`]: packed polar `(distance, angle)` and a gray vignette mask over a
//!   grid twice the visible size, sampled at two scrolling offsets by the tunnel
//! - [`GradientTable`]: heightmap normals for bump mapping
//! - [`light_spot`]: radial light intensity

use crate::blend::gray;
use std::f32::consts::PI;

/// Distance metric used for the tunnel cross-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceShape {
    /// Euclidean norm
    #[default]
    Circle,
    /// Chebyshev distance
    Square,
    /// Manhattan distance / 2
    Diamond,
}

impl DistanceShape {
    #[inline]
    fn distance(self, xdist: i32, ydist: i32) -> i32 {
        match self {
            DistanceShape::Circle => ((xdist * xdist + ydist * ydist) as f32).sqrt() as i32,
            DistanceShape::Square => xdist.abs().max(ydist.abs()),
            DistanceShape::Diamond => (xdist.abs() + ydist.abs()) / 2,
        }
    }
}

/// Build parameters for [`LutTable`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutParams {
    pub shape: DistanceShape,
    /// Falloff numerator: `distance = (gain * 256 / distance) & 0xFF`
    pub gain: i32,
    /// Perturb the distance with five angular lobes
    pub petals: bool,
}

impl Default for LutParams {
    fn default() -> Self {
        Self {
            shape: DistanceShape::Circle,
            gain: 64,
            petals: false,
        }
    }
}

/// Polar lookup table over a `2*width x 2*height` grid centered at `(width, height)`.
///
/// Immutable once built. Any visible pixel `(col, row)` shifted by an offset in
/// `[0, width] x [0, height]` stays inside the grid, which is what lets the tunnel
/// scroll two samples independently without bounds checks in the inner loop.
pub struct LutTable {
    width: u32,
    height: u32,
    lut: Vec<u16>,
    mask: Vec<u32>,
}

impl LutTable {
    /// Build with the given distance shape and falloff gain
    pub fn build(width: u32, height: u32, shape: DistanceShape, gain: i32) -> Self {
        Self::build_with(
            width,
            height,
            LutParams {
                shape,
                gain,
                ..LutParams::default()
            },
        )
    }

    pub fn build_with(width: u32, height: u32, params: LutParams) -> Self {
        let grid_w = width as i32 * 2;
        let grid_h = height as i32 * 2;
        let size = (grid_w * grid_h) as usize;

        let mut lut = Vec::with_capacity(size);
        let mut mask = Vec::with_capacity(size);

        for i in 0..grid_h {
            let ydist = i - height as i32;
            for j in 0..grid_w {
                let xdist = j - width as i32;
                let theta = (xdist as f32).atan2(ydist as f32);

                let mut distance = params.shape.distance(xdist, ydist);
                if params.petals {
                    distance += ((theta * 5.0).sin() * 8.0) as i32;
                }
                if distance > 0 {
                    distance = (params.gain * 256 / distance) & 0xFF;
                } else {
                    distance = 0;
                }

                mask.push(gray(distance.min(255) as u8));

                let angle = (((theta / PI) + 1.0) * 128.0).round() as i32 & 0xFF;
                lut.push(((distance << 8) | angle) as u16);
            }
        }

        log::debug!(
            "built {}x{} lut ({:?}, gain {}, petals {})",
            grid_w,
            grid_h,
            params.shape,
            params.gain,
            params.petals
        );

        Self {
            width,
            height,
            lut,
            mask,
        }
    }

    /// Visible frame width the table was built for
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride of both tables (`2 * width`)
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * 2
    }

    /// Packed `distance << 8 | angle` entries
    #[inline]
    pub fn lut(&self) -> &[u16] {
        &self.lut
    }

    /// Opaque gray falloff entries
    #[inline]
    pub fn mask(&self) -> &[u32] {
        &self.mask
    }

    /// Table index of visible pixel `(col, row)` under scroll offset `(ox, oy)`
    #[inline]
    pub fn index(&self, col: u32, row: u32, ox: u32, oy: u32) -> usize {
        debug_assert!(col < self.width && row < self.height, "pixel outside frame");
        debug_assert!(
            ox <= self.width && oy <= self.height,
            "scroll offset ({}, {}) exceeds lut extent",
            ox,
            oy
        );
        (row + oy) as usize * self.stride() + (col + ox) as usize
    }

    /// Unpack `(distance, angle)` at a table index
    #[inline]
    pub fn polar(&self, index: usize) -> (u8, u8) {
        let v = self.lut[index];
        ((v >> 8) as u8, v as u8)
    }
}

/// Scroll offset `(sin(phase) + 1) * extent / 2`, clamped to `[0, extent]`
#[inline]
pub fn scroll_offset(phase: f64, extent: u32) -> u32 {
    let pos = (phase.sin() + 1.0) * f64::from(extent) / 2.0;
    (pos.max(0.0) as u32).min(extent)
}

// ============================================================================
// Bump mapping tables
// ============================================================================

/// Central-difference normals of a heightmap; edges clamp to the nearest texel
pub struct GradientTable {
    width: u32,
    height: u32,
    normals: Vec<(i16, i16)>,
}

impl GradientTable {
    pub fn from_heightmap(heights: &[u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(heights.len(), (width * height) as usize);
        let w = width as i32;
        let h = height as i32;
        let at = |x: i32, y: i32| -> i16 {
            let x = x.clamp(0, w - 1);
            let y = y.clamp(0, h - 1);
            heights[(y * w + x) as usize] as i16
        };

        let mut normals = Vec::with_capacity(heights.len());
        for y in 0..h {
            for x in 0..w {
                normals.push((at(x + 1, y) - at(x - 1, y), at(x, y + 1) - at(x, y - 1)));
            }
        }

        Self {
            width,
            height,
            normals,
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
    pub fn normal(&self, x: u32, y: u32) -> (i16, i16) {
        self.normals[(y * self.width + x) as usize]
    }
}

/// `size x size` radial light intensity: `255 * (1 - d/r)^2` inside the radius, 0 outside
pub fn light_spot(size: u32) -> Vec<u8> {
    let r = size as f32 / 2.0;
    let mut spot = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        let dy = y as f32 - r;
        for x in 0..size {
            let dx = x as f32 - r;
            let t = (1.0 - (dx * dx + dy * dy).sqrt() / r).max(0.0);
            spot.push((t * t * 255.0) as u8);
        }
    }
    spot
}
