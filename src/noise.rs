//! Heightmap Noise
//!
//! Tileable value-noise fBm over integer pixel coordinates. Lattice corners
//! wrap at the map size, so a map generated for `size x size` repeats without
//! seams when sampled with `& (size - 1)`.

/// Lattice value in [0, 1) for a wrapped grid corner
#[inline]
fn lattice(gx: u32, gy: u32, seed: u32) -> f32 {
    let mut h = gx.wrapping_mul(0x27D4_EB2D)
        ^ gy.wrapping_mul(0x1656_67B1)
        ^ seed.wrapping_mul(0x9E37_79B9);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

#[inline]
fn ease(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Fractal value noise sampled at whole pixels.
///
/// Octave `k` uses cells of `cell >> k` pixels with amplitude `0.5^k`.
#[derive(Debug, Clone, Copy)]
pub struct HeightNoise {
    size: u32,
    cell: u32,
    octaves: u32,
    seed: u32,
}

impl HeightNoise {
    pub fn new(size: u32, cell: u32, octaves: u32, seed: u32) -> Self {
        debug_assert!(size.is_power_of_two() && cell.is_power_of_two() && cell <= size);
        debug_assert!(octaves >= 1 && cell >> (octaves - 1) >= 1, "octave cells below a pixel");
        Self {
            size,
            cell,
            octaves,
            seed,
        }
    }

    /// Height at `(x, y)`; coordinates wrap at the map size
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        let (x, y) = (x & (self.size - 1), y & (self.size - 1));
        let mut sum = 0.0;
        let mut total = 0.0;
        let mut amplitude = 1.0;

        for octave in 0..self.octaves {
            let cell = self.cell >> octave;
            let period = self.size / cell;
            let seed = self.seed.wrapping_add(octave);
            let (gx, gy) = (x / cell, y / cell);
            let fx = ease((x % cell) as f32 / cell as f32);
            let fy = ease((y % cell) as f32 / cell as f32);
            let (nx, ny) = ((gx + 1) % period, (gy + 1) % period);

            let top = lerp(lattice(gx, gy, seed), lattice(nx, gy, seed), fx);
            let bottom = lerp(lattice(gx, ny, seed), lattice(nx, ny, seed), fx);
            sum += lerp(top, bottom, fy) * amplitude;
            total += amplitude;
            amplitude *= 0.5;
        }

        (sum / total * 255.0) as u8
    }

    /// Row-major `size x size` heightmap
    pub fn heightmap(&self) -> Vec<u8> {
        (0..self.size)
            .flat_map(|y| (0..self.size).map(move |x| (x, y)))
            .map(|(x, y)| self.sample(x, y))
            .collect()
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmap_is_seeded() {
        let a = HeightNoise::new(64, 16, 3, 7).heightmap();
        assert_eq!(a.len(), 64 * 64);
        assert_eq!(a, HeightNoise::new(64, 16, 3, 7).heightmap());
        assert_ne!(a, HeightNoise::new(64, 16, 3, 8).heightmap());
    }

    #[test]
    fn test_heights_use_the_range() {
        let map = HeightNoise::new(128, 32, 4, 1).heightmap();
        let lo = *map.iter().min().unwrap();
        let hi = *map.iter().max().unwrap();
        assert!(hi - lo > 64, "flat map: {}..{}", lo, hi);
    }

    #[test]
    fn test_wraps_at_map_size() {
        let noise = HeightNoise::new(64, 16, 3, 3);
        for i in 0..64 {
            assert_eq!(noise.sample(i, 5), noise.sample(i + 64, 5));
            assert_eq!(noise.sample(9, i), noise.sample(9, i + 128));
        }
    }

    #[test]
    fn test_no_seams_or_jumps() {
        let size = 128;
        let noise = HeightNoise::new(size, 32, 4, 11);
        for y in 0..size {
            // Includes the wrap from the last column back to the first
            for x in 0..size {
                let step = i32::from(noise.sample(x, y)) - i32::from(noise.sample(x + 1, y));
                assert!(step.abs() <= 32, "jump of {} at ({}, {})", step, x, y);
            }
        }
    }
}
