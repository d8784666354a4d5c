use super::Effect;
use crate::display::PixelBuffer;
use crate::particles::gen_color;

/// Classic demoscene plasma effect
pub struct Plasma {
    time: f32,
    palette: Vec<u32>,
    sin_table: Vec<f32>,
}

impl Plasma {
    pub fn new() -> Self {
        // Pre-compute sine table for speed
        let sin_table: Vec<f32> = (0..256)
            .map(|i| (i as f32 * std::f32::consts::TAU / 256.0).sin())
            .collect();

        Self {
            time: 0.0,
            palette: (0..256).map(|i| gen_color(i, 100, 1.0)).collect(),
            sin_table,
        }
    }

    #[inline]
    fn fast_sin(&self, x: f32) -> f32 {
        let idx = ((x * 40.74) as i32 & 255) as usize;
        self.sin_table[idx]
    }
}

impl Default for Plasma {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Plasma {
    fn update(&mut self, ticks: u64, _width: u32, _height: u32) {
        self.time = ticks as f32 / 1000.0;
    }

    fn render(&mut self, buffer: &mut PixelBuffer) {
        let width = buffer.width() as usize;
        if width == 0 {
            return;
        }
        let t = self.time;
        // Palette rotation
        let shift = (t * 32.0) as usize;

        for (y, row) in buffer.pixels_mut().chunks_exact_mut(width).enumerate() {
            let fy = y as f32;
            for (x, px) in row.iter_mut().enumerate() {
                let fx = x as f32;

                // Classic plasma formula - sum of sines at different frequencies
                let v1 = self.fast_sin(fx * 0.02 + t);
                let v2 = self.fast_sin(fy * 0.03 + t * 0.5);
                let v3 = self.fast_sin((fx + fy) * 0.02 + t * 0.7);
                let v4 = self.fast_sin(((fx * fx + fy * fy).sqrt() * 0.03) + t);

                let v = (v1 + v2 + v3 + v4 + 4.0) / 8.0; // Normalize to 0-1
                let idx = (v * 255.0) as usize;

                *px = self.palette[(idx + shift) & 255];
            }
        }
    }

    fn name(&self) -> &'static str {
        "Plasma"
    }
}
