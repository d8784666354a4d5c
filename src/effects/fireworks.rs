//! Fireworks
//!
//! Rockets rise from the bottom edge, shed sparks, and burst into flashes and
//! fragments that burst again. Each frame is averaged with a slightly zoomed
//! copy of the previous one, so trails smear outward from the center.

use super::Effect;
use crate::blend::{BlendMode, BLACK};
use crate::compositor::FixedStep;
use crate::display::PixelBuffer;
use crate::particles::{gen_color, ParticleKind, ParticlePool, DEFAULT_CAPACITY};
use crate::util::Rng;

/// Simulation steps between rocket launches
const LAUNCH_INTERVAL: u64 = 40;
/// Bursts only happen above this fraction of the screen height
const GROUND_FRACTION: f32 = 0.9;
const FEEDBACK_ZOOM: f64 = 0.99;

const RISER_GLOW: f32 = 2.5;
const SPARK_GLOW: f32 = 6.0;
const FLASH_GLOW: f32 = 12.0;

pub struct Fireworks {
    pool: ParticlePool,
    rng: Rng,
    clock: FixedStep,
    steps: u64,
    previous: PixelBuffer,
    width: u32,
    height: u32,
}

impl Fireworks {
    pub fn new(seed: u64) -> Self {
        Self {
            pool: ParticlePool::new(DEFAULT_CAPACITY),
            rng: Rng::new(seed),
            clock: FixedStep::default(),
            steps: 0,
            previous: PixelBuffer::with_size(0, 0),
            width: 0,
            height: 0,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.previous = PixelBuffer::with_size(width, height);
        self.pool.physics_mut().ground = height as f32 * GROUND_FRACTION;
    }

    fn step(&mut self) {
        if self.steps % LAUNCH_INTERVAL == 0 {
            let w = self.width as f32;
            let x = self.rng.range_f32(w / 8.0, w * 7.0 / 8.0);
            let color = self.rng.range_i32(0, 1000);
            self.pool.launch(&mut self.rng, x, self.height as f32, color);
        }
        self.pool.tick(&mut self.rng);
        self.steps += 1;
    }
}

impl Effect for Fireworks {
    fn update(&mut self, ticks: u64, width: u32, height: u32) {
        self.resize(width, height);
        for _ in 0..self.clock.advance(ticks) {
            self.step();
        }
    }

    fn render(&mut self, buffer: &mut PixelBuffer) {
        self.resize(buffer.width(), buffer.height());
        self.previous.copy_from(buffer);
        buffer.clear(BLACK);

        let flash_life = self.pool.physics().flash_life;
        for p in self.pool.live() {
            let (x, y) = (p.x as i32, p.y as i32);
            match p.kind {
                ParticleKind::Riser => {
                    let radius = if p.gen == 0 { 2 } else { 1 };
                    let color = gen_color(p.color, p.live, RISER_GLOW);
                    buffer.fill_circle_blend(x, y, radius, color, BlendMode::Additive);
                },
                ParticleKind::Spark => {
                    let color = gen_color(p.color, p.live, SPARK_GLOW);
                    buffer.blend_pixel(x, y, color, BlendMode::Additive);
                },
                ParticleKind::Flash => {
                    let radius = (flash_life - p.live) * 3;
                    let color = gen_color(p.color, p.live, FLASH_GLOW);
                    buffer.draw_circle_blend(x, y, radius, color, BlendMode::Additive);
                },
            }
        }

        buffer.zoom_average_from(&self.previous, FEEDBACK_ZOOM);
    }

    fn name(&self) -> &'static str {
        "Fireworks"
    }

    fn enter(&mut self) {
        self.clock.reset();
    }
}
