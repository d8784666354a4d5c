//! Snowfall
//!
//! A forest is painted once; afterwards the frame buffer itself is the
//! simulation. White pixels are snow grains that fall through black sky,
//! slide off anything else, and pile up on branches and the ground.

use super::Effect;
use crate::blend::{pack, BlendMode, BLACK, WHITE};
use crate::compositor::{FixedStep, MAX_CATCHUP_STEPS};
use crate::display::{PixelBuffer, SNOWFLAKE};
use crate::util::Rng;

const TREE_COUNT: usize = 32;
/// New grains on the top row per simulation step
const FLAKES_PER_STEP: usize = 8;
/// Sprite flakes hanging in the sky when the scene is drawn; they crumble into grains
const SKY_FLAKES: usize = 6;

const TRUNK: u32 = pack(90, 60, 30);
const STAR: u32 = pack(255, 200, 40);

/// One step of the falling-sand rule over a `width`-wide frame.
///
/// Rows are scanned bottom-up from the second-to-last so a grain moves at most
/// once per step. A white pixel moves into black directly below, else below-left,
/// else below-right. The outer columns never move.
pub fn snow_step(pixels: &mut [u32], width: usize) {
    if width < 3 || pixels.len() < width * 2 {
        return;
    }
    let height = pixels.len() / width;

    for y in (0..height - 1).rev() {
        let row = y * width;
        for x in 1..width - 1 {
            let here = row + x;
            if pixels[here] != WHITE {
                continue;
            }
            let below = here + width;
            let target = [below, below - 1, below + 1]
                .into_iter()
                .find(|&i| pixels[i] == BLACK);
            if let Some(i) = target {
                pixels[i] = WHITE;
                pixels[here] = BLACK;
            }
        }
    }
}

pub struct Snowfall {
    rng: Rng,
    clock: FixedStep,
    pending: u32,
    /// Size the scene was painted at
    scene: Option<(u32, u32)>,
}

impl Snowfall {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rng::new(seed),
            clock: FixedStep::default(),
            pending: 0,
            scene: None,
        }
    }

    fn draw_scene(&mut self, buffer: &mut PixelBuffer) {
        let (w, h) = (buffer.width() as i32, buffer.height() as i32);
        buffer.clear(BLACK);

        let mut trees: Vec<(i32, i32, i32)> = (0..TREE_COUNT)
            .map(|_| {
                let x = self.rng.range_i32(0, w - 1);
                let base = self.rng.range_i32(h / 2, h);
                let size = self.rng.range_i32((h / 6).max(4), (h / 3).max(4));
                (x, base, size)
            })
            .collect();
        // Far trees first
        trees.sort_unstable_by_key(|&(_, base, _)| base);
        for (x, base, size) in trees {
            draw_tree(buffer, x, base, size);
        }

        for _ in 0..SKY_FLAKES {
            let x = self.rng.range_i32(0, (w - 16).max(0));
            let y = self.rng.range_i32((h / 3).min(16), h / 3);
            buffer.stamp(&SNOWFLAKE, x, y, WHITE, BlendMode::Replace);
        }

        log::debug!("painted forest at {}x{}", w, h);
    }

    fn new_snow(&mut self, buffer: &mut PixelBuffer) {
        let w = buffer.width() as i32;
        if w < 3 {
            return;
        }
        for _ in 0..FLAKES_PER_STEP {
            let x = self.rng.range_i32(1, w - 2);
            buffer.set_pixel(x, 0, WHITE);
        }
    }
}

/// Trunk, three stacked crown tiers and a star
fn draw_tree(buffer: &mut PixelBuffer, x: i32, base: i32, size: i32) {
    let trunk_half = (size / 12).max(1);
    let trunk_top = base - size / 3;
    for y in trunk_top..=base {
        buffer.hline(x - trunk_half, x + trunk_half, y, TRUNK, BlendMode::Replace);
    }

    let mut top = trunk_top;
    for tier in 0..3 {
        let radius = (size * (3 - tier) / 8).max(1);
        let cy = trunk_top - tier * size / 4;
        buffer.fill_circle(x, cy, radius, pack(20, 90 + tier as u8 * 25, 40));
        top = cy - radius;
    }

    buffer.stamp(&SNOWFLAKE, x - 8, top - 12, STAR, BlendMode::Replace);
}

impl Effect for Snowfall {
    fn update(&mut self, ticks: u64, _width: u32, _height: u32) {
        self.pending = (self.pending + self.clock.advance(ticks)).min(MAX_CATCHUP_STEPS);
    }

    fn render(&mut self, buffer: &mut PixelBuffer) {
        let size = (buffer.width(), buffer.height());
        if self.scene != Some(size) {
            self.draw_scene(buffer);
            self.scene = Some(size);
        }

        let width = buffer.width() as usize;
        for _ in 0..self.pending {
            self.new_snow(buffer);
            snow_step(buffer.pixels_mut(), width);
        }
        self.pending = 0;
    }

    fn name(&self) -> &'static str {
        "Snowfall"
    }

    fn enter(&mut self) {
        self.scene = None;
        self.pending = 0;
        self.clock.reset();
    }
}
