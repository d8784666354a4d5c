//! Particle Pool for Fireworks
//!
//! Fixed-capacity ring of particle slots with generational spawning.
//!
//! Admission is an unconditional ring overwrite: `spawn` always writes slot
//! `next_index % capacity` and advances the counter. There is no free-list, so a
//! live particle is silently evicted when the ring laps it. Memory stays bounded
//! no matter how fast particles are spawned.
//!
//! A [`ParticlePool::tick`] is one linear pass over the slots by index. Children
//! spawned during the pass are staged and written into the ring after it, so a
//! particle spawned in a tick is never advanced in that same tick.

use crate::blend::pack;
use crate::util::Rng;
use std::f32::consts::TAU;

pub const DEFAULT_CAPACITY: usize = 16384;

/// Behavior tag of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleKind {
    /// Rocket or explosion fragment: falls under gravity, leaves a trail,
    /// explodes on expiry
    #[default]
    Riser,
    /// Trail spark: drifts, no children
    Spark,
    /// Explosion flash: stationary, drawn as a fading ring
    Flash,
}

/// A single particle slot. `live == 0` marks the slot free
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub xi: f32,
    pub yi: f32,
    /// Remaining lifetime in ticks
    pub live: i32,
    /// Fan-out depth; explosions stop once `gen` reaches the physics limit
    pub gen: u32,
    pub kind: ParticleKind,
    /// Palette seed for [`gen_color`]
    pub color: i32,
}

impl Particle {
    pub fn new(kind: ParticleKind, x: f32, y: f32, live: i32) -> Self {
        Self {
            x,
            y,
            live,
            kind,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, xi: f32, yi: f32) -> Self {
        self.xi = xi;
        self.yi = yi;
        self
    }

    pub fn with_gen(mut self, gen: u32) -> Self {
        self.gen = gen;
        self
    }

    pub fn with_color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.live > 0
    }
}

/// Simulation constants, all in per-tick units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolPhysics {
    /// Added to `yi` of risers every tick
    pub gravity: f32,
    /// Risers only explode while above this line (`y < ground`)
    pub ground: f32,
    /// Flash/fragment pairs per explosion
    pub fan_out: usize,
    /// Risers of this generation or deeper never explode
    pub max_gen: u32,
    pub flash_life: i32,
    /// Inclusive lifetime ranges
    pub spark_life: (i32, i32),
    pub fragment_life: (i32, i32),
}

impl Default for PoolPhysics {
    fn default() -> Self {
        Self {
            gravity: 0.05,
            ground: 480.0,
            fan_out: 12,
            max_gen: 2,
            flash_life: 8,
            spark_life: (8, 16),
            fragment_life: (20, 40),
        }
    }
}

/// Fixed-capacity particle ring
pub struct ParticlePool {
    slots: Box<[Particle]>,
    next_index: u64,
    physics: PoolPhysics,
    staged: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "particle pool needs at least one slot");
        Self {
            slots: vec![Particle::default(); capacity].into_boxed_slice(),
            next_index: 0,
            physics: PoolPhysics::default(),
            staged: Vec::new(),
        }
    }

    pub fn with_physics(mut self, physics: PoolPhysics) -> Self {
        self.physics = physics;
        self
    }

    #[inline]
    pub fn physics(&self) -> &PoolPhysics {
        &self.physics
    }

    #[inline]
    pub fn physics_mut(&mut self) -> &mut PoolPhysics {
        &mut self.physics
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total spawns so far; `next_index % capacity` is the next slot overwritten
    #[inline]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    #[inline]
    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn live(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Write into the next ring slot, evicting whatever was there
    #[inline]
    pub fn spawn(&mut self, particle: Particle) {
        let slot = (self.next_index % self.slots.len() as u64) as usize;
        self.slots[slot] = particle;
        self.next_index += 1;
    }

    /// Launch a generation-0 rocket with a randomized upward speed
    pub fn launch(&mut self, rng: &mut Rng, x: f32, y: f32, color: i32) {
        let rocket = Particle::new(ParticleKind::Riser, x, y, rng.range_i32(60, 90))
            .with_velocity(rng.jitter(256, 128.0), -rng.range_f32(5.0, 7.0))
            .with_color(color);
        self.spawn(rocket);
    }

    /// Advance every live slot by one tick
    pub fn tick(&mut self, rng: &mut Rng) {
        let physics = self.physics;
        let mut staged = std::mem::take(&mut self.staged);

        for p in self.slots.iter_mut().filter(|p| p.is_alive()) {
            match p.kind {
                ParticleKind::Riser => {
                    p.yi += physics.gravity;
                    p.x += p.xi;
                    p.y += p.yi;
                    p.live -= 1;
                    if p.live > 0 {
                        staged.push(trail_spark(p, rng, &physics));
                    } else if p.y < physics.ground && p.gen < physics.max_gen {
                        explode(p, rng, &physics, &mut staged);
                    }
                },
                ParticleKind::Spark => {
                    p.x += p.xi;
                    p.y += p.yi;
                    p.live -= 1;
                },
                ParticleKind::Flash => {
                    p.live -= 1;
                },
            }
        }

        for child in staged.drain(..) {
            self.spawn(child);
        }
        self.staged = staged;
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn trail_spark(parent: &Particle, rng: &mut Rng, physics: &PoolPhysics) -> Particle {
    let (lo, hi) = physics.spark_life;
    Particle::new(ParticleKind::Spark, parent.x, parent.y, rng.range_i32(lo, hi))
        .with_velocity(rng.jitter(256, 128.0), rng.jitter(256, 128.0))
        .with_gen(parent.gen)
        .with_color(parent.color)
}

/// Fan out `fan_out` flash/fragment pairs at the parent's position
fn explode(parent: &Particle, rng: &mut Rng, physics: &PoolPhysics, out: &mut Vec<Particle>) {
    let (lo, hi) = physics.fragment_life;
    for _ in 0..physics.fan_out {
        out.push(
            Particle::new(ParticleKind::Flash, parent.x, parent.y, physics.flash_life)
                .with_gen(parent.gen)
                .with_color(parent.color),
        );
        out.push(
            Particle::new(ParticleKind::Riser, parent.x, parent.y, rng.range_i32(lo, hi))
                .with_velocity(rng.jitter(256, 32.0), rng.jitter(256, 32.0))
                .with_gen(parent.gen + 1)
                .with_color(parent.color),
        );
    }
}

/// Hue cycle through three sines 120 degrees apart, centered on mid-gray,
/// scaled by `brightness * live / 100` so particles fade as they expire
pub fn gen_color(seed: i32, live: i32, brightness: f32) -> u32 {
    let phase = seed as f32 * 0.1;
    let fade = brightness * (live as f32 / 100.0);
    let channel = |k: f32| -> u8 {
        let v = (phase + k * TAU / 3.0).sin() * 127.0 + 128.0;
        (v * fade).clamp(0.0, 255.0) as u8
    };
    pack(channel(0.0), channel(1.0), channel(2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BLACK;

    fn tagged(color: i32) -> Particle {
        Particle::new(ParticleKind::Spark, 0.0, 0.0, 100).with_color(color)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn ground_at_200() -> PoolPhysics {
        PoolPhysics {
            ground: 200.0,
            ..PoolPhysics::default()
        }
    }

    #[test]
    fn test_ring_wraps_over_oldest() {
        let mut pool = ParticlePool::new(4);
        for color in 1..=5 {
            pool.spawn(tagged(color));
        }
        let colors: Vec<i32> = pool.slots().iter().map(|p| p.color).collect();
        assert_eq!(colors, vec![5, 2, 3, 4]);
        assert_eq!(pool.next_index(), 5);
    }

    #[test]
    fn test_full_pool_overwrites_slot_zero() {
        let mut pool = ParticlePool::new(8);
        for color in 0..8 {
            pool.spawn(tagged(color));
        }
        assert_eq!(pool.slots()[0].color, 0);
        pool.spawn(tagged(99));
        assert_eq!(pool.slots()[0].color, 99);
        assert_eq!(pool.slots()[1].color, 1);
    }

    #[test]
    fn test_expiring_riser_explodes_into_pairs() {
        let mut rng = Rng::new(1);
        let mut pool = ParticlePool::new(DEFAULT_CAPACITY).with_physics(ground_at_200());
        pool.spawn(Particle::new(ParticleKind::Riser, 100.0, 100.0, 1));
        pool.tick(&mut rng);

        assert_eq!(pool.slots()[0].live, 0);
        assert_eq!(pool.next_index(), 1 + 24);

        let flashes = pool.live().filter(|p| p.kind == ParticleKind::Flash).count();
        let fragments: Vec<&Particle> =
            pool.live().filter(|p| p.kind == ParticleKind::Riser).collect();
        assert_eq!(flashes, 12);
        assert_eq!(fragments.len(), 12);
        assert!(fragments.iter().all(|p| p.gen == 1));
        let parent = pool.slots()[0];
        assert!(pool.live().all(|p| p.x == parent.x && p.y == parent.y));
    }

    #[test]
    fn test_explosion_wraps_small_ring_within_one_tick() {
        let mut rng = Rng::new(3);
        let mut pool = ParticlePool::new(4).with_physics(ground_at_200());
        pool.spawn(Particle::new(ParticleKind::Riser, 100.0, 100.0, 1).with_color(7));
        pool.tick(&mut rng);

        assert_eq!(pool.next_index(), 25);
        // Spawns 21..24 survive: flash, fragment, flash, fragment from slot 1 on
        let kinds: Vec<ParticleKind> = pool.slots().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParticleKind::Riser,
                ParticleKind::Flash,
                ParticleKind::Riser,
                ParticleKind::Flash,
            ]
        );

        // The parent slot now holds a fresh fragment, not the spent rocket
        let slot0 = pool.slots()[0];
        assert_eq!(slot0.gen, 1);
        assert!((20..=40).contains(&slot0.live));
        assert_eq!(pool.live_count(), 4);

        // Nothing born this tick has moved or aged yet
        let (x, y) = (slot0.x, slot0.y);
        for p in pool.slots() {
            assert!(approx(p.x, x) && approx(p.y, y));
            assert_eq!(p.color, 7);
            if p.kind == ParticleKind::Flash {
                assert_eq!(p.live, 8);
            }
        }
    }

    #[test]
    fn test_last_generation_never_explodes() {
        let mut rng = Rng::new(2);
        let mut pool = ParticlePool::new(64).with_physics(ground_at_200());
        pool.spawn(Particle::new(ParticleKind::Riser, 100.0, 100.0, 1).with_gen(2));
        pool.tick(&mut rng);
        assert_eq!(pool.next_index(), 1);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_no_explosion_below_ground() {
        let mut rng = Rng::new(3);
        let mut pool = ParticlePool::new(64).with_physics(ground_at_200());
        pool.spawn(Particle::new(ParticleKind::Riser, 100.0, 250.0, 1));
        pool.tick(&mut rng);
        assert_eq!(pool.next_index(), 1);
    }

    #[test]
    fn test_riser_integrates_and_leaves_trail() {
        let mut rng = Rng::new(4);
        let mut pool = ParticlePool::new(64);
        pool.spawn(
            Particle::new(ParticleKind::Riser, 10.0, 300.0, 5)
                .with_velocity(1.0, -5.0)
                .with_color(7),
        );
        pool.tick(&mut rng);

        let rocket = pool.slots()[0];
        assert_eq!(rocket.live, 4);
        assert!(approx(rocket.yi, -4.95));
        assert!(approx(rocket.x, 11.0) && approx(rocket.y, 295.05));

        // Spawned this tick, so not advanced yet
        let spark = pool.slots()[1];
        assert_eq!(spark.kind, ParticleKind::Spark);
        assert_eq!((spark.x, spark.y), (rocket.x, rocket.y));
        assert_eq!(spark.color, 7);
        let (lo, hi) = PoolPhysics::default().spark_life;
        assert!(spark.live >= lo && spark.live <= hi);
    }

    #[test]
    fn test_spark_and_flash_update_rules() {
        let mut rng = Rng::new(5);
        let mut pool = ParticlePool::new(8);
        pool.spawn(Particle::new(ParticleKind::Spark, 0.0, 0.0, 3).with_velocity(2.0, 1.0));
        pool.spawn(Particle::new(ParticleKind::Flash, 5.0, 5.0, 3).with_velocity(9.0, 9.0));
        pool.tick(&mut rng);
        pool.tick(&mut rng);

        let spark = pool.slots()[0];
        assert_eq!((spark.x, spark.y, spark.live), (4.0, 2.0, 1));
        let flash = pool.slots()[1];
        assert_eq!((flash.x, flash.y, flash.live), (5.0, 5.0, 1));
        assert_eq!(pool.next_index(), 2);

        pool.tick(&mut rng);
        assert_eq!(pool.live_count(), 0);
        // Dead slots are frozen
        pool.tick(&mut rng);
        assert_eq!(pool.slots()[0].x, 6.0);
    }

    #[test]
    fn test_fan_out_terminates() {
        let mut rng = Rng::new(6);
        let mut pool = ParticlePool::new(DEFAULT_CAPACITY).with_physics(PoolPhysics {
            ground: f32::MAX,
            ..PoolPhysics::default()
        });
        pool.launch(&mut rng, 400.0, 500.0, 3);
        let mut max_gen = 0;
        for _ in 0..500 {
            pool.tick(&mut rng);
            max_gen = pool.live().map(|p| p.gen).max().unwrap_or(0).max(max_gen);
        }
        assert_eq!(max_gen, 2);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_gen_color_regression() {
        assert_eq!(gen_color(0, 100, 1.0), pack(128, 237, 18));
        assert_eq!(gen_color(0, 100, 1.0), gen_color(0, 100, 1.0));
    }

    #[test]
    fn test_gen_color_fades_with_life() {
        assert_eq!(gen_color(17, 0, 1.0), BLACK);
        assert_eq!(gen_color(0, 50, 1.0), pack(64, 118, 9));
        // Overbright saturates instead of wrapping
        assert_eq!(gen_color(0, 100, 4.0), pack(255, 255, 72));
    }
}
