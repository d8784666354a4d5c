//! Frame Compositor
//!
//! Owns the pixel buffer, the effect list and the profiler. The host calls
//! [`Compositor::frame`] once per presented frame with a monotonic tick count;
//! effects decouple simulation from that variable rate with [`FixedStep`].

use crate::display::PixelBuffer;
use crate::effects::Effect;
use crate::stopwatch::Stopwatch;

/// Simulation quantum in milliseconds
pub const STEP_MS: u64 = 20;
/// Catch-up limit per frame; longer stalls are dropped rather than replayed
pub const MAX_CATCHUP_STEPS: u32 = 25;

/// Fixed-timestep accumulator over a millisecond tick counter
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_ms: u64,
    max_steps: u32,
    last: Option<u64>,
    accum: u64,
}

impl FixedStep {
    pub fn new(step_ms: u64) -> Self {
        debug_assert!(step_ms > 0);
        Self {
            step_ms,
            max_steps: MAX_CATCHUP_STEPS,
            last: None,
            accum: 0,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Number of whole steps to run for this frame. The first call only anchors the clock.
    pub fn advance(&mut self, ticks: u64) -> u32 {
        let last = *self.last.get_or_insert(ticks);
        self.accum += ticks.saturating_sub(last);
        self.last = Some(ticks.max(last));

        let steps = self.accum / self.step_ms;
        self.accum %= self.step_ms;
        if steps > u64::from(self.max_steps) {
            log::debug!("dropping {} simulation steps", steps - u64::from(self.max_steps));
            self.max_steps
        } else {
            steps as u32
        }
    }

    /// Forget the anchor; the next `advance` starts a fresh clock
    pub fn reset(&mut self) {
        self.last = None;
        self.accum = 0;
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(STEP_MS)
    }
}

/// Explicit render context: buffer, effects and profiler, owned by the host loop
pub struct Compositor {
    buffer: PixelBuffer,
    effects: Vec<Box<dyn Effect>>,
    current: usize,
    stopwatch: Stopwatch,
}

impl Compositor {
    pub fn new(width: u32, height: u32, effects: Vec<Box<dyn Effect>>) -> Self {
        assert!(!effects.is_empty(), "compositor needs at least one effect");
        let mut compositor = Self {
            buffer: PixelBuffer::with_size(width, height),
            effects,
            current: 0,
            stopwatch: Stopwatch::new(),
        };
        compositor.effects[0].enter();
        compositor
    }

    /// Update and rasterize the current effect for tick `ticks` (ms)
    pub fn frame(&mut self, ticks: u64) {
        let Self {
            buffer,
            effects,
            current,
            stopwatch,
        } = self;
        let effect = &mut effects[*current];
        let name = effect.name();
        let (width, height) = (buffer.width(), buffer.height());

        stopwatch.time(name, || {
            effect.update(ticks, width, height);
            effect.render(buffer);
        });
    }

    /// Switch to effect `index`; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.effects.len() {
            return false;
        }
        if index != self.current {
            self.current = index;
            self.buffer.clear(crate::blend::BLACK);
            self.effects[index].enter();
            log::info!("switched to {}", self.effects[index].name());
        }
        true
    }

    pub fn next(&mut self) {
        self.select((self.current + 1) % self.effects.len());
    }

    pub fn prev(&mut self) {
        self.select((self.current + self.effects.len() - 1) % self.effects.len());
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &'static str {
        self.effects[self.current].name()
    }

    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    #[inline]
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }
}
