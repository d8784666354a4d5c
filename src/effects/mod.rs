mod bump;
mod fireworks;
mod plasma;
mod snowfall;
mod tunnel;

pub use bump::Bump;
pub use fireworks::Fireworks;
pub use plasma::Plasma;
pub use snowfall::{snow_step, Snowfall};
pub use tunnel::Tunnel;

use crate::display::PixelBuffer;

/// Trait for all demoscene-style effects
pub trait Effect {
    /// Update effect state (called each frame)
    /// - ticks: monotonic milliseconds since start
    /// - width/height: buffer dimensions, for size-dependent tables
    fn update(&mut self, ticks: u64, width: u32, height: u32);

    /// Render effect to the pixel buffer
    fn render(&mut self, buffer: &mut PixelBuffer);

    /// Effect name for UI/debugging
    fn name(&self) -> &'static str;

    /// Called when the effect becomes current
    fn enter(&mut self) {}
}

/// Every effect, in `DemoKind` order
pub fn all(seed: u64) -> Vec<Box<dyn Effect>> {
    vec![
        Box::new(Fireworks::new(seed)),
        Box::new(Tunnel::new()),
        Box::new(Bump::new(seed as u32)),
        Box::new(Snowfall::new(seed)),
        Box::new(Plasma::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_effect_renders_opaque_frames() {
        let mut buffer = PixelBuffer::with_size(64, 48);
        for mut effect in all(7) {
            effect.enter();
            for ticks in [0u64, 40, 400] {
                effect.update(ticks, 64, 48);
                effect.render(&mut buffer);
            }
            assert!(
                buffer.pixels().iter().all(|&p| p >> 24 == 0xFF),
                "{} left transparent pixels",
                effect.name()
            );
        }
    }

    #[test]
    fn test_names_are_unique() {
        let effects = all(1);
        let mut names: Vec<_> = effects.iter().map(|e| e.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), effects.len());
    }
}
