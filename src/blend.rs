//! Color Blending
//!
//! Channel-wise operators over packed `0xAABBGGRR` colors (red in the low byte).
//! Every result is opaque: alpha is forced to 0xFF.

/// Opaque alpha bits
pub const OPAQUE: u32 = 0xFF00_0000;
pub const BLACK: u32 = OPAQUE;
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Pack RGB into an opaque `0xAABBGGRR` pixel
#[inline]
pub const fn pack(r: u8, g: u8, b: u8) -> u32 {
    OPAQUE | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

/// Unpack a pixel into (r, g, b), ignoring alpha
#[inline]
pub fn unpack(c: u32) -> (u8, u8, u8) {
    (c as u8, (c >> 8) as u8, (c >> 16) as u8)
}

/// Grayscale color (same value for R, G, B)
#[inline]
pub const fn gray(v: u8) -> u32 {
    OPAQUE | (v as u32) * 0x01_0101
}

#[inline]
fn combine(source: u32, target: u32, op: impl Fn(u32, u32) -> u32) -> u32 {
    let mut out = OPAQUE;
    for shift in [0, 8, 16] {
        let s = (source >> shift) & 0xFF;
        let t = (target >> shift) & 0xFF;
        out |= (op(s, t) & 0xFF) << shift;
    }
    out
}

/// Per-channel mean, rounded down
#[inline]
pub fn average(source: u32, target: u32) -> u32 {
    combine(source, target, |s, t| (s + t) / 2)
}

/// Fixed-point multiply: `(s * t) >> 8`.
///
/// This is deliberately a shift and not a divide by 255, so `multiply(white, white)`
/// yields 0xFE per channel. Repeated application darkens slightly.
#[inline]
pub fn multiply(source: u32, target: u32) -> u32 {
    combine(source, target, |s, t| (s * t) >> 8)
}

/// Per-channel sum clamped at 255
#[inline]
pub fn additive_saturate(source: u32, target: u32) -> u32 {
    combine(source, target, |s, t| (s + t).min(255))
}

/// Compositing operator used by the rasterization primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Overwrite the target with the (opaque) source
    #[default]
    Replace,
    Average,
    Multiply,
    /// Saturating add, for sparks and glow
    Additive,
}

impl BlendMode {
    #[inline]
    pub fn apply(self, source: u32, target: u32) -> u32 {
        match self {
            BlendMode::Replace => source | OPAQUE,
            BlendMode::Average => average(source, target),
            BlendMode::Multiply => multiply(source, target),
            BlendMode::Additive => additive_saturate(source, target),
        }
    }
}
