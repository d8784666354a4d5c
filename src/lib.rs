//! Software-rendered demoscene effects over a packed `0xAABBGGRR` frame buffer.
//!
//! The library is windowing-agnostic: a host feeds [`compositor::Compositor::frame`]
//! a millisecond tick count and uploads [`display::PixelBuffer::as_bytes`].
//! The `pixelfx` binary (feature `window`) does that with SDL2.

pub mod blend;
pub mod compositor;
pub mod config;
pub mod display;
pub mod effects;
pub mod lut;
pub mod noise;
pub mod particles;
pub mod stopwatch;
pub mod texture;
pub mod util;
