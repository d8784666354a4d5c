mod pixel_buffer;
mod stencil;
#[cfg(feature = "window")]
mod window;

pub use pixel_buffer::PixelBuffer;
pub use stencil::{Stencil, SNOWFLAKE};
#[cfg(feature = "window")]
pub use window::{Display, InputEvent, RenderTarget};

/// Half of 1920x1080
pub const DEFAULT_WIDTH: u32 = 960;
pub const DEFAULT_HEIGHT: u32 = 540;
