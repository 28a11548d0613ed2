mod frame_buffer;
#[cfg(feature = "viewer")]
mod window;

pub use frame_buffer::{shade, FrameBuffer, Rgb};
#[cfg(feature = "viewer")]
pub use window::{Display, InputEvent, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 600;
