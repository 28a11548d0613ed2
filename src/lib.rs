//! Software-rendered wireframe and shaded solids with a z-buffer, plus an
//! interactive convex hull view.

pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod geometry;
pub mod hull;
#[cfg(feature = "mqtt")]
pub mod mqtt;
pub mod raster;
pub mod renderer;
pub mod solid;
pub mod util;

pub use config::Config;
pub use display::FrameBuffer;
pub use error::{Error, Result};
pub use geometry::{Point2D, Point3D, Segment3D};
pub use hull::{convex_hull, HullSet};
pub use renderer::Renderer;
pub use solid::SolidParams;
