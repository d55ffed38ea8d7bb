//! Chartlet core: binds a 2d drawing surface to a scene root.
//!
//! The `Canvas` resolves a concrete surface and context from loosely
//! specified configuration, normalizes device pixel density, maps client
//! coordinates into buffer space, and forwards one `draw()` per frame to
//! its children with failure containment. Platform specifics (DOM,
//! mini-program hosts, headless buffers) live behind the `Platform`,
//! `Surface`, and `DrawContext` seams.

pub mod canvas;
pub mod config;
pub mod container;
pub mod error;
pub mod headless;
pub mod platform;
pub mod surface;

pub use canvas::Canvas;
pub use config::{CanvasConfig, SurfaceRef};
pub use container::{ChildContainer, Drawable, Group};
pub use error::{ConfigError, DrawError};
pub use platform::Platform;
pub use surface::{DrawContext, Surface, SurfaceCapabilities};

// Re-export the kurbo geometry types used across the public API so
// downstream crates don't need a direct dependency.
pub use kurbo::{Point, Rect, Size};
