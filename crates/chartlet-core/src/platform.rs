//! Platform discovery seam.
//!
//! Everything the canvas needs from its runtime environment goes through
//! this trait: pixel-density discovery, element lookup, recovering the
//! surface that owns a pre-existing context, and the capability table for
//! the platform's surface class. Backends implement it once; the canvas
//! never touches globals.

use crate::surface::{DrawContext, Surface, SurfaceCapabilities};
use std::rc::Rc;

/// A runtime environment that can produce drawing surfaces.
pub trait Platform {
    type Context: DrawContext;
    type Surface: Surface<Context = Self::Context>;

    /// Device pixel ratio reported by the runtime.
    fn device_pixel_ratio(&self) -> f64;

    /// Look up a surface by element identifier.
    fn surface_by_id(&self, id: &str) -> Option<Self::Surface>;

    /// The surface owning a pre-existing context, if it can be recovered.
    fn surface_of_context(&self, ctx: &Rc<Self::Context>) -> Option<Self::Surface>;

    /// Behavior classification for this platform's surfaces.
    fn capabilities(&self) -> SurfaceCapabilities;
}
