//! Typed canvas configuration.
//!
//! The known construction options are plain struct fields; anything else a
//! collaborator wants to stash rides along in the open `extras` map and
//! lands in the canvas unchanged.

use crate::platform::Platform;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Reference to the drawing surface: an element identifier to look up, or
/// an already-resolved handle.
pub enum SurfaceRef<P: Platform> {
    Id(String),
    Handle(P::Surface),
}

/// Construction options for `Canvas`.
///
/// Unset fields fall back to platform-resolved values: pixel ratio from
/// the device, dimensions from the surface's displayed size. A supplied
/// `context` supersedes `el`; its owning surface is used instead.
pub struct CanvasConfig<P: Platform> {
    pub el: Option<SurfaceRef<P>>,
    pub context: Option<Rc<P::Context>>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub pixel_ratio: Option<f64>,
    /// Arbitrary pass-through entries for collaborators.
    pub extras: HashMap<String, Value>,
}

impl<P: Platform> Default for CanvasConfig<P> {
    fn default() -> Self {
        Self {
            el: None,
            context: None,
            width: None,
            height: None,
            pixel_ratio: None,
            extras: HashMap::new(),
        }
    }
}

impl<P: Platform> CanvasConfig<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference the surface by element identifier.
    pub fn el_id(mut self, id: impl Into<String>) -> Self {
        self.el = Some(SurfaceRef::Id(id.into()));
        self
    }

    /// Use an already-resolved surface handle.
    pub fn el(mut self, surface: P::Surface) -> Self {
        self.el = Some(SurfaceRef::Handle(surface));
        self
    }

    /// Use a pre-existing drawing context. Its owning surface supersedes
    /// any `el` reference.
    pub fn context(mut self, ctx: Rc<P::Context>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Logical (CSS-space) dimensions, not premultiplied by pixel ratio.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = Some(ratio);
        self
    }

    /// Stash an arbitrary pass-through entry.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}
