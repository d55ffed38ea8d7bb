//! The canvas scene root.
//!
//! Binds a drawing surface to a child list, normalizes device pixel
//! density, and forwards one `draw()` per frame to the children. There is
//! no drawing logic here beyond the inter-frame clear: children paint
//! themselves through the shared context, and the canvas only decides
//! where they paint and in what order.

use crate::config::{CanvasConfig, SurfaceRef};
use crate::container::{ChildContainer, Drawable, Group};
use crate::error::ConfigError;
use crate::platform::Platform;
use crate::surface::{DrawContext, Surface, SurfaceCapabilities};
use kurbo::{Point, Size};
use log::warn;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The scene root bound to one drawing surface.
///
/// Callers are expected to serialize `draw()` and `change_size()` from a
/// single render loop; the canvas holds no locks.
pub struct Canvas<P: Platform> {
    pixel_ratio: f64,
    el: P::Surface,
    context: Rc<P::Context>,
    /// Logical (CSS-space) dimensions, not premultiplied by pixel ratio.
    width: f64,
    height: f64,
    capabilities: SurfaceCapabilities,
    destroyed: bool,
    children: ChildContainer<P::Context>,
    extras: HashMap<String, Value>,
}

impl<P: Platform> Canvas<P> {
    /// Constant node tag collaborators use to distinguish the scene root
    /// from grouping and shape nodes.
    pub const KIND: &'static str = "canvas";

    /// Resolve the surface and context from `config` and size the buffer.
    ///
    /// Resolution order: a supplied context's owning surface supersedes
    /// `el`; an `el` identifier is looked up on the platform; an `el`
    /// handle is used as-is. Dimensions and pixel ratio fall back to the
    /// surface's displayed size and the device pixel ratio.
    pub fn new(config: CanvasConfig<P>, platform: &P) -> Result<Self, ConfigError> {
        let CanvasConfig {
            el,
            context,
            width,
            height,
            pixel_ratio,
            extras,
        } = config;

        let pixel_ratio = pixel_ratio.unwrap_or_else(|| platform.device_pixel_ratio());

        let mut surface = if let Some(ctx) = context.as_ref() {
            platform.surface_of_context(ctx)
        } else {
            match el {
                Some(SurfaceRef::Id(id)) => platform.surface_by_id(&id),
                Some(SurfaceRef::Handle(handle)) => Some(handle),
                None => None,
            }
        }
        .ok_or(ConfigError::MissingSurface)?;

        // A supplied context whose surface cannot re-yield one natively
        // gets it retrofitted, so later context() queries keep working.
        if let Some(ctx) = context.as_ref()
            && surface.context().is_none()
        {
            surface.install_context(Rc::clone(ctx));
        }

        let intrinsic = surface.intrinsic_size();
        let width = width.unwrap_or(intrinsic.width);
        let height = height.unwrap_or(intrinsic.height);

        let context = match context {
            Some(ctx) => ctx,
            None => surface.context().ok_or(ConfigError::MissingContext)?,
        };

        let mut canvas = Self {
            pixel_ratio,
            el: surface,
            context,
            width: 0.0,
            height: 0.0,
            capabilities: platform.capabilities(),
            destroyed: false,
            children: ChildContainer::new(),
            extras,
        };
        canvas.change_size(width, height);
        Ok(canvas)
    }

    /// Set logical dimensions and propagate them to the surface.
    ///
    /// Writes the CSS-space box on layouted surfaces and the physical
    /// buffer (logical x pixel ratio) on surfaces with a direct buffer.
    /// The ratio scale stacks onto the context's current transform; on DOM
    /// surfaces the buffer write has just reset that transform.
    pub fn change_size(&mut self, width: f64, height: f64) {
        if self.capabilities.supports_css_layout {
            self.el.set_css_size(Size::new(width, height));
        }

        if self.capabilities.direct_pixel_buffer {
            self.el.set_buffer_size(Size::new(
                width * self.pixel_ratio,
                height * self.pixel_ratio,
            ));
            if self.pixel_ratio != 1.0 {
                self.context.scale(self.pixel_ratio, self.pixel_ratio);
            }
        }

        self.width = width;
        self.height = height;
    }

    /// Draw one frame: clear, paint children in order, present.
    ///
    /// A failing child aborts the rest of the frame (including the
    /// present step), logs the detail, and returns normally; the next
    /// frame starts fresh.
    pub fn draw(&mut self) {
        if self.destroyed {
            return;
        }

        if self.capabilities.supports_clear_rect {
            let buffer = self.el.buffer_size();
            self.context
                .clear_rect(0.0, 0.0, buffer.width, buffer.height);
        }

        let ctx = Rc::clone(&self.context);
        if let Err(err) = self.children.draw_all(&ctx) {
            warn!("error in draw canvas, detail as: {err}");
            return;
        }

        if self.capabilities.requires_explicit_flush {
            self.context.flush();
        }
    }

    /// Tear down once: clear children and the extras map. Repeated calls
    /// are no-ops, and a destroyed canvas never draws again.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.children.clear();
        self.extras.clear();
        self.destroyed = true;
    }

    /// Map a client/window coordinate to surface-buffer coordinates,
    /// correcting for any CSS scaling of the on-screen box.
    pub fn point_from_client(&self, client_x: f64, client_y: f64) -> Point {
        let bbox = self.el.bounding_rect();
        let buffer = self.el.buffer_size();
        Point::new(
            (client_x - bbox.x0) * (buffer.width / bbox.width()),
            (client_y - bbox.y0) * (buffer.height / bbox.height()),
        )
    }

    /// Logical width, as configured or inferred.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Logical height, as configured or inferred.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Physical buffer width: logical width x pixel ratio.
    pub fn physical_width(&self) -> f64 {
        self.width * self.pixel_ratio
    }

    /// Physical buffer height: logical height x pixel ratio.
    pub fn physical_height(&self) -> f64 {
        self.height * self.pixel_ratio
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn capabilities(&self) -> SurfaceCapabilities {
        self.capabilities
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The resolved surface handle.
    pub fn surface(&self) -> &P::Surface {
        &self.el
    }

    /// The shared 2d context children draw through.
    pub fn context(&self) -> &Rc<P::Context> {
        &self.context
    }

    // ─── Child container delegation ──────────────────────────────────────

    /// Append a child at the top of the paint order.
    pub fn add(&mut self, child: impl Drawable<P::Context> + 'static) {
        self.children.add(child);
    }

    /// Remove and return the child at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Drawable<P::Context>>> {
        self.children.remove(index)
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    /// Build the grouping-node variant for this surface type.
    pub fn create_group(&self) -> Group<P::Context> {
        Group::new()
    }

    // ─── Extras: open pass-through map ───────────────────────────────────

    /// Read an entry stashed by a collaborator.
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extras.get(name)
    }

    /// Stash an arbitrary entry. No validation; any key may be set.
    pub fn set_extra(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.extras.insert(name.into(), value.into());
    }
}

impl<P: Platform> fmt::Debug for Canvas<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("children", &self.children.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessPlatform, HeadlessSurface, RecordingContext};
    use serde_json::json;

    #[test]
    fn construction_without_surface_fails_loudly() {
        let platform = HeadlessPlatform::new();
        let err = Canvas::new(CanvasConfig::new(), &platform).unwrap_err();
        assert_eq!(err, ConfigError::MissingSurface);
        assert_eq!(err.to_string(), "Please specify the id or el of the chart!");
    }

    #[test]
    fn unknown_id_fails_like_no_surface() {
        let platform = HeadlessPlatform::new();
        let err = Canvas::new(CanvasConfig::new().el_id("nope"), &platform).unwrap_err();
        assert_eq!(err, ConfigError::MissingSurface);
    }

    #[test]
    fn surface_without_context_fails_construction() {
        let platform = HeadlessPlatform::new();
        let surface = HeadlessSurface::without_context(Size::new(40.0, 40.0));
        let err = Canvas::new(CanvasConfig::new().el(surface), &platform).unwrap_err();
        assert_eq!(err, ConfigError::MissingContext);
    }

    #[test]
    fn pixel_ratio_defaults_to_device_ratio() {
        let platform = HeadlessPlatform::new().with_pixel_ratio(3.0);
        let surface = HeadlessSurface::new(Size::new(100.0, 50.0));
        let canvas = Canvas::new(CanvasConfig::new().el(surface), &platform).unwrap();
        assert_eq!(canvas.pixel_ratio(), 3.0);
    }

    #[test]
    fn configured_pixel_ratio_wins_over_device() {
        let platform = HeadlessPlatform::new().with_pixel_ratio(3.0);
        let surface = HeadlessSurface::new(Size::new(100.0, 50.0));
        let canvas =
            Canvas::new(CanvasConfig::new().el(surface).pixel_ratio(2.0), &platform).unwrap();
        assert_eq!(canvas.pixel_ratio(), 2.0);
    }

    #[test]
    fn dimensions_fall_back_to_intrinsic_size() {
        let platform = HeadlessPlatform::new();
        let surface = HeadlessSurface::new(Size::new(320.0, 180.0));
        let canvas = Canvas::new(CanvasConfig::new().el(surface), &platform).unwrap();
        assert_eq!(canvas.width(), 320.0);
        assert_eq!(canvas.height(), 180.0);
    }

    #[test]
    fn supplied_context_supersedes_el() {
        let platform = HeadlessPlatform::new();
        let owner = HeadlessSurface::new(Size::new(64.0, 64.0));
        let ctx = owner.recording().unwrap();
        let decoy = HeadlessSurface::new(Size::new(999.0, 999.0));

        let canvas =
            Canvas::new(CanvasConfig::new().el(decoy).context(ctx), &platform).unwrap();
        assert_eq!(canvas.width(), 64.0);
    }

    #[test]
    fn detached_context_cannot_resolve_a_surface() {
        let platform = HeadlessPlatform::new();
        let ctx = RecordingContext::new();
        let err = Canvas::new(CanvasConfig::new().context(ctx), &platform).unwrap_err();
        assert_eq!(err, ConfigError::MissingSurface);
    }

    #[test]
    fn supplied_context_is_retrofitted_onto_bare_surfaces() {
        let platform = HeadlessPlatform::new();
        let bare = HeadlessSurface::without_context(Size::new(80.0, 60.0));
        let ctx = RecordingContext::new();
        bare.adopt_context(&ctx);

        let canvas = Canvas::new(CanvasConfig::new().context(Rc::clone(&ctx)), &platform).unwrap();
        let installed = canvas.surface().context().unwrap();
        assert!(Rc::ptr_eq(&installed, &ctx));
        assert!(Rc::ptr_eq(&bare.context().unwrap(), &ctx));
    }

    #[test]
    fn extras_pass_through_and_mutate() {
        let platform = HeadlessPlatform::new();
        let surface = HeadlessSurface::new(Size::new(10.0, 10.0));
        let config = CanvasConfig::new().el(surface).extra("theme", "dark");
        let mut canvas = Canvas::new(config, &platform).unwrap();

        assert_eq!(canvas.extra("theme"), Some(&json!("dark")));
        canvas.set_extra("frame_count", 12);
        assert_eq!(canvas.extra("frame_count"), Some(&json!(12)));
        assert_eq!(canvas.extra("missing"), None);
    }

    #[test]
    fn destroy_is_idempotent_and_clears_state() {
        let platform = HeadlessPlatform::new();
        let surface = HeadlessSurface::new(Size::new(10.0, 10.0));
        let mut canvas = Canvas::new(
            CanvasConfig::new().el(surface).extra("theme", "dark"),
            &platform,
        )
        .unwrap();
        canvas.add(crate::container::Group::new());

        canvas.destroy();
        assert!(canvas.is_destroyed());
        assert_eq!(canvas.children_len(), 0);
        assert_eq!(canvas.extra("theme"), None);

        canvas.destroy();
        assert!(canvas.is_destroyed());
    }
}
