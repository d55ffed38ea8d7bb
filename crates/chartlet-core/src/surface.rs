//! Surface and context seams.
//!
//! A `Surface` is the concrete thing pixels land on (a DOM `<canvas>`
//! element, an in-memory buffer); a `DrawContext` is the shared 2d handle
//! children draw through. Behavioral differences between surface classes
//! are captured once in `SurfaceCapabilities` instead of being probed
//! inside every method.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Behavior classification for a surface class.
///
/// Injected at canvas construction and consulted by `change_size` and
/// `draw`; no other platform probing happens after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceCapabilities {
    /// The context can clear an arbitrary rectangle between frames.
    pub supports_clear_rect: bool,
    /// The surface lives in a CSS layout and takes style-space size writes.
    pub supports_css_layout: bool,
    /// Frames only become visible after an explicit flush on the context.
    pub requires_explicit_flush: bool,
    /// The pixel buffer can be resized directly from here. Constrained
    /// embedded surfaces size their buffer out-of-band.
    pub direct_pixel_buffer: bool,
}

impl SurfaceCapabilities {
    /// A DOM `<canvas>` in a browser page.
    pub const fn browser() -> Self {
        Self {
            supports_clear_rect: true,
            supports_css_layout: true,
            requires_explicit_flush: false,
            direct_pixel_buffer: true,
        }
    }

    /// A mini-program canvas node: no CSS layout, no direct buffer
    /// access, and frames must be flushed explicitly.
    pub const fn mini_program() -> Self {
        Self {
            supports_clear_rect: false,
            supports_css_layout: false,
            requires_explicit_flush: true,
            direct_pixel_buffer: false,
        }
    }

    /// An in-memory surface with no layout around it.
    pub const fn headless() -> Self {
        Self {
            supports_clear_rect: true,
            supports_css_layout: false,
            requires_explicit_flush: false,
            direct_pixel_buffer: true,
        }
    }
}

/// The shared 2d drawing context handed to every child each frame.
///
/// Implementations are aliased handles (a JS context, a recording buffer),
/// so all operations take `&self`.
pub trait DrawContext {
    /// Clear an axis-aligned rectangle, in physical pixels.
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);

    /// Stack a uniform scale onto the current transform.
    fn scale(&self, sx: f64, sy: f64);

    /// Present the frame. Only surface classes with
    /// `requires_explicit_flush` ever call this; the default is a no-op.
    fn flush(&self) {}
}

/// A concrete drawing surface.
pub trait Surface {
    type Context: DrawContext;

    /// Displayed (CSS-space) size. Used when the configuration omits
    /// explicit dimensions.
    fn intrinsic_size(&self) -> Size;

    /// Physical pixel-buffer size.
    fn buffer_size(&self) -> Size;

    fn set_buffer_size(&mut self, size: Size);

    /// Write the on-screen (CSS-space) box size.
    fn set_css_size(&mut self, size: Size);

    /// On-screen bounding box in client/window coordinates.
    fn bounding_rect(&self) -> Rect;

    /// The surface's own 2d context, if it can produce one.
    fn context(&self) -> Option<Rc<Self::Context>>;

    /// Retrofit a context onto a surface that cannot produce one natively.
    /// Subsequent `context()` calls return the installed handle.
    fn install_context(&mut self, ctx: Rc<Self::Context>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_presets_disagree_where_platforms_do() {
        let browser = SurfaceCapabilities::browser();
        let mini = SurfaceCapabilities::mini_program();

        assert!(browser.supports_clear_rect && !mini.supports_clear_rect);
        assert!(browser.direct_pixel_buffer && !mini.direct_pixel_buffer);
        assert!(!browser.requires_explicit_flush && mini.requires_explicit_flush);
    }

    #[test]
    fn capabilities_roundtrip_as_json() {
        let caps = SurfaceCapabilities::mini_program();
        let json = serde_json::to_string(&caps).unwrap();
        let back: SurfaceCapabilities = serde_json::from_str(&json).unwrap();
        assert_eq!(caps, back);
    }
}
