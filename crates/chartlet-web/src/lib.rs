//! DOM canvas platform backend.
//!
//! Implements the chartlet platform seams over `web-sys`: element lookup
//! through the document, pixel density from `devicePixelRatio`, CSS-space
//! sizing through the style declaration, and a `CanvasRenderingContext2d`
//! as the shared drawing context. The crate compiles on every target; the
//! DOM calls themselves only function on `wasm32`.

use chartlet_core::{DrawContext, Platform, Rect, Size, Surface, SurfaceCapabilities};
use log::warn;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A canvas bound to the browser platform.
pub type WebCanvas = chartlet_core::Canvas<DomPlatform>;

/// The browser 2d context.
#[derive(Debug, Clone)]
pub struct Context2d {
    ctx: CanvasRenderingContext2d,
}

impl Context2d {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// The underlying `web-sys` handle, for children that draw with the
    /// full Canvas 2D API.
    pub fn raw(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl DrawContext for Context2d {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn scale(&self, sx: f64, sy: f64) {
        let _ = self.ctx.scale(sx, sy);
    }

    // Browser surfaces present implicitly; the default no-op flush stands.
}

/// A DOM `<canvas>` element surface.
#[derive(Debug, Clone)]
pub struct DomSurface {
    el: HtmlCanvasElement,
    installed: Option<Rc<Context2d>>,
}

impl DomSurface {
    pub fn new(el: HtmlCanvasElement) -> Self {
        Self {
            el,
            installed: None,
        }
    }

    /// The underlying element handle.
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.el
    }
}

impl Surface for DomSurface {
    type Context = Context2d;

    fn intrinsic_size(&self) -> Size {
        Size::new(
            f64::from(self.el.client_width()),
            f64::from(self.el.client_height()),
        )
    }

    fn buffer_size(&self) -> Size {
        Size::new(f64::from(self.el.width()), f64::from(self.el.height()))
    }

    fn set_buffer_size(&mut self, size: Size) {
        self.el.set_width(size.width as u32);
        self.el.set_height(size.height as u32);
    }

    fn set_css_size(&mut self, size: Size) {
        let style = self.el.style();
        let wrote = style
            .set_property("width", &format!("{}px", size.width))
            .and_then(|()| style.set_property("height", &format!("{}px", size.height)));
        if wrote.is_err() {
            warn!("failed to write css size on canvas element");
        }
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.el.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn context(&self) -> Option<Rc<Context2d>> {
        if let Some(installed) = &self.installed {
            return Some(Rc::clone(installed));
        }
        let ctx = self.el.get_context("2d").ok().flatten()?;
        let ctx = ctx.dyn_into::<CanvasRenderingContext2d>().ok()?;
        Some(Rc::new(Context2d::new(ctx)))
    }

    fn install_context(&mut self, ctx: Rc<Context2d>) {
        self.installed = Some(ctx);
    }
}

/// The browser platform: document lookup plus `devicePixelRatio`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomPlatform;

impl DomPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for DomPlatform {
    type Context = Context2d;
    type Surface = DomSurface;

    fn device_pixel_ratio(&self) -> f64 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
    }

    fn surface_by_id(&self, id: &str) -> Option<DomSurface> {
        let document = web_sys::window()?.document()?;
        let el = document.get_element_by_id(id)?;
        let el = el.dyn_into::<HtmlCanvasElement>().ok()?;
        Some(DomSurface::new(el))
    }

    fn surface_of_context(&self, ctx: &Rc<Context2d>) -> Option<DomSurface> {
        ctx.raw().canvas().map(DomSurface::new)
    }

    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities::browser()
    }
}

/// Route panics to the browser console instead of a silent wasm trap.
pub fn set_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("chartlet panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
