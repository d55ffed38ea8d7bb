//! Headless platform backend.
//!
//! An in-memory surface with a recording context: every context operation
//! is captured instead of rasterized, so tests and native demos can assert
//! on exactly what a frame did. Surface clones alias the same state, the
//! way multiple handles to one DOM element do.

use crate::platform::Platform;
use crate::surface::{DrawContext, Surface, SurfaceCapabilities};
use kurbo::{Point, Rect, Size};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// One recorded context operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedOp {
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Flush,
}

/// A 2d context that records every operation.
#[derive(Debug, Default)]
pub struct RecordingContext {
    ops: RefCell<Vec<RecordedOp>>,
    owner: RefCell<Weak<RefCell<SurfaceState>>>,
}

impl RecordingContext {
    /// A detached context with no owning surface.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Drawing operation available to child nodes.
    pub fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.borrow_mut().push(RecordedOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    /// Snapshot of the operations recorded so far.
    pub fn ops(&self) -> Vec<RecordedOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }
}

impl DrawContext for RecordingContext {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.borrow_mut().push(RecordedOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn scale(&self, sx: f64, sy: f64) {
        self.ops.borrow_mut().push(RecordedOp::Scale { sx, sy });
    }

    fn flush(&self) {
        self.ops.borrow_mut().push(RecordedOp::Flush);
    }
}

#[derive(Debug)]
struct SurfaceState {
    /// Physical pixel-buffer size.
    buffer: Size,
    /// Displayed (CSS-space) size.
    css: Size,
    /// Top-left of the on-screen box in client coordinates.
    origin: Point,
    context: Option<Rc<RecordingContext>>,
}

/// An in-memory drawing surface. Clones alias the same state.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    /// A surface with its own recording context attached.
    pub fn new(size: Size) -> Self {
        let surface = Self::without_context(size);
        let ctx = RecordingContext::new();
        *ctx.owner.borrow_mut() = Rc::downgrade(&surface.state);
        surface.state.borrow_mut().context = Some(ctx);
        surface
    }

    /// A surface with no context of its own, like a raw platform node
    /// that needs a supplied context retrofitted onto it.
    pub fn without_context(size: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                buffer: size,
                css: size,
                origin: Point::ZERO,
                context: None,
            })),
        }
    }

    /// Mark `ctx` as owned by this surface without installing it, so the
    /// platform can recover the surface from the context alone.
    pub fn adopt_context(&self, ctx: &Rc<RecordingContext>) {
        *ctx.owner.borrow_mut() = Rc::downgrade(&self.state);
    }

    /// Move the on-screen box, for client-coordinate mapping.
    pub fn set_client_origin(&self, origin: Point) {
        self.state.borrow_mut().origin = origin;
    }

    /// The attached recording context, if any.
    pub fn recording(&self) -> Option<Rc<RecordingContext>> {
        self.state.borrow().context.clone()
    }
}

impl Surface for HeadlessSurface {
    type Context = RecordingContext;

    fn intrinsic_size(&self) -> Size {
        self.state.borrow().css
    }

    fn buffer_size(&self) -> Size {
        self.state.borrow().buffer
    }

    fn set_buffer_size(&mut self, size: Size) {
        self.state.borrow_mut().buffer = size;
    }

    fn set_css_size(&mut self, size: Size) {
        self.state.borrow_mut().css = size;
    }

    fn bounding_rect(&self) -> Rect {
        let state = self.state.borrow();
        Rect::from_origin_size(state.origin, state.css)
    }

    fn context(&self) -> Option<Rc<RecordingContext>> {
        self.state.borrow().context.clone()
    }

    fn install_context(&mut self, ctx: Rc<RecordingContext>) {
        self.state.borrow_mut().context = Some(ctx);
    }
}

/// A platform backed by an id registry instead of a document.
#[derive(Debug)]
pub struct HeadlessPlatform {
    pixel_ratio: f64,
    capabilities: SurfaceCapabilities,
    registry: RefCell<HashMap<String, HeadlessSurface>>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            pixel_ratio: 1.0,
            capabilities: SurfaceCapabilities::headless(),
            registry: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Override the capability table, e.g. to mimic a mini-program host.
    pub fn with_capabilities(mut self, capabilities: SurfaceCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Register a surface under an element identifier.
    pub fn register(&self, id: impl Into<String>, surface: HeadlessSurface) {
        self.registry.borrow_mut().insert(id.into(), surface);
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    type Context = RecordingContext;
    type Surface = HeadlessSurface;

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn surface_by_id(&self, id: &str) -> Option<HeadlessSurface> {
        self.registry.borrow().get(id).cloned()
    }

    fn surface_of_context(&self, ctx: &Rc<RecordingContext>) -> Option<HeadlessSurface> {
        ctx.owner
            .borrow()
            .upgrade()
            .map(|state| HeadlessSurface { state })
    }

    fn capabilities(&self) -> SurfaceCapabilities {
        self.capabilities
    }
}
