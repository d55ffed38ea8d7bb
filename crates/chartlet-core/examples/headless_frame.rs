//! Render two frames into a recording context and print the op log.
//!
//! Run with `RUST_LOG=warn cargo run --example headless_frame` to see the
//! containment warning from the second frame's failing child.

use chartlet_core::headless::{HeadlessPlatform, HeadlessSurface, RecordingContext};
use chartlet_core::{Canvas, CanvasConfig, DrawError, Drawable, Size};

struct Bar {
    x: f64,
    height: f64,
}

impl Drawable<RecordingContext> for Bar {
    fn draw(&mut self, ctx: &RecordingContext) -> Result<(), DrawError> {
        if !self.height.is_finite() {
            return Err(DrawError::new(format!("bar at x={} has no height", self.x)));
        }
        ctx.fill_rect(self.x, 220.0 - self.height, 24.0, self.height);
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let platform = HeadlessPlatform::new().with_pixel_ratio(2.0);
    platform.register("chart", HeadlessSurface::new(Size::new(400.0, 240.0)));

    let mut canvas = Canvas::new(CanvasConfig::new().el_id("chart"), &platform)
        .expect("surface was registered above");

    for (i, height) in [96.0, 132.0, 75.0].into_iter().enumerate() {
        canvas.add(Bar {
            x: 24.0 + i as f64 * 40.0,
            height,
        });
    }
    canvas.draw();

    let recording = canvas.surface().recording().expect("context attached");
    println!("frame 1 ops:");
    for op in recording.ops() {
        println!("  {op:?}");
    }
    println!(
        "physical size: {} x {}",
        canvas.physical_width(),
        canvas.physical_height()
    );

    // A bad child aborts the second frame after the bars before it.
    recording.clear_ops();
    canvas.add(Bar {
        x: 144.0,
        height: f64::NAN,
    });
    canvas.draw();
    println!("frame 2 recorded {} ops", recording.ops().len());
}
