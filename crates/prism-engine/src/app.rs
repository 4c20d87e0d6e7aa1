//! Application contract.
//!
//! This is the stable boundary between the runtime and user code: the runtime
//! owns windows, devices, and frame lifecycle; the application owns what gets
//! drawn.

use std::path::PathBuf;

use crate::platform::MouseState;
use crate::render::Canvas;

/// Implemented by applications driven by `runtime::run`.
pub trait App {
    /// Called once per loop iteration, before the frame is rendered.
    ///
    /// `mouse` is already mapped into logical viewport coordinates. Runs even
    /// on frames that end up skipped (e.g. while minimized).
    fn update(&mut self, dt: f32, mouse: MouseState);

    /// Called once per rendered frame. All drawing goes through `canvas` and
    /// is batched into a single GPU draw call.
    fn render(&mut self, canvas: &mut Canvas<'_>);

    /// The loop exits when this turns false.
    fn is_running(&self) -> bool {
        true
    }

    /// Return a path to capture the current frame to a PNG. Polled after each
    /// presented frame; capture failures are logged and do not stop the loop.
    fn should_take_screenshot(&mut self) -> Option<PathBuf> {
        None
    }

    /// Called after a requested screenshot was written (or failed and was
    /// logged), so the application can clear its request.
    fn on_screenshot_complete(&mut self) {}
}
