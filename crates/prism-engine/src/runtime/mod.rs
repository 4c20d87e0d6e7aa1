//! Run loops.
//!
//! `run` selects between the winit-backed windowed loop and the plain
//! headless loop over an offscreen target. Both drive the same frame
//! protocol: poll → update → begin → render → flush → end, with inline
//! device-loss recovery (session rebuilt first, then targets).

mod headless;
mod windowed;

use std::path::PathBuf;

use anyhow::Result;

use crate::app::App;
use crate::coords::Viewport;
use crate::paint::Color;

/// Startup configuration; resolved once, immutable for the run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Window title (windowed mode only).
    pub title: String,

    /// Fixed logical drawing space all shape coordinates live in.
    pub viewport: Viewport,

    /// Initial window size (windowed) or the fixed framebuffer size
    /// (headless), in physical pixels.
    pub initial_size: (u32, u32),

    /// Color the frame controller clears to; the letterbox bars show it too.
    pub clear_color: Color,

    /// Render to an offscreen target without creating a window.
    pub headless: bool,

    /// Capture the first rendered frame to this path (headless mode).
    /// Windowed applications request captures via `App::should_take_screenshot`.
    pub screenshot: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            viewport: Viewport::default(),
            initial_size: (800, 600),
            clear_color: Color::BLACK,
            headless: false,
            screenshot: None,
        }
    }
}

/// Runs `app` to completion under `config`.
///
/// Fatal setup failures (no adapter/device, shader or pipeline build errors,
/// window creation) and failed device-loss recovery return an error; routine
/// frame skips and capture failures never do.
pub fn run<A>(config: RunConfig, app: A) -> Result<()>
where
    A: App + 'static,
{
    anyhow::ensure!(
        config.viewport.is_valid(),
        "viewport must have positive finite dimensions, got {}x{}",
        config.viewport.width,
        config.viewport.height
    );

    if config.headless {
        headless::run(config, app)
    } else {
        windowed::run(config, app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MouseState;
    use crate::render::Canvas;

    struct Noop;

    impl App for Noop {
        fn update(&mut self, _dt: f32, _mouse: MouseState) {}
        fn render(&mut self, _canvas: &mut Canvas<'_>) {}
    }

    #[test]
    fn run_rejects_degenerate_viewport() {
        for viewport in [
            Viewport::new(0.0, 300.0),
            Viewport::new(400.0, -1.0),
            Viewport::new(f32::NAN, 300.0),
        ] {
            let config = RunConfig {
                viewport,
                headless: true,
                ..RunConfig::default()
            };
            assert!(run(config, Noop).is_err());
        }
    }
}
