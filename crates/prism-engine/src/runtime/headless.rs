use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::device::{Session, SessionConfig};
use crate::frame::{FrameController, FrameOutcome};
use crate::input::Key;
use crate::platform::{MouseState, Platform};
use crate::render::{Canvas, TriangleBatch};
use crate::target::{OffscreenTarget, RenderTarget};
use crate::time::FrameClock;

use super::RunConfig;

/// Platform stand-in for runs without a window: fixed framebuffer, no input.
struct HeadlessPlatform {
    size: (u32, u32),
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) {}

    fn should_quit(&self) -> bool {
        false
    }

    fn mouse_state(&self) -> MouseState {
        MouseState::default()
    }

    fn is_key_pressed(&self, _key: Key) -> bool {
        false
    }

    fn window_size(&self) -> (u32, u32) {
        self.size
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }
}

/// Plain loop over an offscreen target; exits when the app stops running.
pub(super) fn run<A>(config: RunConfig, mut app: A) -> Result<()>
where
    A: App,
{
    let session_config = SessionConfig::default();
    let mut session = Session::open(session_config.clone())?;

    let (width, height) = config.initial_size;
    let mut target = OffscreenTarget::new(&session, width, height)?;

    let controller = FrameController::new(config.viewport, config.clear_color);
    let mut batch = TriangleBatch::new();
    let mut clock = FrameClock::new();
    let mut platform = HeadlessPlatform {
        size: (width, height),
    };

    // Startup capture fires once, on the first completed frame.
    let mut startup_capture = config.screenshot.clone();

    while app.is_running() && !platform.should_quit() {
        platform.poll_events();
        let ft = clock.tick();
        app.update(ft.dt, platform.mouse_state());

        match controller.begin_frame(&session, &mut target, platform.framebuffer_size()) {
            FrameOutcome::Begun(mut frame) => {
                app.render(&mut Canvas::new(&mut batch));
                controller.flush(&mut session, &mut batch, &mut frame);
                controller.end_frame(&session, &mut target, frame);

                let request = app.should_take_screenshot().or_else(|| startup_capture.take());
                if let Some(path) = request {
                    capture_frame(&session, &target, &path);
                    app.on_screenshot_complete();
                }
            }
            FrameOutcome::Skipped => {}
            FrameOutcome::DeviceLost => {
                log::warn!("GPU device lost; rebuilding session and offscreen target");
                batch.clear();
                batch.reset_gpu_resources();
                session = Session::open(session_config.clone())
                    .context("device-loss recovery: reopening the session failed")?;
                target = OffscreenTarget::new(&session, width, height)
                    .context("device-loss recovery: rebuilding the offscreen target failed")?;
                clock.reset();
            }
            FrameOutcome::Fatal => anyhow::bail!("unrecoverable render-target failure"),
        }
    }

    Ok(())
}

/// Reads back the just-submitted frame and writes it out. Failures are
/// logged, never fatal to the loop.
fn capture_frame(session: &Session, target: &OffscreenTarget, path: &Path) {
    match target.read_pixels(session) {
        Ok(pixels) => {
            let (w, h) = target.dimensions();
            if let Err(err) = crate::capture::write_png(path, w, h, pixels) {
                log::error!("screenshot capture failed: {err:#}");
            }
        }
        Err(err) => log::error!("screenshot readback failed: {err:#}"),
    }
}
