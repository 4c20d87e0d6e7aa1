use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::App;
use crate::coords::{Vec2, Viewport, compute_letterbox, to_logical};
use crate::device::{Session, SessionConfig};
use crate::frame::{FrameController, FrameOutcome};
use crate::input::{InputState, Key, MouseButton};
use crate::platform::{MouseButtons, MouseState, Platform};
use crate::render::{Canvas, TriangleBatch};
use crate::target::{OffscreenTarget, PresentedTarget, RenderTarget};
use crate::time::FrameClock;

use super::RunConfig;

/// Entry point for the windowed loop.
pub(super) fn run<A>(config: RunConfig, app: A) -> Result<()>
where
    A: App + 'static,
{
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut state = RunState::new(config, app);

    event_loop
        .run_app(&mut state)
        .context("winit event loop terminated with error")?;

    match state.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Platform capability over the winit window. Events are pushed by winit, so
/// `poll_events` has nothing left to drain.
struct WindowPlatform {
    viewport: Viewport,
    input: InputState,
    size: (u32, u32),
    quit: bool,
}

impl WindowPlatform {
    fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            input: InputState::default(),
            size: (0, 0),
            quit: false,
        }
    }
}

impl Platform for WindowPlatform {
    fn poll_events(&mut self) {}

    fn should_quit(&self) -> bool {
        self.quit
    }

    fn mouse_state(&self) -> MouseState {
        let (px, py) = self.input.pointer_pos.unwrap_or((0.0, 0.0));
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);

        let active = compute_letterbox(w, h, self.viewport);
        let p = to_logical(Vec2::new(px, py), active, (w, h), self.viewport);

        MouseState {
            x: p.x,
            y: p.y,
            buttons: MouseButtons {
                left: self.input.is_button_down(MouseButton::Left),
                right: self.input.is_button_down(MouseButton::Right),
                middle: self.input.is_button_down(MouseButton::Middle),
            },
        }
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.input.is_key_down(key)
    }

    fn window_size(&self) -> (u32, u32) {
        self.size
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }
}

/// GPU objects bound to the live window.
///
/// Field order matters for recovery teardown: the target's surface references
/// the session's instance and must drop first.
struct Gfx {
    target: PresentedTarget,
    session: Session,
    window: Arc<Window>,
}

enum After {
    Continue,
    Recover,
    Fatal,
}

struct RunState<A>
where
    A: App,
{
    config: RunConfig,
    session_config: SessionConfig,
    controller: FrameController,
    app: A,
    platform: WindowPlatform,
    batch: TriangleBatch,
    clock: FrameClock,
    gfx: Option<Gfx>,
    failure: Option<anyhow::Error>,
}

impl<A> RunState<A>
where
    A: App,
{
    fn new(config: RunConfig, app: A) -> Self {
        let controller = FrameController::new(config.viewport, config.clear_color);
        let platform = WindowPlatform::new(config.viewport);

        Self {
            config,
            session_config: SessionConfig::default(),
            controller,
            app,
            platform,
            batch: TriangleBatch::new(),
            clock: FrameClock::new(),
            gfx: None,
            failure: None,
        }
    }

    fn init_gfx(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.config.initial_size;
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(w, h));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let session = Session::open(self.session_config.clone())?;
        let target = PresentedTarget::new(&session, Arc::clone(&window))?;

        let size = window.inner_size();
        self.platform.size = (size.width, size.height);

        window.request_redraw();
        self.gfx = Some(Gfx {
            target,
            session,
            window,
        });
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    /// Drives one frame. Runs update even when the frame itself is skipped.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let ft = self.clock.tick();

        self.platform.poll_events();
        self.app.update(ft.dt, self.platform.mouse_state());

        if !self.app.is_running() || self.platform.should_quit() {
            event_loop.exit();
            return;
        }

        let physical = self.platform.framebuffer_size();

        let after = {
            let Some(gfx) = self.gfx.as_mut() else { return };

            match self
                .controller
                .begin_frame(&gfx.session, &mut gfx.target, physical)
            {
                FrameOutcome::Begun(mut frame) => {
                    self.app.render(&mut Canvas::new(&mut self.batch));
                    self.controller
                        .flush(&mut gfx.session, &mut self.batch, &mut frame);
                    self.controller
                        .end_frame(&gfx.session, &mut gfx.target, frame);

                    if let Some(path) = self.app.should_take_screenshot() {
                        capture_to_png(
                            &mut gfx.session,
                            &self.controller,
                            &mut self.app,
                            &mut self.batch,
                            physical,
                            &path,
                        );
                        self.app.on_screenshot_complete();
                    }

                    After::Continue
                }
                FrameOutcome::Skipped => After::Continue,
                FrameOutcome::DeviceLost => After::Recover,
                FrameOutcome::Fatal => After::Fatal,
            }
        };

        match after {
            After::Continue => {}
            After::Recover => {
                if let Err(err) = self.recover() {
                    self.fail(event_loop, err);
                }
            }
            After::Fatal => {
                self.fail(event_loop, anyhow!("unrecoverable render-target failure"));
            }
        }
    }

    /// Full device-loss recovery: tear down targets and session, reopen the
    /// session, rebuild targets against it. Rebuild failure is fatal.
    fn recover(&mut self) -> Result<()> {
        log::warn!("GPU device lost; rebuilding session and surface");

        self.batch.clear();
        self.batch.reset_gpu_resources();

        let Some(gfx) = self.gfx.take() else { return Ok(()) };
        let Gfx {
            target,
            session,
            window,
        } = gfx;
        drop(target);
        drop(session);

        let session = Session::open(self.session_config.clone())
            .context("device-loss recovery: reopening the session failed")?;
        let target = PresentedTarget::new(&session, Arc::clone(&window))
            .context("device-loss recovery: rebuilding the surface failed")?;

        self.clock.reset();
        self.gfx = Some(Gfx {
            target,
            session,
            window,
        });
        Ok(())
    }
}

impl<A> ApplicationHandler for RunState<A>
where
    A: App,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        if let Err(err) = self.init_gfx(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the app decides when to stop.
        if let Some(gfx) = self.gfx.as_ref() {
            gfx.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.platform.quit = true;
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => self.platform.input.on_focus(focused),

            WindowEvent::CursorMoved { position, .. } => {
                // Kept in physical pixels; the letterbox inverse mapping
                // translates to logical coordinates at query time.
                self.platform
                    .input
                    .on_pointer_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::CursorLeft { .. } => self.platform.input.on_pointer_left(),

            WindowEvent::MouseInput { state, button, .. } => {
                self.platform.input.on_mouse_button(
                    map_mouse_button(button),
                    state == ElementState::Pressed,
                );
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.platform
                    .input
                    .on_key(map_key(event.physical_key), event.state == ElementState::Pressed);
            }

            WindowEvent::Resized(new_size) => {
                self.platform.size = (new_size.width, new_size.height);
                if let Some(gfx) = self.gfx.as_mut() {
                    // Zero-size resizes are ignored inside the target.
                    let _ = gfx
                        .target
                        .resize(&gfx.session, new_size.width, new_size.height);
                    gfx.window.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(gfx) = self.gfx.as_mut() {
                    let size = gfx.window.inner_size();
                    self.platform.size = (size.width, size.height);
                    let _ = gfx.target.resize(&gfx.session, size.width, size.height);
                    gfx.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }
}

/// Renders one extra application frame into a freshly allocated offscreen
/// target and writes it out. Failures are logged, never fatal to the loop.
fn capture_to_png<A>(
    session: &mut Session,
    controller: &FrameController,
    app: &mut A,
    batch: &mut TriangleBatch,
    size: (u32, u32),
    path: &Path,
) where
    A: App,
{
    let result = (|| -> Result<()> {
        let mut target = OffscreenTarget::new(session, size.0, size.1)?;

        match controller.begin_frame(session, &mut target, size) {
            FrameOutcome::Begun(mut frame) => {
                app.render(&mut Canvas::new(batch));
                controller.flush(session, batch, &mut frame);
                controller.end_frame(session, &mut target, frame);

                let pixels = target.read_pixels(session)?;
                crate::capture::write_png(path, size.0, size.1, pixels)
            }
            _ => anyhow::bail!("offscreen capture frame could not begin"),
        }
    })();

    if let Err(err) = result {
        log::error!("screenshot capture failed: {err:#}");
    }
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(key: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = key else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}
