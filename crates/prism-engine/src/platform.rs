//! Platform capability consumed by the frame loop.
//!
//! The windowing/input backend is an external collaborator; the engine only
//! polls it through this trait. The winit runtime provides the real
//! implementation, headless runs a fixed-size one, and tests script their own.

use crate::input::Key;

/// Mouse button snapshot.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

/// Mouse snapshot in logical viewport coordinates (already mapped through the
/// letterbox inverse transform).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub buttons: MouseButtons,
}

/// Host services the frame loop needs from a windowing backend.
pub trait Platform {
    /// Drains pending host events. May be a no-op for push-based backends.
    fn poll_events(&mut self);

    /// True once the host asked the run to end.
    fn should_quit(&self) -> bool;

    /// Mouse snapshot in logical coordinates.
    fn mouse_state(&self) -> MouseState;

    fn is_key_pressed(&self, key: Key) -> bool;

    /// Window size in physical pixels.
    fn window_size(&self) -> (u32, u32);

    /// Framebuffer size in physical pixels. Equal to `window_size` on most
    /// backends; kept separate for platforms where they diverge.
    fn framebuffer_size(&self) -> (u32, u32);
}
