//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types; the
//! runtime translates platform events into calls on `InputState`. The model
//! is polled "is down" state — the engine's `Platform` capability exposes no
//! event stream.

mod state;
mod types;

pub use state::InputState;
pub use types::{Key, MouseButton};
