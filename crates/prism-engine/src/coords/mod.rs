//! Coordinate and geometry types shared across the engine.
//!
//! Canonical CPU space:
//! - Logical drawing units (resolution independent)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The batch renderer converts logical units to NDC in the vertex shader using
//! a viewport uniform; the letterbox mapper decides which physical pixels the
//! logical space occupies.

mod letterbox;
mod rect;
mod vec2;
mod viewport;

pub use letterbox::{compute_letterbox, to_logical};
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
