//! Paint model shared between the shape API and the batch renderer.
//!
//! Scope:
//! - color representation (straight-alpha normalized RGBA)
//!
//! Geometry types remain in `coords`.

mod color;

pub use color::Color;
