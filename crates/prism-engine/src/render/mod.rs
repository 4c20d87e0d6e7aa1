//! Batched 2D rendering.
//!
//! All drawing funnels into a single `TriangleBatch` which accumulates
//! position+color vertices across a frame and issues exactly one GPU draw call
//! at flush. `Canvas` is the shape API applications draw with; every shape
//! lowers to triangles.
//!
//! Convention:
//! - CPU geometry is in logical drawing units (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.
//! - Letterbox placement is applied through the render-pass viewport rect.

mod batch;
mod canvas;
mod vertex;

pub use batch::TriangleBatch;
pub use canvas::Canvas;
pub use vertex::{Vertex, ViewportUniform};
