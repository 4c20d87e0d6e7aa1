//! GPU device session.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - compiling the fixed triangle shader and building its pipeline
//! - device-loss detection (polled, not pushed)
//!
//! Presentation surfaces and offscreen textures live in `target`; a `Session`
//! deliberately knows nothing about windows so that device-loss recovery can
//! rebuild it before any target exists.

mod session;

pub use session::{Session, SessionConfig};
