//! Prism engine crate.
//!
//! A small cross-platform 2D rendering platform: applications describe a frame
//! through a shape API, and the engine owns GPU device setup, frame lifecycle,
//! presentation, and recovery from resize / minimization / device loss.

pub mod device;
pub mod target;
pub mod frame;
pub mod render;
pub mod runtime;

pub mod app;
pub mod platform;
pub mod input;
pub mod time;

pub mod logging;
pub mod coords;
pub mod paint;
mod capture;
