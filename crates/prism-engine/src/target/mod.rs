//! Render-target abstraction.
//!
//! Two backends share one capability contract: a presented surface tied to a
//! window, and an offscreen texture with a CPU-readable staging buffer for
//! capture and testing. The frame controller drives either through the
//! `RenderTarget` trait and never sees backend error codes.

mod offscreen;
mod presented;

pub use offscreen::OffscreenTarget;
pub use presented::PresentedTarget;

use crate::device::Session;

/// Routine per-frame target failures, pre-translated from backend errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TargetError {
    /// No presentable view this frame (stale surface, minimized window).
    /// Skip the frame; rendering resumes on a later iteration.
    ViewUnavailable,
    /// The target could not adopt the requested size. Skip and retry.
    ResizeFailed,
    /// Unrecoverable target failure (commonly OOM); terminate gracefully.
    Fatal,
}

/// Shared `needs_resize` predicate: a zero queried size in either dimension
/// never demands a resize (such a query means "skip this frame").
pub(crate) fn size_changed(current: (u32, u32), width: u32, height: u32) -> bool {
    width > 0 && height > 0 && (width, height) != current
}

/// Capability contract shared by presented and offscreen targets.
pub trait RenderTarget {
    /// Acquires the view to render into this frame.
    ///
    /// Targets release any view still held from a previous frame before
    /// acquiring the next one.
    fn acquire_view(&mut self, session: &Session) -> Result<wgpu::TextureView, TargetError>;

    /// Current pixel dimensions.
    fn dimensions(&self) -> (u32, u32);

    /// Texture format rendering into this target must use.
    fn format(&self) -> wgpu::TextureFormat;

    /// Whether the target should adopt the queried physical size.
    ///
    /// Always false for a zero size in either dimension: a zero query means
    /// "skip this frame", never "resize to zero".
    fn needs_resize(&self, width: u32, height: u32) -> bool;

    /// Recreates backing resources at the new size. Zero in either dimension
    /// is an accepted no-op (guards against spurious minimize events).
    fn resize(&mut self, session: &Session, width: u32, height: u32) -> Result<(), TargetError>;

    /// Hook recorded after the main pass, before submission. The offscreen
    /// variant queues its capture copy here.
    fn before_submit(&mut self, _encoder: &mut wgpu::CommandEncoder) {}

    /// Hands the frame to the display. No-op for offscreen targets.
    fn present(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_never_demands_resize() {
        assert!(!size_changed((800, 600), 0, 600));
        assert!(!size_changed((800, 600), 800, 0));
        assert!(!size_changed((800, 600), 0, 0));
    }

    #[test]
    fn resize_demanded_only_on_actual_change() {
        assert!(!size_changed((800, 600), 800, 600));
        assert!(size_changed((800, 600), 1024, 768));
        assert!(size_changed((800, 600), 800, 601));
    }
}
