//! Frame lifecycle orchestration.
//!
//! One frame is: `begin_frame` (loss check, resize, acquire, clear) →
//! application drawing into the batch → `flush` (single draw call) →
//! `end_frame` (capture hook, submit, present). The controller skips frames
//! for routine conditions and never propagates raw backend error codes.

use crate::coords::{Rect, Viewport, compute_letterbox};
use crate::device::Session;
use crate::paint::Color;
use crate::render::TriangleBatch;
use crate::target::{RenderTarget, TargetError};

/// Result of `begin_frame`.
pub enum FrameOutcome {
    /// A view was acquired and cleared; draw, flush, then call `end_frame`.
    Begun(FrameState),
    /// Routine skip (minimized window, stale view, rejected resize). The
    /// loop just continues; this is not an error.
    Skipped,
    /// The device is gone. The caller owns recovery: rebuild the session,
    /// then every target bound to it.
    DeviceLost,
    /// Unrecoverable target failure; terminate the run.
    Fatal,
}

/// Frame-scoped state created by `begin_frame` and consumed by `end_frame`.
///
/// Never persisted across frames.
pub struct FrameState {
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    pub letterbox: Rect,
    pub format: wgpu::TextureFormat,
}

/// Pre-GPU gate for `begin_frame`, checked before any backend call.
///
/// Loss is checked first so a lost device is reported even while the window
/// is minimized; a zero physical size means "skip", never "resize to zero".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Preflight {
    DeviceLost,
    Skip,
    Render,
}

fn preflight(device_lost: bool, physical: (u32, u32)) -> Preflight {
    if device_lost {
        Preflight::DeviceLost
    } else if physical.0 == 0 || physical.1 == 0 {
        Preflight::Skip
    } else {
        Preflight::Render
    }
}

/// Drives the begin → clear → flush → submit → present protocol against any
/// `RenderTarget`.
pub struct FrameController {
    pub viewport: Viewport,
    pub clear_color: Color,
}

impl FrameController {
    pub fn new(viewport: Viewport, clear_color: Color) -> Self {
        Self {
            viewport,
            clear_color,
        }
    }

    /// Opens a frame on `target`, clearing it to the configured color.
    ///
    /// `physical` is the currently queried framebuffer size; zero in either
    /// dimension always means "skip this frame", never "resize to zero".
    pub fn begin_frame(
        &self,
        session: &Session,
        target: &mut dyn RenderTarget,
        physical: (u32, u32),
    ) -> FrameOutcome {
        match preflight(session.is_device_lost(), physical) {
            Preflight::DeviceLost => return FrameOutcome::DeviceLost,
            Preflight::Skip => return FrameOutcome::Skipped,
            Preflight::Render => {}
        }

        if target.needs_resize(physical.0, physical.1) {
            match target.resize(session, physical.0, physical.1) {
                Ok(()) => {}
                Err(TargetError::Fatal) => return FrameOutcome::Fatal,
                Err(err) => {
                    // Skip and retry on the next iteration; no backoff.
                    log::debug!("target resize to {physical:?} rejected: {err:?}");
                    return FrameOutcome::Skipped;
                }
            }
        }

        let view = match target.acquire_view(session) {
            Ok(view) => view,
            Err(TargetError::Fatal) => return FrameOutcome::Fatal,
            Err(err) => {
                log::debug!("no presentable view ({err:?}), skipping frame");
                return FrameOutcome::Skipped;
            }
        };

        let mut encoder = session
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });

        // Clear pass — dropped immediately so the batch pass can begin later.
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let (w, h) = target.dimensions();
        let letterbox = compute_letterbox(w as f32, h as f32, self.viewport);

        FrameOutcome::Begun(FrameState {
            view,
            encoder,
            letterbox,
            format: target.format(),
        })
    }

    /// Flushes the batched triangles into the frame: one draw call, or none
    /// when the batch is empty.
    pub fn flush(&self, session: &mut Session, batch: &mut TriangleBatch, frame: &mut FrameState) {
        batch.flush(
            session,
            &mut frame.encoder,
            &frame.view,
            frame.format,
            self.viewport,
            frame.letterbox,
        );
    }

    /// Finalizes and submits the frame, then presents it.
    pub fn end_frame(
        &self,
        session: &Session,
        target: &mut dyn RenderTarget,
        frame: FrameState,
    ) {
        let FrameState {
            view, mut encoder, ..
        } = frame;

        target.before_submit(&mut encoder);
        session.queue().submit(std::iter::once(encoder.finish()));
        drop(view);
        target.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_device_reported_before_size_checks() {
        assert_eq!(preflight(true, (800, 600)), Preflight::DeviceLost);
        // Loss wins even when the window is minimized.
        assert_eq!(preflight(true, (0, 0)), Preflight::DeviceLost);
    }

    #[test]
    fn zero_size_in_either_dimension_skips() {
        assert_eq!(preflight(false, (0, 600)), Preflight::Skip);
        assert_eq!(preflight(false, (800, 0)), Preflight::Skip);
        assert_eq!(preflight(false, (0, 0)), Preflight::Skip);
    }

    #[test]
    fn healthy_frame_proceeds_to_acquire() {
        assert_eq!(preflight(false, (800, 600)), Preflight::Render);
        assert_eq!(preflight(false, (1, 1)), Preflight::Render);
    }
}
