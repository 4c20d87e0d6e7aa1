use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::device::Session;

use super::{RenderTarget, TargetError};

/// Render target backed by a window's presentation surface.
///
/// The window is held as `Arc<Window>` so the surface carries a `'static`
/// lifetime and the target can be rebuilt freely during device-loss recovery.
pub struct PresentedTarget {
    acquired: Option<wgpu::SurfaceTexture>,
    config: wgpu::SurfaceConfiguration,
    surface: wgpu::Surface<'static>,
    window: Arc<Window>,
}

impl PresentedTarget {
    /// Creates and configures a surface for `window` on the session's device.
    pub fn new(session: &Session, window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let surface = session
            .instance()
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        let caps = surface.get_capabilities(session.adapter());
        let format = choose_surface_format(&caps).context("no supported surface formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(session.device(), &config);

        Ok(Self {
            acquired: None,
            config,
            surface,
            window,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl RenderTarget for PresentedTarget {
    fn acquire_view(&mut self, session: &Session) -> Result<wgpu::TextureView, TargetError> {
        // Release a view left over from a frame that never presented.
        self.acquired = None;

        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.acquired = Some(texture);
                Ok(view)
            }
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                // Reconfigure so the next iteration can acquire; this frame
                // is skipped either way.
                if self.config.width > 0 && self.config.height > 0 {
                    self.surface.configure(session.device(), &self.config);
                }
                Err(TargetError::ViewUnavailable)
            }
            Err(wgpu::SurfaceError::Timeout) | Err(wgpu::SurfaceError::Other) => {
                Err(TargetError::ViewUnavailable)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(TargetError::Fatal),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn needs_resize(&self, width: u32, height: u32) -> bool {
        super::size_changed(self.dimensions(), width, height)
    }

    fn resize(&mut self, session: &Session, width: u32, height: u32) -> Result<(), TargetError> {
        // wgpu cannot configure a 0x0 surface; a spurious minimize event is
        // simply ignored.
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(session.device(), &self.config);
        Ok(())
    }

    fn present(&mut self) {
        if let Some(texture) = self.acquired.take() {
            self.window.pre_present_notify();
            texture.present();
        }
    }
}

/// Prefers a non-sRGB BGRA8/RGBA8 surface so flat shape colors and captured
/// pixels share one channel interpretation; falls back to whatever the
/// surface offers first.
fn choose_surface_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    let preferred = [
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
    ];
    for f in preferred {
        if caps.formats.contains(&f) {
            return Some(f);
        }
    }

    caps.formats.first().copied()
}
