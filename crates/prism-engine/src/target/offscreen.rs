use std::sync::mpsc::channel;

use anyhow::{Context, Result};

use crate::device::Session;

use super::{RenderTarget, TargetError};

/// Offscreen targets always render in RGBA8 so readback bytes are directly
/// usable as image pixels, independent of what the display surface prefers.
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BYTES_PER_PIXEL: u32 = 4;

/// wgpu requires buffer copy rows to be aligned to 256 bytes.
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    (width * BYTES_PER_PIXEL).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

/// Render target backed by a capturable texture plus a CPU-readable staging
/// buffer, for screenshots and headless runs.
///
/// `acquire_view` always succeeds; `present` is a no-op. The capture copy is
/// recorded in `before_submit` so it lands in the same command stream as the
/// frame, after the main pass; `read_pixels` then blocks until the queue is
/// done and returns tightly packed RGBA rows.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    staging: wgpu::Buffer,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub fn new(session: &Session, width: u32, height: u32) -> Result<Self> {
        anyhow::ensure!(
            width > 0 && height > 0,
            "offscreen target needs a positive size, got {width}x{height}"
        );

        let (texture, staging) = allocate(session.device(), width, height);

        Ok(Self {
            texture,
            staging,
            width,
            height,
        })
    }

    /// Blocks until the submitted frame finishes, then returns the captured
    /// pixels as tightly packed RGBA rows (row padding stripped).
    pub fn read_pixels(&self, session: &Session) -> Result<Vec<u8>> {
        let slice = self.staging.slice(..);
        let (sender, receiver) = channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            drop(sender.send(res));
        });

        loop {
            session
                .device()
                .poll(wgpu::PollType::wait_indefinitely())
                .context("device poll failed while waiting for readback")?;
            if let Ok(res) = receiver.try_recv() {
                res.context("staging buffer mapping failed")?;
                break;
            }
        }

        let padded = padded_bytes_per_row(self.width) as usize;
        let row_bytes = (self.width * BYTES_PER_PIXEL) as usize;

        let mapped = slice.get_mapped_range();
        let mut out = vec![0u8; row_bytes * self.height as usize];
        for row in 0..self.height as usize {
            let src = row * padded;
            let dst = row * row_bytes;
            out[dst..dst + row_bytes].copy_from_slice(&mapped[src..src + row_bytes]);
        }
        drop(mapped);
        self.staging.unmap();

        Ok(out)
    }
}

impl RenderTarget for OffscreenTarget {
    fn acquire_view(&mut self, _session: &Session) -> Result<wgpu::TextureView, TargetError> {
        Ok(self
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default()))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn format(&self) -> wgpu::TextureFormat {
        FORMAT
    }

    fn needs_resize(&self, width: u32, height: u32) -> bool {
        super::size_changed(self.dimensions(), width, height)
    }

    fn resize(&mut self, session: &Session, width: u32, height: u32) -> Result<(), TargetError> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        let (texture, staging) = allocate(session.device(), width, height);
        self.texture = texture;
        self.staging = staging;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn before_submit(&mut self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row(self.width)),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn present(&mut self) {
        // Nothing to hand to a display.
    }
}

fn allocate(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::Buffer) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("prism offscreen target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("prism offscreen readback"),
        size: u64::from(padded_bytes_per_row(width)) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    (texture, staging)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_padding_rounds_up_to_alignment() {
        // 64 px * 4 bytes = 256, already aligned.
        assert_eq!(padded_bytes_per_row(64), 256);
        // 400 px * 4 bytes = 1600 -> next multiple of 256.
        assert_eq!(padded_bytes_per_row(400), 1792);
        assert_eq!(padded_bytes_per_row(1), 256);
    }

    #[test]
    fn padded_rows_never_smaller_than_tight_rows() {
        for w in [1u32, 3, 64, 255, 256, 257, 1920] {
            assert!(padded_bytes_per_row(w) >= w * BYTES_PER_PIXEL);
            assert_eq!(padded_bytes_per_row(w) % 256, 0);
        }
    }
}
