use crate::coords::{Rect, Vec2, Viewport};
use crate::device::Session;
use crate::paint::Color;

use super::vertex::{Vertex, ViewportUniform};

/// Starting GPU vertex-buffer capacity, in vertices.
const INITIAL_VERTEX_CAPACITY: usize = 3 * 1024;

/// Accumulates triangles across a frame and issues one draw call at flush.
///
/// The host-side vector grows geometrically (via `Vec`), the GPU vertex buffer
/// grows by doubling when the host array exceeds its capacity; neither ever
/// shrinks, so steady-state frames allocate nothing.
///
/// Valid to fill only between `begin_frame` and `end_frame`. The vertex count
/// is reset on every flush path so triangles never leak into the next frame.
#[derive(Default)]
pub struct TriangleBatch {
    vertices: Vec<Vertex>,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    viewport_ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl TriangleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one triangle (three vertices, in submission order).
    ///
    /// Winding and degeneracy are not validated; a degenerate triangle draws
    /// as zero-area geometry, which is harmless.
    pub fn queue_triangle(&mut self, positions: [Vec2; 3], colors: [Color; 3]) {
        for i in 0..3 {
            self.vertices.push(Vertex {
                pos: [positions[i].x, positions[i].y],
                color: [colors[i].r, colors[i].g, colors[i].b],
            });
        }
    }

    /// Number of queued vertices (always a multiple of 3).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drops queued vertices without drawing. Capacity is retained.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Drops all GPU-side resources.
    ///
    /// Required after device-loss recovery: buffers and bind groups belong to
    /// the old device and must be recreated against the new session.
    pub fn reset_gpu_resources(&mut self) {
        self.vertex_buffer = None;
        self.vertex_capacity = 0;
        self.viewport_ubo = None;
        self.bind_group = None;
    }

    /// Uploads the queued vertices and issues exactly one draw call.
    ///
    /// An empty batch is a no-op (no render pass, no submission). Otherwise
    /// the host count is reset before recording the pass, so the invariant
    /// "nothing carries over" holds on every exit path, upload failure
    /// included. The pass loads the existing attachment contents and draws
    /// into the letterboxed viewport rectangle.
    pub fn flush(
        &mut self,
        session: &mut Session,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        format: wgpu::TextureFormat,
        viewport: Viewport,
        letterbox: Rect,
    ) {
        if self.vertices.is_empty() {
            return;
        }

        self.ensure_vertex_capacity(session.device());
        self.ensure_bindings(session);

        let vertex_count = self.vertices.len() as u32;

        if let Some(vbo) = self.vertex_buffer.as_ref() {
            session
                .queue()
                .write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
        }
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            let uniform = ViewportUniform {
                size: [viewport.width, viewport.height],
                _pad: [0.0, 0.0],
            };
            session
                .queue()
                .write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
        }

        // Host batch is consumed by this frame from here on.
        self.vertices.clear();

        session.ensure_pipeline(format);
        let Some(pipeline) = session.pipeline(format) else { return };
        let Some(vbo) = self.vertex_buffer.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism batch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if !letterbox.is_empty() {
            rpass.set_viewport(letterbox.x, letterbox.y, letterbox.w, letterbox.h, 0.0, 1.0);
        }

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..vertex_count, 0..1);
    }

    fn ensure_vertex_capacity(&mut self, device: &wgpu::Device) {
        let needed = self.vertices.len();
        if self.vertex_buffer.is_some() && needed <= self.vertex_capacity {
            return;
        }

        let mut capacity = self.vertex_capacity.max(INITIAL_VERTEX_CAPACITY);
        while capacity < needed {
            capacity *= 2;
        }

        self.vertex_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism batch vbo"),
            size: (capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = capacity;
    }

    fn ensure_bindings(&mut self, session: &Session) {
        if self.viewport_ubo.is_some() && self.bind_group.is_some() {
            return;
        }

        let ubo = session.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = session
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("prism viewport bind group"),
                layout: session.bind_group_layout(),
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                }],
            });

        self.viewport_ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(batch: &mut TriangleBatch) {
        batch.queue_triangle(
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            [Color::RED, Color::GREEN, Color::BLUE],
        );
    }

    #[test]
    fn count_is_multiple_of_three() {
        let mut batch = TriangleBatch::new();
        for n in 1..=5 {
            tri(&mut batch);
            assert_eq!(batch.len(), n * 3);
            assert_eq!(batch.len() % 3, 0);
        }
    }

    #[test]
    fn clear_resets_count() {
        let mut batch = TriangleBatch::new();
        tri(&mut batch);
        tri(&mut batch);
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn queued_vertices_preserve_submission_order() {
        let mut batch = TriangleBatch::new();
        batch.queue_triangle(
            [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)],
            [Color::WHITE; 3],
        );
        assert_eq!(batch.vertices[0].pos, [1.0, 2.0]);
        assert_eq!(batch.vertices[1].pos, [3.0, 4.0]);
        assert_eq!(batch.vertices[2].pos, [5.0, 6.0]);
    }

    #[test]
    fn reset_gpu_resources_keeps_host_vertices() {
        let mut batch = TriangleBatch::new();
        tri(&mut batch);
        batch.reset_gpu_resources();
        // Host geometry is untouched; only device objects are dropped.
        assert_eq!(batch.len(), 3);
        assert!(batch.vertex_buffer.is_none());
        assert_eq!(batch.vertex_capacity, 0);
    }
}
