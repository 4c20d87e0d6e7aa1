//! GPU wire types shared by the batch and the device session's pipeline.

use bytemuck::{Pod, Zeroable};

/// One batched vertex: logical-unit position plus normalized RGB.
///
/// The 20-byte layout (2 x f32 + 3 x f32) is a wire contract with the
/// pipeline's vertex-attribute layout; change both together or not at all.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Logical viewport size uploaded to the vertex shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ViewportUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_twenty_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
    }

    #[test]
    fn viewport_uniform_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<ViewportUniform>() % 16, 0);
    }
}
