use bytemuck::{Pod, Zeroable};

use crate::backend::RenderBackend;

/// Interleaved vertex: position followed by texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
    ];

    /// Vertex buffer layout matching `vs_main` inputs.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// The single triangle, standing in the X = 0 plane with its apex on +Z.
pub const TRIANGLE_VERTICES: [MeshVertex; 3] = [
    MeshVertex { position: [0.0, 0.0, 0.5], uv: [0.5, 0.0] },
    MeshVertex { position: [0.0, -0.5, -0.5], uv: [0.0, 1.0] },
    MeshVertex { position: [0.0, 0.5, -0.5], uv: [1.0, 1.0] },
];

/// Device-resident vertex buffer for the triangle.
pub struct TriangleMesh<B: RenderBackend> {
    buffer: B::Buffer,
    vertex_count: u32,
}

impl<B: RenderBackend> TriangleMesh<B> {
    pub fn new(backend: &B) -> Self {
        let buffer = backend.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle vertices"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!("triangle mesh uploaded ({} vertices)", TRIANGLE_VERTICES.len());

        Self {
            buffer,
            vertex_count: TRIANGLE_VERTICES.len() as u32,
        }
    }

    pub fn buffer(&self) -> &B::Buffer {
        &self.buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn layout(&self) -> wgpu::VertexBufferLayout<'static> {
        MeshVertex::layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Call, RecordingBackend};

    #[test]
    fn layout_is_interleaved_position_then_uv() {
        let layout = MeshVertex::layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 2);

        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);

        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn triangle_lies_in_x_zero_plane() {
        assert!(TRIANGLE_VERTICES.iter().all(|v| v.position[0] == 0.0));
        assert_eq!(TRIANGLE_VERTICES[0].position, [0.0, 0.0, 0.5]);
        assert_eq!(TRIANGLE_VERTICES[0].uv, [0.5, 0.0]);
    }

    #[test]
    fn mesh_uploads_sixty_bytes_as_vertex_buffer() {
        let backend = RecordingBackend::new(640, 480, wgpu::TextureFormat::Bgra8UnormSrgb);
        let mesh = TriangleMesh::new(&backend);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(backend.buffer_size(mesh.buffer()), 60);

        let calls = backend.calls();
        assert!(matches!(
            calls.as_slice(),
            [Call::CreateBuffer { size: 60, usage, .. }] if *usage == wgpu::BufferUsages::VERTEX
        ));
    }
}
