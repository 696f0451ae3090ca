use std::num::NonZeroU64;

use crate::assets::{Material, TriangleMesh};
use crate::backend::{BindResource, PipelineSpec, RenderBackend};

use super::shader::{FRAGMENT_ENTRY, MESH_SHADER, VERTEX_ENTRY};
use super::uniforms::UNIFORM_BUFFER_SIZE;

pub const UNIFORM_BINDING: u32 = 0;
pub const TEXTURE_BINDING: u32 = 1;
pub const SAMPLER_BINDING: u32 = 2;

const UNIFORM_MIN_SIZE: NonZeroU64 = match NonZeroU64::new(UNIFORM_BUFFER_SIZE) {
    Some(size) => size,
    None => panic!("uniform buffer size must be non-zero"),
};

/// Layout of bind group 0: transforms for the vertex stage, texture and
/// sampler for the fragment stage.
pub fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: UNIFORM_BINDING,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(UNIFORM_MIN_SIZE),
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: TEXTURE_BINDING,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: SAMPLER_BINDING,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

/// Uniform buffer plus the bind group resolving it together with the material.
pub struct Bindings<B: RenderBackend> {
    pub uniform_buffer: B::Buffer,
    pub layout: B::BindGroupLayout,
    pub bind_group: B::BindGroup,
}

impl<B: RenderBackend> Bindings<B> {
    pub fn new(backend: &B, material: &Material<B>) -> Self {
        let uniform_buffer = backend.create_buffer(&wgpu::BufferDescriptor {
            label: Some("transform uniforms"),
            size: UNIFORM_BUFFER_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = backend.create_bind_group_layout("mesh bgl", &bind_group_layout_entries());

        let bind_group = backend.create_bind_group(
            "mesh bind group",
            &layout,
            &[
                (UNIFORM_BINDING, BindResource::Buffer(&uniform_buffer)),
                (TEXTURE_BINDING, BindResource::TextureView(material.view())),
                (SAMPLER_BINDING, BindResource::Sampler(material.sampler())),
            ],
        );

        Self {
            uniform_buffer,
            layout,
            bind_group,
        }
    }
}

/// Immutable pipeline bundle: bindings, shader module and render pipeline.
///
/// Built once; there is no partial update path.
pub struct PipelineState<B: RenderBackend> {
    bindings: Bindings<B>,
    shader: B::ShaderModule,
    pipeline: B::Pipeline,
    color_format: wgpu::TextureFormat,
}

impl<B: RenderBackend> PipelineState<B> {
    pub fn build(backend: &B, mesh: &TriangleMesh<B>, material: &Material<B>) -> Self {
        let bindings = Bindings::new(backend, material);
        let shader = backend.create_shader_module("mesh shader", MESH_SHADER);
        let color_format = backend.surface_format();

        let pipeline = backend.create_render_pipeline(&PipelineSpec {
            label: "mesh pipeline",
            shader: &shader,
            vertex_entry: VERTEX_ENTRY,
            fragment_entry: FRAGMENT_ENTRY,
            vertex_layout: mesh.layout(),
            bind_group_layouts: &[&bindings.layout],
            color_format,
            topology: wgpu::PrimitiveTopology::TriangleList,
        });

        log::debug!("mesh pipeline built for {color_format:?}");

        Self {
            bindings,
            shader,
            pipeline,
            color_format,
        }
    }

    pub fn uniform_buffer(&self) -> &B::Buffer {
        &self.bindings.uniform_buffer
    }

    pub fn bind_group(&self) -> &B::BindGroup {
        &self.bindings.bind_group
    }

    pub fn bind_group_layout(&self) -> &B::BindGroupLayout {
        &self.bindings.layout
    }

    pub fn shader(&self) -> &B::ShaderModule {
        &self.shader
    }

    pub fn pipeline(&self) -> &B::Pipeline {
        &self.pipeline
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }
}
