//! The GPU operations the renderer performs, behind one trait.
//!
//! `RenderBackend` is implemented by the wgpu device context ([`Gpu`]) and by
//! [`RecordingBackend`], a headless backend that records every call. Plain
//! descriptor data uses wgpu's own types; GPU objects are associated types.
//!
//! [`Gpu`]: crate::device::Gpu

mod recording;
mod wgpu_backend;

pub use recording::{
    Call, HeadlessSurface, PassRecord, RecordedBuffer, RecordedFrame, RecordingBackend,
    RecordingRuntime, ResourceId,
};

use std::ops::Range;

use crate::assets::TextureImage;
use crate::device::SurfaceErrorAction;
use crate::error::RenderError;

/// A GPU resource bound into a bind group slot.
pub enum BindResource<'a, B: RenderBackend + ?Sized> {
    Buffer(&'a B::Buffer),
    TextureView(&'a B::TextureView),
    Sampler(&'a B::Sampler),
}

/// Everything needed to assemble a render pipeline.
pub struct PipelineSpec<'a, B: RenderBackend + ?Sized> {
    pub label: &'a str,
    pub shader: &'a B::ShaderModule,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub bind_group_layouts: &'a [&'a B::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
    pub topology: wgpu::PrimitiveTopology,
}

/// Parameters of a single non-indexed draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

impl DrawCall {
    pub fn vertices(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }

    pub fn instances(&self) -> Range<u32> {
        self.first_instance..self.first_instance + self.instance_count
    }
}

/// One render pass: clear, bind, draw.
pub struct PassSpec<'a, B: RenderBackend + ?Sized> {
    pub label: &'a str,
    pub clear: wgpu::Color,
    pub pipeline: &'a B::Pipeline,
    pub vertex_buffer: &'a B::Buffer,
    pub bind_group: &'a B::BindGroup,
    pub draw: DrawCall,
}

/// GPU device operations used by the renderer.
///
/// Queue operations (`write_buffer`, `submit_pass`) execute on the device in
/// the order they are issued.
pub trait RenderBackend {
    type Buffer;
    type TextureView;
    type Sampler;
    type BindGroupLayout;
    type BindGroup;
    type ShaderModule;
    type Pipeline;
    type Frame;

    /// Format the surface was configured with.
    fn surface_format(&self) -> wgpu::TextureFormat;

    /// Current surface size in physical pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Reconfigures the surface for a new size.
    fn resize(&mut self, width: u32, height: u32);

    fn create_buffer(&self, desc: &wgpu::BufferDescriptor<'_>) -> Self::Buffer;

    fn create_buffer_init(&self, desc: &wgpu::util::BufferInitDescriptor<'_>) -> Self::Buffer;

    fn buffer_size(&self, buffer: &Self::Buffer) -> u64;

    /// Queues a host-to-device copy into `buffer` at `offset`.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, data: &[u8]);

    /// Creates a 2D sRGB texture, uploads `image` into it and returns a view.
    ///
    /// Images larger than the device's 2D texture limit are rejected with
    /// [`RenderError::AssetLoad`] before anything is created.
    fn create_texture(&self, label: &str, image: &TextureImage)
        -> Result<Self::TextureView, RenderError>;

    fn create_sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> Self::Sampler;

    fn create_bind_group_layout(
        &self,
        label: &str,
        entries: &[wgpu::BindGroupLayoutEntry],
    ) -> Self::BindGroupLayout;

    fn create_bind_group(
        &self,
        label: &str,
        layout: &Self::BindGroupLayout,
        entries: &[(u32, BindResource<'_, Self>)],
    ) -> Self::BindGroup;

    fn create_shader_module(&self, label: &str, wgsl: &str) -> Self::ShaderModule;

    fn create_render_pipeline(&self, spec: &PipelineSpec<'_, Self>) -> Self::Pipeline;

    /// Acquires the current presentable surface image.
    fn acquire_frame(&self) -> Result<Self::Frame, wgpu::SurfaceError>;

    /// Records `pass` against `frame`, submits it and presents the frame.
    fn submit_pass(&self, frame: Self::Frame, pass: &PassSpec<'_, Self>);

    /// Classifies an acquisition failure, reconfiguring the surface if needed.
    fn recover_surface(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction;
}
