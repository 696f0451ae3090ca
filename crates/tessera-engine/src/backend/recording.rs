use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::{BindResource, DrawCall, PassSpec, PipelineSpec, RenderBackend};
use crate::assets::TextureImage;
use crate::device::{surface, GpuInit, GpuRuntime, SurfaceErrorAction};
use crate::error::RenderError;

/// Opaque handle to a resource created by a [`RecordingBackend`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RecordedBuffer {
    pub id: ResourceId,
    pub size: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RecordedFrame {
    pub id: ResourceId,
}

/// A submitted render pass, with resources reduced to their ids.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub frame: ResourceId,
    pub clear: wgpu::Color,
    pub pipeline: ResourceId,
    pub vertex_buffer: ResourceId,
    pub bind_group: ResourceId,
    pub draw: DrawCall,
}

/// One backend operation, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer {
        id: ResourceId,
        label: String,
        size: u64,
        usage: wgpu::BufferUsages,
    },
    WriteBuffer {
        buffer: ResourceId,
        offset: u64,
        data: Vec<u8>,
    },
    CreateTexture {
        id: ResourceId,
        label: String,
        width: u32,
        height: u32,
    },
    CreateSampler {
        id: ResourceId,
    },
    CreateBindGroupLayout {
        id: ResourceId,
        label: String,
        bindings: Vec<(u32, wgpu::ShaderStages)>,
    },
    CreateBindGroup {
        id: ResourceId,
        layout: ResourceId,
        entries: Vec<(u32, ResourceId)>,
    },
    CreateShaderModule {
        id: ResourceId,
        label: String,
    },
    CreatePipeline {
        id: ResourceId,
        vertex_entry: String,
        fragment_entry: String,
        color_format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        vertex_stride: u64,
        bind_group_layouts: Vec<ResourceId>,
    },
    AcquireFrame {
        result: Result<ResourceId, wgpu::SurfaceError>,
    },
    Submit(PassRecord),
    Reconfigure,
    Resize {
        width: u32,
        height: u32,
    },
}

/// A headless backend that hands out ids instead of GPU objects and records
/// every call in order.
///
/// Acquisition failures can be queued with [`fail_next_acquire`](Self::fail_next_acquire)
/// to exercise the surface-loss paths.
pub struct RecordingBackend {
    format: wgpu::TextureFormat,
    size: (u32, u32),
    max_texture_dimension: u32,
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    acquire_failures: RefCell<VecDeque<wgpu::SurfaceError>>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            size: (width, height),
            max_texture_dimension: wgpu::Limits::default().max_texture_dimension_2d,
            next_id: Cell::new(0),
            calls: RefCell::new(Vec::new()),
            acquire_failures: RefCell::new(VecDeque::new()),
        }
    }

    /// Caps the side length of textures this backend accepts.
    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }

    /// Makes the next `acquire_frame` fail with `err`.
    pub fn fail_next_acquire(&self, err: wgpu::SurfaceError) {
        self.acquire_failures.borrow_mut().push_back(err);
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Forgets recorded calls; handles stay valid.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn submissions(&self) -> Vec<PassRecord> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Submit(pass) => Some(pass.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(offset, data)` of every write into `buffer`, in order.
    pub fn writes_to(&self, buffer: ResourceId) -> Vec<(u64, Vec<u8>)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::WriteBuffer { buffer: b, offset, data } if *b == buffer => {
                    Some((*offset, data.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn alloc(&self) -> ResourceId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ResourceId(id)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl RenderBackend for RecordingBackend {
    type Buffer = RecordedBuffer;
    type TextureView = ResourceId;
    type Sampler = ResourceId;
    type BindGroupLayout = ResourceId;
    type BindGroup = ResourceId;
    type ShaderModule = ResourceId;
    type Pipeline = ResourceId;
    type Frame = RecordedFrame;

    fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
        self.record(Call::Resize { width, height });
    }

    fn create_buffer(&self, desc: &wgpu::BufferDescriptor<'_>) -> RecordedBuffer {
        let id = self.alloc();
        self.record(Call::CreateBuffer {
            id,
            label: desc.label.unwrap_or_default().to_string(),
            size: desc.size,
            usage: desc.usage,
        });
        RecordedBuffer { id, size: desc.size }
    }

    fn create_buffer_init(&self, desc: &wgpu::util::BufferInitDescriptor<'_>) -> RecordedBuffer {
        let id = self.alloc();
        let size = desc.contents.len() as u64;
        self.record(Call::CreateBuffer {
            id,
            label: desc.label.unwrap_or_default().to_string(),
            size,
            usage: desc.usage,
        });
        RecordedBuffer { id, size }
    }

    fn buffer_size(&self, buffer: &RecordedBuffer) -> u64 {
        buffer.size
    }

    fn write_buffer(&self, buffer: &RecordedBuffer, offset: u64, data: &[u8]) {
        self.record(Call::WriteBuffer {
            buffer: buffer.id,
            offset,
            data: data.to_vec(),
        });
    }

    fn create_texture(&self, label: &str, image: &TextureImage) -> Result<ResourceId, RenderError> {
        image.check_dimension_limit(self.max_texture_dimension)?;

        let id = self.alloc();
        self.record(Call::CreateTexture {
            id,
            label: label.to_string(),
            width: image.width(),
            height: image.height(),
        });
        Ok(id)
    }

    fn create_sampler(&self, _desc: &wgpu::SamplerDescriptor<'_>) -> ResourceId {
        let id = self.alloc();
        self.record(Call::CreateSampler { id });
        id
    }

    fn create_bind_group_layout(
        &self,
        label: &str,
        entries: &[wgpu::BindGroupLayoutEntry],
    ) -> ResourceId {
        let id = self.alloc();
        self.record(Call::CreateBindGroupLayout {
            id,
            label: label.to_string(),
            bindings: entries.iter().map(|e| (e.binding, e.visibility)).collect(),
        });
        id
    }

    fn create_bind_group(
        &self,
        _label: &str,
        layout: &ResourceId,
        entries: &[(u32, BindResource<'_, Self>)],
    ) -> ResourceId {
        let id = self.alloc();
        let entries = entries
            .iter()
            .map(|(binding, resource)| {
                let bound = match resource {
                    BindResource::Buffer(buffer) => buffer.id,
                    BindResource::TextureView(view) => **view,
                    BindResource::Sampler(sampler) => **sampler,
                };
                (*binding, bound)
            })
            .collect();
        self.record(Call::CreateBindGroup {
            id,
            layout: *layout,
            entries,
        });
        id
    }

    fn create_shader_module(&self, label: &str, _wgsl: &str) -> ResourceId {
        let id = self.alloc();
        self.record(Call::CreateShaderModule {
            id,
            label: label.to_string(),
        });
        id
    }

    fn create_render_pipeline(&self, spec: &PipelineSpec<'_, Self>) -> ResourceId {
        let id = self.alloc();
        self.record(Call::CreatePipeline {
            id,
            vertex_entry: spec.vertex_entry.to_string(),
            fragment_entry: spec.fragment_entry.to_string(),
            color_format: spec.color_format,
            topology: spec.topology,
            vertex_stride: spec.vertex_layout.array_stride,
            bind_group_layouts: spec.bind_group_layouts.iter().map(|l| **l).collect(),
        });
        id
    }

    fn acquire_frame(&self) -> Result<RecordedFrame, wgpu::SurfaceError> {
        let failure = self.acquire_failures.borrow_mut().pop_front();
        match failure {
            Some(err) => {
                self.record(Call::AcquireFrame { result: Err(err.clone()) });
                Err(err)
            }
            None => {
                let id = self.alloc();
                self.record(Call::AcquireFrame { result: Ok(id) });
                Ok(RecordedFrame { id })
            }
        }
    }

    fn submit_pass(&self, frame: RecordedFrame, pass: &PassSpec<'_, Self>) {
        self.record(Call::Submit(PassRecord {
            frame: frame.id,
            clear: pass.clear,
            pipeline: *pass.pipeline,
            vertex_buffer: pass.vertex_buffer.id,
            bind_group: *pass.bind_group,
            draw: pass.draw,
        }));
    }

    fn recover_surface(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(err);
        if action == SurfaceErrorAction::Reconfigured {
            self.record(Call::Reconfigure);
        }
        action
    }
}

/// A drawable surface stand-in for headless runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HeadlessSurface {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
        }
    }
}

/// Runtime producing [`RecordingBackend`]s for [`HeadlessSurface`]s.
#[derive(Debug, Default, Clone)]
pub struct RecordingRuntime {
    /// Simulates a machine without a usable GPU adapter.
    pub no_adapter: bool,
    /// Texture side limit handed to the backends; `None` keeps the wgpu default.
    pub max_texture_dimension: Option<u32>,
}

impl RecordingRuntime {
    pub fn without_adapter() -> Self {
        Self {
            no_adapter: true,
            ..Self::default()
        }
    }

    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = Some(max);
        self
    }
}

impl GpuRuntime<HeadlessSurface> for RecordingRuntime {
    type Backend = RecordingBackend;

    async fn connect(
        &self,
        surface: HeadlessSurface,
        _init: &GpuInit,
    ) -> Result<RecordingBackend, RenderError> {
        if self.no_adapter {
            return Err(RenderError::AdapterUnavailable("headless runtime has no adapter".into()));
        }
        if surface.width == 0 || surface.height == 0 {
            return Err(RenderError::Surface("headless surface has zero size".into()));
        }
        let backend = RecordingBackend::new(surface.width, surface.height, surface.format);
        Ok(match self.max_texture_dimension {
            Some(max) => backend.with_max_texture_dimension(max),
            None => backend,
        })
    }
}
