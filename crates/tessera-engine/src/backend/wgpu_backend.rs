use wgpu::util::DeviceExt;

use super::{BindResource, PassSpec, PipelineSpec, RenderBackend};
use crate::assets::TextureImage;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::error::RenderError;

impl<'w> RenderBackend for Gpu<'w> {
    type Buffer = wgpu::Buffer;
    type TextureView = wgpu::TextureView;
    type Sampler = wgpu::Sampler;
    type BindGroupLayout = wgpu::BindGroupLayout;
    type BindGroup = wgpu::BindGroup;
    type ShaderModule = wgpu::ShaderModule;
    type Pipeline = wgpu::RenderPipeline;
    type Frame = GpuFrame;

    fn surface_format(&self) -> wgpu::TextureFormat {
        Gpu::surface_format(self)
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        Gpu::resize(self, width, height);
    }

    fn create_buffer(&self, desc: &wgpu::BufferDescriptor<'_>) -> wgpu::Buffer {
        self.device().create_buffer(desc)
    }

    fn create_buffer_init(&self, desc: &wgpu::util::BufferInitDescriptor<'_>) -> wgpu::Buffer {
        self.device().create_buffer_init(desc)
    }

    fn buffer_size(&self, buffer: &wgpu::Buffer) -> u64 {
        buffer.size()
    }

    fn write_buffer(&self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.queue().write_buffer(buffer, offset, data);
    }

    fn create_texture(
        &self,
        label: &str,
        image: &TextureImage,
    ) -> Result<wgpu::TextureView, RenderError> {
        image.check_dimension_limit(self.device().limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };

        let texture = self.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height()),
            },
            size,
        );

        Ok(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    fn create_sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> wgpu::Sampler {
        self.device().create_sampler(desc)
    }

    fn create_bind_group_layout(
        &self,
        label: &str,
        entries: &[wgpu::BindGroupLayoutEntry],
    ) -> wgpu::BindGroupLayout {
        self.device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries,
            })
    }

    fn create_bind_group(
        &self,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        entries: &[(u32, BindResource<'_, Self>)],
    ) -> wgpu::BindGroup {
        let entries: Vec<wgpu::BindGroupEntry<'_>> = entries
            .iter()
            .map(|(binding, resource)| wgpu::BindGroupEntry {
                binding: *binding,
                resource: match resource {
                    BindResource::Buffer(buffer) => buffer.as_entire_binding(),
                    BindResource::TextureView(view) => wgpu::BindingResource::TextureView(view),
                    BindResource::Sampler(sampler) => wgpu::BindingResource::Sampler(sampler),
                },
            })
            .collect();

        self.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &entries,
        })
    }

    fn create_shader_module(&self, label: &str, wgsl: &str) -> wgpu::ShaderModule {
        self.device().create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        })
    }

    fn create_render_pipeline(&self, spec: &PipelineSpec<'_, Self>) -> wgpu::RenderPipeline {
        let pipeline_layout = self
            .device()
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(spec.label),
                bind_group_layouts: spec.bind_group_layouts,
                immediate_size: 0,
            });

        self.device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(spec.label),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: spec.shader,
                    entry_point: Some(spec.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: std::slice::from_ref(&spec.vertex_layout),
                },

                fragment: Some(wgpu::FragmentState {
                    module: spec.shader,
                    entry_point: Some(spec.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: spec.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: spec.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
    }

    fn acquire_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        self.begin_frame()
    }

    fn submit_pass(&self, frame: GpuFrame, pass: &PassSpec<'_, Self>) {
        let mut encoder = self
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera frame encoder"),
            });

        // The pass borrows the encoder; it must end before `finish`.
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(pass.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(pass.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pass.pipeline);
            rpass.set_vertex_buffer(0, pass.vertex_buffer.slice(..));
            rpass.set_bind_group(0, pass.bind_group, &[]);
            rpass.draw(pass.draw.vertices(), pass.draw.instances());
        }

        self.queue().submit(std::iter::once(encoder.finish()));

        let GpuFrame { surface_texture, view } = frame;
        drop(view);
        surface_texture.present();
    }

    fn recover_surface(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        self.handle_surface_error(err)
    }
}
