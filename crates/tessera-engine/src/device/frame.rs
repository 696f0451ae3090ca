/// A surface image acquired for one frame, plus a view onto it.
///
/// Short-lived: holding it blocks acquisition of the next image. It is
/// consumed by [`RenderBackend::submit_pass`](crate::backend::RenderBackend::submit_pass),
/// which presents it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
