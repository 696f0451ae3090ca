use std::future::Future;

use winit::window::Window;

use super::{Gpu, GpuInit};
use crate::backend::RenderBackend;
use crate::error::RenderError;

/// Handle to a GPU runtime able to negotiate a device for a drawable surface.
///
/// Renderers receive the runtime explicitly instead of reaching for a global
/// entry point, so a headless runtime can stand in for the real one.
pub trait GpuRuntime<S> {
    type Backend: RenderBackend;

    /// Requests an adapter, a logical device, and configures `surface` with
    /// the preferred presentation format.
    fn connect(
        &self,
        surface: S,
        init: &GpuInit,
    ) -> impl Future<Output = Result<Self::Backend, RenderError>>;
}

/// The wgpu runtime: one `wgpu::Instance` per process.
pub struct WgpuRuntime {
    instance: wgpu::Instance,
}

impl WgpuRuntime {
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self { instance }
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }
}

impl Default for WgpuRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl<'w> GpuRuntime<&'w Window> for WgpuRuntime {
    type Backend = Gpu<'w>;

    async fn connect(&self, surface: &'w Window, init: &GpuInit) -> Result<Gpu<'w>, RenderError> {
        Gpu::new(&self.instance, surface, init).await
    }
}
