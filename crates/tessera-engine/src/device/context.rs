use winit::window::Window;

use super::{GpuFrame, GpuInit, SurfaceErrorAction};
use super::surface;
use crate::error::RenderError;

/// Owns the wgpu adapter, logical device, queue and configured surface.
///
/// This is the device context of the renderer:
/// - negotiates Adapter/Device/Queue against a surface
/// - configures the Surface (swapchain) with the preferred format
/// - acquires surface images for rendering
///
/// The surface borrows the window for `'w`; the window must outlive the `Gpu`.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl<'w> Gpu<'w> {
    /// Runs the adapter → device → surface configuration sequence for `window`.
    pub async fn new(
        instance: &wgpu::Instance,
        window: &'w Window,
        init: &GpuInit,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::AdapterUnavailable(e.to_string()))?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera device"),
                required_features: wgpu::Features::empty(),
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::DeviceUnavailable(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .ok_or_else(|| RenderError::Surface("surface reports no supported formats".into()))?;
        let alpha_mode = surface::choose_alpha_mode(&caps, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        log::info!(
            "surface configured: {:?} {}x{} ({:?})",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config,
        })
    }

    /// Returns the configured surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the configured surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface for a new drawable size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if surface::apply_resize(&mut self.config, width, height) {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Acquires the next surface image and a default view onto it.
    pub fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(GpuFrame {
            surface_texture,
            view,
        })
    }

    /// Classifies a failed acquisition and reconfigures the surface when that
    /// is the remedy.
    pub fn handle_surface_error(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(err);
        if action == SurfaceErrorAction::Reconfigured {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }
}
