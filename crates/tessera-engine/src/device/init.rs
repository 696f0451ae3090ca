/// Parameters for adapter/device negotiation and surface configuration.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when the surface offers one.
    ///
    /// The material texture is uploaded as sRGB, so an sRGB target keeps the
    /// sampled colors unchanged on screen.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO paces frames to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode; falls back to the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency hint for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: Some(wgpu::CompositeAlphaMode::Opaque),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
