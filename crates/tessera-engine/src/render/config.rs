use crate::assets::{MaterialSource, TextureImage};
use crate::device::GpuInit;
use crate::error::RenderError;

use super::animation::{validate_step, Animation};
use super::camera::CameraConfig;

/// Background color of the render pass.
pub const DEFAULT_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.0,
    b: 0.25,
    a: 1.0,
};

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub camera: CameraConfig,

    /// Rotation advanced per frame, in radians.
    pub step: f64,

    pub clear_color: wgpu::Color,

    /// Texture bound as the material.
    pub material: MaterialSource,

    /// Device negotiation parameters; only used by [`Renderer::initialize`].
    ///
    /// [`Renderer::initialize`]: super::Renderer::initialize
    pub gpu: GpuInit,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            step: Animation::DEFAULT_STEP,
            clear_color: DEFAULT_CLEAR_COLOR,
            material: MaterialSource::Pixels(TextureImage::checkerboard(
                64,
                8,
                [255, 255, 255, 255],
                [64, 64, 64, 255],
            )),
            gpu: GpuInit::default(),
        }
    }
}

impl RendererConfig {
    pub fn with_material(mut self, material: MaterialSource) -> Self {
        self.material = material;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        validate_step(self.step).map_err(RenderError::InvalidConfig)?;
        self.camera.validate().map_err(RenderError::InvalidConfig)?;

        let c = self.clear_color;
        if ![c.r, c.g, c.b, c.a].iter().all(|v| v.is_finite()) {
            return Err(RenderError::InvalidConfig("clear color must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RendererConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step, 0.01);
        assert_eq!(config.clear_color, DEFAULT_CLEAR_COLOR);
    }

    #[test]
    fn bad_values_are_rejected() {
        let bad_step = RendererConfig::default().with_step(f64::INFINITY);
        assert!(matches!(bad_step.validate(), Err(RenderError::InvalidConfig(_))));

        let mut bad_clear = RendererConfig::default();
        bad_clear.clear_color.g = f64::NAN;
        assert!(bad_clear.validate().is_err());

        let mut bad_camera = RendererConfig::default();
        bad_camera.camera.far = 0.05;
        assert!(bad_camera.validate().is_err());
    }
}
