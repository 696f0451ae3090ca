use crate::assets::{Material, TriangleMesh};
use crate::backend::{DrawCall, PassSpec, RenderBackend};
use crate::core::{FrameScheduler, FrameStatus};
use crate::device::{GpuRuntime, SurfaceErrorAction};
use crate::error::RenderError;
use crate::time::FrameClock;

use super::animation::Animation;
use super::camera::{aspect_ratio, FrameTransforms};
use super::config::RendererConfig;
use super::pipeline::PipelineState;
use super::uniforms::{MODEL_OFFSET, PROJECTION_OFFSET, VIEW_OFFSET};

/// Draws the textured triangle once per scheduled frame.
///
/// Lifecycle: device, then assets (mesh, material), then pipeline, then the
/// frame loop. [`Renderer::initialize`] runs the whole sequence; the
/// individual steps are public so hosts with their own backend can drive
/// them. A failed step leaves the renderer unusable; build a new one.
pub struct Renderer<B: RenderBackend> {
    backend: B,
    config: RendererConfig,
    animation: Animation,
    mesh: Option<TriangleMesh<B>>,
    material: Option<Material<B>>,
    pipeline: Option<PipelineState<B>>,
    clock: FrameClock,
    frames_presented: u64,
    frames_skipped: u64,
}

impl<B: RenderBackend> Renderer<B> {
    /// Connects to the GPU through `runtime`, creates assets, builds the
    /// pipeline and schedules the first frame.
    pub async fn initialize<R, S>(
        runtime: &R,
        surface: S,
        config: RendererConfig,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<Self, RenderError>
    where
        R: GpuRuntime<S, Backend = B>,
    {
        config.validate()?;
        let backend = runtime.connect(surface, &config.gpu).await?;

        let mut renderer = Self::with_backend(backend, config)?;
        renderer.create_assets().await?;
        renderer.build_pipeline()?;
        renderer.start(scheduler);

        log::info!("renderer initialized");
        Ok(renderer)
    }

    /// Wraps an already connected backend. No assets or pipeline yet.
    pub fn with_backend(backend: B, config: RendererConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Self {
            backend,
            animation: Animation::new(config.step),
            config,
            mesh: None,
            material: None,
            pipeline: None,
            clock: FrameClock::new(),
            frames_presented: 0,
            frames_skipped: 0,
        })
    }

    pub fn create_mesh(&mut self) {
        self.mesh = Some(TriangleMesh::new(&self.backend));
    }

    /// Loads and uploads the configured texture.
    ///
    /// Reading and decoding happen on the calling thread; see
    /// [`Material::load`].
    pub async fn load_material(&mut self) -> Result<(), RenderError> {
        let material = Material::load(&self.backend, &self.config.material).await?;
        self.material = Some(material);
        Ok(())
    }

    pub async fn create_assets(&mut self) -> Result<(), RenderError> {
        self.create_mesh();
        self.load_material().await
    }

    /// Builds the uniform buffer, bind group and render pipeline.
    ///
    /// Fails with [`RenderError::AssetsNotReady`] unless both the mesh and the
    /// material exist. Calling it again replaces the whole bundle.
    pub fn build_pipeline(&mut self) -> Result<(), RenderError> {
        let (Some(mesh), Some(material)) = (&self.mesh, &self.material) else {
            return Err(RenderError::AssetsNotReady);
        };
        self.pipeline = Some(PipelineState::build(&self.backend, mesh, material));
        Ok(())
    }

    /// Requests the first frame.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        self.clock.reset();
        scheduler.request_frame();
    }

    /// Runs one frame and, unless the surface is gone for good, schedules the
    /// next one.
    ///
    /// The animation advances and the uniforms are written before the surface
    /// image is acquired, so a skipped frame still moves the rotation on.
    pub fn render_frame(
        &mut self,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<FrameStatus, RenderError> {
        let (Some(pipeline), Some(mesh)) = (&self.pipeline, &self.mesh) else {
            return Err(RenderError::NotInitialized);
        };

        let t = self.animation.advance();
        let (width, height) = self.backend.surface_size();
        let transforms = FrameTransforms::compute(&self.config.camera, t, aspect_ratio(width, height));

        let uniforms = pipeline.uniform_buffer();
        let data = transforms.to_uniform();
        self.backend.write_buffer(uniforms, MODEL_OFFSET, bytemuck::cast_slice(&data.model));
        self.backend.write_buffer(uniforms, VIEW_OFFSET, bytemuck::cast_slice(&data.view));
        self.backend
            .write_buffer(uniforms, PROJECTION_OFFSET, bytemuck::cast_slice(&data.projection));

        let frame = match self.backend.acquire_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.backend.recover_surface(&err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        log::warn!("skipping frame: {err}");
                        self.frames_skipped += 1;
                        scheduler.request_frame();
                        Ok(FrameStatus::Skipped)
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface lost: {err}");
                        Err(RenderError::SurfaceLost(err))
                    }
                };
            }
        };

        self.backend.submit_pass(
            frame,
            &PassSpec {
                label: "mesh pass",
                clear: self.config.clear_color,
                pipeline: pipeline.pipeline(),
                vertex_buffer: mesh.buffer(),
                bind_group: pipeline.bind_group(),
                draw: DrawCall {
                    vertex_count: mesh.vertex_count(),
                    instance_count: 1,
                    first_vertex: 0,
                    first_instance: 0,
                },
            },
        );

        self.clock.tick();
        self.frames_presented += 1;
        scheduler.request_frame();
        Ok(FrameStatus::Presented)
    }

    /// Reconfigures the surface; the next frame uses the new aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.backend.resize(width, height);
    }

    /// Current animation angle in radians, in `[0, 2π)`.
    pub fn t(&self) -> f64 {
        self.animation.t()
    }

    pub fn is_ready(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn mesh(&self) -> Option<&TriangleMesh<B>> {
        self.mesh.as_ref()
    }

    pub fn material(&self) -> Option<&Material<B>> {
        self.material.as_ref()
    }

    pub fn pipeline(&self) -> Option<&PipelineState<B>> {
        self.pipeline.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Call, HeadlessSurface, RecordingBackend, RecordingRuntime};
    use crate::core::ManualScheduler;
    use crate::render::uniforms::MATRIX_SIZE;

    fn headless() -> (Renderer<RecordingBackend>, ManualScheduler) {
        let mut scheduler = ManualScheduler::new();
        let renderer = pollster::block_on(Renderer::<RecordingBackend>::initialize(
            &RecordingRuntime::default(),
            HeadlessSurface::default(),
            RendererConfig::default(),
            &mut scheduler,
        ))
        .expect("headless init");
        (renderer, scheduler)
    }

    #[test]
    fn initialize_schedules_first_frame() {
        let (renderer, mut scheduler) = headless();
        assert!(renderer.is_ready());
        assert!(scheduler.take_pending());
        assert_eq!(renderer.t(), 0.0);
    }

    #[test]
    fn pipeline_requires_assets() {
        let backend = RecordingBackend::new(800, 600, wgpu::TextureFormat::Bgra8UnormSrgb);
        let mut renderer = Renderer::with_backend(backend, RendererConfig::default()).expect("config");
        assert!(matches!(renderer.build_pipeline(), Err(RenderError::AssetsNotReady)));

        renderer.create_mesh();
        assert!(matches!(renderer.build_pipeline(), Err(RenderError::AssetsNotReady)));
        assert!(renderer.pipeline().is_none());

        pollster::block_on(renderer.load_material()).expect("material");
        assert!(renderer.build_pipeline().is_ok());
    }

    #[test]
    fn frame_before_pipeline_is_rejected() {
        let backend = RecordingBackend::new(800, 600, wgpu::TextureFormat::Bgra8UnormSrgb);
        let mut renderer = Renderer::with_backend(backend, RendererConfig::default()).expect("config");
        let mut scheduler = ManualScheduler::new();
        assert!(matches!(
            renderer.render_frame(&mut scheduler),
            Err(RenderError::NotInitialized)
        ));
        assert!(!scheduler.is_pending());
        assert_eq!(renderer.t(), 0.0);
    }

    #[test]
    fn frame_writes_three_matrices_then_submits() {
        let (mut renderer, mut scheduler) = headless();
        renderer.backend().clear_calls();

        let status = renderer.render_frame(&mut scheduler).expect("frame");
        assert_eq!(status, FrameStatus::Presented);

        let calls = renderer.backend().calls();
        assert_eq!(calls.len(), 5, "{calls:?}");
        let offsets: Vec<_> = calls[..3]
            .iter()
            .map(|c| match c {
                Call::WriteBuffer { offset, data, .. } => (*offset, data.len()),
                other => panic!("expected write, got {other:?}"),
            })
            .collect();
        let size = MATRIX_SIZE as usize;
        assert_eq!(
            offsets,
            vec![(MODEL_OFFSET, size), (VIEW_OFFSET, size), (PROJECTION_OFFSET, size)]
        );
        assert!(matches!(calls[3], Call::AcquireFrame { result: Ok(_) }));
        assert!(matches!(calls[4], Call::Submit(_)));
    }

    #[test]
    fn pass_clears_binds_and_draws_one_triangle() {
        let (mut renderer, mut scheduler) = headless();
        renderer.render_frame(&mut scheduler).expect("frame");

        let submissions = renderer.backend().submissions();
        assert_eq!(submissions.len(), 1);
        let pass = &submissions[0];
        let pipeline = renderer.pipeline().expect("pipeline");
        assert_eq!(pass.clear, wgpu::Color { r: 0.5, g: 0.0, b: 0.25, a: 1.0 });
        assert_eq!(pass.pipeline, *pipeline.pipeline());
        assert_eq!(pass.bind_group, *pipeline.bind_group());
        assert_eq!(pass.vertex_buffer, renderer.mesh().expect("mesh").buffer().id);
        assert_eq!(
            pass.draw,
            DrawCall { vertex_count: 3, instance_count: 1, first_vertex: 0, first_instance: 0 }
        );
    }

    #[test]
    fn outdated_surface_skips_and_reschedules() {
        let (mut renderer, mut scheduler) = headless();
        scheduler.take_pending();
        renderer.backend().fail_next_acquire(wgpu::SurfaceError::Outdated);

        let status = renderer.render_frame(&mut scheduler).expect("recoverable");
        assert_eq!(status, FrameStatus::Skipped);
        assert!(scheduler.take_pending());
        assert_eq!(renderer.frames_skipped(), 1);
        assert!(renderer.backend().calls().contains(&Call::Reconfigure));
        assert!(renderer.backend().submissions().is_empty());

        let status = renderer.render_frame(&mut scheduler).expect("next frame");
        assert_eq!(status, FrameStatus::Presented);
        assert!((renderer.t() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn out_of_memory_stops_the_loop() {
        let (mut renderer, mut scheduler) = headless();
        scheduler.take_pending();
        renderer.backend().fail_next_acquire(wgpu::SurfaceError::OutOfMemory);

        let err = renderer.render_frame(&mut scheduler).expect_err("fatal");
        assert!(matches!(err, RenderError::SurfaceLost(wgpu::SurfaceError::OutOfMemory)));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn resize_changes_projection_aspect() {
        let (mut renderer, mut scheduler) = headless();
        renderer.resize(600, 600);
        renderer.backend().clear_calls();
        renderer.render_frame(&mut scheduler).expect("frame");

        let uniforms = renderer.pipeline().expect("pipeline").uniform_buffer().id;
        let writes = renderer.backend().writes_to(uniforms);
        let (offset, bytes) = &writes[2];
        assert_eq!(*offset, 128);
        let m: &[f32] = bytemuck::cast_slice(bytes);
        // square surface: x and y focal scales are equal
        assert!((m[0] - m[5]).abs() < 1e-6);
    }

    #[test]
    fn invalid_config_fails_before_connecting() {
        let mut scheduler = ManualScheduler::new();
        let result = pollster::block_on(Renderer::<RecordingBackend>::initialize(
            &RecordingRuntime::default(),
            HeadlessSurface::default(),
            RendererConfig::default().with_step(-1.0),
            &mut scheduler,
        ));
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
        assert!(!scheduler.is_pending());
    }
}
