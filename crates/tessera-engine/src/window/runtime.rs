use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{FrameScheduler, FrameStatus};
use crate::device::{Gpu, WgpuRuntime};
use crate::error::RenderError;
use crate::render::{Renderer, RendererConfig};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Maps frame requests onto winit redraw requests.
pub struct WindowScheduler<'a> {
    window: &'a Window,
}

impl<'a> WindowScheduler<'a> {
    pub fn new(window: &'a Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for WindowScheduler<'_> {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Entry point: opens one window and runs the renderer in it until the
/// window closes or the renderer fails.
pub struct Runtime;

impl Runtime {
    pub fn run(config: RuntimeConfig, renderer: RendererConfig) -> Result<()> {
        renderer.validate().context("invalid renderer configuration")?;

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(config, renderer);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(err) => Err(anyhow::Error::new(err).context("renderer stopped")),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[not_covariant]
    renderer: Renderer<Gpu<'this>>,
}

struct AppState {
    config: RuntimeConfig,
    renderer_config: RendererConfig,
    gpu: WgpuRuntime,

    entry: Option<WindowEntry>,
    failure: Option<RenderError>,
}

impl AppState {
    fn new(config: RuntimeConfig, renderer_config: RendererConfig) -> Self {
        Self {
            config,
            renderer_config,
            gpu: WgpuRuntime::new(),
            entry: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{err}");
        self.failure = Some(err);
        self.entry = None;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| RenderError::Surface(format!("failed to create window: {e}")))?;

        let gpu = &self.gpu;
        let renderer_config = self.renderer_config.clone();

        let entry = WindowEntryTryBuilder {
            window,
            renderer_builder: |w| {
                let mut scheduler = WindowScheduler::new(w);
                pollster::block_on(Renderer::initialize(gpu, w, renderer_config, &mut scheduler))
            },
        }
        .try_build()?;

        self.entry = Some(entry);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                entry.with_renderer_mut(|r| r.resize(size.width, size.height));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_renderer_mut(|r| r.resize(size.width, size.height));
            }

            WindowEvent::RedrawRequested => {
                let result = entry.with_mut(|fields| {
                    fields.window.pre_present_notify();
                    let mut scheduler = WindowScheduler::new(fields.window);
                    fields.renderer.render_frame(&mut scheduler)
                });

                match result {
                    Ok(FrameStatus::Presented) => {}
                    Ok(FrameStatus::Skipped) => log::debug!("frame skipped"),
                    Err(err) => self.fail(event_loop, err),
                }
            }

            _ => {}
        }
    }
}
