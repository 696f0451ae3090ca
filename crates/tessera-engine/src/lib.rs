//! Tessera engine crate.
//!
//! A minimal wgpu render loop: it negotiates a device for a window surface,
//! uploads a textured triangle, builds one fixed pipeline, and redraws the
//! spinning triangle once per display refresh.
//!
//! GPU work goes through [`backend::RenderBackend`], implemented by the wgpu
//! [`device::Gpu`] and by the headless [`backend::RecordingBackend`].

pub mod assets;
pub mod backend;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

pub use error::RenderError;
pub use render::{Renderer, RendererConfig};
