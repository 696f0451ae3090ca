//! GPU device + surface management.
//!
//! This module is responsible for:
//! - negotiating the wgpu Adapter/Device/Queue for a window surface
//! - choosing and configuring the surface format (swapchain)
//! - acquiring surface images and classifying acquisition failures
//! - the `GpuRuntime` seam renderers use to obtain a device

mod context;
mod error;
mod frame;
mod init;
mod runtime;
pub(crate) mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use runtime::{GpuRuntime, WgpuRuntime};
