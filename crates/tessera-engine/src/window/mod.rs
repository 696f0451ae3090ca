//! Window + event loop.
//!
//! Owns the `winit` EventLoop and the window, builds the renderer against the
//! window surface, and turns redraw requests into frames.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowScheduler};
