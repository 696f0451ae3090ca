//! Host-facing frame contracts.
//!
//! The renderer draws one frame per callback and asks a [`FrameScheduler`] for
//! the next one. The winit runtime maps requests onto `request_redraw`;
//! headless hosts use [`ManualScheduler`].

mod schedule;

pub use schedule::{FrameScheduler, FrameStatus, ManualScheduler};
