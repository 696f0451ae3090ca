//! Frame timing.
//!
//! One `FrameClock` per renderer; tick it once per rendered frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameReport, FrameTime};
