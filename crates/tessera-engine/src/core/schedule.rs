/// Outcome of one frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame was drawn and presented.
    Presented,
    /// No surface image was available; nothing was drawn this time.
    Skipped,
}

/// Host-provided "run again on the next display refresh" interface.
///
/// The renderer holds no reference to itself: after each frame it asks the
/// scheduler for another callback, and the host invokes the renderer again.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler for hosts that drive frames themselves (headless loops, tests).
///
/// It only remembers whether a frame is pending.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the pending request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of requests seen.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_request_is_consumed_once() {
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.take_pending());

        scheduler.request_frame();
        scheduler.request_frame();
        assert!(scheduler.is_pending());
        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
        assert_eq!(scheduler.requests(), 2);
    }
}
